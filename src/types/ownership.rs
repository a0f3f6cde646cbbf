//! Ownership values: what an entry has, what the caller wants, and which entries qualify.
//! Centralized under `crate::types` for cross-layer reuse.
use std::path::Path;

use serde::Serialize;

use super::errors::{Error, ErrorKind, Result};

/// Numeric owner and group observed on a filesystem entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OwnershipInfo {
    pub uid: u32,
    pub gid: u32,
}

impl OwnershipInfo {
    #[must_use]
    pub fn from_metadata(md: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            uid: md.uid(),
            gid: md.gid(),
        }
    }
}

/// Requested new ownership. `None` leaves that attribute unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OwnershipSpec {
    pub owner: Option<u32>,
    pub group: Option<u32>,
}

impl OwnershipSpec {
    #[must_use]
    pub const fn new(owner: Option<u32>, group: Option<u32>) -> Self {
        Self { owner, group }
    }

    /// Use the owner and group of `reference` (following symlinks).
    ///
    /// # Errors
    ///
    /// Returns an IO error if `reference` cannot be statted.
    pub fn from_reference(reference: &Path) -> Result<Self> {
        let md = std::fs::metadata(reference).map_err(|e| {
            Error::new(
                ErrorKind::Io,
                format!("failed to get attributes of '{}': {e}", reference.display()),
            )
        })?;
        let info = OwnershipInfo::from_metadata(&md);
        Ok(Self {
            owner: Some(info.uid),
            group: Some(info.gid),
        })
    }

    /// True when applying this spec to `current` would leave it as it is.
    #[must_use]
    pub fn retains(&self, current: &OwnershipInfo) -> bool {
        self.owner.map_or(true, |u| u == current.uid) && self.group.map_or(true, |g| g == current.gid)
    }
}

/// Only entries currently owned by `owner` and/or `group` qualify for a change.
/// `None` imposes no constraint on that attribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OwnershipFilter {
    pub owner: Option<u32>,
    pub group: Option<u32>,
}

impl OwnershipFilter {
    #[must_use]
    pub const fn new(owner: Option<u32>, group: Option<u32>) -> Self {
        Self { owner, group }
    }

    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        self.owner.is_none() && self.group.is_none()
    }

    /// Each present field must equal the live value; the fields are independent.
    #[must_use]
    pub fn matches(&self, uid: u32, gid: u32) -> bool {
        self.owner.map_or(true, |u| u == uid) && self.group.map_or(true, |g| g == gid)
    }

    #[must_use]
    pub fn matches_info(&self, info: &OwnershipInfo) -> bool {
        self.matches(info.uid, info.gid)
    }
}

/// Result of resolving one side of a user-supplied `OWNER[:GROUP]` string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdLookup {
    /// The attribute was not given.
    NotSpecified,
    Resolved(u32),
    /// The given name is unknown and not numeric.
    Failed(String),
}

impl IdLookup {
    /// Collapse into the optional id used by `OwnershipSpec`/`OwnershipFilter`.
    ///
    /// # Errors
    ///
    /// Returns an `Identity` error carrying `what` and the unresolved name.
    pub fn into_option(self, what: &str) -> Result<Option<u32>> {
        match self {
            IdLookup::NotSpecified => Ok(None),
            IdLookup::Resolved(id) => Ok(Some(id)),
            IdLookup::Failed(name) => Err(Error::new(
                ErrorKind::Identity,
                format!("invalid {what}: '{name}'"),
            )),
        }
    }
}
