//! Filesystem metadata probes used by the traversal engine.
//!
//! This module provides non-mutating probes for:
//! - `observe(path, follow)`: capture identity and ownership in one path-based stat
//! - `observe_at(dir, name, follow)`: the same, relative to an open directory
//! - `observe_fd(fd)`: the same, for an open handle
//! - `root_identity()`: identity of `/` for root protection
//! - `resolve_symlink_target(path)`: resolve a symlink target to a path usable for descent
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use rustix::fd::BorrowedFd;
use rustix::fs::{fstat, statat, AtFlags, Stat};

use super::handle::{c_name, errno_to_io};
use crate::constants::FS_ROOT;
use crate::types::{EntryIdentity, FileKind, OwnershipInfo};

/// Identity and ownership captured by one stat of a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observed {
    pub identity: EntryIdentity,
    pub owner: OwnershipInfo,
}

impl Observed {
    #[must_use]
    pub fn from_metadata(md: &std::fs::Metadata) -> Self {
        Self {
            identity: EntryIdentity::from_metadata(md),
            owner: OwnershipInfo::from_metadata(md),
        }
    }

    #[must_use]
    #[allow(clippy::unnecessary_cast, reason = "stat field widths differ between targets")]
    pub fn from_stat(st: &Stat) -> Self {
        Self {
            identity: EntryIdentity {
                dev: st.st_dev as u64,
                ino: st.st_ino as u64,
                kind: FileKind::from_raw_mode(st.st_mode as u32),
            },
            owner: OwnershipInfo {
                uid: st.st_uid as u32,
                gid: st.st_gid as u32,
            },
        }
    }
}

/// Stat `path`, following a final symlink when `follow` is set.
///
/// # Errors
///
/// Returns the IO error from stat/lstat.
pub fn observe(path: &Path, follow: bool) -> std::io::Result<Observed> {
    let md = if follow {
        std::fs::metadata(path)?
    } else {
        std::fs::symlink_metadata(path)?
    };
    Ok(Observed::from_metadata(&md))
}

/// Stat `name` relative to the open directory `dir`.
///
/// # Errors
///
/// Returns the IO error from fstatat.
pub fn observe_at(dir: BorrowedFd<'_>, name: &OsStr, follow: bool) -> std::io::Result<Observed> {
    let c = c_name(name)?;
    let flags = if follow {
        AtFlags::empty()
    } else {
        AtFlags::SYMLINK_NOFOLLOW
    };
    let st = statat(dir, c.as_c_str(), flags).map_err(errno_to_io)?;
    Ok(Observed::from_stat(&st))
}

/// Stat an open handle.
///
/// # Errors
///
/// Returns the IO error from fstat.
pub fn observe_fd(fd: BorrowedFd<'_>) -> std::io::Result<Observed> {
    fstat(fd).map(|st| Observed::from_stat(&st)).map_err(errno_to_io)
}

/// Identity of the filesystem root, or `None` if `/` cannot be statted.
#[must_use]
pub fn root_identity() -> Option<EntryIdentity> {
    std::fs::metadata(FS_ROOT)
        .ok()
        .map(|md| EntryIdentity::from_metadata(&md))
}

/// If `target` is a symlink, resolve it to the canonical path of its final referent.
/// Relative links are resolved relative to the parent directory of `target`.
#[must_use]
pub fn resolve_symlink_target(target: &Path) -> Option<PathBuf> {
    let md = std::fs::symlink_metadata(target).ok()?;
    if !md.file_type().is_symlink() {
        return None;
    }
    let mut link = std::fs::read_link(target).ok()?;
    if link.is_relative() {
        if let Some(parent) = target.parent() {
            link = parent.join(link);
        }
    }
    Some(std::fs::canonicalize(&link).unwrap_or(link))
}
