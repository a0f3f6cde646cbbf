//! Per-entry outcome classification consumed by the change reporter.
use std::path::PathBuf;

use serde::Serialize;

use super::ownership::OwnershipInfo;

/// What happened to one entry. Produced once per visited entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOutcome {
    /// The change was applied and the ownership is now different.
    Succeeded,
    Failed,
    /// The platform refused to alter the symlink itself (ENOTSUP); not a hard failure.
    NotApplied,
    /// Filtered out, or the requested ownership equals the current one.
    NoChangeRequested,
}

impl ChangeOutcome {
    /// Whether this outcome keeps the aggregate run result true.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        !matches!(self, ChangeOutcome::Failed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ChangeOutcome::Succeeded => "succeeded",
            ChangeOutcome::Failed => "failed",
            ChangeOutcome::NotApplied => "not_applied",
            ChangeOutcome::NoChangeRequested => "no_change_requested",
        }
    }
}

/// Why an entry failed. Raw errno values never leave the `fs` layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// The path named a different object at change time than at observation time.
    InodeChanged,
    PermissionDenied,
    Io(String),
    /// A symlink had to be followed but its referent is missing or unreadable.
    CannotDereference(String),
    /// Children of a directory could not be enumerated.
    CannotReadDir(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::InodeChanged => f.write_str("inode changed"),
            FailureReason::PermissionDenied => f.write_str("Operation not permitted"),
            FailureReason::Io(e) => f.write_str(e),
            FailureReason::CannotDereference(e) => write!(f, "cannot dereference: {e}"),
            FailureReason::CannotReadDir(e) => write!(f, "cannot read directory: {e}"),
        }
    }
}

/// One processed entry, in visit order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    pub path: PathBuf,
    pub outcome: ChangeOutcome,
    pub reason: Option<FailureReason>,
    /// Ownership observed before the change; absent when the entry could not be statted.
    pub before: Option<OwnershipInfo>,
    /// A failure that happened after the change itself took effect (e.g. close(2)).
    pub secondary: Option<String>,
}

impl EntryRecord {
    pub(crate) fn new(path: PathBuf, outcome: ChangeOutcome, before: Option<OwnershipInfo>) -> Self {
        Self {
            path,
            outcome,
            reason: None,
            before,
            secondary: None,
        }
    }

    pub(crate) fn failed(path: PathBuf, reason: FailureReason, before: Option<OwnershipInfo>) -> Self {
        Self {
            path,
            outcome: ChangeOutcome::Failed,
            reason: Some(reason),
            before,
            secondary: None,
        }
    }

    /// True when the entry counts against the aggregate result.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        !self.outcome.is_ok() || self.secondary.is_some()
    }
}
