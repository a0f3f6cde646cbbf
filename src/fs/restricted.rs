//! Race-safe ownership change for a single entry.
//!
//! With an ownership filter in effect the change is made through a handle:
//! `openat(parent, name) -> fstat(fd) -> compare {dev, ino} -> re-check filter -> fchown(fd) -> close(fd)`.
//! Once the handle is open, swapping the path cannot redirect the change to another object.
//! Without a filter the ordinary path-based chown/lchown is used.
use std::ffi::{CStr, OsStr};
use std::path::Path;

use rustix::fd::{AsFd, BorrowedFd, OwnedFd};
use rustix::fs::{openat, Mode, OFlags, CWD};
use rustix::io::Errno;

use super::handle::{c_name, close_checked, errno_to_io, open_parent};
use super::meta::{observe_fd, Observed};
use crate::types::{
    ChangeOutcome, EntryIdentity, FailureReason, FileKind, OwnershipFilter, OwnershipInfo,
    OwnershipSpec,
};

/// Result of opening an entry relative to its parent directory.
#[derive(Debug)]
pub enum OpenOutcome {
    Opened(OwnedFd),
    /// EACCES on every attempted access mode.
    PermissionDenied,
    Failed(Errno),
}

/// Open `name` under `parent` read-only, retrying write-only for a regular file
/// that refused read access. Ownership changes need neither, but `open` needs one.
pub fn open_entry<Fd: AsFd>(parent: Fd, name: &CStr, kind: FileKind, follow: bool) -> OpenOutcome {
    let mut flags = OFlags::NONBLOCK | OFlags::NOCTTY | OFlags::CLOEXEC;
    if kind == FileKind::Directory {
        flags |= OFlags::DIRECTORY;
    }
    if !follow {
        flags |= OFlags::NOFOLLOW;
    }
    match openat(&parent, name, OFlags::RDONLY | flags, Mode::empty()) {
        Ok(fd) => return OpenOutcome::Opened(fd),
        Err(e) if e == Errno::ACCESS && kind == FileKind::Regular => {}
        Err(e) if e == Errno::ACCESS => return OpenOutcome::PermissionDenied,
        Err(e) => return OpenOutcome::Failed(e),
    }
    match openat(&parent, name, OFlags::WRONLY | flags, Mode::empty()) {
        Ok(fd) => OpenOutcome::Opened(fd),
        Err(e) if e == Errno::ACCESS => OpenOutcome::PermissionDenied,
        Err(e) => OpenOutcome::Failed(e),
    }
}

/// Status of a handle-based change attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum RestrictedStatus {
    /// fchown succeeded; `live` is the ownership read from the handle before the change.
    Changed { live: OwnershipInfo },
    /// The live ownership read from the handle no longer matches the filter.
    Excluded { live: OwnershipInfo },
    InodeChanged,
    /// A handle is not available or not meaningful; use the path-based change.
    DoOrdinaryChown,
    Error(FailureReason),
}

#[derive(Debug)]
pub struct Restricted {
    pub status: RestrictedStatus,
    /// close(2) failed after the handle was used.
    pub close_error: Option<std::io::Error>,
}

impl Restricted {
    const fn status(status: RestrictedStatus) -> Self {
        Self {
            status,
            close_error: None,
        }
    }
}

/// Change ownership of `name` under `parent` through a handle, provided it is still
/// the object described by `expected` and its live ownership still passes `filter`.
pub fn restricted_chown(
    parent: BorrowedFd<'_>,
    name: &OsStr,
    expected: &EntryIdentity,
    spec: &OwnershipSpec,
    filter: &OwnershipFilter,
    follow: bool,
) -> Restricted {
    if filter.is_unrestricted() {
        return Restricted::status(RestrictedStatus::DoOrdinaryChown);
    }
    if !matches!(expected.kind, FileKind::Regular | FileKind::Directory) {
        return Restricted::status(RestrictedStatus::DoOrdinaryChown);
    }
    let Ok(cname) = c_name(name) else {
        return Restricted::status(RestrictedStatus::Error(FailureReason::Io(
            "invalid path".into(),
        )));
    };

    let fd = match open_entry(parent, cname.as_c_str(), expected.kind, follow) {
        OpenOutcome::Opened(fd) => fd,
        OpenOutcome::PermissionDenied => {
            return Restricted::status(RestrictedStatus::DoOrdinaryChown)
        }
        // O_NOFOLLOW hit a symlink where a file or directory was observed.
        OpenOutcome::Failed(e) if e == Errno::LOOP && !follow => {
            return Restricted::status(RestrictedStatus::InodeChanged)
        }
        // O_DIRECTORY hit a non-directory where a directory was observed.
        OpenOutcome::Failed(e) if e == Errno::NOTDIR => {
            return Restricted::status(RestrictedStatus::InodeChanged)
        }
        OpenOutcome::Failed(e) => {
            return Restricted::status(RestrictedStatus::Error(classify_errno(e)))
        }
    };

    let status = match observe_fd(fd.as_fd()) {
        Err(e) => RestrictedStatus::Error(classify_io(&e)),
        Ok(opened) => {
            let live = opened.owner;
            if !opened.identity.same_object(expected) {
                RestrictedStatus::InodeChanged
            } else if !filter.matches_info(&live) {
                RestrictedStatus::Excluded { live }
            } else {
                match std::os::unix::fs::fchown(&fd, spec.owner, spec.group) {
                    Ok(()) => RestrictedStatus::Changed { live },
                    Err(e) => RestrictedStatus::Error(classify_io(&e)),
                }
            }
        }
    };
    Restricted {
        status,
        close_error: close_checked(fd).err(),
    }
}

/// Path-based chown (`follow`) or lchown.
///
/// # Errors
///
/// Returns the IO error from chown/lchown.
pub fn ordinary_chown(path: &Path, spec: &OwnershipSpec, follow: bool) -> std::io::Result<()> {
    if follow {
        std::os::unix::fs::chown(path, spec.owner, spec.group)
    } else {
        std::os::unix::fs::lchown(path, spec.owner, spec.group)
    }
}

/// Translate an OS error into the failure taxonomy.
#[must_use]
pub fn classify_io(e: &std::io::Error) -> FailureReason {
    match e.raw_os_error() {
        Some(code) if code == libc::EPERM || code == libc::EACCES => FailureReason::PermissionDenied,
        _ => FailureReason::Io(e.to_string()),
    }
}

fn classify_errno(e: Errno) -> FailureReason {
    classify_io(&errno_to_io(e))
}

fn is_unsupported(e: &std::io::Error) -> bool {
    matches!(e.raw_os_error(), Some(code) if code == libc::ENOTSUP || code == libc::EOPNOTSUPP)
}

/// Outcome of `change_owner` for one entry.
#[derive(Debug, PartialEq, Eq)]
pub struct ChangeResult {
    pub outcome: ChangeOutcome,
    pub reason: Option<FailureReason>,
    /// Ownership the change started from: read through the handle when one was
    /// used, otherwise the scan-time observation.
    pub before: OwnershipInfo,
    pub secondary: Option<String>,
}

impl ChangeResult {
    const fn outcome(outcome: ChangeOutcome, before: OwnershipInfo) -> Self {
        Self {
            outcome,
            reason: None,
            before,
            secondary: None,
        }
    }

    const fn failed(reason: FailureReason, before: OwnershipInfo) -> Self {
        Self {
            outcome: ChangeOutcome::Failed,
            reason: Some(reason),
            before,
            secondary: None,
        }
    }

    fn applied(spec: &OwnershipSpec, before: OwnershipInfo) -> Self {
        if spec.retains(&before) {
            Self::outcome(ChangeOutcome::NoChangeRequested, before)
        } else {
            Self::outcome(ChangeOutcome::Succeeded, before)
        }
    }
}

/// Apply `spec` to the entry at `path` last observed as `observed`.
///
/// `parent` is a handle on the directory containing `path`; when absent and a
/// handle-based change is needed, the parent is opened here. A path without a
/// final name (`.`, `..`, `/`, `dir/..`) is opened as a whole from the working
/// directory. `follow` selects whether a final symlink is dereferenced.
pub fn change_owner(
    path: &Path,
    parent: Option<BorrowedFd<'_>>,
    observed: &Observed,
    spec: &OwnershipSpec,
    filter: &OwnershipFilter,
    follow: bool,
) -> ChangeResult {
    let scanned = observed.owner;
    if !filter.matches_info(&scanned) {
        return ChangeResult::outcome(ChangeOutcome::NoChangeRequested, scanned);
    }

    let mut secondary = None;
    if !filter.is_unrestricted() {
        let expected = &observed.identity;
        let r = match (parent, path.file_name()) {
            (Some(dir), Some(name)) => restricted_chown(dir, name, expected, spec, filter, follow),
            (None, Some(name)) => match open_parent(path) {
                Ok(dir) => restricted_chown(dir.as_fd(), name, expected, spec, filter, follow),
                Err(e) => return ChangeResult::failed(classify_io(&e), scanned),
            },
            (_, None) => restricted_chown(CWD, path.as_os_str(), expected, spec, filter, follow),
        };
        if let Some(e) = r.close_error {
            secondary = Some(format!("close failed: {e}"));
        }
        let mut res = match r.status {
            RestrictedStatus::Changed { live } => ChangeResult::applied(spec, live),
            RestrictedStatus::Excluded { live } => {
                ChangeResult::outcome(ChangeOutcome::NoChangeRequested, live)
            }
            RestrictedStatus::InodeChanged => {
                ChangeResult::failed(FailureReason::InodeChanged, scanned)
            }
            RestrictedStatus::Error(reason) => ChangeResult::failed(reason, scanned),
            RestrictedStatus::DoOrdinaryChown => {
                return ordinary_change(path, spec, scanned, follow, secondary)
            }
        };
        res.secondary = secondary;
        return res;
    }
    ordinary_change(path, spec, scanned, follow, secondary)
}

fn ordinary_change(
    path: &Path,
    spec: &OwnershipSpec,
    before: OwnershipInfo,
    follow: bool,
    secondary: Option<String>,
) -> ChangeResult {
    let mut res = match ordinary_chown(path, spec, follow) {
        Ok(()) => ChangeResult::applied(spec, before),
        Err(e) if !follow && is_unsupported(&e) => {
            ChangeResult::outcome(ChangeOutcome::NotApplied, before)
        }
        Err(e) => ChangeResult::failed(classify_io(&e), before),
    };
    res.secondary = secondary;
    res
}
