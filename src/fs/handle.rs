//! Directory and entry handle primitives.
//!
//! Mutations that must not be redirected by a path swap go through handles:
//! `open_dir(parent) -> openat(parent, name) -> fstat(fd) -> fchown(fd) -> close(fd)`.
use std::ffi::{CString, OsStr};
use std::path::Path;

use rustix::fd::OwnedFd;
use rustix::fs::{openat, Mode, OFlags, CWD};
use rustix::io::Errno;

pub(crate) fn errno_to_io(e: Errno) -> std::io::Error {
    std::io::Error::from_raw_os_error(e.raw_os_error())
}

/// Convert a path or name into a NUL-terminated string for `*at` calls.
///
/// # Errors
///
/// Returns `InvalidInput` if the bytes contain an interior NUL.
pub fn c_name(name: &OsStr) -> std::io::Result<CString> {
    use std::os::unix::ffi::OsStrExt;
    CString::new(name.as_bytes())
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "invalid path"))
}

/// Open a directory with `O_DIRECTORY`, adding `O_NOFOLLOW` unless `follow` is set.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be opened.
pub fn open_dir(dir: &Path, follow: bool) -> std::io::Result<OwnedFd> {
    let c = c_name(dir.as_os_str())?;
    let mut flags = OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC;
    if !follow {
        flags |= OFlags::NOFOLLOW;
    }
    openat(CWD, c.as_c_str(), flags, Mode::empty()).map_err(errno_to_io)
}

/// Open the directory containing `path`; `.` for a bare name.
///
/// # Errors
///
/// Returns an IO error if the parent cannot be opened.
pub fn open_parent(path: &Path) -> std::io::Result<OwnedFd> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    open_dir(parent, true)
}

/// Close `fd` and report the result of close(2).
///
/// Dropping an `OwnedFd` discards close errors; callers that must surface them
/// release the descriptor here instead.
///
/// # Errors
///
/// Returns the OS error reported by close(2).
#[allow(unsafe_code)]
pub fn close_checked(fd: OwnedFd) -> std::io::Result<()> {
    use std::os::fd::IntoRawFd;
    let raw = fd.into_raw_fd();
    // SAFETY: `raw` was released from an `OwnedFd` above, so it is open and
    // owned exclusively here; it is not used again after this call.
    let rc = unsafe { libc::close(raw) };
    if rc == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}
