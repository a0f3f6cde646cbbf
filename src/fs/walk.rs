//! Directory enumeration helpers.
use std::ffi::OsString;
use std::path::Path;

/// Names of the immediate children of `dir`, sorted bytewise.
///
/// Sorting makes visit order independent of the order the filesystem returns.
///
/// # Errors
///
/// Returns an IO error if the directory cannot be opened or read.
pub fn read_dir_sorted(dir: &Path) -> std::io::Result<Vec<OsString>> {
    let mut names = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<Vec<_>>>()?;
    names.sort_unstable();
    Ok(names)
}
