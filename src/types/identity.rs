//! Identity of a filesystem object, independent of the path used to reach it.
use serde::Serialize;

/// Coarse file type derived from the `S_IFMT` bits of a stat result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    /// Device nodes, FIFOs, sockets.
    Other,
}

impl FileKind {
    #[must_use]
    pub fn from_std(ft: std::fs::FileType) -> Self {
        if ft.is_symlink() {
            FileKind::Symlink
        } else if ft.is_dir() {
            FileKind::Directory
        } else if ft.is_file() {
            FileKind::Regular
        } else {
            FileKind::Other
        }
    }

    #[must_use]
    pub fn from_raw_mode(mode: u32) -> Self {
        use rustix::fs::FileType;
        match FileType::from_raw_mode(mode as rustix::fs::RawMode) {
            FileType::RegularFile => FileKind::Regular,
            FileType::Directory => FileKind::Directory,
            FileType::Symlink => FileKind::Symlink,
            _ => FileKind::Other,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FileKind::Regular => "file",
            FileKind::Directory => "dir",
            FileKind::Symlink => "symlink",
            FileKind::Other => "other",
        }
    }
}

/// `{device, inode, file type}` captured once when an entry is first observed.
///
/// Two identities refer to the same object when device and inode agree; the
/// kind is carried along so the change operator can pick open flags without
/// re-statting the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct EntryIdentity {
    pub dev: u64,
    pub ino: u64,
    pub kind: FileKind,
}

impl EntryIdentity {
    #[must_use]
    pub fn from_metadata(md: &std::fs::Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;
        Self {
            dev: md.dev(),
            ino: md.ino(),
            kind: FileKind::from_std(md.file_type()),
        }
    }

    /// True when both identities name the same filesystem object.
    #[must_use]
    pub const fn same_object(&self, other: &EntryIdentity) -> bool {
        self.dev == other.dev && self.ino == other.ino
    }
}
