use thiserror::Error;

use crate::types::FailureReason;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Recursive operation reached the filesystem root with protection enabled.
    #[error("it is dangerous to operate recursively on '{0}' (root protection is enabled)")]
    RootProtected(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    #[error("filesystem error: {0}")]
    FilesystemError(String),
}

impl From<crate::types::errors::Error> for ApiError {
    fn from(e: crate::types::errors::Error) -> Self {
        use crate::types::errors::ErrorKind::{Identity, Io};
        match e.kind {
            Io => ApiError::FilesystemError(e.msg),
            Identity => ApiError::InvalidSpec(e.msg),
        }
    }
}

// Stable identifiers carried in emitted facts.
#[allow(non_camel_case_types, reason = "error ids are emitted verbatim")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorId {
    E_INODE_CHANGED,
    E_PERMISSION,
    E_IO,
    E_ROOT_PROTECTED,
    E_CONFIG,
    E_SPEC,
    E_GENERIC,
}

#[must_use]
pub const fn id_str(id: ErrorId) -> &'static str {
    match id {
        ErrorId::E_INODE_CHANGED => "E_INODE_CHANGED",
        ErrorId::E_PERMISSION => "E_PERMISSION",
        ErrorId::E_IO => "E_IO",
        ErrorId::E_ROOT_PROTECTED => "E_ROOT_PROTECTED",
        ErrorId::E_CONFIG => "E_CONFIG",
        ErrorId::E_SPEC => "E_SPEC",
        ErrorId::E_GENERIC => "E_GENERIC",
    }
}

impl ErrorId {
    #[must_use]
    pub const fn for_reason(reason: &FailureReason) -> Self {
        match reason {
            FailureReason::InodeChanged => ErrorId::E_INODE_CHANGED,
            FailureReason::PermissionDenied => ErrorId::E_PERMISSION,
            FailureReason::Io(_)
            | FailureReason::CannotDereference(_)
            | FailureReason::CannotReadDir(_) => ErrorId::E_IO,
        }
    }

    #[must_use]
    pub const fn for_error(err: &ApiError) -> Self {
        match err {
            ApiError::RootProtected(_) => ErrorId::E_ROOT_PROTECTED,
            ApiError::InvalidConfig(_) => ErrorId::E_CONFIG,
            ApiError::InvalidSpec(_) => ErrorId::E_SPEC,
            ApiError::FilesystemError(_) => ErrorId::E_IO,
        }
    }
}
