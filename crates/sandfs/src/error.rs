//! Error types for sandboxed file operations.

use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds for every file operation, surfaced as a closed set rather
/// than raw OS errors. The API layer maps these to HTTP statuses; nothing in
/// this crate logs or retries.
#[derive(Debug, Error)]
pub enum FsError {
    /// The resolved path would land outside the sandbox root.
    #[error("invalid path: traversal outside root is not allowed")]
    PathTraversal,

    /// The path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// A file operation was attempted on a directory.
    #[error("path is a directory: {0}")]
    IsADirectory(PathBuf),

    /// A directory operation was attempted on a non-directory.
    #[error("path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The destination already exists and overwriting was not requested.
    #[error("already exists: {0}")]
    AlreadyExists(PathBuf),

    /// Non-recursive delete of a directory that still has entries.
    #[error("directory not empty: {0}")]
    DirectoryNotEmpty(PathBuf),

    /// Rename was requested with a blank destination name.
    #[error("missing new name")]
    MissingNewName,

    /// Any other I/O failure, passed through unclassified.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    /// Stable machine code for remote clients, when the kind has one.
    ///
    /// Unclassified I/O failures carry no code; clients treat those as a
    /// generic failure.
    pub fn code(&self) -> Option<&'static str> {
        match self {
            FsError::PathTraversal => Some("PATH_TRAVERSAL"),
            FsError::NotFound(_) => Some("FILE_NOT_FOUND"),
            FsError::IsADirectory(_) => Some("FILE_IS_DIRECTORY"),
            FsError::NotADirectory(_) => Some("NOT_A_DIRECTORY"),
            FsError::AlreadyExists(_) => Some("FILE_EXISTS"),
            FsError::DirectoryNotEmpty(_) => Some("DIRECTORY_NOT_EMPTY"),
            FsError::MissingNewName => Some("MISSING_NEW_NAME"),
            FsError::Io(err) if err.kind() == std::io::ErrorKind::PermissionDenied => {
                Some("NO_PERMISSIONS")
            }
            FsError::Io(_) => None,
        }
    }

    /// True when the underlying failure is a permission error.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, FsError::Io(err) if err.kind() == std::io::ErrorKind::PermissionDenied)
    }
}

/// Result type alias for sandboxed file operations.
pub type FsResult<T> = std::result::Result<T, FsError>;
