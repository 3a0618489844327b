//! Error types for explorer operations.
//!
//! Traversal failures never surface through these: unreadable subtrees
//! simply contribute nothing. They cover the outer surfaces only, such as
//! validating a scan root, serializing rescans and deleting entries.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur around scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A scan was requested while another one is still running.
    #[error("A scan of {root} is already in progress")]
    ScanInProgress { root: PathBuf },

    /// The scan worker was torn down before producing a result.
    #[error("Scan interrupted")]
    Interrupted,

    /// Removing a path failed.
    #[error("Failed to delete {path}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// Create a deletion error.
    pub fn delete_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DeleteFailed {
            path: path.into(),
            source,
        }
    }
}
