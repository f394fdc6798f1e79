//! Error types for the storage module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing an object.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object path is not acceptable.
    #[error("Invalid object path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Failed to create the directory holding an object.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write object content.
    #[error("Failed to write object to {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage service refused the upload.
    #[error("Upload of '{path}' rejected with HTTP {status}: {message}")]
    Rejected {
        path: String,
        status: u16,
        message: String,
    },

    /// The storage service could not be reached.
    #[error("Storage request failed: {0}")]
    Request(String),
}

impl StorageError {
    /// Creates an invalid path error.
    pub fn invalid_path(path: &str, reason: &str) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}
