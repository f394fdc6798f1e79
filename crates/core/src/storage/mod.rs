//! Object storage for accepted submissions.
//!
//! This module provides the `ObjectStore` trait, a write-only view of a
//! bucket, and two implementations:
//!
//! - [`FsObjectStore`]: one directory per bucket on the local file system
//! - [`HttpObjectStore`]: `PUT` uploads against a bucket HTTP API (GCS XML
//!   API, S3-compatible endpoints)
//!
//! Objects are addressed by a `/`-separated path that [`ArtifactLocation`]
//! derives deterministically from the submission event.
//!
//! # Example
//!
//! ```ignore
//! use handin_core::storage::{ArtifactLocation, FsObjectStore, ObjectStore};
//!
//! let store = FsObjectStore::new("/srv/buckets", "submissions");
//! let location = ArtifactLocation::new(&event, "test.zip", store.bucket(), base_url);
//! let stored = store.put(&location.object_path, &bytes).await?;
//! println!("Stored {} bytes at {}", stored.size_bytes, location.public_url);
//! ```

mod error;
mod fs_store;
mod http_store;
mod location;

pub use error::StorageError;
pub use fs_store::FsObjectStore;
pub use http_store::HttpObjectStore;
pub use location::{file_name_from_url, ArtifactLocation, FALLBACK_FILE_NAME};

use async_trait::async_trait;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// An object that was written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    /// Path of the object inside the bucket.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Hex SHA-256 of the content.
    pub sha256: String,
}

impl StoredObject {
    pub(crate) fn describe(path: &str, bytes: &[u8]) -> Self {
        Self {
            path: path.to_string(),
            size_bytes: bytes.len() as u64,
            sha256: format!("{:x}", Sha256::digest(bytes)),
        }
    }
}

/// A bucket that objects can be written into.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns the name of this store implementation.
    fn name(&self) -> &str;

    /// Bucket the store writes into.
    fn bucket(&self) -> &str;

    /// Write `bytes` at `path`, replacing any existing object.
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<StoredObject, StorageError>;
}

/// Check that an object path is relative and free of traversal segments.
pub(crate) fn validate_object_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return Err(StorageError::invalid_path(path, "must be a relative '/'-separated path"));
    }
    if path
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(StorageError::invalid_path(
            path,
            "must not contain empty, '.' or '..' segments",
        ));
    }
    Ok(())
}
