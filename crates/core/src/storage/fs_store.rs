//! File system object store.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::error::StorageError;
use super::{validate_object_path, ObjectStore, StoredObject};

/// Object store backed by a local directory.
///
/// The bucket lives at `{root}/{bucket}`; an object path maps onto nested
/// directories below it.
pub struct FsObjectStore {
    root: PathBuf,
    bucket: String,
}

impl FsObjectStore {
    /// Creates a store writing into `{root}/{bucket}`.
    pub fn new(root: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            bucket: bucket.into(),
        }
    }

    /// Directory holding the bucket's objects.
    pub fn bucket_dir(&self) -> PathBuf {
        self.root.join(&self.bucket)
    }

    /// Local path of an object.
    pub fn object_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .fold(self.bucket_dir(), |acc, segment| acc.join(segment))
    }

    async fn ensure_parent_dirs(path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Writes to a sibling temp file, then renames over the destination.
    async fn write_atomic(destination: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        let file_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp = destination.with_file_name(format!(".{}.{}.part", file_name, uuid::Uuid::new_v4()));

        let write_err = |e| StorageError::WriteFailed {
            path: destination.to_path_buf(),
            source: e,
        };

        let mut file = File::create(&temp).await.map_err(write_err)?;
        file.write_all(bytes).await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        drop(file);

        if let Err(e) = fs::rename(&temp, destination).await {
            let _ = fs::remove_file(&temp).await;
            return Err(write_err(e));
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    fn name(&self) -> &str {
        "filesystem"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, path: &str, bytes: &[u8]) -> Result<StoredObject, StorageError> {
        validate_object_path(path)?;

        let destination = self.object_path(path);
        Self::ensure_parent_dirs(&destination).await?;
        Self::write_atomic(&destination, bytes).await?;

        debug!(path = %destination.display(), bytes = bytes.len(), "Stored object");
        Ok(StoredObject::describe(path, bytes))
    }
}
