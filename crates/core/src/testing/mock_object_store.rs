//! Mock object store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::{validate_object_path, ObjectStore, StorageError, StoredObject};

/// Mock implementation of the ObjectStore trait.
///
/// Objects are kept in memory; every successful write is recorded.
#[derive(Debug, Clone)]
pub struct MockObjectStore {
    bucket: String,
    /// Stored objects keyed by path.
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    /// Successful writes, in order.
    writes: Arc<RwLock<Vec<StoredObject>>>,
    /// If set, the next put will fail with this error.
    next_error: Arc<RwLock<Option<StorageError>>>,
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new("submissions")
    }
}

impl MockObjectStore {
    /// Create an empty store for `bucket`.
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Arc::new(RwLock::new(HashMap::new())),
            writes: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Get all recorded writes.
    pub async fn recorded_writes(&self) -> Vec<StoredObject> {
        self.writes.read().await.clone()
    }

    /// Get the number of successful writes.
    pub async fn write_count(&self) -> usize {
        self.writes.read().await.len()
    }

    /// Content stored at `path`.
    pub async fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(path).cloned()
    }

    /// Configure the next put to fail with the given error.
    pub async fn set_next_error(&self, error: StorageError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    fn name(&self) -> &str {
        "mock"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, path: &str, bytes: &[u8]) -> Result<StoredObject, StorageError> {
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        validate_object_path(path)?;

        let stored = StoredObject::describe(path, bytes);
        self.objects
            .write()
            .await
            .insert(path.to_string(), bytes.to_vec());
        self.writes.write().await.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_records_object() {
        let store = MockObjectStore::new("bucket");
        let stored = store.put("A_B/hw1/attempt_1/x.zip", b"zip").await.unwrap();

        assert_eq!(stored.size_bytes, 3);
        assert_eq!(store.write_count().await, 1);
        assert_eq!(
            store.object("A_B/hw1/attempt_1/x.zip").await,
            Some(b"zip".to_vec())
        );
    }

    #[tokio::test]
    async fn test_next_error_is_not_recorded() {
        let store = MockObjectStore::default();
        store
            .set_next_error(StorageError::Request("offline".to_string()))
            .await;

        assert!(store.put("a/b.zip", b"zip").await.is_err());
        assert_eq!(store.write_count().await, 0);
    }
}
