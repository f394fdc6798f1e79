//! Mock tracking store for testing.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::tracking::{TrackingError, TrackingRecord, TrackingStore};

/// Mock implementation of the TrackingStore trait.
///
/// The trait is synchronous, so state sits behind std locks.
#[derive(Debug, Clone, Default)]
pub struct MockTrackingStore {
    records: Arc<RwLock<HashMap<String, TrackingRecord>>>,
    /// Every upsert attempt as (key, record), in order.
    writes: Arc<RwLock<Vec<(String, TrackingRecord)>>>,
    next_error: Arc<RwLock<Option<TrackingError>>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

impl MockTrackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all upsert attempts.
    pub fn recorded_writes(&self) -> Vec<(String, TrackingRecord)> {
        read(&self.writes).clone()
    }

    /// Get the number of upsert attempts.
    pub fn write_count(&self) -> usize {
        read(&self.writes).len()
    }

    /// Number of distinct keys stored.
    pub fn record_count(&self) -> usize {
        read(&self.records).len()
    }

    /// Configure the next upsert to fail with the given error.
    pub fn set_next_error(&self, error: TrackingError) {
        *write(&self.next_error) = Some(error);
    }
}

impl TrackingStore for MockTrackingStore {
    fn upsert(&self, key: &str, record: &TrackingRecord) -> Result<(), TrackingError> {
        write(&self.writes).push((key.to_string(), record.clone()));

        if let Some(error) = write(&self.next_error).take() {
            return Err(error);
        }

        write(&self.records).insert(key.to_string(), record.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<TrackingRecord>, TrackingError> {
        Ok(read(&self.records).get(key).cloned())
    }

    fn list_for_email(&self, email: &str) -> Result<Vec<TrackingRecord>, TrackingError> {
        let mut records: Vec<TrackingRecord> = read(&self.records)
            .values()
            .filter(|record| record.email == email)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(records)
    }
}
