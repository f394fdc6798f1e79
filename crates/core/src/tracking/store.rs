use thiserror::Error;

use super::TrackingRecord;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt tracking row '{id}': {reason}")]
    Corrupt { id: String, reason: String },
}

/// Trait for notification tracking storage
pub trait TrackingStore: Send + Sync {
    /// Insert or replace the record stored under `key` (last write wins)
    fn upsert(&self, key: &str, record: &TrackingRecord) -> Result<(), TrackingError>;

    /// Fetch a record by key
    fn get(&self, key: &str) -> Result<Option<TrackingRecord>, TrackingError>;

    /// All records for one recipient, most recently updated first
    fn list_for_email(&self, email: &str) -> Result<Vec<TrackingRecord>, TrackingError>;
}
