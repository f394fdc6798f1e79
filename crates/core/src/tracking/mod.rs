mod sqlite;
mod store;
mod types;

pub use sqlite::SqliteTrackingStore;
pub use store::{TrackingError, TrackingStore};
pub use types::{tracking_key, TrackingRecord, TrackingStatus};
