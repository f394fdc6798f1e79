use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{TrackingError, TrackingRecord, TrackingStatus, TrackingStore};

/// Raw column values of one row, before status/timestamp decoding.
type RawRow = (String, String, String, String, u32, String);

/// SQLite-backed tracking store
pub struct SqliteTrackingStore {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteTrackingStore {
    /// Open (or create) the database at `path` and ensure `table` exists.
    ///
    /// `table` must already be a validated identifier.
    pub fn new(path: &Path, table: &str) -> Result<Self, TrackingError> {
        let conn = Connection::open(path).map_err(|e| TrackingError::Database(e.to_string()))?;
        Self::with_connection(conn, table)
    }

    /// Create an in-memory SQLite tracking store (useful for testing)
    pub fn in_memory() -> Result<Self, TrackingError> {
        let conn =
            Connection::open_in_memory().map_err(|e| TrackingError::Database(e.to_string()))?;
        Self::with_connection(conn, "email_tracking")
    }

    fn with_connection(conn: Connection, table: &str) -> Result<Self, TrackingError> {
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                status TEXT NOT NULL,
                assignment_id TEXT NOT NULL,
                submission_count INTEGER NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_{table}_email ON {table}(email);
            "#
        ))
        .map_err(|e| TrackingError::Database(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
        })
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    fn decode(raw: RawRow) -> Result<TrackingRecord, TrackingError> {
        let (id, email, status, assignment_id, submission_count, updated_at) = raw;

        let status = TrackingStatus::parse(&status).ok_or_else(|| TrackingError::Corrupt {
            id: id.clone(),
            reason: format!("unknown status '{}'", status),
        })?;

        let updated_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&updated_at)
            .map_err(|e| TrackingError::Corrupt {
                id: id.clone(),
                reason: format!("invalid timestamp: {}", e),
            })?
            .into();

        Ok(TrackingRecord {
            id,
            email,
            status,
            assignment_id,
            submission_count,
            updated_at,
        })
    }
}

impl TrackingStore for SqliteTrackingStore {
    fn upsert(&self, key: &str, record: &TrackingRecord) -> Result<(), TrackingError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| TrackingError::Database("connection lock poisoned".to_string()))?;

        conn.execute(
            &format!(
                "INSERT INTO {} (id, email, status, assignment_id, submission_count, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                    email = excluded.email,
                    status = excluded.status,
                    assignment_id = excluded.assignment_id,
                    submission_count = excluded.submission_count,
                    updated_at = excluded.updated_at",
                self.table
            ),
            params![
                key,
                record.email,
                record.status.as_str(),
                record.assignment_id,
                record.submission_count,
                // Fixed width so ORDER BY on the text column is chronological
                record.updated_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )
        .map_err(|e| TrackingError::Database(e.to_string()))?;

        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<TrackingRecord>, TrackingError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| TrackingError::Database("connection lock poisoned".to_string()))?;

        let raw = conn
            .query_row(
                &format!(
                    "SELECT id, email, status, assignment_id, submission_count, updated_at
                     FROM {} WHERE id = ?1",
                    self.table
                ),
                params![key],
                Self::read_row,
            )
            .optional()
            .map_err(|e| TrackingError::Database(e.to_string()))?;

        raw.map(Self::decode).transpose()
    }

    fn list_for_email(&self, email: &str) -> Result<Vec<TrackingRecord>, TrackingError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| TrackingError::Database("connection lock poisoned".to_string()))?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT id, email, status, assignment_id, submission_count, updated_at
                 FROM {} WHERE email = ?1 ORDER BY updated_at DESC",
                self.table
            ))
            .map_err(|e| TrackingError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![email], Self::read_row)
            .map_err(|e| TrackingError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let raw = row.map_err(|e| TrackingError::Database(e.to_string()))?;
            records.push(Self::decode(raw)?);
        }
        Ok(records)
    }
}
