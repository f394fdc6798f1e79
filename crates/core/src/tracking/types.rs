use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery status of the notification email for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingStatus {
    Sent,
    Failed,
}

impl TrackingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "Sent",
            Self::Failed => "Failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Sent" => Some(Self::Sent),
            "Failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of the tracking record for one attempt by one user.
pub fn tracking_key(email: &str, assignment_id: &str, submission_count: u32) -> String {
    format!("{}__{}__{}", email, assignment_id, submission_count)
}

/// Durable row recording the notification outcome of one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub id: String,
    pub email: String,
    pub status: TrackingStatus,
    pub assignment_id: String,
    pub submission_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl TrackingRecord {
    /// Build a record stamped with the current time.
    pub fn new(
        email: &str,
        assignment_id: &str,
        submission_count: u32,
        status: TrackingStatus,
    ) -> Self {
        Self {
            id: tracking_key(email, assignment_id, submission_count),
            email: email.to_string(),
            status,
            assignment_id: assignment_id.to_string(),
            submission_count,
            updated_at: Utc::now(),
        }
    }
}
