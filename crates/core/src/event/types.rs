use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EventError;

/// Message shape expected from publishers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventVariant {
    /// Six required keys.
    Simple,
    /// Also requires `total_attempts` and `assignment_name`.
    #[default]
    Extended,
}

/// One submission attempt, as announced by the publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionEvent {
    pub submission_url: String,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
    pub assignment_id: String,
    pub submission_count: u32,
    pub total_attempts: Option<u32>,
    pub assignment_name: Option<String>,
}

/// A parsed notification: the typed event plus the message exactly as received.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub raw: Value,
    pub event: SubmissionEvent,
}

impl SubmissionEvent {
    /// Extract and validate an event from a decoded message object.
    pub fn from_message(message: &Value, variant: EventVariant) -> Result<Self, EventError> {
        let fields = message
            .as_object()
            .ok_or_else(|| EventError::malformed("message", "must be a JSON object"))?;

        let mut event = Self {
            submission_url: required_string(fields, "submission_url")?,
            user_email: required_string(fields, "user_email")?,
            user_first_name: required_string(fields, "user_first_name")?,
            user_last_name: required_string(fields, "user_last_name")?,
            assignment_id: required_identifier(fields, "assignment_id")?,
            submission_count: required_count(fields, "submission_count")?,
            total_attempts: None,
            assignment_name: None,
        };

        match variant {
            EventVariant::Simple => {
                event.total_attempts = optional_count(fields, "total_attempts")?;
                event.assignment_name = optional_string(fields, "assignment_name")?;
            }
            EventVariant::Extended => {
                event.total_attempts = Some(required_count(fields, "total_attempts")?);
                event.assignment_name = Some(required_string(fields, "assignment_name")?);
            }
        }

        Ok(event)
    }

    /// Label used in subjects and bodies: the assignment name when known.
    pub fn assignment_label(&self) -> &str {
        self.assignment_name
            .as_deref()
            .unwrap_or(&self.assignment_id)
    }
}

fn required_string(fields: &Map<String, Value>, key: &str) -> Result<String, EventError> {
    optional_string(fields, key)?.ok_or_else(|| EventError::malformed(key, "is required"))
}

fn optional_string(fields: &Map<String, Value>, key: &str) -> Result<Option<String>, EventError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(EventError::malformed(key, "must not be empty"))
        }
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(_) => Err(EventError::malformed(key, "must be a string")),
    }
}

/// Identifiers arrive as strings or integers depending on the publisher.
fn required_identifier(fields: &Map<String, Value>, key: &str) -> Result<String, EventError> {
    match fields.get(key) {
        Some(Value::Number(n)) if n.is_u64() || n.is_i64() => Ok(n.to_string()),
        Some(Value::Number(_)) => Err(EventError::malformed(key, "must be an integer or string")),
        _ => required_string(fields, key),
    }
}

fn required_count(fields: &Map<String, Value>, key: &str) -> Result<u32, EventError> {
    optional_count(fields, key)?.ok_or_else(|| EventError::malformed(key, "is required"))
}

fn optional_count(fields: &Map<String, Value>, key: &str) -> Result<Option<u32>, EventError> {
    let parsed = match fields.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        Some(_) => None,
    };

    match parsed.and_then(|n| u32::try_from(n).ok()) {
        Some(0) => Err(EventError::malformed(key, "must be at least 1")),
        Some(n) => Ok(Some(n)),
        None => Err(EventError::malformed(key, "must be a positive integer")),
    }
}
