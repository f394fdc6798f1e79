//! Inbound submission events.
//!
//! Publishers deliver a JSON message describing one uploaded submission. It
//! may arrive wrapped in a pub/sub envelope (Lambda-style `Records[0].Sns`,
//! or an SNS HTTP delivery) or bare. [`parse_notification`] unwraps the
//! envelope and validates the message into a [`SubmissionEvent`].

mod envelope;
mod types;

pub use envelope::parse_notification;
pub use types::{EventVariant, InboundMessage, SubmissionEvent};

use thiserror::Error;

/// Errors raised while reading an inbound notification.
#[derive(Debug, Error)]
pub enum EventError {
    /// Body or embedded message is not valid JSON.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Envelope carried no records.
    #[error("Notification envelope contains no records")]
    EmptyEnvelope,

    /// A required field is missing or has the wrong shape.
    #[error("Malformed event: field '{field}' {reason}")]
    Malformed { field: String, reason: String },
}

impl EventError {
    pub(crate) fn malformed(field: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
