use serde::Deserialize;
use serde_json::Value;

use super::types::{EventVariant, InboundMessage, SubmissionEvent};
use super::EventError;

/// Lambda-style pub/sub delivery: `{"Records":[{"Sns":{"Message":"..."}}]}`.
#[derive(Debug, Deserialize)]
struct RecordsEnvelope {
    #[serde(rename = "Records")]
    records: Vec<EnvelopeRecord>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeRecord {
    #[serde(rename = "Sns")]
    sns: TopicPayload,
}

/// Also the shape of an SNS HTTP delivery body.
#[derive(Debug, Deserialize)]
struct TopicPayload {
    #[serde(rename = "Message")]
    message: String,
}

/// Parse a notification body into the message it carries.
///
/// Only the first record of a multi-record envelope is processed.
pub fn parse_notification(body: &[u8], variant: EventVariant) -> Result<InboundMessage, EventError> {
    let outer: Value =
        serde_json::from_slice(body).map_err(|e| EventError::InvalidJson(e.to_string()))?;

    let raw = if outer.get("Records").is_some() {
        let envelope: RecordsEnvelope = serde_json::from_value(outer)
            .map_err(|e| EventError::malformed("Records", e.to_string()))?;
        let record = envelope
            .records
            .into_iter()
            .next()
            .ok_or(EventError::EmptyEnvelope)?;
        decode_message(&record.sns.message)?
    } else if outer.get("Message").is_some_and(Value::is_string) {
        let payload: TopicPayload = serde_json::from_value(outer)
            .map_err(|e| EventError::malformed("Message", e.to_string()))?;
        decode_message(&payload.message)?
    } else {
        outer
    };

    let event = SubmissionEvent::from_message(&raw, variant)?;
    Ok(InboundMessage { raw, event })
}

fn decode_message(message: &str) -> Result<Value, EventError> {
    serde_json::from_str(message).map_err(|e| EventError::InvalidJson(e.to_string()))
}
