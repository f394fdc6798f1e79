//! Inbound notification delivery.

use axum::{
    body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Extension, Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use handin_core::{parse_notification, EventError, Publisher};

use crate::metrics::NOTIFICATIONS_RECEIVED;
use crate::state::AppState;

/// Error response
#[derive(Debug, Serialize)]
pub struct NotificationErrorResponse {
    pub error: String,
}

fn rejection_label(error: &EventError) -> &'static str {
    match error {
        EventError::InvalidJson(_) => "invalid_json",
        EventError::EmptyEnvelope => "empty_envelope",
        EventError::Malformed { .. } => "malformed",
    }
}

/// Process one notification and acknowledge with the original message.
///
/// Malformed deliveries are rejected with 400 before any work happens;
/// everything after parsing is handled inside the processor and answered 200.
pub async fn receive_notification(
    State(state): State<Arc<AppState>>,
    Extension(publisher): Extension<Publisher>,
    body: Bytes,
) -> Result<Json<Value>, impl IntoResponse> {
    let message = match parse_notification(&body, state.variant()) {
        Ok(message) => message,
        Err(e) => {
            NOTIFICATIONS_RECEIVED
                .with_label_values(&[rejection_label(&e)])
                .inc();
            warn!(publisher = %publisher.id, error = %e, "Rejected notification");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(NotificationErrorResponse {
                    error: e.to_string(),
                }),
            ));
        }
    };

    NOTIFICATIONS_RECEIVED
        .with_label_values(&["accepted"])
        .inc();
    info!(
        publisher = %publisher.id,
        auth_method = publisher.method,
        email = %message.event.user_email,
        assignment_id = %message.event.assignment_id,
        "Notification accepted"
    );

    Ok(Json(state.processor().handle_message(message).await))
}
