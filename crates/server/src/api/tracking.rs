//! Tracking record lookups.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use handin_core::{TrackingError, TrackingRecord};

use crate::state::AppState;

/// Query parameters for listing tracking records
#[derive(Debug, Deserialize)]
pub struct ListTrackingParams {
    /// Recipient whose attempts to list
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ListTrackingResponse {
    pub records: Vec<TrackingRecord>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct TrackingErrorResponse {
    pub error: String,
}

fn store_failure(e: TrackingError) -> (StatusCode, Json<TrackingErrorResponse>) {
    error!(error = %e, "Tracking store query failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(TrackingErrorResponse {
            error: e.to_string(),
        }),
    )
}

/// Get one tracking record by key
pub async fn get_tracking(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<TrackingRecord>, impl IntoResponse> {
    match state.tracking().get(&key) {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(TrackingErrorResponse {
                error: format!("No tracking record for '{}'", key),
            }),
        )),
        Err(e) => Err(store_failure(e)),
    }
}

/// List tracking records for one recipient
pub async fn list_tracking(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTrackingParams>,
) -> Result<Json<ListTrackingResponse>, impl IntoResponse> {
    state
        .tracking()
        .list_for_email(&params.email)
        .map(|records| Json(ListTrackingResponse { records }))
        .map_err(store_failure)
}
