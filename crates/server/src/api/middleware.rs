//! Authentication and metrics middleware for API routes.

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use handin_core::{AuthError, Credentials};

use crate::metrics::{
    normalize_path, AUTH_FAILURES_TOTAL, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL,
    HTTP_REQUEST_DURATION,
};
use crate::state::AppState;

/// Metrics middleware that tracks HTTP request duration and counts.
///
/// This middleware records:
/// - Request duration (histogram)
/// - Request count (counter)
/// - Requests in flight (gauge)
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    HTTP_REQUESTS_IN_FLIGHT.inc();

    let response = next.run(request).await;

    HTTP_REQUESTS_IN_FLIGHT.dec();

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUEST_DURATION
        .with_label_values(&[&method, &path, &status])
        .observe(duration);
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();

    response
}

fn credentials_from(request: &Request<Body>) -> Credentials {
    let headers = request.headers();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let api_key = headers.get("x-api-key").and_then(|v| v.to_str().ok());

    let credentials = Credentials::from_headers(authorization, api_key);
    match request.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => credentials.with_source_ip(addr.ip()),
        None => credentials,
    }
}

/// Authentication middleware that admits publishers using the configured guard.
///
/// On success the admitted [`handin_core::Publisher`] is stored in request
/// extensions; otherwise the request is answered 401.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let credentials = credentials_from(&request);

    match state.guard().admit(&credentials).await {
        Ok(publisher) => {
            debug!(publisher = %publisher.id, method = publisher.method, "Publisher admitted");
            request.extensions_mut().insert(publisher);
            Ok(next.run(request).await)
        }
        Err(AuthError::MissingCredentials) => {
            AUTH_FAILURES_TOTAL
                .with_label_values(&["missing_credentials"])
                .inc();
            Err(StatusCode::UNAUTHORIZED)
        }
        Err(AuthError::InvalidCredentials) => {
            AUTH_FAILURES_TOTAL
                .with_label_values(&["invalid_credentials"])
                .inc();
            warn!(source_ip = ?credentials.source_ip, "Rejected publisher credentials");
            Err(StatusCode::UNAUTHORIZED)
        }
        Err(e) => {
            AUTH_FAILURES_TOTAL
                .with_label_values(&["internal_error"])
                .inc();
            warn!(error = %e, "Publisher guard failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
