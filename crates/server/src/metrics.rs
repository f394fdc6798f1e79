//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the handin server:
//! - HTTP request metrics (latency, counts, errors)
//! - Notification deliveries and rejections
//! - Core processor metrics, registered into the same registry

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "handin_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("handin_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "handin_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

/// Authentication failures.
pub static AUTH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("handin_auth_failures_total", "Total authentication failures"),
        &["reason"], // "missing_credentials", "invalid_credentials", "internal_error"
    )
    .unwrap()
});

// =============================================================================
// Notification Metrics
// =============================================================================

/// Notification deliveries received, by parse result.
pub static NOTIFICATIONS_RECEIVED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "handin_notifications_received_total",
            "Total notification deliveries received",
        ),
        &["result"], // "accepted", "invalid_json", "empty_envelope", "malformed"
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();
    registry
        .register(Box::new(AUTH_FAILURES_TOTAL.clone()))
        .unwrap();

    // Notifications
    registry
        .register(Box::new(NOTIFICATIONS_RECEIVED.clone()))
        .unwrap();

    // Core metrics (processor, collaborators)
    for metric in handin_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Normalize a path for metric labels.
///
/// Tracking keys embed user email addresses; they are collapsed so label
/// cardinality stays bounded.
pub fn normalize_path(path: &str) -> String {
    match path.strip_prefix("/api/v1/tracking/") {
        Some(rest) if !rest.is_empty() => "/api/v1/tracking/{key}".to_string(),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_tracking_key() {
        let path = "/api/v1/tracking/a@b.com__hw1__1";
        assert_eq!(normalize_path(path), "/api/v1/tracking/{key}");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(normalize_path("/api/v1/tracking"), "/api/v1/tracking");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("handin_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        handin_core::metrics::SUBMISSIONS_TOTAL
            .with_label_values(&["success"])
            .inc();
        NOTIFICATIONS_RECEIVED
            .with_label_values(&["accepted"])
            .inc();
        HTTP_REQUESTS_IN_FLIGHT.set(0);

        let output = encode_metrics();

        assert!(output.contains("handin_http_requests_in_flight"));
        assert!(output.contains("handin_notifications_received_total"));
        assert!(output.contains("handin_submissions_total"));
        assert!(output.contains("handin_uploaded_bytes_total"));
    }
}
