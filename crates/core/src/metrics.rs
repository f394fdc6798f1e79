//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Processor (submissions by outcome, notification emails)
//! - Collaborators (fetch duration, uploaded bytes, tracking writes)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Processor Metrics
// =============================================================================

/// Processed submissions by outcome.
pub static SUBMISSIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("handin_submissions_total", "Total submissions processed"),
        &["outcome"], // "success", "download_failed", "format_invalid", "processing_error"
    )
    .unwrap()
});

/// Notification emails by result.
pub static EMAILS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("handin_emails_total", "Total notification emails attempted"),
        &["result"], // "delivered", "fallback_delivered", "send_failed"
    )
    .unwrap()
});

// =============================================================================
// Collaborator Metrics
// =============================================================================

/// Submission download duration.
pub static FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "handin_fetch_duration_seconds",
            "Duration of submission downloads",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["result"], // "ok", "bad_status", "error"
    )
    .unwrap()
});

/// Bytes written to object storage.
pub static UPLOADED_BYTES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "handin_uploaded_bytes_total",
        "Total bytes of submissions written to object storage",
    )
    .unwrap()
});

/// Tracking writes by recorded status and write result.
pub static TRACKING_WRITES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "handin_tracking_writes_total",
            "Total tracking record writes",
        ),
        &["status", "result"], // status: "Sent", "Failed"; result: "ok", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Processor
        Box::new(SUBMISSIONS_TOTAL.clone()),
        Box::new(EMAILS_TOTAL.clone()),
        // Collaborators
        Box::new(FETCH_DURATION.clone()),
        Box::new(UPLOADED_BYTES.clone()),
        Box::new(TRACKING_WRITES.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        SUBMISSIONS_TOTAL.with_label_values(&["success"]).inc();
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|family| family.get_name().to_string())
            .collect();
        assert!(names.contains(&"handin_submissions_total".to_string()));
    }
}
