//! Submission processor implementation.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::archive::is_zip_archive;
use crate::event::{InboundMessage, SubmissionEvent};
use crate::fetcher::Fetcher;
use crate::mailer::{Mailer, OutgoingEmail};
use crate::metrics;
use crate::storage::{file_name_from_url, ArtifactLocation, ObjectStore};
use crate::templates::{fallback_email, NotificationContext, TemplateRenderer};
use crate::tracking::{tracking_key, TrackingRecord, TrackingStatus, TrackingStore};

use super::config::ProcessorSettings;
use super::types::{EmailDelivery, Outcome, ProcessingReport, ProcessingStage};

/// Processes one submission notification at a time.
///
/// Collaborators are shared; the processor itself holds no per-invocation
/// state, so one instance can serve concurrent requests.
pub struct SubmissionProcessor {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn ObjectStore>,
    mailer: Arc<dyn Mailer>,
    renderer: Arc<dyn TemplateRenderer>,
    tracking: Arc<dyn TrackingStore>,
    settings: ProcessorSettings,
}

fn enter_stage(stage: ProcessingStage) {
    debug!(stage = stage.as_str(), "Stage transition");
}

impl SubmissionProcessor {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn ObjectStore>,
        mailer: Arc<dyn Mailer>,
        renderer: Arc<dyn TemplateRenderer>,
        tracking: Arc<dyn TrackingStore>,
        settings: ProcessorSettings,
    ) -> Self {
        Self {
            fetcher,
            store,
            mailer,
            renderer,
            tracking,
            settings,
        }
    }

    pub fn settings(&self) -> &ProcessorSettings {
        &self.settings
    }

    /// Process a parsed notification and return the acknowledgement payload,
    /// which is the original message unchanged.
    pub async fn handle_message(&self, message: InboundMessage) -> Value {
        let InboundMessage { raw, event } = message;
        self.process(&event).await;
        raw
    }

    /// Run the full workflow for one event.
    ///
    /// Never fails: every outcome is reported, emailed and tracked.
    pub async fn process(&self, event: &SubmissionEvent) -> ProcessingReport {
        let invocation_id = Uuid::new_v4().to_string();
        let span = info_span!(
            "submission",
            invocation_id = %invocation_id,
            email = %event.user_email,
            assignment_id = %event.assignment_id,
            attempt = event.submission_count,
        );
        self.run(event, invocation_id).instrument(span).await
    }

    async fn run(&self, event: &SubmissionEvent, invocation_id: String) -> ProcessingReport {
        enter_stage(ProcessingStage::Received);

        let file_name = file_name_from_url(&event.submission_url);
        let outcome = self.acquire(event, &file_name).await;
        metrics::SUBMISSIONS_TOTAL
            .with_label_values(&[outcome.label()])
            .inc();

        enter_stage(ProcessingStage::Notifying);
        let email = self.notify(event, &file_name, &outcome).await;
        metrics::EMAILS_TOTAL
            .with_label_values(&[email.label()])
            .inc();

        let tracking_status = if outcome.is_success() && email.is_delivered() {
            TrackingStatus::Sent
        } else {
            TrackingStatus::Failed
        };

        let key = tracking_key(
            &event.user_email,
            &event.assignment_id,
            event.submission_count,
        );
        let record = TrackingRecord::new(
            &event.user_email,
            &event.assignment_id,
            event.submission_count,
            tracking_status,
        );

        let tracking_error = match self.tracking.upsert(&key, &record) {
            Ok(()) => {
                metrics::TRACKING_WRITES
                    .with_label_values(&[tracking_status.as_str(), "ok"])
                    .inc();
                None
            }
            Err(e) => {
                metrics::TRACKING_WRITES
                    .with_label_values(&[tracking_status.as_str(), "error"])
                    .inc();
                error!(key = %key, error = %e, "Failed to write tracking record");
                Some(e.to_string())
            }
        };
        enter_stage(ProcessingStage::Tracked);

        info!(
            outcome = outcome.label(),
            email_result = email.label(),
            tracking_status = %tracking_status,
            "Submission processed"
        );

        ProcessingReport {
            invocation_id,
            event: event.clone(),
            outcome,
            email,
            tracking_key: key,
            tracking_status,
            tracking_error,
        }
    }

    /// Fetch, validate and store the artifact.
    async fn acquire(&self, event: &SubmissionEvent, file_name: &str) -> Outcome {
        enter_stage(ProcessingStage::Fetching);

        let started = Instant::now();
        let fetched = match self.fetcher.fetch(&event.submission_url).await {
            Ok(fetched) => fetched,
            Err(e) => {
                metrics::FETCH_DURATION
                    .with_label_values(&["error"])
                    .observe(started.elapsed().as_secs_f64());
                warn!(
                    url = %event.submission_url,
                    fetcher = self.fetcher.name(),
                    error = %e,
                    "Failed to download submission"
                );
                return Outcome::ProcessingError {
                    reason: e.to_string(),
                };
            }
        };

        let result = if fetched.is_ok() { "ok" } else { "bad_status" };
        metrics::FETCH_DURATION
            .with_label_values(&[result])
            .observe(started.elapsed().as_secs_f64());

        if !fetched.is_ok() {
            enter_stage(ProcessingStage::DownloadFailed);
            warn!(
                url = %event.submission_url,
                status = fetched.status,
                "Submission URL did not return 200"
            );
            return Outcome::DownloadFailed {
                status: fetched.status,
            };
        }

        if !is_zip_archive(&fetched.body) {
            enter_stage(ProcessingStage::FormatInvalid);
            info!(
                file_name = %file_name,
                size_bytes = fetched.body.len(),
                "Submission is not a zip archive"
            );
            return Outcome::FormatInvalid {
                file_name: file_name.to_string(),
            };
        }

        enter_stage(ProcessingStage::Uploading);
        let location = ArtifactLocation::new(
            event,
            file_name,
            self.store.bucket(),
            &self.settings.public_base_url,
        );

        match self.store.put(&location.object_path, &fetched.body).await {
            Ok(stored) => {
                metrics::UPLOADED_BYTES.inc_by(stored.size_bytes);
                info!(
                    store = self.store.name(),
                    path = %stored.path,
                    size_bytes = stored.size_bytes,
                    "Submission stored"
                );
                Outcome::Success { location, stored }
            }
            Err(e) => {
                error!(
                    store = self.store.name(),
                    path = %location.object_path,
                    error = %e,
                    "Failed to store submission"
                );
                Outcome::ProcessingError {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Render and send exactly one email for the outcome.
    async fn notify(
        &self,
        event: &SubmissionEvent,
        file_name: &str,
        outcome: &Outcome,
    ) -> EmailDelivery {
        let mut context = NotificationContext::from_event(event, file_name);
        if let Outcome::Success { location, .. } = outcome {
            context = context.with_file_url(location.public_url.clone());
        }

        let kind = outcome.notification();
        let (rendered, render_error) = match self.renderer.render(kind, &context) {
            Ok(rendered) => (rendered, None),
            Err(e) => {
                error!(error = %e, "Failed to render notification, sending plain fallback");
                (fallback_email(kind, &context), Some(e.to_string()))
            }
        };

        let email = OutgoingEmail::new(event.user_email.clone(), rendered);
        match (self.mailer.send(&email).await, render_error) {
            (Ok(receipt), None) => {
                debug!(
                    mailer = self.mailer.name(),
                    status_code = receipt.status_code,
                    "Notification delivered"
                );
                EmailDelivery::Delivered { receipt }
            }
            (Ok(receipt), Some(render_error)) => {
                debug!(
                    mailer = self.mailer.name(),
                    status_code = receipt.status_code,
                    "Fallback notification delivered"
                );
                EmailDelivery::FallbackDelivered {
                    receipt,
                    render_error,
                }
            }
            (Err(e), render_error) => {
                warn!(mailer = self.mailer.name(), error = %e, "Failed to send notification");
                let reason = match render_error {
                    Some(render_error) => format!("{} (after render failure: {})", e, render_error),
                    None => e.to_string(),
                };
                EmailDelivery::SendFailed { reason }
            }
        }
    }
}
