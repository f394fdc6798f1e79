//! Submission processor lifecycle integration tests.
//!
//! These tests drive the processor end to end with mock collaborators:
//! received -> fetching -> {download failed | format invalid | uploading}
//! -> notifying -> tracked

use std::sync::Arc;

use handin_core::{
    fetcher::FetchError,
    mailer::MailerError,
    parse_notification,
    storage::StorageError,
    templates::TemplateError,
    testing::{
        fixtures, MockFetcher, MockMailer, MockObjectStore, MockRenderer, MockTrackingStore,
    },
    BodyFormat, EmailDelivery, EventVariant, Outcome, ProcessorSettings, SqliteTrackingStore,
    SubmissionProcessor, TeraRenderer, TrackingError, TrackingStatus, TrackingStore,
};

const BUCKET: &str = "submissions";

/// Test helper wiring the processor to mocks.
struct TestHarness {
    processor: SubmissionProcessor,
    fetcher: MockFetcher,
    store: MockObjectStore,
    mailer: MockMailer,
    tracking: MockTrackingStore,
}

impl TestHarness {
    fn new() -> Self {
        let renderer = TeraRenderer::new(BodyFormat::Text).expect("Failed to load templates");
        Self::with_renderer(Arc::new(renderer))
    }

    fn with_renderer(renderer: Arc<dyn handin_core::TemplateRenderer>) -> Self {
        let fetcher = MockFetcher::new();
        let store = MockObjectStore::new(BUCKET);
        let mailer = MockMailer::new();
        let tracking = MockTrackingStore::new();

        let processor = SubmissionProcessor::new(
            Arc::new(fetcher.clone()),
            Arc::new(store.clone()),
            Arc::new(mailer.clone()),
            renderer,
            Arc::new(tracking.clone()),
            ProcessorSettings {
                public_base_url: "https://storage.example.com".to_string(),
            },
        );

        Self {
            processor,
            fetcher,
            store,
            mailer,
            tracking,
        }
    }

    async fn serve_zip(&self, url: &str) {
        self.fetcher
            .set_response(url, 200, fixtures::submission_zip())
            .await;
    }
}

#[tokio::test]
async fn test_reference_scenario_succeeds() {
    let harness = TestHarness::new();
    harness.serve_zip("https://x/test.zip").await;

    let report = harness.processor.process(&fixtures::event()).await;

    match &report.outcome {
        Outcome::Success { location, stored } => {
            assert_eq!(location.object_path, "A_B/hw1/attempt_1/test.zip");
            assert_eq!(
                location.public_url,
                "https://storage.example.com/submissions/A_B/hw1/attempt_1/test.zip"
            );
            assert_eq!(stored.path, "A_B/hw1/attempt_1/test.zip");
        }
        other => panic!("Expected success, got {:?}", other),
    }

    let writes = harness.store.recorded_writes().await;
    assert_eq!(writes.len(), 1);
    assert_eq!(
        harness.store.object("A_B/hw1/attempt_1/test.zip").await,
        Some(fixtures::submission_zip())
    );

    let emails = harness.mailer.sent_emails().await;
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to, "a@b.com");
    assert_eq!(emails[0].subject, "Assignment hw1 Submission Successful");
    assert!(emails[0].body.starts_with("Hello A B,"));
    assert!(emails[0].body.contains("has been successfully uploaded"));
    assert!(emails[0]
        .body
        .contains("https://storage.example.com/submissions/A_B/hw1/attempt_1/test.zip"));

    assert_eq!(report.tracking_key, "a@b.com__hw1__1");
    assert_eq!(report.tracking_status, TrackingStatus::Sent);
    let record = harness
        .tracking
        .get("a@b.com__hw1__1")
        .unwrap()
        .expect("tracking record written");
    assert_eq!(record.status, TrackingStatus::Sent);
    assert_eq!(record.email, "a@b.com");
    assert_eq!(record.assignment_id, "hw1");
    assert_eq!(record.submission_count, 1);
}

#[tokio::test]
async fn test_non_200_sends_download_error() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .set_response("https://x/test.zip", 403, b"AccessDenied".to_vec())
        .await;

    let report = harness.processor.process(&fixtures::event()).await;

    assert_eq!(report.outcome, Outcome::DownloadFailed { status: 403 });
    assert_eq!(harness.store.write_count().await, 0);

    let emails = harness.mailer.sent_emails().await;
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].subject, "Assignment hw1 Submission Failed");
    assert!(emails[0]
        .body
        .contains("There was an error downloading the Assignment hw1 and processing it."));

    assert_eq!(report.tracking_status, TrackingStatus::Failed);
    assert_eq!(harness.tracking.write_count(), 1);
}

#[tokio::test]
async fn test_non_zip_sends_format_error() {
    let harness = TestHarness::new();
    let mut event = fixtures::event();
    event.submission_url = "https://x/report.pdf".to_string();
    harness
        .fetcher
        .set_response("https://x/report.pdf", 200, b"%PDF-1.7".to_vec())
        .await;

    let report = harness.processor.process(&event).await;

    assert_eq!(
        report.outcome,
        Outcome::FormatInvalid {
            file_name: "report.pdf".to_string()
        }
    );
    assert_eq!(harness.store.write_count().await, 0);

    let emails = harness.mailer.sent_emails().await;
    assert_eq!(emails.len(), 1);
    assert!(emails[0].body.contains("('report.pdf') is not a .zip file"));
    assert!(emails[0]
        .body
        .contains("Please submit the file in .zip format."));

    let record = harness.tracking.get("a@b.com__hw1__1").unwrap().unwrap();
    assert_eq!(record.status, TrackingStatus::Failed);
}

#[tokio::test]
async fn test_attempt_ratio_in_success_body() {
    let harness = TestHarness::new();
    harness.serve_zip("https://x/test.zip").await;

    let report = harness
        .processor
        .process(&fixtures::extended_event(2, 5))
        .await;

    assert!(report.outcome.is_success());
    let emails = harness.mailer.sent_emails().await;
    assert!(emails[0].body.contains("2/5"));
    assert_eq!(emails[0].subject, "Assignment Homework 1 Submission Successful");
    assert_eq!(report.tracking_key, "a@b.com__hw1__2");
}

#[tokio::test]
async fn test_send_failure_on_success_tracks_failed() {
    let harness = TestHarness::new();
    harness.serve_zip("https://x/test.zip").await;
    harness
        .mailer
        .set_next_error(MailerError::Rejected {
            status: 401,
            message: "bad key".to_string(),
        })
        .await;

    let report = harness.processor.process(&fixtures::event()).await;

    assert!(report.outcome.is_success());
    assert_eq!(harness.store.write_count().await, 1);
    assert!(matches!(report.email, EmailDelivery::SendFailed { .. }));
    assert_eq!(report.tracking_status, TrackingStatus::Failed);
    assert_eq!(
        harness.tracking.get("a@b.com__hw1__1").unwrap().unwrap().status,
        TrackingStatus::Failed
    );
}

#[tokio::test]
async fn test_upload_failure_sends_generic_error() {
    let harness = TestHarness::new();
    harness.serve_zip("https://x/test.zip").await;
    harness
        .store
        .set_next_error(StorageError::Rejected {
            path: "A_B/hw1/attempt_1/test.zip".to_string(),
            status: 403,
            message: "forbidden".to_string(),
        })
        .await;

    let report = harness.processor.process(&fixtures::event()).await;

    assert!(matches!(report.outcome, Outcome::ProcessingError { .. }));
    let emails = harness.mailer.sent_emails().await;
    assert_eq!(emails.len(), 1);
    assert!(emails[0]
        .body
        .contains("There was an error processing your submission."));
    assert!(!emails[0].body.contains("successfully uploaded"));
    assert_eq!(report.tracking_status, TrackingStatus::Failed);
}

#[tokio::test]
async fn test_transport_fault_sends_generic_error() {
    let harness = TestHarness::new();
    harness
        .fetcher
        .set_next_error(FetchError::ConnectionFailed("connection refused".to_string()))
        .await;

    let report = harness.processor.process(&fixtures::event()).await;

    assert!(matches!(report.outcome, Outcome::ProcessingError { .. }));
    assert_eq!(harness.store.write_count().await, 0);
    assert_eq!(harness.mailer.sent_count().await, 1);
    assert_eq!(report.tracking_status, TrackingStatus::Failed);
}

#[tokio::test]
async fn test_render_failure_sends_plain_fallback_and_tracks_failed() {
    let renderer = MockRenderer::new();
    let harness = TestHarness::with_renderer(Arc::new(renderer.clone()));
    harness.serve_zip("https://x/test.zip").await;
    renderer.set_next_error(TemplateError::Render {
        template: "success.txt".to_string(),
        message: "boom".to_string(),
    });

    let report = harness.processor.process(&fixtures::event()).await;

    assert!(report.outcome.is_success());
    assert!(matches!(
        report.email,
        EmailDelivery::FallbackDelivered { ref render_error, .. } if render_error.contains("boom")
    ));

    let emails = harness.mailer.sent_emails().await;
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].subject, "Assignment hw1 Submission Successful");
    assert!(emails[0]
        .body
        .contains("https://storage.example.com/submissions/A_B/hw1/attempt_1/test.zip"));

    assert_eq!(report.tracking_status, TrackingStatus::Failed);
    assert_eq!(harness.tracking.write_count(), 1);
}

#[tokio::test]
async fn test_broken_override_template_still_notifies() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("download_failed.txt"), "Hello {{ frist_name }}").unwrap();
    let renderer = TeraRenderer::with_overrides(BodyFormat::Text, dir.path()).unwrap();
    let harness = TestHarness::with_renderer(Arc::new(renderer));
    harness
        .fetcher
        .set_response("https://x/test.zip", 404, Vec::new())
        .await;

    let report = harness.processor.process(&fixtures::event()).await;

    assert_eq!(report.outcome, Outcome::DownloadFailed { status: 404 });
    assert!(matches!(report.email, EmailDelivery::FallbackDelivered { .. }));

    let emails = harness.mailer.sent_emails().await;
    assert_eq!(emails.len(), 1);
    assert!(emails[0].body.starts_with("Hello A B,"));
    assert!(emails[0]
        .body
        .contains("There was an error downloading the Assignment hw1 and processing it."));
    assert_eq!(
        harness.tracking.get("a@b.com__hw1__1").unwrap().unwrap().status,
        TrackingStatus::Failed
    );
}

#[tokio::test]
async fn test_render_and_send_failure_reports_both() {
    let renderer = MockRenderer::new();
    let harness = TestHarness::with_renderer(Arc::new(renderer.clone()));
    harness.serve_zip("https://x/test.zip").await;
    renderer.set_next_error(TemplateError::Render {
        template: "success.txt".to_string(),
        message: "boom".to_string(),
    });
    harness
        .mailer
        .set_next_error(MailerError::Rejected {
            status: 503,
            message: "unavailable".to_string(),
        })
        .await;

    let report = harness.processor.process(&fixtures::event()).await;

    match &report.email {
        EmailDelivery::SendFailed { reason } => {
            assert!(reason.contains("boom"));
            assert!(reason.contains("503"));
        }
        other => panic!("Expected send failure, got {:?}", other),
    }
    assert_eq!(harness.mailer.sent_count().await, 1);
    assert_eq!(report.tracking_status, TrackingStatus::Failed);
}

#[tokio::test]
async fn test_tracking_fault_is_reported_not_raised() {
    let harness = TestHarness::new();
    harness.serve_zip("https://x/test.zip").await;
    harness
        .tracking
        .set_next_error(TrackingError::Database("disk full".to_string()));

    let report = harness.processor.process(&fixtures::event()).await;

    assert!(report.outcome.is_success());
    assert_eq!(harness.mailer.sent_count().await, 1);
    assert_eq!(report.tracking_status, TrackingStatus::Sent);
    assert!(report
        .tracking_error
        .as_deref()
        .is_some_and(|e| e.contains("disk full")));
    assert_eq!(harness.tracking.record_count(), 0);
}

#[tokio::test]
async fn test_every_outcome_emails_and_tracks_once() {
    let harness = TestHarness::new();
    harness.serve_zip("https://x/ok.zip").await;
    harness
        .fetcher
        .set_response("https://x/text.zip", 200, b"not really".to_vec())
        .await;

    let mut ok = fixtures::event();
    ok.submission_url = "https://x/ok.zip".to_string();
    let mut text = fixtures::event();
    text.submission_url = "https://x/text.zip".to_string();
    text.submission_count = 2;
    let mut missing = fixtures::event();
    missing.submission_url = "https://x/missing.zip".to_string();
    missing.submission_count = 3;

    for event in [&ok, &text, &missing] {
        harness.processor.process(event).await;
    }

    assert_eq!(harness.mailer.sent_count().await, 3);
    assert_eq!(harness.tracking.write_count(), 3);
    assert_eq!(harness.tracking.record_count(), 3);
    assert_eq!(harness.store.write_count().await, 1);
}

#[tokio::test]
async fn test_resubmission_overwrites_tracking_with_sqlite() {
    let fetcher = MockFetcher::new();
    let mailer = MockMailer::new();
    let tracking = Arc::new(SqliteTrackingStore::in_memory().unwrap());

    let processor = SubmissionProcessor::new(
        Arc::new(fetcher.clone()),
        Arc::new(MockObjectStore::new(BUCKET)),
        Arc::new(mailer.clone()),
        Arc::new(TeraRenderer::new(BodyFormat::Html).unwrap()),
        tracking.clone(),
        ProcessorSettings::default(),
    );

    // First delivery: the file is not there yet.
    processor.process(&fixtures::event()).await;
    assert_eq!(
        tracking.get("a@b.com__hw1__1").unwrap().unwrap().status,
        TrackingStatus::Failed
    );

    // Redelivery of the same attempt once the file is available.
    fetcher
        .set_response("https://x/test.zip", 200, fixtures::submission_zip())
        .await;
    processor.process(&fixtures::event()).await;

    let records = tracking.list_for_email("a@b.com").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, TrackingStatus::Sent);
}

#[tokio::test]
async fn test_handle_message_returns_original_message() {
    let harness = TestHarness::new();
    harness.serve_zip("https://x/test.zip").await;

    let message = fixtures::message_json(&fixtures::extended_event(1, 3));
    let inbound = parse_notification(&fixtures::sns_envelope(&message), EventVariant::Extended)
        .expect("valid envelope");

    let ack = harness.processor.handle_message(inbound).await;

    assert_eq!(ack, message);
    assert_eq!(harness.mailer.sent_count().await, 1);
}
