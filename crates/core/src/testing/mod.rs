//! Testing utilities and mock implementations for end-to-end tests.
//!
//! This module provides mock implementations of every collaborator trait the
//! processor depends on, so the whole workflow can be exercised without a
//! network, a bucket or an email provider.
//!
//! # Example
//!
//! ```rust,ignore
//! use handin_core::testing::{fixtures, MockFetcher, MockMailer, MockObjectStore};
//!
//! let fetcher = MockFetcher::new();
//! fetcher.set_response("https://x/test.zip", 200, fixtures::zip_bytes(&[])).await;
//!
//! let mailer = MockMailer::new();
//! // ... run the processor ...
//! assert_eq!(mailer.sent_count().await, 1);
//! ```

mod mock_fetcher;
mod mock_mailer;
mod mock_object_store;
mod mock_renderer;
mod mock_tracking_store;

pub use mock_fetcher::MockFetcher;
pub use mock_mailer::MockMailer;
pub use mock_object_store::MockObjectStore;
pub use mock_renderer::MockRenderer;
pub use mock_tracking_store::MockTrackingStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    use crate::event::SubmissionEvent;

    /// Build an in-memory zip archive holding `entries` (name, content).
    pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
            for (name, content) in entries {
                zip.start_file(*name, options)
                    .expect("failed to start zip entry");
                zip.write_all(content).expect("failed to write zip entry");
            }
            zip.finish().expect("failed to finish zip");
        }
        buf.into_inner()
    }

    /// A small archive that looks like a real submission.
    pub fn submission_zip() -> Vec<u8> {
        zip_bytes(&[
            ("README.md", b"# Homework 1\n"),
            ("src/main.c", b"int main(void) { return 0; }\n"),
        ])
    }

    /// The reference event: `a@b.com`, `A B`, `hw1`, first attempt,
    /// submitted as `https://x/test.zip`.
    pub fn event() -> SubmissionEvent {
        SubmissionEvent {
            submission_url: "https://x/test.zip".to_string(),
            user_email: "a@b.com".to_string(),
            user_first_name: "A".to_string(),
            user_last_name: "B".to_string(),
            assignment_id: "hw1".to_string(),
            submission_count: 1,
            total_attempts: None,
            assignment_name: None,
        }
    }

    /// The reference event with the extended fields filled in.
    pub fn extended_event(submission_count: u32, total_attempts: u32) -> SubmissionEvent {
        SubmissionEvent {
            submission_count,
            total_attempts: Some(total_attempts),
            assignment_name: Some("Homework 1".to_string()),
            ..event()
        }
    }

    /// The message object a publisher would send for `event`.
    pub fn message_json(event: &SubmissionEvent) -> Value {
        let mut message = json!({
            "submission_url": event.submission_url,
            "user_email": event.user_email,
            "user_first_name": event.user_first_name,
            "user_last_name": event.user_last_name,
            "assignment_id": event.assignment_id,
            "submission_count": event.submission_count,
        });
        if let Some(total) = event.total_attempts {
            message["total_attempts"] = json!(total);
        }
        if let Some(name) = &event.assignment_name {
            message["assignment_name"] = json!(name);
        }
        message
    }

    /// Wrap a message in a Lambda-style SNS envelope.
    pub fn sns_envelope(message: &Value) -> Vec<u8> {
        json!({
            "Records": [{
                "EventSource": "aws:sns",
                "Sns": {
                    "Type": "Notification",
                    "MessageId": "00000000-0000-0000-0000-000000000001",
                    "Message": message.to_string(),
                }
            }]
        })
        .to_string()
        .into_bytes()
    }
}
