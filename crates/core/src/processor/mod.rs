//! Submission processing workflow.
//!
//! `SubmissionProcessor` drives one invocation end to end:
//! fetch the artifact, check it is a zip archive, store it, email the user
//! and record the delivery status.
//!
//! # Example
//!
//! ```ignore
//! use handin_core::processor::{ProcessorSettings, SubmissionProcessor};
//!
//! let processor = SubmissionProcessor::new(
//!     fetcher, store, mailer, renderer, tracking,
//!     ProcessorSettings::default(),
//! );
//!
//! let message = parse_notification(&body, EventVariant::Extended)?;
//! let ack = processor.handle_message(message).await;
//! ```

mod config;
mod submission;
mod types;

pub use config::ProcessorSettings;
pub use submission::SubmissionProcessor;
pub use types::{EmailDelivery, Outcome, ProcessingReport, ProcessingStage};
