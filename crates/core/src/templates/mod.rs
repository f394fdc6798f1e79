//! Notification email rendering.
//!
//! The processor decides *which* notification to send; a [`TemplateRenderer`]
//! turns that decision plus a [`NotificationContext`] into a subject and body.

mod defaults;
mod tera_renderer;

pub use tera_renderer::TeraRenderer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::SubmissionEvent;

/// Errors raised while loading or rendering templates.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to load templates: {0}")]
    Load(String),

    #[error("Failed to render template '{template}': {message}")]
    Render { template: String, message: String },
}

/// Content type of rendered bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyFormat {
    #[default]
    Html,
    Text,
}

impl BodyFormat {
    /// Template file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "txt",
        }
    }

    /// MIME type used when sending.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Text => "text/plain",
        }
    }
}

/// The four user-facing outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    DownloadFailed,
    FormatInvalid,
    ProcessingError,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 4] = [
        Self::Success,
        Self::DownloadFailed,
        Self::FormatInvalid,
        Self::ProcessingError,
    ];

    /// File stem of the template for this kind.
    pub fn template_stem(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::DownloadFailed => "download_failed",
            Self::FormatInvalid => "format_invalid",
            Self::ProcessingError => "processing_error",
        }
    }

    /// Template name for this kind in the given format, e.g. `success.html`.
    pub fn template_name(&self, format: BodyFormat) -> String {
        format!("{}.{}", self.template_stem(), format.extension())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Values available to templates.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationContext {
    pub first_name: String,
    pub last_name: String,
    pub assignment_id: String,
    /// Assignment name when known, otherwise the id.
    pub assignment_label: String,
    pub file_name: String,
    pub file_url: Option<String>,
    pub submission_count: u32,
    pub total_attempts: Option<u32>,
}

impl NotificationContext {
    pub fn from_event(event: &SubmissionEvent, file_name: &str) -> Self {
        Self {
            first_name: event.user_first_name.clone(),
            last_name: event.user_last_name.clone(),
            assignment_id: event.assignment_id.clone(),
            assignment_label: event.assignment_label().to_string(),
            file_name: file_name.to_string(),
            file_url: None,
            submission_count: event.submission_count,
            total_attempts: event.total_attempts,
        }
    }

    pub fn with_file_url(mut self, url: impl Into<String>) -> Self {
        self.file_url = Some(url.into());
        self
    }
}

/// A rendered notification, ready to hand to a mailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
    pub format: BodyFormat,
}

/// Renders notification emails.
pub trait TemplateRenderer: Send + Sync {
    /// Render the notification for `kind`.
    fn render(
        &self,
        kind: NotificationKind,
        context: &NotificationContext,
    ) -> Result<RenderedEmail, TemplateError>;
}

/// Subject line for a notification.
pub fn subject_for(kind: NotificationKind, context: &NotificationContext) -> String {
    if kind.is_success() {
        format!("Assignment {} Submission Successful", context.assignment_label)
    } else {
        format!("Assignment {} Submission Failed", context.assignment_label)
    }
}

/// Plain-text notification built without any template engine.
///
/// Sent when the configured renderer fails, so the user still hears about
/// the outcome.
pub fn fallback_email(kind: NotificationKind, context: &NotificationContext) -> RenderedEmail {
    let message = match kind {
        NotificationKind::Success => {
            let mut text = format!(
                "Your submission for Assignment {} has been successfully uploaded.",
                context.assignment_label
            );
            if let Some(total) = context.total_attempts {
                text.push_str(&format!(
                    " This was attempt {}/{}.",
                    context.submission_count, total
                ));
            }
            if let Some(url) = &context.file_url {
                text.push_str(&format!("\nYou can download your submission at: {}", url));
            }
            text
        }
        NotificationKind::DownloadFailed => format!(
            "There was an error downloading the Assignment {} and processing it.",
            context.assignment_label
        ),
        NotificationKind::FormatInvalid => format!(
            "Your submission for Assignment {} failed because the submitted file ('{}') \
             is not a .zip file. Please submit the file in .zip format.",
            context.assignment_label, context.file_name
        ),
        NotificationKind::ProcessingError => {
            "There was an error processing your submission.".to_string()
        }
    };

    RenderedEmail {
        subject: subject_for(kind, context),
        body: format!(
            "Hello {} {},\n\n{}\n\nThanks",
            context.first_name, context.last_name, message
        ),
        format: BodyFormat::Text,
    }
}
