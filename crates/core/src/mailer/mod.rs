//! Outbound email delivery.

mod log_mailer;
mod sendgrid;

pub use log_mailer::LogMailer;
pub use sendgrid::SendGridMailer;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::templates::{BodyFormat, RenderedEmail};

/// Errors that can occur when sending an email.
#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Email provider rejected the message with HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Email provider unreachable: {0}")]
    Request(String),

    #[error("Mailer configuration error: {0}")]
    Configuration(String),
}

/// Sender identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sender {
    pub address: String,
    pub name: Option<String>,
}

/// One message for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub format: BodyFormat,
}

impl OutgoingEmail {
    pub fn new(to: impl Into<String>, rendered: RenderedEmail) -> Self {
        Self {
            to: to.into(),
            subject: rendered.subject,
            body: rendered.body,
            format: rendered.format,
        }
    }
}

/// What the provider reported for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    pub status_code: u16,
    pub message_id: Option<String>,
}

/// Sends notification emails.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Returns the name of this mailer implementation.
    fn name(&self) -> &str;

    /// Send one email. An `Ok` means the provider accepted it.
    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailerError>;
}
