use async_trait::async_trait;
use tracing::info;

use super::{DeliveryReceipt, Mailer, MailerError, OutgoingEmail, Sender};

/// Mailer that writes messages to the log instead of sending them.
/// Must be explicitly configured.
pub struct LogMailer {
    sender: Sender,
}

impl LogMailer {
    pub fn new(sender: Sender) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailerError> {
        info!(
            from = %self.sender.address,
            to = %email.to,
            subject = %email.subject,
            content_type = email.format.mime_type(),
            body = %email.body,
            "Email (not sent, log provider)"
        );
        Ok(DeliveryReceipt {
            status_code: 200,
            message_id: None,
        })
    }
}
