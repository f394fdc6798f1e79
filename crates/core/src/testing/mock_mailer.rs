//! Mock mailer for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::mailer::{DeliveryReceipt, Mailer, MailerError, OutgoingEmail};

/// Mock implementation of the Mailer trait.
///
/// Every send attempt is recorded, including the ones that fail.
#[derive(Debug, Clone, Default)]
pub struct MockMailer {
    /// Send attempts, in order.
    sent: Arc<RwLock<Vec<OutgoingEmail>>>,
    /// If set, the next send will fail with this error.
    next_error: Arc<RwLock<Option<MailerError>>>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded send attempts.
    pub async fn sent_emails(&self) -> Vec<OutgoingEmail> {
        self.sent.read().await.clone()
    }

    /// Get the number of send attempts.
    pub async fn sent_count(&self) -> usize {
        self.sent.read().await.len()
    }

    /// Configure the next send to fail with the given error.
    pub async fn set_next_error(&self, error: MailerError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl Mailer for MockMailer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailerError> {
        self.sent.write().await.push(email.clone());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(DeliveryReceipt {
            status_code: 202,
            message_id: Some(format!("mock-{}", self.sent.read().await.len())),
        })
    }
}
