//! SendGrid v3 mail API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::config::SendGridConfig;

use super::{DeliveryReceipt, Mailer, MailerError, OutgoingEmail, Sender};

#[derive(Debug, Serialize)]
struct MailSendRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: &'a str,
    content: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Debug, Serialize)]
struct Address<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

/// Sends email through the SendGrid v3 `mail/send` endpoint.
pub struct SendGridMailer {
    client: Client,
    api_key: String,
    api_base: String,
    sender: Sender,
}

impl SendGridMailer {
    pub fn new(config: &SendGridConfig, sender: Sender) -> Result<Self, MailerError> {
        if config.api_key.is_empty() {
            return Err(MailerError::Configuration(
                "SendGrid API key is empty".to_string(),
            ));
        }

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| MailerError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            sender,
        })
    }

    fn build_request<'a>(&'a self, email: &'a OutgoingEmail) -> MailSendRequest<'a> {
        MailSendRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: &email.to,
                    name: None,
                }],
            }],
            from: Address {
                email: &self.sender.address,
                name: self.sender.name.as_deref(),
            },
            subject: &email.subject,
            content: vec![Content {
                content_type: email.format.mime_type(),
                value: &email.body,
            }],
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    fn name(&self) -> &str {
        "sendgrid"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<DeliveryReceipt, MailerError> {
        let url = format!("{}/v3/mail/send", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(email))
            .send()
            .await
            .map_err(|e| MailerError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        debug!(to = %email.to, status = status.as_u16(), "SendGrid accepted message");

        Ok(DeliveryReceipt {
            status_code: status.as_u16(),
            message_id,
        })
    }
}
