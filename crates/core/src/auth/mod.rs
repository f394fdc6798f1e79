//! Publisher authentication for the notification endpoint.
//!
//! The host extracts [`Credentials`] from each request and asks the
//! configured [`PublisherGuard`] whether the caller may deliver
//! notifications.

mod credentials;
mod open;
mod shared_key;

pub use credentials::{Credentials, Publisher};
pub use open::OpenGuard;
pub use shared_key::SharedKeyGuard;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{AuthConfig, AuthMethod};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Decides whether a caller may publish notifications.
#[async_trait]
pub trait PublisherGuard: Send + Sync {
    async fn admit(&self, credentials: &Credentials) -> Result<Publisher, AuthError>;

    /// Name of this authentication method
    fn method_name(&self) -> &'static str;
}

/// Build the guard selected by configuration.
pub fn create_guard(config: &AuthConfig) -> Result<Box<dyn PublisherGuard>, AuthError> {
    match config.method {
        AuthMethod::None => Ok(Box::new(OpenGuard)),
        AuthMethod::ApiKey => {
            let key = config
                .api_key
                .as_deref()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| {
                    AuthError::Configuration(
                        "api_key must be set when using api_key auth method".to_string(),
                    )
                })?;
            Ok(Box::new(SharedKeyGuard::new(key)))
        }
    }
}
