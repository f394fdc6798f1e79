//! Shared-secret publisher authentication.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::{AuthError, Credentials, Publisher, PublisherGuard};

/// Admits callers presenting the configured key, as
/// `Authorization: Bearer <key>` or `X-API-Key: <key>`.
pub struct SharedKeyGuard {
    expected: [u8; 32],
}

impl SharedKeyGuard {
    pub fn new(key: &str) -> Self {
        Self {
            expected: Sha256::digest(key.as_bytes()).into(),
        }
    }
}

#[async_trait]
impl PublisherGuard for SharedKeyGuard {
    async fn admit(&self, credentials: &Credentials) -> Result<Publisher, AuthError> {
        let presented = credentials.secret().ok_or(AuthError::MissingCredentials)?;
        let digest: [u8; 32] = Sha256::digest(presented.as_bytes()).into();

        // Fixed-length digests, compared without early exit.
        let diff = digest
            .iter()
            .zip(self.expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));

        if diff == 0 {
            Ok(Publisher {
                id: "publisher".to_string(),
                method: "api_key",
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    fn method_name(&self) -> &'static str {
        "api_key"
    }
}
