use async_trait::async_trait;

use super::{AuthError, Credentials, Publisher, PublisherGuard};

/// Admits every caller as anonymous.
/// Must be explicitly configured.
pub struct OpenGuard;

#[async_trait]
impl PublisherGuard for OpenGuard {
    async fn admit(&self, _credentials: &Credentials) -> Result<Publisher, AuthError> {
        Ok(Publisher::anonymous())
    }

    fn method_name(&self) -> &'static str {
        "none"
    }
}
