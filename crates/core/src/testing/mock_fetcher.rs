//! Mock fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, FetchedResource, Fetcher};

/// Mock implementation of the Fetcher trait.
///
/// Provides controllable behavior for testing:
/// - Serve configured responses per URL
/// - Unknown URLs answer 404 with an empty body
/// - Simulate transport faults
/// - Track requested URLs
///
/// # Example
///
/// ```rust,ignore
/// use handin_core::testing::{fixtures, MockFetcher};
///
/// let fetcher = MockFetcher::new();
/// fetcher.set_response("https://x/test.zip", 200, fixtures::zip_bytes(&[])).await;
///
/// let resource = fetcher.fetch("https://x/test.zip").await?;
/// assert!(resource.is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MockFetcher {
    /// Configured responses keyed by URL.
    responses: Arc<RwLock<HashMap<String, FetchedResource>>>,
    /// URLs requested, in order.
    requests: Arc<RwLock<Vec<String>>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<FetchError>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// Create a new mock fetcher with no configured responses.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Configure the response for a URL.
    pub async fn set_response(&self, url: &str, status: u16, body: Vec<u8>) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), FetchedResource { status, body });
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all requested URLs.
    pub async fn recorded_requests(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError> {
        self.requests.write().await.push(url.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self
            .responses
            .read()
            .await
            .get(url)
            .cloned()
            .unwrap_or(FetchedResource {
                status: 404,
                body: Vec::new(),
            }))
    }
}
