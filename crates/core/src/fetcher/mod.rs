//! Downloading submitted artifacts.
//!
//! A non-200 response is data, not an error: the processor decides what a
//! bad status means for the user. Only transport faults surface as
//! [`FetchError`].

mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while downloading a submission.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid submission URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Request failed: {0}")]
    Request(String),
}

/// The response to a submission download.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// HTTP status code returned by the server.
    pub status: u16,
    /// Response body, possibly empty.
    pub body: Vec<u8>,
}

impl FetchedResource {
    /// Only an exact 200 counts as a successful download.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Retrieves the resource behind a submission URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Fetch the resource with a plain GET.
    async fn fetch(&self, url: &str) -> Result<FetchedResource, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_200_is_ok() {
        let ok = FetchedResource {
            status: 200,
            body: vec![],
        };
        let created = FetchedResource {
            status: 201,
            body: vec![],
        };
        assert!(ok.is_ok());
        assert!(!created.is_ok());
    }
}
