//! HTTP bucket API object store.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::HttpStorageConfig;

use super::error::StorageError;
use super::{validate_object_path, ObjectStore, StoredObject};

/// Uploads objects with `PUT {endpoint}/{bucket}/{path}`.
///
/// With the default endpoint this is the Cloud Storage XML API; any
/// S3-compatible endpoint accepting bearer or anonymous PUTs works as well.
pub struct HttpObjectStore {
    client: Client,
    endpoint: String,
    bucket: String,
    access_token: Option<String>,
}

impl HttpObjectStore {
    /// Create a new store for `bucket` using the given configuration.
    pub fn new(config: &HttpStorageConfig, bucket: impl Into<String>) -> Result<Self, StorageError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| StorageError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// Build the upload URL, percent-encoding each path segment.
    fn object_url(&self, path: &str) -> String {
        let encoded: Vec<String> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!(
            "{}/{}/{}",
            self.endpoint,
            urlencoding::encode(&self.bucket),
            encoded.join("/")
        )
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    fn name(&self) -> &str {
        "http"
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put(&self, path: &str, bytes: &[u8]) -> Result<StoredObject, StorageError> {
        validate_object_path(path)?;

        let url = self.object_url(path);
        let mut request = self
            .client
            .put(&url)
            .header("content-type", "application/zip")
            .body(bytes.to_vec());
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                path: path.to_string(),
                status,
                message: body.chars().take(200).collect(),
            });
        }

        debug!(url = %url, bytes = bytes.len(), "Uploaded object");
        Ok(StoredObject::describe(path, bytes))
    }
}
