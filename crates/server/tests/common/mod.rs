//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock collaborators injected, so notification handling can be tested
//! end to end without a bucket, an email provider or the network.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use handin_core::{
    auth::SharedKeyGuard,
    config::{
        AuthConfig, AuthMethod, Config, EmailConfig, EmailProvider, FsStorageConfig,
        ProcessorConfig, ServerConfig, StorageBackend, StorageConfig, TrackingConfig,
    },
    testing::{MockFetcher, MockMailer, MockObjectStore},
    BodyFormat, EventVariant, Fetcher, OpenGuard, ProcessorSettings, PublisherGuard,
    SqliteTrackingStore, SubmissionProcessor, TeraRenderer, TrackingStore,
};

/// Re-export fixtures for test convenience
pub use handin_core::testing::fixtures;

pub const BUCKET: &str = "submissions";
pub const PUBLIC_BASE_URL: &str = "https://storage.example.com";

/// Test fixture for E2E testing with mock dependencies.
///
/// Provides an in-process server with fully controllable mocks for:
/// - Submission downloads (MockFetcher, unless a real fetcher is injected)
/// - Object storage (MockObjectStore)
/// - Email delivery (MockMailer)
///
/// Tracking uses a real SQLite store in a temp directory.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    pub fetcher: MockFetcher,
    pub store: MockObjectStore,
    pub mailer: MockMailer,
    pub tracking: Arc<SqliteTrackingStore>,
    /// Temporary directory for the tracking database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Require this key from publishers
    pub api_key: Option<String>,
    /// Message shape expected on the notification endpoint
    pub variant: EventVariant,
}

impl TestConfig {
    pub fn with_api_key(key: &str) -> Self {
        Self {
            api_key: Some(key.to_string()),
            ..Default::default()
        }
    }

    pub fn simple() -> Self {
        Self {
            variant: EventVariant::Simple,
            ..Default::default()
        }
    }
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let fetcher = MockFetcher::new();
        Self::build(test_config, fetcher.clone(), Arc::new(fetcher))
    }

    /// Create a test fixture that downloads with the given fetcher.
    pub async fn with_fetcher(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::build(TestConfig::default(), MockFetcher::new(), fetcher)
    }

    fn build(test_config: TestConfig, mock_fetcher: MockFetcher, fetcher: Arc<dyn Fetcher>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("tracking.db");

        let config = Config {
            auth: AuthConfig {
                method: if test_config.api_key.is_some() {
                    AuthMethod::ApiKey
                } else {
                    AuthMethod::None
                },
                api_key: test_config.api_key.clone(),
            },
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            processor: ProcessorConfig {
                variant: test_config.variant,
                fetch_timeout_secs: None,
            },
            storage: StorageConfig {
                backend: StorageBackend::Filesystem,
                bucket: BUCKET.to_string(),
                public_base_url: PUBLIC_BASE_URL.to_string(),
                filesystem: Some(FsStorageConfig {
                    root: temp_dir.path().join("buckets"),
                }),
                http: None,
            },
            email: EmailConfig {
                provider: EmailProvider::Log,
                from_address: "noreply@example.com".to_string(),
                from_name: None,
                body_format: BodyFormat::Text,
                templates_dir: None,
                sendgrid: None,
            },
            tracking: TrackingConfig {
                database_path: db_path.clone(),
                table: "email_tracking".to_string(),
            },
        };

        let guard: Arc<dyn PublisherGuard> = match &test_config.api_key {
            Some(key) => Arc::new(SharedKeyGuard::new(key)),
            None => Arc::new(OpenGuard),
        };

        let store = MockObjectStore::new(BUCKET);
        let mailer = MockMailer::new();
        let tracking = Arc::new(
            SqliteTrackingStore::new(&db_path, "email_tracking")
                .expect("Failed to create tracking store"),
        );

        let processor = SubmissionProcessor::new(
            fetcher,
            Arc::new(store.clone()),
            Arc::new(mailer.clone()),
            Arc::new(TeraRenderer::new(BodyFormat::Text).expect("Failed to load templates")),
            Arc::clone(&tracking) as Arc<dyn TrackingStore>,
            ProcessorSettings::from_storage_config(&config.storage),
        );

        let state = Arc::new(handin_server::state::AppState::new(
            config,
            guard,
            Arc::new(processor),
            Arc::clone(&tracking) as Arc<dyn TrackingStore>,
        ));

        let router = handin_server::api::create_router(state);

        Self {
            router,
            fetcher: mock_fetcher,
            store,
            mailer,
            tracking,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, &[]).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body.to_string()), &[]).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request("POST", path, Some(body.to_string()), &[]).await
    }

    /// Send a POST request with extra headers.
    pub async fn post_with_headers(
        &self,
        path: &str,
        body: Value,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        self.request("POST", path, Some(body.to_string()), headers)
            .await
    }

    /// Send a GET request with extra headers.
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        self.request("GET", path, None, headers).await
    }

    /// Deliver a message wrapped in a Lambda-style SNS envelope.
    pub async fn deliver(&self, message: &Value) -> TestResponse {
        let envelope = String::from_utf8(fixtures::sns_envelope(message))
            .expect("envelope is UTF-8");
        self.post_raw("/api/v1/notifications", &envelope).await
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }

        let body = match body {
            Some(text) => {
                request_builder = request_builder.header("Content-Type", "application/json");
                Body::from(text)
            }
            None => Body::empty(),
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()))
        };

        TestResponse { status, body }
    }
}

/// Serve `routes` on an ephemeral local port and return its address.
pub async fn spawn_local_server(routes: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind local server");
    let addr = listener.local_addr().expect("local server address");
    tokio::spawn(async move {
        axum::serve(listener, routes).await.ok();
    });
    addr
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
