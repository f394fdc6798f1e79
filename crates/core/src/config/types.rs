use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::event::EventVariant;
use crate::templates::BodyFormat;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub processor: ProcessorConfig,
    pub storage: StorageConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Authentication configuration for the inbound notification endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub method: AuthMethod,
    /// Shared secret expected from the publisher (required when method = "api_key")
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    None,
    ApiKey,
}

/// Submission processing configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProcessorConfig {
    /// Which message shape publishers send (default: extended)
    #[serde(default)]
    pub variant: EventVariant,
    /// Timeout for downloading the submission. Unset means the HTTP client default.
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
}

/// Object storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Bucket receiving the artifacts
    pub bucket: String,
    /// Base of the download link mailed to the user
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    #[serde(default)]
    pub filesystem: Option<FsStorageConfig>,
    #[serde(default)]
    pub http: Option<HttpStorageConfig>,
}

fn default_public_base_url() -> String {
    "https://storage.cloud.google.com".to_string()
}

/// Available object storage backends
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    Filesystem,
    Http,
}

/// Local directory standing in for a bucket store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FsStorageConfig {
    /// Directory holding one sub-directory per bucket
    pub root: PathBuf,
}

/// HTTP object storage (GCS XML API, S3-compatible endpoints)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpStorageConfig {
    #[serde(default = "default_storage_endpoint")]
    pub endpoint: String,
    /// OAuth bearer token sent with every upload
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_storage_endpoint() -> String {
    "https://storage.googleapis.com".to_string()
}

/// Outbound email configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub provider: EmailProvider,
    pub from_address: String,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub body_format: BodyFormat,
    /// Directory with `<kind>.html` / `<kind>.txt` files overriding the built-in bodies
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
    #[serde(default)]
    pub sendgrid: Option<SendGridConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmailProvider {
    Sendgrid,
    /// Write emails to the log instead of sending them
    Log,
}

/// SendGrid v3 API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendGridConfig {
    pub api_key: String,
    #[serde(default = "default_sendgrid_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_sendgrid_api_base() -> String {
    "https://api.sendgrid.com".to_string()
}

/// Tracking store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackingConfig {
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            table: default_table(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("handin.db")
}

fn default_table() -> String {
    "email_tracking".to_string()
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub processor: ProcessorConfig,
    pub storage: SanitizedStorageConfig,
    pub email: SanitizedEmailConfig,
    pub tracking: TrackingConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
    pub api_key_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub backend: String,
    pub bucket: String,
    pub public_base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub access_token_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedEmailConfig {
    pub provider: String,
    pub from_address: String,
    pub body_format: BodyFormat,
    pub custom_templates: bool,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let http = config.storage.http.as_ref();
        Self {
            auth: SanitizedAuthConfig {
                method: match config.auth.method {
                    AuthMethod::None => "none".to_string(),
                    AuthMethod::ApiKey => "api_key".to_string(),
                },
                api_key_configured: config.auth.api_key.is_some(),
            },
            server: config.server.clone(),
            processor: config.processor.clone(),
            storage: SanitizedStorageConfig {
                backend: match config.storage.backend {
                    StorageBackend::Filesystem => "filesystem".to_string(),
                    StorageBackend::Http => "http".to_string(),
                },
                bucket: config.storage.bucket.clone(),
                public_base_url: config.storage.public_base_url.clone(),
                root: config.storage.filesystem.as_ref().map(|f| f.root.clone()),
                endpoint: http.map(|h| h.endpoint.clone()),
                access_token_configured: http
                    .map(|h| h.access_token.as_deref().is_some_and(|t| !t.is_empty()))
                    .unwrap_or(false),
            },
            email: SanitizedEmailConfig {
                provider: match config.email.provider {
                    EmailProvider::Sendgrid => "sendgrid".to_string(),
                    EmailProvider::Log => "log".to_string(),
                },
                from_address: config.email.from_address.clone(),
                body_format: config.email.body_format,
                custom_templates: config.email.templates_dir.is_some(),
                api_key_configured: config
                    .email
                    .sendgrid
                    .as_ref()
                    .is_some_and(|s| !s.api_key.is_empty()),
            },
            tracking: config.tracking.clone(),
        }
    }
}
