pub mod archive;
pub mod auth;
pub mod config;
pub mod event;
pub mod fetcher;
pub mod mailer;
pub mod metrics;
pub mod processor;
pub mod storage;
pub mod templates;
pub mod testing;
pub mod tracking;

pub use archive::is_zip_archive;
pub use auth::{create_guard, AuthError, Credentials, OpenGuard, Publisher, PublisherGuard};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthMethod, Config, ConfigError,
    SanitizedConfig,
};
pub use event::{parse_notification, EventError, EventVariant, InboundMessage, SubmissionEvent};
pub use fetcher::{FetchError, FetchedResource, Fetcher, HttpFetcher};
pub use mailer::{LogMailer, Mailer, MailerError, OutgoingEmail, SendGridMailer, Sender};
pub use processor::{
    EmailDelivery, Outcome, ProcessingReport, ProcessingStage, ProcessorSettings,
    SubmissionProcessor,
};
pub use storage::{ArtifactLocation, FsObjectStore, HttpObjectStore, ObjectStore, StorageError};
pub use templates::{BodyFormat, NotificationKind, TemplateRenderer, TeraRenderer};
pub use tracking::{
    tracking_key, SqliteTrackingStore, TrackingError, TrackingRecord, TrackingStatus,
    TrackingStore,
};
