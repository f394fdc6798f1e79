//! Builds the processor and its collaborators from configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use handin_core::config::{Config, EmailProvider, StorageBackend, TrackingConfig};
use handin_core::{
    Fetcher, FsObjectStore, HttpFetcher, HttpObjectStore, LogMailer, Mailer, ObjectStore,
    ProcessorSettings, SendGridMailer, Sender, SqliteTrackingStore, SubmissionProcessor,
    TemplateRenderer, TeraRenderer, TrackingStore,
};

pub fn build_tracking_store(config: &TrackingConfig) -> Result<Arc<dyn TrackingStore>> {
    let store = SqliteTrackingStore::new(&config.database_path, &config.table)
        .with_context(|| format!("Failed to open tracking store at {:?}", config.database_path))?;
    info!(
        path = ?config.database_path,
        table = %config.table,
        "Tracking store initialized"
    );
    Ok(Arc::new(store))
}

pub fn build_object_store(config: &Config) -> Result<Arc<dyn ObjectStore>> {
    let storage = &config.storage;
    match storage.backend {
        StorageBackend::Filesystem => {
            let fs = storage
                .filesystem
                .as_ref()
                .ok_or_else(|| anyhow!("filesystem backend selected but [storage.filesystem] is missing"))?;
            info!(root = ?fs.root, bucket = %storage.bucket, "Using filesystem object store");
            Ok(Arc::new(FsObjectStore::new(fs.root.clone(), storage.bucket.clone())))
        }
        StorageBackend::Http => {
            let http = storage
                .http
                .as_ref()
                .ok_or_else(|| anyhow!("http backend selected but [storage.http] is missing"))?;
            info!(endpoint = %http.endpoint, bucket = %storage.bucket, "Using HTTP object store");
            let store = HttpObjectStore::new(http, storage.bucket.clone())
                .context("Failed to create HTTP object store")?;
            Ok(Arc::new(store))
        }
    }
}

pub fn build_mailer(config: &Config) -> Result<Arc<dyn Mailer>> {
    let email = &config.email;
    let sender = Sender {
        address: email.from_address.clone(),
        name: email.from_name.clone(),
    };
    match email.provider {
        EmailProvider::Sendgrid => {
            let sendgrid = email
                .sendgrid
                .as_ref()
                .ok_or_else(|| anyhow!("sendgrid provider selected but [email.sendgrid] is missing"))?;
            info!(api_base = %sendgrid.api_base, "Using SendGrid mailer");
            let mailer =
                SendGridMailer::new(sendgrid, sender).context("Failed to create SendGrid mailer")?;
            Ok(Arc::new(mailer))
        }
        EmailProvider::Log => {
            info!("Using log mailer, emails will not be delivered");
            Ok(Arc::new(LogMailer::new(sender)))
        }
    }
}

pub fn build_renderer(config: &Config) -> Result<Arc<dyn TemplateRenderer>> {
    let format = config.email.body_format;
    let renderer = match &config.email.templates_dir {
        Some(dir) => {
            info!(dir = ?dir, "Loading template overrides");
            TeraRenderer::with_overrides(format, dir)
                .with_context(|| format!("Failed to load templates from {:?}", dir))?
        }
        None => TeraRenderer::new(format).context("Failed to load built-in templates")?,
    };
    Ok(Arc::new(renderer))
}

pub fn build_fetcher(config: &Config) -> Result<Arc<dyn Fetcher>> {
    let timeout = config.processor.fetch_timeout_secs.map(Duration::from_secs);
    let fetcher = HttpFetcher::new(timeout).context("Failed to create HTTP fetcher")?;
    Ok(Arc::new(fetcher))
}

/// Wire a processor from configuration, sharing `tracking` with the caller.
pub fn build_processor(
    config: &Config,
    tracking: Arc<dyn TrackingStore>,
) -> Result<SubmissionProcessor> {
    Ok(SubmissionProcessor::new(
        build_fetcher(config)?,
        build_object_store(config)?,
        build_mailer(config)?,
        build_renderer(config)?,
        tracking,
        ProcessorSettings::from_storage_config(&config.storage),
    ))
}
