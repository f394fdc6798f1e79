use std::sync::Arc;
use handin_core::{
    Config, EventVariant, PublisherGuard, SanitizedConfig, SubmissionProcessor, TrackingStore,
};

/// Shared application state
pub struct AppState {
    config: Config,
    guard: Arc<dyn PublisherGuard>,
    processor: Arc<SubmissionProcessor>,
    tracking: Arc<dyn TrackingStore>,
}

impl AppState {
    pub fn new(
        config: Config,
        guard: Arc<dyn PublisherGuard>,
        processor: Arc<SubmissionProcessor>,
        tracking: Arc<dyn TrackingStore>,
    ) -> Self {
        Self {
            config,
            guard,
            processor,
            tracking,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// Message shape expected on the notification endpoint.
    pub fn variant(&self) -> EventVariant {
        self.config.processor.variant
    }

    pub fn guard(&self) -> &dyn PublisherGuard {
        self.guard.as_ref()
    }

    pub fn processor(&self) -> &SubmissionProcessor {
        self.processor.as_ref()
    }

    pub fn tracking(&self) -> &dyn TrackingStore {
        self.tracking.as_ref()
    }
}
