//! Settings for the submission processor.

use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;

/// Settings the processor needs beyond its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorSettings {
    /// Base of the public download URL, without the bucket.
    pub public_base_url: String,
}

impl ProcessorSettings {
    pub fn from_storage_config(storage: &StorageConfig) -> Self {
        Self {
            public_base_url: storage.public_base_url.clone(),
        }
    }
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            public_base_url: "https://storage.cloud.google.com".to_string(),
        }
    }
}
