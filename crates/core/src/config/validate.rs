use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::{
    types::{AuthMethod, Config, EmailProvider, StorageBackend},
    ConfigError,
};

/// Plain SQL identifier, safe to splice into statements as a table name.
static SQL_IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - The selected auth, storage and email backends have their sections
/// - Bucket and sender address look sane
/// - Tracking table name is a plain SQL identifier
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if config.auth.method == AuthMethod::ApiKey
        && config.auth.api_key.as_deref().is_none_or(str::is_empty)
    {
        return Err(invalid("auth.api_key must be set when auth.method = \"api_key\""));
    }

    let bucket = config.storage.bucket.trim();
    if bucket.is_empty() || bucket.contains('/') {
        return Err(invalid("storage.bucket must be a non-empty name without '/'"));
    }

    match config.storage.backend {
        StorageBackend::Filesystem if config.storage.filesystem.is_none() => {
            return Err(invalid(
                "storage.filesystem section is required for the filesystem backend",
            ));
        }
        StorageBackend::Http if config.storage.http.is_none() => {
            return Err(invalid("storage.http section is required for the http backend"));
        }
        _ => {}
    }

    if !config.email.from_address.contains('@') {
        return Err(invalid("email.from_address must be an email address"));
    }

    if config.email.provider == EmailProvider::Sendgrid {
        match &config.email.sendgrid {
            Some(sendgrid) if !sendgrid.api_key.is_empty() => {}
            _ => {
                return Err(invalid(
                    "email.sendgrid.api_key is required for the sendgrid provider",
                ))
            }
        }
    }

    if !SQL_IDENTIFIER.is_match(&config.tracking.table) {
        return Err(invalid("tracking.table must be a plain identifier"));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
