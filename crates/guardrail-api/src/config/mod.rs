//! Configuration management for the API server

pub mod app;
pub mod auth;
pub mod observability;
pub mod rate_limit;

pub use app::AppConfig;
pub use auth::AuthConfig;
pub use observability::ObservabilityConfig;
pub use rate_limit::{RateLimitConfig, RateLimitTier};

use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Load configuration from file and environment
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut builder = config::Config::builder();

    // Load default configuration
    if let Some(path) = config_path {
        builder = builder.add_source(config::File::from(path));
    }

    // Override with environment variables (GUARDRAIL_API_*)
    builder = builder.add_source(
        config::Environment::with_prefix("GUARDRAIL_API")
            .separator("__")
            .try_parsing(true),
    );

    let config: AppConfig = builder
        .build()
        .map_err(|e| ConfigError::LoadError(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError(e.to_string()))?;

    config.validate()?;

    Ok(config)
}
