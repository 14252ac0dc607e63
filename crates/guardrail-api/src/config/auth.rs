//! Authentication cache configuration (§4.9): the read-through cache
//! sitting in front of the tenant/application API-key lookup, keyed by raw
//! key value.

use super::{ConfigError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Enable the auth cache (disabling forces a DB round trip per request — tests only)
    #[serde(default = "default_auth_cache_enabled")]
    pub enabled: bool,

    /// Cache TTL in seconds (§4.9 "Auth cache... 300s TTL")
    #[serde(default = "default_auth_cache_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum entries held at once
    #[serde(default = "default_auth_cache_max_size")]
    pub max_size: usize,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "auth.ttl_secs must be greater than 0 when enabled".to_string(),
            ));
        }
        if self.enabled && self.max_size == 0 {
            return Err(ConfigError::ValidationError(
                "auth.max_size must be greater than 0 when enabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: default_auth_cache_enabled(),
            ttl_secs: default_auth_cache_ttl_secs(),
            max_size: default_auth_cache_max_size(),
        }
    }
}

fn default_auth_cache_enabled() -> bool {
    true
}

fn default_auth_cache_ttl_secs() -> u64 {
    300
}

fn default_auth_cache_max_size() -> usize {
    50_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert!(config.enabled);
        assert_eq!(config.ttl_secs, 300);
    }

    #[test]
    fn test_auth_config_validation() {
        let mut config = AuthConfig::default();
        assert!(config.validate().is_ok());

        config.ttl_secs = 0;
        assert!(config.validate().is_err());

        config.enabled = false;
        assert!(config.validate().is_ok());
    }
}
