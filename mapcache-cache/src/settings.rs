//! Cache settings loaded from the environment.

use serde::{Deserialize, Serialize};

use mapcache_core::constants::{
    CACHE_DURATION_PROPERTY, DEFAULT_TTL_MILLIS, ENV_DEFAULT_TTL_MS, ENV_TTL_PROPERTY,
};
use mapcache_core::error::{MapCacheError, Result};

/// Cache settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Host property holding the TTL in milliseconds
    pub ttl_property: String,
    /// TTL used when the property is unset or invalid
    pub default_ttl_ms: i64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_property: CACHE_DURATION_PROPERTY.into(),
            default_ttl_ms: DEFAULT_TTL_MILLIS,
        }
    }
}

impl CacheSettings {
    /// Loads settings from the process environment (and a `.env` file if present).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut settings = Self::default();

        if let Some(property) = lookup(ENV_TTL_PROPERTY) {
            settings.ttl_property = property.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_DEFAULT_TTL_MS) {
            settings.default_ttl_ms = raw.trim().parse().map_err(|_| {
                MapCacheError::ConfigError(format!("{} must be an integer, got '{}'", ENV_DEFAULT_TTL_MS, raw))
            })?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Checks the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.ttl_property.is_empty() {
            return Err(MapCacheError::ConfigError("TTL property name is empty".into()));
        }
        if self.default_ttl_ms < 0 {
            return Err(MapCacheError::ConfigError(format!(
                "default TTL must not be negative, got {}",
                self.default_ttl_ms
            )));
        }
        Ok(())
    }
}
