//! TTL resolution from host configuration.
//!
//! The TTL is read from the property source on every cache access, so a
//! changed property takes effect on the next call without a restart.

use chrono::TimeDelta;
use tracing::warn;

use mapcache_core::constants::{CACHE_DURATION_PROPERTY, DEFAULT_TTL_MILLIS};
use mapcache_core::error::{MapCacheError, Result};
use mapcache_core::traits::PropertySource;

use crate::settings::CacheSettings;

/// Resolves the cache TTL from a named host property.
#[derive(Clone, Debug)]
pub struct TtlResolver {
    property: String,
    default_ttl: TimeDelta,
}

impl TtlResolver {
    /// Creates a resolver reading `property`, falling back to `default_ms`.
    pub fn new(property: impl Into<String>, default_ms: i64) -> Self {
        Self {
            property: property.into(),
            default_ttl: TimeDelta::milliseconds(default_ms.max(0)),
        }
    }

    /// Creates a resolver from cache settings.
    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.ttl_property.clone(), settings.default_ttl_ms)
    }

    /// Name of the property consulted.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// TTL used when the property is unset or unusable.
    pub fn default_ttl(&self) -> TimeDelta {
        self.default_ttl
    }

    /// Reads and parses the TTL.
    ///
    /// Unset, empty, unparseable, and negative values all yield the default.
    /// Only a failure to query the source is an error.
    pub fn resolve(&self, source: &dyn PropertySource) -> Result<TimeDelta> {
        let raw = source.property(&self.property).map_err(|e| {
            MapCacheError::CacheUnavailable(format!(
                "cannot read property '{}': {}",
                self.property, e
            ))
        })?;

        let raw = match raw.as_deref().map(str::trim) {
            None | Some("") => return Ok(self.default_ttl),
            Some(value) => value,
        };

        match raw.parse::<i64>() {
            Ok(millis) if millis >= 0 => Ok(TimeDelta::milliseconds(millis)),
            _ => {
                warn!(
                    property = %self.property,
                    value = raw,
                    default_ms = self.default_ttl.num_milliseconds(),
                    "Invalid cache duration, using default"
                );
                Ok(self.default_ttl)
            }
        }
    }
}

impl Default for TtlResolver {
    fn default() -> Self {
        Self::new(CACHE_DURATION_PROPERTY, DEFAULT_TTL_MILLIS)
    }
}
