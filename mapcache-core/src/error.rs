//! Error types for the mapping resource cache.
//!
//! A single error hierarchy built with `thiserror`. Cache failures carry the
//! instance identifier they occurred for so callers can log them with context.

use thiserror::Error;

/// Result type alias using `MapCacheError`.
pub type Result<T> = std::result::Result<T, MapCacheError>;

/// Boxed error produced by external collaborators such as resource builders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for all cache operations.
#[derive(Debug, Error)]
pub enum MapCacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CACHE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The host configuration or property store could not be queried.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// Building the mapping resource failed. Wraps the underlying cause.
    #[error("Failed to build mapping resource for '{instance_id}': {source}")]
    BuildFailed {
        /// Instance whose resource could not be built.
        instance_id: String,
        /// Underlying cause (missing source, malformed schema, builder error).
        #[source]
        source: BoxError,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // ENTRY STORE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No entry exists under the given key.
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// The entry exists but its content could not be read.
    #[error("Entry '{key}' could not be read: {reason}")]
    EntryUnreadable {
        /// Key that was looked up.
        key: String,
        /// Why the content could not be read.
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // OUTPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Value handed to the row writer is not a well-formed array under its schema.
    #[error("Malformed array value: {0}")]
    MalformedArrayValue(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION / CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // WRAPPED
    // ═══════════════════════════════════════════════════════════════════════════

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl MapCacheError {
    /// Wraps a cause as a build failure for `instance_id`.
    pub fn build_failed(instance_id: impl Into<String>, source: impl Into<BoxError>) -> Self {
        MapCacheError::BuildFailed {
            instance_id: instance_id.into(),
            source: source.into(),
        }
    }

    /// Returns true if resource construction failed.
    pub fn is_build_failure(&self) -> bool {
        matches!(self, MapCacheError::BuildFailed { .. })
    }

    /// Returns true if the host configuration could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, MapCacheError::CacheUnavailable(_))
    }

    /// Returns the source key that failed to resolve, if that is what broke a build.
    pub fn failed_key(&self) -> Option<&str> {
        match self {
            MapCacheError::EntryNotFound(key) => Some(key),
            MapCacheError::EntryUnreadable { key, .. } => Some(key),
            MapCacheError::BuildFailed { source, .. } => source
                .downcast_ref::<MapCacheError>()
                .and_then(MapCacheError::failed_key),
            _ => None,
        }
    }
}
