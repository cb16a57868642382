//! Defaults shared across the cache crates.

// ═══════════════════════════════════════════════════════════════════════════════
// TTL
// ═══════════════════════════════════════════════════════════════════════════════

/// Host property holding the cache TTL, as an integer count of milliseconds.
pub const CACHE_DURATION_PROPERTY: &str = "cachableDuration";

/// TTL applied when the property is unset, empty, or unusable.
pub const DEFAULT_TTL_MILLIS: i64 = 10_000;

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Environment variable overriding the TTL property name.
pub const ENV_TTL_PROPERTY: &str = "MAPCACHE_TTL_PROPERTY";

/// Environment variable overriding the fallback TTL.
pub const ENV_DEFAULT_TTL_MS: &str = "MAPCACHE_DEFAULT_TTL_MS";

/// Prefix used by environment-backed property sources.
pub const ENV_PROPERTY_PREFIX: &str = "MAPCACHE_PROP_";

// ═══════════════════════════════════════════════════════════════════════════════
// DELIMITED OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

/// Field delimiter for rendered rows.
pub const ROW_DELIMITER: u8 = b',';

/// Quote character for rendered rows.
pub const ROW_QUOTE: u8 = b'"';
