//! Collaborator traits.
//!
//! The cache only talks to the outside world through these interfaces, so a
//! host can plug in its own entry store, configuration, builder, and clock.

use chrono::{DateTime, Utc};

use crate::error::{BoxError, Result};
use crate::types::SourceBundle;

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// Named-entry store holding configuration and schema documents.
pub trait EntryStore: Send + Sync {
    /// Returns the raw bytes stored under `key`.
    ///
    /// Fails with `EntryNotFound` when nothing is stored under the key.
    fn fetch(&self, key: &str) -> Result<Vec<u8>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// HOST CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Host configuration properties.
pub trait PropertySource: Send + Sync {
    /// Returns the property value, or `None` when it is not set.
    ///
    /// An `Err` means the source itself could not be queried.
    fn property(&self, name: &str) -> Result<Option<String>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// RESOURCE BUILDER
// ═══════════════════════════════════════════════════════════════════════════════

/// Compiles a schema pair and transformation configuration into a resource.
pub trait ResourceBuilder: Send + Sync {
    /// The compiled mapping resource. Shared read-only between callers.
    type Resource: Send + Sync;

    /// Builds a resource from the resolved source bytes.
    fn build(&self, sources: SourceBundle) -> std::result::Result<Self::Resource, BoxError>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLOCK
// ═══════════════════════════════════════════════════════════════════════════════

/// Source of the current time for staleness checks.
pub trait Clock: Send + Sync {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
