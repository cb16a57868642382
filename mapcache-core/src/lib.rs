//! # mapcache core
//!
//! Core types, errors, and traits shared by the mapping resource cache crates.
//!
//! - **Types**: source keys and the byte bundle handed to a resource builder
//! - **Errors**: a single error hierarchy for the cache, stores, and row writer
//! - **Constants**: defaults such as the TTL property name and fallback TTL
//! - **Traits**: the external collaborators the cache is wired against
//!
//! ## Example
//!
//! ```rust
//! use mapcache_core::{SourceKeys, DEFAULT_TTL_MILLIS};
//!
//! let keys = SourceKeys::new("conf:/mapping.json", "conf:/in.schema", "conf:/out.schema");
//! assert_eq!(keys.config_key, "conf:/mapping.json");
//! assert_eq!(DEFAULT_TTL_MILLIS, 10_000);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{BoxError, MapCacheError, Result};
pub use traits::*;
pub use types::*;
