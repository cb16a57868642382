//! # mapcache cache
//!
//! TTL cache for compiled mapping resources, partitioned per instance
//! identifier.
//!
//! A long-running message processor calls [`ResourceCache::get_resource`]
//! for every message; the resource is only rebuilt when the instance has no
//! entry yet or its entry has outlived the configured TTL.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mapcache_cache::ResourceCache;
//! use mapcache_core::SourceKeys;
//!
//! let cache = ResourceCache::new(builder, Arc::new(entries), Arc::new(properties));
//! let keys = SourceKeys::new("conf/mapping.json", "conf/in.json", "conf/out.json");
//!
//! // First call builds, later calls within the TTL share the same handle
//! let resource = cache.get_resource("mediator-42", &keys)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod clock;
mod settings;
mod ttl;

pub use cache::{CacheStats, EntrySnapshot, ResourceCache};
pub use clock::ManualClock;
pub use settings::CacheSettings;
pub use ttl::TtlResolver;

// Re-export the system clock from core
pub use mapcache_core::traits::SystemClock;
