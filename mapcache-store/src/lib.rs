//! # mapcache store
//!
//! Host-side collaborators for the mapping resource cache.
//!
//! - **Memory**: in-memory named-entry store for tests and embedded hosts
//! - **File**: entry store reading documents from a directory tree
//! - **Properties**: static and environment-backed property sources
//! - **JSON**: a resource builder that parses the three sources as JSON
//!
//! ## Example
//!
//! ```rust
//! use mapcache_core::EntryStore;
//! use mapcache_store::MemoryEntryStore;
//!
//! let store = MemoryEntryStore::new();
//! store.insert("conf/mapping.json", "{}");
//! assert_eq!(store.fetch("conf/mapping.json").unwrap(), b"{}");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod file;
mod json;
mod memory;
mod properties;

pub use file::FileEntryStore;
pub use json::{JsonDocumentBuilder, JsonMapping};
pub use memory::MemoryEntryStore;
pub use properties::{EnvProperties, StaticProperties};
