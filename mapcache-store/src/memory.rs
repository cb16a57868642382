//! In-memory named-entry store.

use dashmap::DashMap;

use mapcache_core::error::{MapCacheError, Result};
use mapcache_core::traits::EntryStore;

/// In-memory entry store.
///
/// Thread-safe; entries can be replaced while caches are reading from it.
#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryEntryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `content` under `key`, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.entries.insert(key.into(), content.into());
    }

    /// Removes the entry under `key`, returning its content.
    pub fn remove(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.remove(key).map(|(_, content)| content)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntryStore for MemoryEntryStore {
    fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        self.entries
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| MapCacheError::EntryNotFound(key.to_string()))
    }
}
