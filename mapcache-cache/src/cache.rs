//! Per-instance TTL cache for compiled mapping resources.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, error, instrument};

use mapcache_core::error::{MapCacheError, Result};
use mapcache_core::traits::{Clock, EntryStore, PropertySource, ResourceBuilder, SystemClock};
use mapcache_core::types::{SourceBundle, SourceKeys};

use crate::settings::CacheSettings;
use crate::ttl::TtlResolver;

/// A built resource and the time it was built.
///
/// Entries are never modified after construction; a refresh installs a new
/// entry in place of the old one.
#[derive(Debug)]
pub(crate) struct CacheEntry<R> {
    resource: Arc<R>,
    created_at: DateTime<Utc>,
}

impl<R> CacheEntry<R> {
    fn new(resource: Arc<R>, created_at: DateTime<Utc>) -> Self {
        Self {
            resource,
            created_at,
        }
    }

    /// Last instant at which the entry is still served, or `None` if that
    /// lies beyond the representable range.
    fn expires_at(&self, ttl: TimeDelta) -> Option<DateTime<Utc>> {
        self.created_at.checked_add_signed(ttl)
    }

    /// An entry is usable up to and including its expiry instant.
    fn is_fresh(&self, ttl: TimeDelta, now: DateTime<Utc>) -> bool {
        self.expires_at(ttl).map_or(true, |limit| limit >= now)
    }
}

/// Read-only view of an instance's current entry.
#[derive(Debug, Clone)]
pub struct EntrySnapshot<R> {
    /// Shared handle to the cached resource
    pub resource: Arc<R>,
    /// When the resource was built
    pub created_at: DateTime<Utc>,
    /// Last instant the entry is served under the current TTL
    pub expires_at: Option<DateTime<Utc>>,
    /// Whether the next access would rebuild
    pub stale: bool,
}

/// Cache statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Calls served from a fresh entry
    pub hits: u64,
    /// Calls that found no entry
    pub misses: u64,
    /// Calls that found an expired entry
    pub stale_rebuilds: u64,
    /// Builds that failed
    pub build_failures: u64,
    /// Instances currently holding an entry
    pub live_entries: usize,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stale_rebuilds: AtomicU64,
    build_failures: AtomicU64,
    live_entries: AtomicUsize,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

type Slot<R> = Arc<Mutex<Option<Arc<CacheEntry<R>>>>>;

/// TTL cache of mapping resources keyed by instance identifier.
///
/// # Concurrency
///
/// Each instance identifier owns a slot with its own lock. The
/// check, build, and replace sequence runs while holding that lock, so
/// concurrent first calls for one instance collapse into a single build and
/// every caller receives the same handle. Slots for different instances are
/// independent: a slow build for one never delays another. The slot table's
/// internal locks are released before any build starts.
pub struct ResourceCache<B: ResourceBuilder> {
    builder: B,
    entries: Arc<dyn EntryStore>,
    properties: Arc<dyn PropertySource>,
    clock: Arc<dyn Clock>,
    ttl: TtlResolver,
    slots: DashMap<String, Slot<B::Resource>>,
    counters: Counters,
}

impl<B: ResourceBuilder> ResourceCache<B> {
    /// Creates a cache with default settings and the system clock.
    pub fn new(
        builder: B,
        entries: Arc<dyn EntryStore>,
        properties: Arc<dyn PropertySource>,
    ) -> Self {
        Self {
            builder,
            entries,
            properties,
            clock: Arc::new(SystemClock),
            ttl: TtlResolver::default(),
            slots: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// Replaces the clock used for staleness checks.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Applies the TTL property name and fallback from `settings`.
    pub fn with_settings(mut self, settings: &CacheSettings) -> Self {
        self.ttl = TtlResolver::from_settings(settings);
        self
    }

    /// The builder resources are compiled with.
    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Returns the resource for `instance_id`, building it if the instance
    /// has no entry or its entry has expired.
    ///
    /// A rebuild always uses `keys`, never the keys an earlier entry was built
    /// from. If the build fails the existing entry is left untouched and the
    /// error is returned; a stale resource is never served as a fallback.
    #[instrument(skip_all, fields(instance_id = %instance_id))]
    pub fn get_resource(&self, instance_id: &str, keys: &SourceKeys) -> Result<Arc<B::Resource>> {
        let ttl = self.ttl.resolve(self.properties.as_ref()).map_err(|e| {
            error!(instance_id, error = %e, "Failed to resolve cache duration");
            e
        })?;

        let slot = self.slot(instance_id);
        let result = self.load(instance_id, keys, ttl, &slot);
        drop(slot);

        if result.is_err() {
            self.prune(instance_id);
        }
        result
    }

    /// Check, build, and replace under the instance's slot lock.
    fn load(
        &self,
        instance_id: &str,
        keys: &SourceKeys,
        ttl: TimeDelta,
        slot: &Slot<B::Resource>,
    ) -> Result<Arc<B::Resource>> {
        let mut current = slot.lock();

        match current.as_ref() {
            Some(entry) if entry.is_fresh(ttl, self.clock.now()) => {
                Counters::bump(&self.counters.hits);
                debug!("Cache hit");
                return Ok(Arc::clone(&entry.resource));
            }
            Some(entry) => {
                Counters::bump(&self.counters.stale_rebuilds);
                debug!(
                    created_at = %entry.created_at,
                    ttl_ms = ttl.num_milliseconds(),
                    "Entry exceeded cache limit, rebuilding"
                );
            }
            None => {
                Counters::bump(&self.counters.misses);
                debug!("Cache miss, building");
            }
        }

        let resource = Arc::new(self.build(instance_id, keys)?);
        let entry = CacheEntry::new(Arc::clone(&resource), self.clock.now());

        if current.replace(Arc::new(entry)).is_none() {
            self.counters.live_entries.fetch_add(1, Ordering::Relaxed);
        }

        Ok(resource)
    }

    /// Returns the current entry for `instance_id` without building.
    ///
    /// Expired entries are still reported, flagged as stale. Waits for an
    /// in-flight build of the same instance to finish.
    pub fn peek(&self, instance_id: &str) -> Result<Option<EntrySnapshot<B::Resource>>> {
        let ttl = self.ttl.resolve(self.properties.as_ref())?;
        let Some(slot) = self.existing_slot(instance_id) else {
            return Ok(None);
        };

        let current = slot.lock();
        Ok(current.as_ref().map(|entry| EntrySnapshot {
            resource: Arc::clone(&entry.resource),
            created_at: entry.created_at,
            expires_at: entry.expires_at(ttl),
            stale: !entry.is_fresh(ttl, self.clock.now()),
        }))
    }

    /// Drops the entry for `instance_id`. Returns true if one existed.
    pub fn invalidate(&self, instance_id: &str) -> bool {
        let Some(slot) = self.existing_slot(instance_id) else {
            return false;
        };
        let removed = slot.lock().take().is_some();
        drop(slot);
        self.prune(instance_id);
        if removed {
            self.counters.live_entries.fetch_sub(1, Ordering::Relaxed);
            debug!(instance_id, "Invalidated cache entry");
        }
        removed
    }

    /// Drops every entry.
    pub fn clear(&self) {
        let ids: Vec<String> = self.slots.iter().map(|s| s.key().clone()).collect();
        for id in ids {
            self.invalidate(&id);
        }
    }

    /// Number of instances holding an entry, stale or not.
    pub fn len(&self) -> usize {
        self.counters.live_entries.load(Ordering::Relaxed)
    }

    /// Returns true if no instance holds an entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            stale_rebuilds: self.counters.stale_rebuilds.load(Ordering::Relaxed),
            build_failures: self.counters.build_failures.load(Ordering::Relaxed),
            live_entries: self.len(),
        }
    }

    fn existing_slot(&self, instance_id: &str) -> Option<Slot<B::Resource>> {
        self.slots.get(instance_id).map(|s| Arc::clone(s.value()))
    }

    fn slot(&self, instance_id: &str) -> Slot<B::Resource> {
        if let Some(slot) = self.existing_slot(instance_id) {
            return slot;
        }
        Arc::clone(self.slots.entry(instance_id.to_owned()).or_default().value())
    }

    /// Removes the instance's slot if it is empty and nobody else holds it.
    ///
    /// Callers must have dropped their own handle to the slot. New handles
    /// are only handed out under the slot table's shard lock, which
    /// `remove_if` holds, so the count cannot grow during the check.
    fn prune(&self, instance_id: &str) {
        self.slots.remove_if(instance_id, |_, slot| {
            Arc::strong_count(slot) == 1 && slot.try_lock().is_some_and(|entry| entry.is_none())
        });
    }

    fn build(&self, instance_id: &str, keys: &SourceKeys) -> Result<B::Resource> {
        let sources = self.resolve_sources(keys).map_err(|e| {
            Counters::bump(&self.counters.build_failures);
            error!(
                instance_id,
                key = e.failed_key().unwrap_or("<unknown>"),
                error = %e,
                "Failed to resolve mapping source"
            );
            MapCacheError::build_failed(instance_id, e)
        })?;

        self.builder.build(sources).map_err(|e| {
            Counters::bump(&self.counters.build_failures);
            error!(instance_id, error = %e, "Mapping resource build failed");
            MapCacheError::build_failed(instance_id, e)
        })
    }

    fn resolve_sources(&self, keys: &SourceKeys) -> Result<SourceBundle> {
        Ok(SourceBundle::new(
            self.entries.fetch(&keys.config_key)?,
            self.entries.fetch(&keys.input_schema_key)?,
            self.entries.fetch(&keys.output_schema_key)?,
        ))
    }
}
