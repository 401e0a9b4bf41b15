//! In-memory [`CacheStore`] backed by moka.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::sync::Cache;

use super::CacheStore;

/// Default maximum number of entries held in memory.
const DEFAULT_MAX_ENTRIES: u64 = 10_000;

#[derive(Clone)]
struct StoredValue {
    text: String,
    ttl: Option<Duration>,
}

/// Per-entry expiry: each value carries the TTL it was stored with.
struct PerEntryTtl;

impl Expiry<String, StoredValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.ttl
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.ttl
    }
}

/// Thread-safe bounded LRU store with per-entry TTL.
///
/// Entries stored without a TTL live until capacity eviction pushes them out.
pub struct MokaCacheStore {
    entries: Cache<String, StoredValue>,
}

impl MokaCacheStore {
    /// Create an empty store with the default capacity (10,000).
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    /// Create a store with a custom max capacity.
    pub fn with_max_entries(max: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }

    /// Number of entries currently in the store.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

impl Default for MokaCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for MokaCacheStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|value| value.text)
    }

    fn put(&self, key: &str, value: &str, ttl: Option<Duration>) {
        self.entries.insert(
            key.to_string(),
            StoredValue {
                text: value.to_string(),
                ttl,
            },
        );
    }
}
