//! TTL-aware request cache sitting between the pipeline and a [`CacheStore`].
//!
//! [`RequestCache`] applies one global [`CacheDuration`] policy:
//!
//! - `Disabled`: every lookup misses and every store is dropped, so each
//!   call reaches the completion endpoint.
//! - `Bounded(d)`: entries expire `d` after they were stored.
//! - `Indefinite`: entries never expire; only the store's own capacity
//!   eviction removes them.
//!
//! Only non-blank text is ever written. The empty sentinel stays uncached so
//! a later call can retry and succeed.
//!
//! The layer takes no locks. Two callers racing on the same key both write
//! the same value, so the last write winning is harmless.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use super::key::CacheKey;
use super::{CacheScope, CacheScopes, CacheStore};
use crate::telemetry;

/// Config keyword selecting [`CacheDuration::Indefinite`].
pub const INDEFINITE: &str = "indefinite";

/// How long completed answers stay cached.
///
/// Deserializes from a number of seconds (`0` disables caching) or the string
/// `"indefinite"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCacheDuration")]
pub enum CacheDuration {
    #[default]
    Disabled,
    Bounded(Duration),
    Indefinite,
}

impl CacheDuration {
    /// `0` disables caching; anything else bounds entries to that many seconds.
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            CacheDuration::Disabled
        } else {
            CacheDuration::Bounded(Duration::from_secs(secs))
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, CacheDuration::Disabled)
    }

    /// TTL handed to the store: `None` means "never expires".
    fn ttl(&self) -> Option<Duration> {
        match self {
            CacheDuration::Bounded(d) => Some(*d),
            CacheDuration::Disabled | CacheDuration::Indefinite => None,
        }
    }
}

impl fmt::Display for CacheDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheDuration::Disabled => f.write_str("disabled"),
            CacheDuration::Bounded(d) => write!(f, "{}s", d.as_secs()),
            CacheDuration::Indefinite => f.write_str(INDEFINITE),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCacheDuration {
    Seconds(u64),
    Keyword(String),
}

impl TryFrom<RawCacheDuration> for CacheDuration {
    type Error = String;

    fn try_from(raw: RawCacheDuration) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawCacheDuration::Seconds(secs) => Ok(CacheDuration::from_secs(secs)),
            RawCacheDuration::Keyword(word) if word.eq_ignore_ascii_case(INDEFINITE) => {
                Ok(CacheDuration::Indefinite)
            }
            RawCacheDuration::Keyword(word) => Err(format!(
                "invalid cache duration '{word}': expected seconds or \"{INDEFINITE}\""
            )),
        }
    }
}

/// Request cache bound to the first available store of a scope chain.
pub struct RequestCache {
    store: Option<Arc<dyn CacheStore>>,
    scope: Option<CacheScope>,
    duration: CacheDuration,
}

impl RequestCache {
    /// Resolve the store from `scopes` and apply `duration`.
    ///
    /// With caching enabled but no scope available, the cache behaves as
    /// disabled; that is logged, not reported as an error.
    pub fn new(scopes: &CacheScopes, duration: CacheDuration) -> Self {
        let resolved = if duration.is_enabled() {
            let resolved = scopes.resolve();
            if resolved.is_none() {
                warn!("no cache scope available, request caching bypassed");
            }
            resolved
        } else {
            None
        };

        let (scope, store) = match resolved {
            Some((scope, store)) => (Some(scope), Some(store)),
            None => (None, None),
        };

        Self {
            store,
            scope,
            duration,
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self {
            store: None,
            scope: None,
            duration: CacheDuration::Disabled,
        }
    }

    /// The configured policy.
    pub fn duration(&self) -> CacheDuration {
        self.duration
    }

    /// Scope the store was resolved from, if caching is active.
    pub fn scope(&self) -> Option<CacheScope> {
        self.scope
    }

    /// Whether lookups can ever hit.
    pub fn is_active(&self) -> bool {
        self.store.is_some()
    }

    /// Look up a cached answer.
    ///
    /// Returns `None` on miss or when caching is inactive. Emits cache
    /// hit/miss metrics.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let hit = self
            .store
            .as_ref()
            .and_then(|store| store.get(key.as_str()))
            .filter(|text| !text.trim().is_empty());

        if hit.is_some() {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
            debug!(key = %key, "cache hit");
        } else {
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
        }
        hit
    }

    /// Store an answer under `key` with the policy's TTL.
    ///
    /// Blank values are dropped, as is everything while caching is inactive.
    pub fn put(&self, key: &CacheKey, value: &str) {
        let Some(store) = &self.store else {
            return;
        };
        if value.trim().is_empty() {
            return;
        }
        store.put(key.as_str(), value, self.duration.ttl());
        debug!(key = %key, duration = %self.duration, "cached completion");
    }
}
