//! Caching subsystem.
//!
//! - [`key`]: deterministic SHA-256 keys for normalized requests.
//! - [`RequestCache`]: TTL policy (disabled / bounded / indefinite) on top
//!   of an injected [`CacheStore`].
//! - [`MokaCacheStore`]: bounded in-memory store with per-entry TTL.
//!
//! Stores are organised by [`CacheScope`], from most specific (document) to
//! least specific (script). [`CacheScopes::resolve`] picks the narrowest
//! available one; a missing scope is a fallback, never an error.

pub mod key;
mod memory;
pub mod response;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

pub use key::{CacheKey, cache_key};
pub use memory::MokaCacheStore;
pub use response::{CacheDuration, RequestCache};

/// A key-value store with optional per-entry expiry.
///
/// `ttl = None` means the entry never expires on its own.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: &str, ttl: Option<Duration>);
}

/// Sharing scope of a cache store, ordered most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CacheScope {
    /// Shared by everyone working in the same document.
    Document,
    /// Private to the calling user.
    User,
    /// Shared by every caller of the script or process.
    Script,
}

/// The stores a host makes available, one per scope.
#[derive(Clone, Default)]
pub struct CacheScopes {
    stores: BTreeMap<CacheScope, Arc<dyn CacheStore>>,
}

impl CacheScopes {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single process-wide store.
    pub fn script_only(store: Arc<dyn CacheStore>) -> Self {
        Self::new().with(CacheScope::Script, Some(store))
    }

    /// Register the store for `scope`; `None` marks the scope unavailable.
    pub fn with(mut self, scope: CacheScope, store: Option<Arc<dyn CacheStore>>) -> Self {
        match store {
            Some(store) => {
                self.stores.insert(scope, store);
            }
            None => {
                self.stores.remove(&scope);
            }
        }
        self
    }

    /// The most specific available scope and its store.
    pub fn resolve(&self) -> Option<(CacheScope, Arc<dyn CacheStore>)> {
        self.stores
            .iter()
            .next()
            .map(|(scope, store)| (*scope, Arc::clone(store)))
    }
}
