//! LRU caching decorator for lookup gateways.
//!
//! Memoizes primary and places lookups across verifier instances, so
//! repeated verification of the same address (e.g. a record saved twice)
//! does not re-query the backend. Absent results are cached; failures are not.

use super::{LookupGateway, LookupOptions, PlacesLookupResult, PrimaryLookupResult};
use crate::error::Result;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

/// Default cache capacity.
const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Cache key for a primary lookup.
type AddressKey = (LookupOptions, String);

/// Cache statistics for monitoring.
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Number of entries added.
    pub additions: u64,
}

impl CacheStats {
    /// Calculate hit rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Gateway wrapper that caches lookups in two LRU maps.
#[derive(Clone)]
pub struct CachingGateway<G> {
    inner: G,
    addresses: Arc<Mutex<LruCache<AddressKey, Option<PrimaryLookupResult>>>>,
    places: Arc<Mutex<LruCache<String, Option<PlacesLookupResult>>>>,
    stats: Arc<Mutex<CacheStats>>,
}

impl<G: LookupGateway> CachingGateway<G> {
    /// Wrap a gateway with the default capacity.
    #[must_use]
    pub fn new(inner: G) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    /// Wrap a gateway, holding at most `capacity` entries per lookup kind.
    #[must_use]
    pub fn with_capacity(inner: G, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            addresses: Arc::new(Mutex::new(LruCache::new(cap))),
            places: Arc::new(Mutex::new(LruCache::new(cap))),
            stats: Arc::new(Mutex::new(CacheStats::default())),
        }
    }

    /// The wrapped gateway.
    #[must_use]
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Get current cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }

    /// Number of cached entries across both lookup kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.addresses.lock().len() + self.places.lock().len()
    }

    /// Check if the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries from the cache.
    pub fn clear(&self) {
        self.addresses.lock().clear();
        self.places.lock().clear();
    }

    fn record(&self, hit: bool) {
        let mut stats = self.stats.lock();
        if hit {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
    }
}

impl<G: LookupGateway> LookupGateway for CachingGateway<G> {
    async fn lookup_address(
        &self,
        query: &str,
        options: &LookupOptions,
    ) -> Result<Option<PrimaryLookupResult>> {
        let key = (options.clone(), query.to_string());

        let cached = self.addresses.lock().get(&key).cloned();
        self.record(cached.is_some());
        if let Some(result) = cached {
            debug!("Address lookup served from cache: {query}");
            return Ok(result);
        }

        let result = self.inner.lookup_address(query, options).await?;
        self.addresses.lock().put(key, result.clone());
        self.stats.lock().additions += 1;
        Ok(result)
    }

    async fn lookup_places(&self, query: &str) -> Result<Option<PlacesLookupResult>> {
        let cached = self.places.lock().get(query).cloned();
        self.record(cached.is_some());
        if let Some(result) = cached {
            debug!("Places lookup served from cache: {query}");
            return Ok(result);
        }

        let result = self.inner.lookup_places(query).await?;
        self.places.lock().put(query.to_string(), result.clone());
        self.stats.lock().additions += 1;
        Ok(result)
    }
}
