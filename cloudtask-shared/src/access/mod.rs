/// Authorization-aware data access
///
/// [`AccessService`] is the one gate between callers and the records they
/// may touch. It orchestrates the store, the cache, and the policy into the
/// five operations (list, create, read, update, delete) per entity type,
/// and owns two contracts the rest of the system relies on:
///
/// - **Authorization on every read.** The policy runs before any record is
///   returned. On a cache hit it runs against the projection's embedded
///   `owner_id`, because the cached copy may have been written under a
///   different actor's context. A warm cache never bypasses a permission
///   check.
/// - **Invalidate-on-write.** Task mutations delete the cache entry after
///   the store commit (never before), so a deleted or updated task cannot
///   be served from a projection that outlived it beyond the accepted
///   TTL-bounded staleness window.
///
/// Cache failures are absorbed here: a read falls through to the store and
/// a write proceeds as if the cache were cold. The cache being down
/// degrades latency, never correctness.
///
/// Both capabilities are injected at construction; the service holds no
/// global state and takes the acting identity as an explicit parameter on
/// every call.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::cache::{Cache, CacheExt, DEFAULT_TTL};
use crate::store::Store;

pub mod policy;
pub mod projects;
pub mod tasks;

/// Orchestrates store, cache, and policy into authorized CRUD operations
#[derive(Clone)]
pub struct AccessService {
    store: Arc<dyn Store>,
    cache: Arc<dyn Cache>,
    cache_ttl: Duration,
}

impl AccessService {
    /// Creates a service over the given store and cache
    pub fn new(store: Arc<dyn Store>, cache: Arc<dyn Cache>) -> Self {
        Self {
            store,
            cache,
            cache_ttl: DEFAULT_TTL,
        }
    }

    /// Overrides the TTL used when populating cache entries
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Cache read that degrades to a miss on backend failure
    pub(crate) async fn cache_get<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> Option<T> {
        match self.cache.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Cache write that degrades to a no-op on backend failure
    pub(crate) async fn cache_put<T: Serialize + Send + Sync>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value, self.cache_ttl).await {
            warn!(key, error = %e, "cache write failed, skipping population");
        }
    }

    /// Cache invalidation that degrades to a no-op on backend failure
    ///
    /// Only called after the corresponding store mutation has committed; on
    /// failure the stale entry ages out within one TTL.
    pub(crate) async fn cache_evict(&self, key: &str) {
        if let Err(e) = self.cache.delete(key).await {
            warn!(key, error = %e, "cache invalidation failed, entry expires by TTL");
        }
    }
}
