/// In-memory cache
///
/// HashMap with per-entry expiry deadlines, honoring the same contract as
/// [`crate::cache::RedisCache`]: expired entries behave exactly like absent
/// ones. Used by tests and local development without a Redis backend.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::cache::{Cache, CacheError};

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Cache implementation over a process-local map
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .unwrap()
            .values()
            .filter(|e| e.expires_at > now)
            .count()
    }

    /// True when no live entries remain
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_and_delete() {
        let cache = MemoryCache::new();

        cache
            .set_raw("k", "v", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("v"));

        cache.delete("k").await.unwrap();
        assert!(cache.get_raw("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let cache = MemoryCache::new();

        cache
            .set_raw("k", "v", Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(cache.get_raw("k").await.unwrap().is_none());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = MemoryCache::new();

        cache
            .set_raw("k", "old", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set_raw("k", "new", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get_raw("k").await.unwrap().as_deref(), Some("new"));
    }
}
