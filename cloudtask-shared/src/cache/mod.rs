/// Key-value cache seam for hot single-record lookups
///
/// The cache holds JSON-serialized, TTL-bounded copies of task projections.
/// It is never authoritative: a store lookup is the only valid way to
/// confirm a record exists, and the access service re-applies the
/// authorization policy against the cached copy on every hit.
///
/// Implementations:
///
/// - [`RedisCache`]: Redis via a reconnecting `ConnectionManager`. The
///   production backend.
/// - [`MemoryCache`]: HashMap with expiry deadlines, for tests and local
///   development.
///
/// Keys are composed centrally ([`task_key`]) so the read path and the
/// invalidation path can never drift apart.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

mod memory;
mod redis;

pub use self::memory::MemoryCache;
pub use self::redis::RedisCache;

/// Default entry lifetime: 5 minutes
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Cache key for a task projection
pub fn task_key(id: Uuid) -> String {
    format!("task:{}", id)
}

/// Errors raised by a cache backend
///
/// These never cross the access-service boundary: every cache failure is
/// logged there and treated as a miss (reads) or a no-op (writes/deletes).
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached or refused the command
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// A cached value could not be (de)serialized
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// TTL-based key-value cache over JSON strings
///
/// `get` on an absent or expired key returns `Ok(None)`; callers treat both
/// identically to a cold start.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Reads the raw JSON value at `key`, if present and unexpired
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Writes `value` at `key`, expiring after `ttl`
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key`; absent keys are not an error
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}

/// Typed convenience layer over [`Cache`]
#[async_trait]
pub trait CacheExt: Cache {
    /// Reads and deserializes the value at `key`
    async fn get<T: serde::de::DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> Result<Option<T>, CacheError> {
        match self.get_raw(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Serializes and writes `value` at `key`
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

impl<T: Cache + ?Sized> CacheExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_key_format() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(task_key(id), "task:550e8400-e29b-41d4-a716-446655440000");
    }
}
