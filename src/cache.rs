//! Persistent cache for geocoding results and route durations
//!
//! Lookups and stores never fail the request: a missing, broken, or
//! uninitialized cache degrades to a service call.

use anyhow::{Result, anyhow};
use fjall::Keyspace;
use rand::RngExt;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::OnceCell;
use tokio::task;
use tracing::{debug, warn};

static GLOBAL_CACHE: OnceCell<PersistentCache> = OnceCell::const_new();

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: u64, // Unix timestamp (seconds)
}

pub struct PersistentCache {
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    Ok(store.get(key)?.map(|v| v.to_vec()))
}

impl PersistentCache {
    fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let items = db.keyspace("cache", fjall::KeyspaceCreateOptions::default)?;
        Ok(PersistentCache { store: items })
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    async fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
        ttl: Duration,
    ) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let expires_at = SystemTime::now()
            .checked_add(ttl)
            .ok_or(anyhow!("TTL overflow"))?
            .duration_since(UNIX_EPOCH)?
            .as_secs();
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry)?;

        let _ = task::spawn_blocking(move || store.insert(key, bytes)).await?;
        Ok(())
    }

    /// Retrieves a value if it exists and has not expired.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes: Option<Vec<u8>> =
            task::spawn_blocking(move || get_from_store(store, key_bytes)).await??;

        if let Some(bytes) = maybe_bytes {
            let entry: StoredEntry<T> = postcard::from_bytes(&bytes)?;
            let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

            if now < entry.expires_at {
                debug!("Key found and still fresh");
                Ok(Some(entry.value))
            } else {
                debug!("Key found but expired");
                self.remove(key).await?;
                Ok(None)
            }
        } else {
            debug!("Key not found");
            Ok(None)
        }
    }

    /// Manually removes a key from the cache.
    async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        let _ = task::spawn_blocking(move || store.remove(key)).await?;
        Ok(())
    }
}

/// Initializes the global persistent cache.
///
/// Optional: when never called (or when it fails), `get` misses and `put`
/// drops the value.
pub fn init(path: impl AsRef<Path>) -> Result<()> {
    let cache = PersistentCache::new(path)?;
    GLOBAL_CACHE
        .set(cache)
        .map_err(|_| anyhow!("Cache already initialized"))?;
    Ok(())
}

/// Look up a cached value; any cache trouble reads as a miss.
pub async fn get<T: DeserializeOwned + Send + 'static>(key: &str) -> Option<T> {
    let cache = GLOBAL_CACHE.get()?;
    match cache.get(key).await {
        Ok(value) => value,
        Err(e) => {
            warn!("Cache lookup failed for {key}: {e}");
            None
        }
    }
}

/// Store a value; failures are logged and dropped.
pub async fn put<T: Serialize + Send + Debug + 'static>(key: &str, value: T, ttl: Duration) {
    let Some(cache) = GLOBAL_CACHE.get() else {
        return;
    };
    if let Err(e) = cache.put(key, value, ttl).await {
        warn!("Cache store failed for {key}: {e}");
    }
}

/// Spread a TTL by +/-10% so cached entries don't all expire at once.
#[must_use]
pub fn jittered(base: Duration) -> Duration {
    let jitter: f64 = rand::rng().random_range(0.9..1.1);
    Duration::from_secs((base.as_secs() as f64 * jitter) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jittered_stays_within_bounds() {
        let base = Duration::from_secs(1000);
        for _ in 0..100 {
            let ttl = jittered(base);
            assert!(ttl >= Duration::from_secs(900));
            assert!(ttl <= Duration::from_secs(1100));
        }
    }

    #[tokio::test]
    async fn test_uninitialized_cache_reads_as_miss() {
        // The global cache is not initialized in unit tests
        let value: Option<String> = get("route:nowhere").await;
        assert!(value.is_none());
        // And stores are silently dropped
        put("route:nowhere", "10 mins".to_string(), Duration::from_secs(60)).await;
    }
}
