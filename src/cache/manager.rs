//! Expiring cache on top of a key-value storage backend
//!
//! Provides a `CacheStore` that serializes data into namespaced entries with an
//! expiry timestamp. The cache is best-effort: storage and serialization
//! failures are logged and treated as a miss or a no-op write.

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::storage::KeyValueStorage;

/// Prefix applied to every key this application writes
pub const DEFAULT_NAMESPACE: &str = "rideau_realty_cache_";

/// Time-to-live used by callers that have no better idea
pub const DEFAULT_TTL_MINUTES: u64 = 10;

const MILLIS_PER_MINUTE: i64 = 60 * 1000;

/// Wrapper struct for cached data as stored in the backend
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry<T> {
    /// The cached data
    data: T,
    /// When the data was cached (epoch milliseconds)
    timestamp: i64,
    /// When the cache entry expires (epoch milliseconds)
    expires_at: i64,
}

/// Entry metadata without the payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryHeader {
    timestamp: i64,
    expires_at: i64,
}

/// Diagnostic view of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    /// When the entry was written (epoch milliseconds)
    pub timestamp: i64,
    /// When the entry stops being served (epoch milliseconds)
    pub expires_at: i64,
    /// Whether `get` would treat the entry as expired right now
    pub is_expired: bool,
}

/// Namespaced, expiring cache
///
/// Every entry is stored as `{data, timestamp, expiresAt}` JSON under
/// `<namespace><key>`. `get` and `has` evict expired entries as they find them;
/// `info` reports on them without touching storage.
#[derive(Debug, Clone)]
pub struct CacheStore<S> {
    storage: S,
    namespace: String,
}

impl<S: KeyValueStorage> CacheStore<S> {
    /// Creates a cache using the default application namespace
    pub fn new(storage: S) -> Self {
        Self::with_namespace(storage, DEFAULT_NAMESPACE)
    }

    /// Creates a cache with a custom key namespace
    pub fn with_namespace(storage: S, namespace: impl Into<String>) -> Self {
        Self {
            storage,
            namespace: namespace.into(),
        }
    }

    /// The underlying storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The key prefix this cache owns
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the storage key for a logical cache key
    pub fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    /// Stores data with a TTL in minutes
    ///
    /// A TTL of zero still yields an entry that expires strictly after it was
    /// written (one millisecond later).
    pub fn set<T: Serialize>(&self, key: &str, data: &T, ttl_minutes: u64) {
        let now = now_millis();
        let ttl_millis = i64::try_from(ttl_minutes)
            .ok()
            .and_then(|minutes| minutes.checked_mul(MILLIS_PER_MINUTE))
            .unwrap_or(i64::MAX)
            .max(1);
        let entry = CacheEntry {
            data,
            timestamp: now,
            expires_at: now.saturating_add(ttl_millis),
        };

        let json = match serde_json::to_string(&entry) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize cache entry '{}': {}", key, e);
                return;
            }
        };

        if let Err(e) = self.storage.set_item(&self.storage_key(key), &json) {
            log::warn!("Failed to store data in cache '{}': {}", key, e);
        }
    }

    /// Reads data if present and not expired
    ///
    /// Returns `None` when the entry is missing, cannot be parsed as `T`, or has
    /// expired. Expired entries are removed.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to retrieve data from cache '{}': {}", key, e);
                return None;
            }
        };

        if now_millis() > entry.expires_at {
            log::debug!("Cache entry '{}' expired", key);
            self.remove(key);
            return None;
        }

        Some(entry.data)
    }

    /// Whether a fresh, non-null entry exists. Evicts expired entries.
    pub fn has(&self, key: &str) -> bool {
        matches!(self.get::<serde_json::Value>(key), Some(value) if !value.is_null())
    }

    /// Removes a single entry
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(&self.storage_key(key)) {
            log::warn!("Failed to remove cache entry '{}': {}", key, e);
        }
    }

    /// Removes every entry in this cache's namespace
    ///
    /// Keys outside the namespace are left alone.
    pub fn clear(&self) {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                log::warn!("Failed to clear cache: {}", e);
                return;
            }
        };

        for key in keys.iter().filter(|k| k.starts_with(&self.namespace)) {
            if let Err(e) = self.storage.remove_item(key) {
                log::warn!("Failed to remove cache entry '{}': {}", key, e);
            }
        }
    }

    /// Returns entry metadata without evicting expired entries
    pub fn info(&self, key: &str) -> Option<CacheInfo> {
        let raw = self.read_raw(key)?;
        let header: EntryHeader = serde_json::from_str(&raw).ok()?;

        Some(CacheInfo {
            timestamp: header.timestamp,
            expires_at: header.expires_at,
            is_expired: now_millis() > header.expires_at,
        })
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.storage.get_item(&self.storage_key(key)) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Failed to read cache entry '{}': {}", key, e);
                None
            }
        }
    }
}

/// Current time in epoch milliseconds
fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
