//! Local cache for generated content
//!
//! `CacheStore` is the only owner of cache entries. It namespaces every key,
//! wraps values in a timestamped JSON envelope and never lets a storage
//! failure reach the caller. The bytes themselves live in a `PersistentStore`:
//! SQLite on disk for real runs, memory for tests.

pub mod key;
pub mod memory;
pub mod storage;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// Prefix applied to every key this crate writes
pub const NAMESPACE: &str = "hkc_cache_v1_";

/// Platform key-value store the cache is persisted in.
///
/// Implementations may fail on any call; `CacheStore` decides what to do
/// with those failures.
pub trait PersistentStore: Send {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Remove `key`, returning whether it existed
    fn remove(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove every key starting with `prefix`, returning how many were removed
    fn remove_prefix(&self, prefix: &str) -> Result<usize, CacheError>;

    /// Size statistics for keys starting with `prefix`
    fn stats(&self, prefix: &str) -> Result<StoreStats, CacheError>;
}

impl<T: PersistentStore + Sync + ?Sized> PersistentStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool, CacheError> {
        (**self).remove(key)
    }

    fn remove_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        (**self).remove_prefix(prefix)
    }

    fn stats(&self, prefix: &str) -> Result<StoreStats, CacheError> {
        (**self).stats(prefix)
    }
}

/// Statistics about stored entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub entries: usize,
    pub total_size_bytes: usize,
    /// Unix timestamp (seconds) of the oldest write
    pub oldest_entry: Option<i64>,
    /// Unix timestamp (seconds) of the newest write
    pub newest_entry: Option<i64>,
}

/// One cached value as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: serde_json::Value,
    pub written_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whether the entry is older than `ttl`. `None` means it never expires.
    pub fn is_expired(&self, ttl: Option<Duration>) -> bool {
        let Some(ttl) = ttl else {
            return false;
        };
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => self.written_at + ttl <= Utc::now(),
            Err(_) => false,
        }
    }
}

type SharedStore = Arc<Mutex<Box<dyn PersistentStore>>>;

/// Namespaced JSON cache over a persistent store.
///
/// Reads fail open and writes are best-effort. A disabled cache (`--no-cache`)
/// misses on every read and drops every write.
#[derive(Clone)]
pub struct CacheStore {
    store: Option<SharedStore>,
}

impl CacheStore {
    /// Create a cache over the given store
    pub fn new(store: impl PersistentStore + 'static) -> Self {
        Self {
            store: Some(Arc::new(Mutex::new(Box::new(store)))),
        }
    }

    /// Create a cache that never stores anything
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Look up a live entry.
    ///
    /// Store errors, corrupt JSON and expired entries all read as absent.
    /// Expired entries are pruned; corrupt ones are left in place for the
    /// next write to replace.
    pub fn get(&self, key: &str, ttl: Option<Duration>) -> Option<CacheEntry> {
        let store = self.store.as_ref()?;
        let guard = store.lock().ok()?;

        let raw = match guard.get(&namespaced(key)) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Cache read error for {}: {}", key, e);
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Ignoring corrupt cache entry {}: {}", key, e);
                return None;
            }
        };

        if entry.is_expired(ttl) {
            log::debug!("Cache entry expired: {}", key);
            if let Err(e) = guard.remove(&namespaced(key)) {
                log::warn!("Could not prune expired cache entry {}: {}", key, e);
            }
            return None;
        }
        Some(entry)
    }

    /// Store a value. Failures (quota exceeded, I/O) are logged and swallowed.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        let entry = match serde_json::to_value(value) {
            Ok(value) => CacheEntry {
                key: key.to_string(),
                value,
                written_at: Utc::now(),
            },
            Err(e) => {
                log::warn!("Cache write error for {}: {}", key, e);
                return;
            }
        };

        let result = serde_json::to_string(&entry)
            .map_err(|e| CacheError::Serialize(e.to_string()))
            .and_then(|json| match store.lock() {
                Ok(guard) => guard.set(&namespaced(key), &json),
                Err(_) => Err(CacheError::Io("cache store lock poisoned".to_string())),
            });

        if let Err(e) = result {
            log::warn!("Cache write error (quota exceeded?) for {}: {}", key, e);
        }
    }

    /// Remove every entry under the namespace, optionally narrowed to keys
    /// starting with `prefix` (an operation name).
    pub fn clear(&self, prefix: Option<&str>) -> Result<usize, CacheError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(0);
        };
        let guard = store
            .lock()
            .map_err(|_| CacheError::Io("cache store lock poisoned".to_string()))?;
        guard.remove_prefix(&namespaced(prefix.unwrap_or("")))
    }

    /// Statistics for entries under the namespace
    pub fn stats(&self) -> Result<StoreStats, CacheError> {
        let Some(store) = self.store.as_ref() else {
            return Ok(StoreStats::default());
        };
        let guard = store
            .lock()
            .map_err(|_| CacheError::Io("cache store lock poisoned".to_string()))?;
        guard.stats(NAMESPACE)
    }
}

fn namespaced(key: &str) -> String {
    format!("{}{}", NAMESPACE, key)
}

// Re-export main types
pub use key::cache_key;
pub use memory::MemoryStore;
pub use storage::SqliteStore;
