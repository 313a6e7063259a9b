//! In-memory persistent store for tests and `--no-persist` runs

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::Utc;

use super::{PersistentStore, StoreStats};
use crate::error::CacheError;

type Result<T> = std::result::Result<T, CacheError>;

/// A stored value with its write time
#[derive(Debug, Clone)]
struct Slot {
    data: String,
    written_at: i64,
}

/// Map-backed store. Can be told to reject writes to simulate a full disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Slot>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail with `QuotaExceeded`
    #[allow(dead_code)]
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes so far
    #[allow(dead_code)]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Store raw text under a key, bypassing any failure switch
    #[allow(dead_code)]
    pub fn insert_raw(&self, key: &str, data: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.to_string(),
                Slot {
                    data: data.to_string(),
                    written_at: Utc::now().timestamp(),
                },
            );
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, Slot>>> {
        self.entries
            .lock()
            .map_err(|_| CacheError::Io("memory store lock poisoned".to_string()))
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).map(|slot| slot.data.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::QuotaExceeded {
                needed: value.len(),
                available: 0,
            });
        }
        self.lock()?.insert(
            key.to_string(),
            Slot {
                data: value.to_string(),
                written_at: Utc::now().timestamp(),
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.lock()?.remove(key).is_some())
    }

    fn remove_prefix(&self, prefix: &str) -> Result<usize> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|k, _| !k.starts_with(prefix));
        Ok(before - entries.len())
    }

    fn stats(&self, prefix: &str) -> Result<StoreStats> {
        let entries = self.lock()?;
        let matching: Vec<&Slot> = entries
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(_, slot)| slot)
            .collect();

        Ok(StoreStats {
            entries: matching.len(),
            total_size_bytes: matching.iter().map(|s| s.data.len()).sum(),
            oldest_entry: matching.iter().map(|s| s.written_at).min(),
            newest_entry: matching.iter().map(|s| s.written_at).max(),
        })
    }
}
