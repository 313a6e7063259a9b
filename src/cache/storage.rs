//! SQLite-based persistent store with file blob support
//!
//! Stores small values inline in SQLite, large values (>10KB, mostly generated
//! images) as files.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};

use super::{PersistentStore, StoreStats};
use crate::error::CacheError;

/// Schema version - increment to trigger nuke-and-rebuild
const SCHEMA_VERSION: i32 = 1;

/// Values larger than this are stored as external blobs
const INLINE_THRESHOLD: usize = 10 * 1024; // 10KB

type Result<T> = std::result::Result<T, CacheError>;

/// SQLite-backed key-value store with file blob support
pub struct SqliteStore {
    conn: Connection,
    blobs_dir: PathBuf,
    max_bytes: Option<usize>,
}

impl SqliteStore {
    /// Open or create the store at the default XDG cache location
    pub fn open(max_bytes: Option<usize>) -> Result<Self> {
        let cache_dir = Self::cache_dir()?;
        Ok(Self::open_at(&cache_dir)?.with_quota(max_bytes))
    }

    /// Get the cache directory path (~/.cache/hkconnect on Linux)
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_base = dirs::cache_dir().ok_or(CacheError::NoHome)?;
        Ok(cache_base.join("hkconnect"))
    }

    /// Open the store at a specific directory (for testing)
    pub fn open_at(cache_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(cache_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create cache dir: {}", e)))?;

        let db_path = cache_dir.join("cache.db");
        let blobs_dir = cache_dir.join("blobs");
        std::fs::create_dir_all(&blobs_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create blobs dir: {}", e)))?;

        let conn = Connection::open(&db_path)?;

        // Check schema version - nuke if mismatched
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version != 0 && version != SCHEMA_VERSION {
            log::info!(
                "Cache schema version mismatch ({} != {}), rebuilding",
                version,
                SCHEMA_VERSION
            );
            drop(conn);
            Self::nuke(&db_path, &blobs_dir)?;
            return Self::open_at(cache_dir);
        }

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                cache_key TEXT PRIMARY KEY NOT NULL,
                data TEXT,
                blob_path TEXT,
                written_at INTEGER NOT NULL,
                size_bytes INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_written_at ON kv_entries(written_at);
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn,
            blobs_dir,
            max_bytes: None,
        })
    }

    /// Limit the total stored bytes; writes beyond it fail with `QuotaExceeded`
    pub fn with_quota(mut self, max_bytes: Option<usize>) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn check_quota(&self, key: &str, incoming: usize) -> Result<()> {
        let Some(max) = self.max_bytes else {
            return Ok(());
        };

        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(size_bytes), 0) FROM kv_entries WHERE cache_key != ?1",
            [key],
            |r| r.get(0),
        )?;
        let available = max.saturating_sub(used as usize);

        if incoming > available {
            return Err(CacheError::QuotaExceeded {
                needed: incoming,
                available,
            });
        }
        Ok(())
    }

    /// Write a blob file, sharded by the last 2 chars of the key
    fn write_blob(&self, key: &str, data: &[u8]) -> Result<String> {
        let shard = &key[key.len().saturating_sub(2)..];
        let shard_dir = self.blobs_dir.join(shard);
        std::fs::create_dir_all(&shard_dir)
            .map_err(|e| CacheError::Io(format!("Failed to create shard dir: {}", e)))?;

        let filename = format!("{}.json", key);
        let rel_path = format!("{}/{}", shard, filename);
        let full_path = shard_dir.join(&filename);

        std::fs::write(&full_path, data)
            .map_err(|e| CacheError::Io(format!("Failed to write blob: {}", e)))?;

        Ok(rel_path)
    }

    fn remove_blob(&self, rel_path: &str) {
        if let Err(e) = std::fs::remove_file(self.blobs_dir.join(rel_path)) {
            log::warn!("Failed to remove blob {}: {}", rel_path, e);
        }
    }

    /// Nuke the store (delete DB and all blobs)
    fn nuke(db_path: &Path, blobs_dir: &Path) -> Result<()> {
        if db_path.exists() {
            std::fs::remove_file(db_path)
                .map_err(|e| CacheError::Io(format!("Failed to remove cache DB: {}", e)))?;
        }
        if blobs_dir.exists() {
            std::fs::remove_dir_all(blobs_dir)
                .map_err(|e| CacheError::Io(format!("Failed to remove blobs dir: {}", e)))?;
        }
        Ok(())
    }
}

/// Escape a literal prefix for use in a `LIKE ... ESCAPE '\'` pattern
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl PersistentStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let result: Option<(Option<String>, Option<String>)> = self
            .conn
            .query_row(
                "SELECT data, blob_path FROM kv_entries WHERE cache_key = ?1",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match result {
            Some((Some(data), None)) => Ok(Some(data)),
            Some((None, Some(blob_path))) => {
                let full_path = self.blobs_dir.join(&blob_path);
                match std::fs::read_to_string(&full_path) {
                    Ok(data) => Ok(Some(data)),
                    Err(e) => {
                        log::warn!("Failed to read blob {}: {}", blob_path, e);
                        // Delete stale entry
                        if let Err(e) = self
                            .conn
                            .execute("DELETE FROM kv_entries WHERE cache_key = ?1", [key])
                        {
                            log::warn!("Failed to delete stale entry {}: {}", key, e);
                        }
                        Ok(None)
                    }
                }
            }
            _ => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_quota(key, value.len())?;

        let now = Utc::now().timestamp();
        let previous_blob: Option<String> = self
            .conn
            .query_row(
                "SELECT blob_path FROM kv_entries WHERE cache_key = ?1",
                [key],
                |r| r.get(0),
            )
            .optional()?
            .flatten();

        if value.len() <= INLINE_THRESHOLD {
            self.conn.execute(
                "INSERT OR REPLACE INTO kv_entries
                 (cache_key, data, blob_path, written_at, size_bytes)
                 VALUES (?1, ?2, NULL, ?3, ?4)",
                params![key, value, now, value.len()],
            )?;
            if let Some(old) = previous_blob {
                self.remove_blob(&old);
            }
        } else {
            // Same key always maps to the same blob path, so an old blob is overwritten
            let blob_path = self.write_blob(key, value.as_bytes())?;
            self.conn.execute(
                "INSERT OR REPLACE INTO kv_entries
                 (cache_key, data, blob_path, written_at, size_bytes)
                 VALUES (?1, NULL, ?2, ?3, ?4)",
                params![key, blob_path, now, value.len()],
            )?;
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let blob: Option<String> = self
            .conn
            .query_row(
                "SELECT blob_path FROM kv_entries WHERE cache_key = ?1",
                [key],
                |r| r.get(0),
            )
            .optional()?
            .flatten();

        let deleted = self
            .conn
            .execute("DELETE FROM kv_entries WHERE cache_key = ?1", [key])?;
        if let Some(blob) = blob {
            self.remove_blob(&blob);
        }
        Ok(deleted > 0)
    }

    fn remove_prefix(&self, prefix: &str) -> Result<usize> {
        let pattern = like_prefix(prefix);

        let blobs: Vec<String> = {
            let mut stmt = self.conn.prepare(
                "SELECT blob_path FROM kv_entries
                 WHERE cache_key LIKE ?1 ESCAPE '\\' AND blob_path IS NOT NULL",
            )?;
            let rows = stmt.query_map([&pattern], |r| r.get(0))?;
            rows.collect::<std::result::Result<_, _>>()?
        };

        let deleted = self.conn.execute(
            "DELETE FROM kv_entries WHERE cache_key LIKE ?1 ESCAPE '\\'",
            [&pattern],
        )?;

        for blob in &blobs {
            self.remove_blob(blob);
        }
        Ok(deleted)
    }

    fn stats(&self, prefix: &str) -> Result<StoreStats> {
        let pattern = like_prefix(prefix);

        let (entries, total_size, oldest, newest): (i64, i64, Option<i64>, Option<i64>) =
            self.conn.query_row(
                "SELECT COUNT(*), COALESCE(SUM(size_bytes), 0), MIN(written_at), MAX(written_at)
                 FROM kv_entries WHERE cache_key LIKE ?1 ESCAPE '\\'",
                [&pattern],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
            )?;

        Ok(StoreStats {
            entries: entries as usize,
            total_size_bytes: total_size as usize,
            oldest_entry: oldest,
            newest_entry: newest,
        })
    }
}
