//! Cache management commands

use crate::cache::{CacheStore, SqliteStore, StoreStats};
use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::dispatch::Operation;
use crate::error::{ConfigError, Result};

fn open_cache(opts: &GlobalOptions) -> Result<CacheStore> {
    let config = CommandContext::resolve_config(opts)?;
    let store = SqliteStore::open(config.cache.max_bytes)?;
    Ok(CacheStore::new(store))
}

fn cache_path() -> String {
    SqliteStore::cache_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Show cache status/statistics
pub fn status(opts: &GlobalOptions) -> Result<()> {
    let stats = open_cache(opts)?.stats()?;

    match opts.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries": stats.entries,
                "total_size_bytes": stats.total_size_bytes,
                "total_size_human": format_size(stats.total_size_bytes),
                "oldest_entry_timestamp": stats.oldest_entry,
                "newest_entry_timestamp": stats.newest_entry,
                "path": cache_path(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => print_status(&stats),
    }

    Ok(())
}

fn print_status(stats: &StoreStats) {
    println!("Cache Status");
    println!("────────────────────────────────────────");
    println!("Location:       {}", cache_path());
    println!("Entries:        {}", stats.entries);
    println!("Total size:     {}", format_size(stats.total_size_bytes));

    if let Some(oldest) = stats.oldest_entry {
        println!("Oldest entry:   {}", format_local(oldest));
    }
    if let Some(newest) = stats.newest_entry {
        println!("Newest entry:   {}", format_local(newest));
    }
}

/// Clear cached content, optionally for one operation only
pub fn clear(opts: &GlobalOptions, operation: Option<&str>) -> Result<()> {
    let operation = operation
        .map(|name| name.parse::<Operation>().map_err(ConfigError::Invalid))
        .transpose()?;
    let prefix = operation.map(|op| format!("{}_", op.name()));

    let removed = open_cache(opts)?.clear(prefix.as_deref())?;

    match opts.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "entries_removed": removed,
                "operation": operation.map(|op| op.name()),
                "success": true,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            if removed > 0 {
                println!("Cleared {} cache entries", removed);
            } else {
                println!("Cache was already empty");
            }
        }
    }

    Ok(())
}

/// Show cache path
pub fn path() -> Result<()> {
    let path = SqliteStore::cache_dir()?;
    println!("{}", path.display());
    Ok(())
}

fn format_local(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|d| {
            d.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "unknown".to_string())
}

/// Format bytes as human-readable size
fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
