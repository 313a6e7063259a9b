//! Configuration inspection

use std::path::PathBuf;

use colored::Colorize;

use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::config::Config;
use crate::error::{ConfigError, Result};

fn target_path(opts: &GlobalOptions) -> Result<PathBuf> {
    match opts.config_path() {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::default_path(),
    }
}

/// Write a starter config file
pub fn init(opts: &GlobalOptions, force: bool) -> Result<()> {
    let path = target_path(opts)?;
    if path.exists() && !force {
        return Err(ConfigError::Invalid(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ))
        .into());
    }

    let mut config = Config::default();
    config.gateway.url = opts.gateway_url.clone();
    if let Some(lang) = &opts.lang {
        config.language = lang.clone();
    }
    config.save_to(&path)?;

    println!(
        "{} Wrote configuration to {}",
        "✓".green(),
        path.display().to_string().bold()
    );
    if config.gateway.url.is_none() {
        println!("  → Set gateway.url before fetching content");
    }
    Ok(())
}

/// Show the effective configuration (file + overrides)
pub fn show(opts: &GlobalOptions) -> Result<()> {
    let config = CommandContext::resolve_config(opts)?;
    let path = target_path(opts)?.display().to_string();

    match opts.format {
        OutputFormat::Json => {
            let mut shown = config.clone();
            shown.gateway.api_key = shown.gateway.api_key.as_deref().map(mask_key);
            let json = serde_json::json!({
                "path": path,
                "config": shown,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => print_config(&config, &path),
    }

    Ok(())
}

fn print_config(config: &Config, path: &str) {
    println!("{}\n", "hkconnect Configuration".bold());
    println!("Config file: {}", path.cyan());
    println!();

    match &config.gateway.url {
        Some(url) => println!("{} Gateway: {}", "✓".green(), url),
        None => {
            println!("{} Gateway not configured", "✗".red());
            println!("  → Set gateway.url or pass --gateway-url");
        }
    }
    match &config.gateway.api_key {
        Some(key) => println!("{} API key: {}", "✓".green(), mask_key(key)),
        None => println!("{} No API key", "○".dimmed()),
    }
    println!("  Rate limit: {} req/s", config.gateway.requests_per_second);
    println!("  Language: {}", config.language);

    println!("\n{}", "Retry:".bold());
    println!(
        "  {} retries, starting at {} ms",
        config.retry.max_retries, config.retry.initial_delay_ms
    );

    println!("\n{}", "Cache:".bold());
    if config.cache.ttl_secs.is_empty() {
        println!("  Entries never expire");
    } else {
        for (operation, secs) in &config.cache.ttl_secs {
            println!("  {} expires after {}s", operation, secs);
        }
    }
    if let Some(max) = config.cache.max_bytes {
        println!("  Quota: {} bytes", max);
    }
    println!(
        "  In-flight dedupe: {}",
        if config.dispatch.dedupe_in_flight { "on" } else { "off" }
    );
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}
