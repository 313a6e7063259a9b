//! Command execution context
//!
//! Loads configuration, applies flag/env overrides and wires the cache,
//! gateway and dispatcher together for content commands.

use crate::cache::{CacheStore, MemoryStore, SqliteStore};
use crate::cli::{GlobalOptions, OutputFormat};
use crate::config::Config;
use crate::content::ContentService;
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::gateway::HttpGateway;

/// Context for command execution containing config, service and output options.
pub struct CommandContext {
    /// Configuration with overrides applied
    pub config: Config,
    /// Content service over the HTTP gateway
    pub service: ContentService<HttpGateway>,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// An unusable cache directory is not fatal: content is still fetched,
    /// just not stored.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Self::resolve_config(opts)?;

        let cache = if opts.no_cache {
            CacheStore::disabled()
        } else if opts.no_persist {
            CacheStore::new(MemoryStore::new())
        } else {
            match SqliteStore::open(config.cache.max_bytes) {
                Ok(store) => CacheStore::new(store),
                Err(e) => {
                    log::warn!("Response cache unavailable, continuing without it: {}", e);
                    CacheStore::disabled()
                }
            }
        };
        if !cache.is_enabled() {
            log::debug!("Running without a response cache");
        }

        let gateway = HttpGateway::new(
            config.gateway.url.clone(),
            config.gateway.api_key.clone(),
            config.gateway.requests_per_second,
        )?;

        let dispatcher = Dispatcher::new(gateway, cache)
            .with_retry(config.retry_policy())
            .with_expiry(config.expiry()?)
            .with_dedupe(config.dispatch.dedupe_in_flight);

        Ok(Self {
            config,
            service: ContentService::new(dispatcher),
            format: opts.format,
        })
    }

    /// Load the config file and layer flag/env overrides on top
    pub fn resolve_config(opts: &GlobalOptions) -> Result<Config> {
        let mut config = Config::load(opts.config_path())?;

        if let Some(url) = &opts.gateway_url {
            config.gateway.url = Some(url.clone());
        }
        if let Some(lang) = &opts.lang {
            config.language = lang.clone();
        }

        Ok(config)
    }

    /// Content language for requests
    pub fn locale(&self) -> &str {
        &self.config.language
    }
}
