//! Global CLI options shared across all commands

use std::path::Path;

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// Flag > environment variable > config file > default. This struct captures
/// the flag/env layer; config file values are merged in `CommandContext`.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Output format (pretty, table, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.hkconnect/config.yaml)
    pub config: Option<String>,

    /// Content gateway URL override
    pub gateway_url: Option<String>,

    /// Content language override
    pub lang: Option<String>,

    /// Bypass the response cache entirely
    pub no_cache: bool,

    /// Use an in-memory cache instead of the on-disk store
    pub no_persist: bool,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            gateway_url: cli.gateway_url.clone(),
            lang: cli.lang.clone(),
            no_cache: cli.no_cache,
            no_persist: cli.no_persist,
        }
    }

    /// Get config path as `Option<&Path>`.
    pub fn config_path(&self) -> Option<&Path> {
        self.config.as_deref().map(Path::new)
    }
}
