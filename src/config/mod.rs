//! Configuration management for hkconnect

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dispatch::Operation;
use crate::error::{ConfigError, Result};
use crate::gateway::http::DEFAULT_REQUESTS_PER_SECOND;
use crate::retry::RetryPolicy;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Default content language
    #[serde(default = "default_language")]
    pub language: String,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            language: default_language(),
            retry: RetryConfig::default(),
            cache: CacheConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}

/// Where the content gateway lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Sent as a bearer token when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            requests_per_second: default_requests_per_second(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Expiry in seconds, keyed by operation name. Unlisted operations never expire.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ttl_secs: BTreeMap<String, u64>,

    /// Store quota in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bytes: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Share one gateway call between concurrent identical requests
    #[serde(default = "default_true")]
    pub dedupe_in_flight: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            dedupe_in_flight: true,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_requests_per_second() -> u32 {
    DEFAULT_REQUESTS_PER_SECOND
}

fn default_max_retries() -> u32 {
    RetryPolicy::default().max_retries
}

fn default_initial_delay_ms() -> u64 {
    RetryPolicy::default().initial_delay.as_millis() as u64
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".hkconnect").join("config.yaml"))
    }

    /// Load configuration from an explicit path, or the default one.
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.display().to_string()).into());
                }
                Self::load_from(path)
            }
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    log::debug!("No config at {}, using defaults", path.display());
                    return Ok(Self::default());
                }
                Self::load_from(&path)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate YAML contents
    pub fn parse(contents: &str) -> Result<Self> {
        // An empty file is a valid (all-default) config
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(contents).map_err(ConfigError::from)?;
        config.expiry()?;
        Ok(config)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // The file may hold an API key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Per-operation expiry map
    pub fn expiry(&self) -> Result<HashMap<Operation, Duration>> {
        let mut expiry = HashMap::new();
        for (name, secs) in &self.cache.ttl_secs {
            let op = name
                .parse::<Operation>()
                .map_err(|e| ConfigError::Invalid(format!("cache.ttl_secs: {}", e)))?;
            expiry.insert(op, Duration::from_secs(*secs));
        }
        Ok(expiry)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry.max_retries,
            Duration::from_millis(self.retry.initial_delay_ms),
        )
    }
}
