//! Error types for hkconnect

use std::time::Duration;
use thiserror::Error;

/// Result type alias for hkconnect operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

/// Failures talking to the content generation gateway.
///
/// Every variant counts as "operation failed" for retry purposes.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limit exceeded. Retry after {0:?}")]
    RateLimit(Duration),

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("Gateway reported an error: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            GatewayError::Network("Failed to connect to content gateway".to_string())
        } else {
            GatewayError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error(
        "Content gateway not configured. Set `gateway.url` in the config file or pass --gateway-url."
    )]
    MissingGateway,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Local cache storage errors.
///
/// These never escape a content fetch; `CacheStore` logs and absorbs them.
/// They only surface from explicit cache management commands.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Could not determine cache directory")]
    NoHome,

    #[error("Cache I/O error: {0}")]
    Io(String),

    #[error("Cache database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Cache quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },

    #[error("Cache serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// True when the failure came from missing configuration rather than the gateway.
    pub fn is_config(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
