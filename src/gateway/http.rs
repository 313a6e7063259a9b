//! HTTP gateway to the content generation backend

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client as HttpClient, StatusCode};

use super::{Gateway, GatewayRequest};
use crate::error::{GatewayError, Result};

/// Transport timeout for a single generation call
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default client-side throttle
pub const DEFAULT_REQUESTS_PER_SECOND: u32 = 5;

/// Gateway that POSTs JSON requests to the backend's `/api/...` endpoints
pub struct HttpGateway {
    http: HttpClient,
    base_url: Option<String>,
    api_key: Option<String>,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl HttpGateway {
    /// Create a new gateway client.
    ///
    /// A missing `base_url` yields an unconfigured gateway: dispatch
    /// short-circuits before ever calling it.
    pub fn new(
        base_url: Option<String>,
        api_key: Option<String>,
        requests_per_second: u32,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let quota =
            Quota::per_second(NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN));

        Ok(Self {
            http,
            base_url: base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty()),
            api_key,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    #[allow(dead_code)]
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Turn a response into a JSON payload or a gateway error
    async fn read_response(
        response: reqwest::Response,
    ) -> std::result::Result<serde_json::Value, GatewayError> {
        let status = response.status();
        match status {
            status if status.is_success() => {
                let text = response.text().await.map_err(|e| {
                    GatewayError::InvalidResponse(format!("Failed to read response: {}", e))
                })?;
                let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
                    GatewayError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;

                // The backend reports some failures as `{ "error": "..." }`
                if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
                    return Err(GatewayError::Remote(message.to_string()));
                }
                Ok(value)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                Err(GatewayError::RateLimit(Duration::from_secs(retry_after)))
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = error_message(response, "Bad request").await;
                Err(GatewayError::BadRequest(error_msg))
            }
            status if status.is_server_error() => {
                let fallback = format!("Server error: {}", status);
                let error_msg = error_message(response, &fallback).await;
                Err(GatewayError::ServerError(error_msg))
            }
            _ => Err(GatewayError::InvalidResponse(format!(
                "Unexpected status code: {}",
                status
            ))),
        }
    }
}

/// Pull `error` out of a JSON error body, falling back to the raw text
async fn error_message(response: reqwest::Response, fallback: &str) -> String {
    match response.text().await {
        Ok(text) if !text.is_empty() => serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(text),
        _ => fallback.to_string(),
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    async fn generate(
        &self,
        request: &GatewayRequest,
    ) -> std::result::Result<serde_json::Value, GatewayError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or_else(|| GatewayError::Network("Content gateway URL not configured".to_string()))?;

        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", base_url, request.operation.endpoint());
        log::debug!("POST {}", url);

        let mut builder = self.http.post(&url).json(&request.body());
        if let Some(ref key) = self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder.send().await.map_err(GatewayError::from)?;
        Self::read_response(response).await
    }
}
