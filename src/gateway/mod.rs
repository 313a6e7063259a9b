//! Content generation gateway
//!
//! The remote LLM-backed service that turns a structured request into JSON.
//! Everything behind this trait is outside the cache/dispatch core.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::dispatch::Operation;
use crate::error::GatewayError;

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::HttpGateway;
#[cfg(test)]
pub use mock::MockGateway;

/// Remote generation gateway trait
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Whether the gateway has what it needs (endpoint, credentials) to be called at all
    fn is_configured(&self) -> bool;

    /// Produce the JSON payload for one request
    async fn generate(&self, request: &GatewayRequest) -> Result<serde_json::Value, GatewayError>;
}

/// A primitive request parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(s) => write!(f, "{}", s),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<u32> for ParamValue {
    fn from(i: u32) -> Self {
        ParamValue::Int(i64::from(i))
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// What the gateway receives for one call
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    pub operation: Operation,
    pub params: BTreeMap<String, ParamValue>,
    pub locale: String,
}

impl GatewayRequest {
    /// JSON body: the params plus `language`.
    ///
    /// News takes its location as a nested `coords` object; the `scope`
    /// param only separates local from global entries in the cache.
    pub fn body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        match self.operation {
            Operation::News => {
                if let (Some(lat), Some(lng)) = (self.params.get("lat"), self.params.get("lng")) {
                    let mut coords = serde_json::Map::new();
                    coords.insert("lat".to_string(), to_json(lat));
                    coords.insert("lng".to_string(), to_json(lng));
                    body.insert("coords".to_string(), serde_json::Value::Object(coords));
                }
            }
            _ => {
                for (k, v) in &self.params {
                    body.insert(k.clone(), to_json(v));
                }
            }
        }
        body.insert(
            "language".to_string(),
            serde_json::Value::String(self.locale.clone()),
        );
        serde_json::Value::Object(body)
    }
}

fn to_json(value: &ParamValue) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_value_display() {
        assert_eq!(ParamValue::from("krishna").to_string(), "krishna");
        assert_eq!(ParamValue::from(47u32).to_string(), "47");
        assert_eq!(ParamValue::from(true).to_string(), "true");
        assert_eq!(ParamValue::from(12.5).to_string(), "12.5");
    }

    #[test]
    fn test_request_body_includes_language() {
        let mut params = BTreeMap::new();
        params.insert("chapter".to_string(), ParamValue::from(2u32));
        params.insert("verse".to_string(), ParamValue::from(47u32));

        let request = GatewayRequest {
            operation: Operation::Verse,
            params,
            locale: "en".to_string(),
        };

        assert_eq!(
            request.body(),
            json!({"chapter": 2, "verse": 47, "language": "en"})
        );
    }

    #[test]
    fn test_news_body_nests_coords_and_drops_scope() {
        let mut params = BTreeMap::new();
        params.insert("scope".to_string(), ParamValue::from("local"));
        params.insert("lat".to_string(), ParamValue::from(27.58));
        params.insert("lng".to_string(), ParamValue::from(77.69));

        let request = GatewayRequest {
            operation: Operation::News,
            params,
            locale: "en".to_string(),
        };

        assert_eq!(
            request.body(),
            json!({"coords": {"lat": 27.58, "lng": 77.69}, "language": "en"})
        );
    }

    #[test]
    fn test_global_news_body_has_no_coords() {
        let mut params = BTreeMap::new();
        params.insert("scope".to_string(), ParamValue::from("global"));

        let request = GatewayRequest {
            operation: Operation::News,
            params,
            locale: "hi".to_string(),
        };

        assert_eq!(request.body(), json!({"language": "hi"}));
    }
}
