//! Operations and request descriptors

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::cache::cache_key;
use crate::gateway::{GatewayRequest, ParamValue};

/// Every content operation the dispatcher knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    Verse,
    ChapterSummary,
    Affirmation,
    BhajanLyrics,
    Temples,
    TempleWisdom,
    News,
    Saint,
    HolyPlace,
    Leela,
    LeelaList,
    CalendarEvents,
    Image,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::Verse,
        Operation::ChapterSummary,
        Operation::Affirmation,
        Operation::BhajanLyrics,
        Operation::Temples,
        Operation::TempleWisdom,
        Operation::News,
        Operation::Saint,
        Operation::HolyPlace,
        Operation::Leela,
        Operation::LeelaList,
        Operation::CalendarEvents,
        Operation::Image,
    ];

    /// Stable name, used as the cache key prefix and in config
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Verse => "verse",
            Operation::ChapterSummary => "chapter",
            Operation::Affirmation => "affirmation",
            Operation::BhajanLyrics => "lyrics",
            Operation::Temples => "temples",
            Operation::TempleWisdom => "wisdom",
            Operation::News => "news",
            Operation::Saint => "saint",
            Operation::HolyPlace => "place",
            Operation::Leela => "leela",
            Operation::LeelaList => "leelas",
            Operation::CalendarEvents => "calendar",
            Operation::Image => "img",
        }
    }

    /// Backend path for this operation
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Verse => "/api/gita/verse",
            Operation::ChapterSummary => "/api/gita/chapter",
            Operation::Affirmation => "/api/affirmation",
            Operation::BhajanLyrics => "/api/geet/lyrics",
            Operation::Temples => "/api/temples/search",
            Operation::TempleWisdom => "/api/temples/wisdom",
            Operation::News => "/api/news",
            Operation::Saint => "/api/pilgrimage/saint",
            Operation::HolyPlace => "/api/pilgrimage/place",
            Operation::Leela => "/api/leelas/story",
            Operation::LeelaList => "/api/leelas/list",
            Operation::CalendarEvents => "/api/calendar/events",
            Operation::Image => "/api/image/generate",
        }
    }

    /// Field some list endpoints wrap their array in (`{ "news": [...] }`)
    fn list_field(&self) -> Option<&'static str> {
        match self {
            Operation::Temples => Some("temples"),
            Operation::News => Some("news"),
            Operation::LeelaList => Some("leelas"),
            Operation::CalendarEvents => Some("events"),
            _ => None,
        }
    }

    /// Reduce a raw gateway payload to the shape the result type parses from.
    ///
    /// List operations accept either a bare array or an object wrapping one.
    /// Image generation yields the data URL string, or null when the backend
    /// produced no image.
    pub fn normalize_payload(&self, payload: Value) -> Value {
        if let Some(field) = self.list_field() {
            return match payload {
                Value::Object(mut map) if map.get(field).is_some_and(Value::is_array) => {
                    map.remove(field).unwrap_or(Value::Null)
                }
                other => other,
            };
        }

        if *self == Operation::Image {
            return match payload {
                Value::String(s) => Value::String(s),
                Value::Object(map) => ["image", "imageUrl", "dataUrl"]
                    .iter()
                    .find_map(|f| map.get(*f).and_then(Value::as_str))
                    .map(|s| Value::String(s.to_string()))
                    .unwrap_or(Value::Null),
                _ => Value::Null,
            };
        }

        payload
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Operation::ALL.iter().map(|op| op.name()).collect();
                format!("unknown operation '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// One logical content request. Built per call, never persisted.
///
/// Params live in a sorted map so the derived cache key does not depend on
/// the order they were added in.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub operation: Operation,
    pub params: BTreeMap<String, ParamValue>,
    pub locale: String,
}

impl RequestDescriptor {
    pub fn new(operation: Operation, locale: &str) -> Self {
        Self {
            operation,
            params: BTreeMap::new(),
            locale: locale.trim().to_lowercase(),
        }
    }

    /// Add a parameter
    pub fn param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    /// Deterministic cache key: operation + sorted params + locale
    pub fn cache_key(&self) -> String {
        let rendered: Vec<(&str, String)> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.to_string()))
            .collect();
        let params_ref: Vec<(&str, &str)> =
            rendered.iter().map(|(k, v)| (*k, v.as_str())).collect();

        cache_key(self.operation.name(), &params_ref, &self.locale)
    }

    pub fn to_gateway_request(&self) -> GatewayRequest {
        GatewayRequest {
            operation: self.operation,
            params: self.params.clone(),
            locale: self.locale.clone(),
        }
    }
}

/// Trim, collapse inner whitespace and lowercase free-text parameters
pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
