//! Devotional content types returned by the gateway

use serde::{Deserialize, Deserializer, Serialize};

pub mod service;

pub use service::ContentService;

/// A Bhagavad Gita verse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    pub chapter: u32,
    pub verse: u32,
    pub sanskrit: String,
    pub transliteration: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purport: Option<String>,
}

/// Title and short summary of a Gita chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterSummary {
    pub title: String,
    pub summary: String,
}

/// Mood-based Gita affirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affirmation {
    pub quote: String,
    /// Verse reference, e.g. "2.47"
    pub verse: String,
    pub meaning: String,
    pub theme: String,
}

/// Vaishnava song lyrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub title: String,
    pub author: String,
    /// One entry per line
    pub lyrics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Round to two decimals (~1 km), enough to share cached results between nearby users
    pub fn rounded(&self) -> Self {
        Self {
            lat: (self.lat * 100.0).round() / 100.0,
            lng: (self.lng * 100.0).round() / 100.0,
        }
    }
}

/// An ISKCON temple or center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temple {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timings: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

/// A Gita verse chosen for a particular temple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempleWisdom {
    pub verse_reference: String,
    pub translation: String,
    pub significance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default = "read_more")]
    pub summary: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

fn read_more() -> String {
    "Read more.".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Saint {
    pub name: String,
    pub title: String,
    pub bio: String,
    #[serde(default)]
    pub contributions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub places_found: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolyPlace {
    pub name: String,
    pub location: String,
    pub description: String,
    pub pastime: String,
    pub significance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
}

/// A pastime of Krishna
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KrishnaLeela {
    pub title: String,
    /// childhood, vrindavan or kurukshetra
    pub category: String,
    pub description: String,
    pub full_story: String,
    pub moral_lesson: String,
    #[serde(default)]
    pub related_verses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_description: Option<String>,
}

/// An upcoming Vaishnava calendar event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub month: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub day: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Accept `"7"` and `7` alike; generated JSON is loose about such fields
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s,
        Loose::Int(i) => i.to_string(),
        Loose::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verse_purport_optional() {
        let verse: Verse = serde_json::from_value(json!({
            "chapter": 2, "verse": 47,
            "sanskrit": "s", "transliteration": "t", "translation": "tr"
        }))
        .unwrap();
        assert_eq!(verse.purport, None);
    }

    #[test]
    fn test_verse_missing_field_rejected() {
        let result: Result<Verse, _> =
            serde_json::from_value(json!({"chapter": 2, "verse": 47}));
        assert!(result.is_err());
    }

    #[test]
    fn test_wire_names_are_camel_case() {
        let wisdom: TempleWisdom = serde_json::from_value(json!({
            "verseReference": "BG 9.26",
            "translation": "If one offers Me with love...",
            "significance": "Offerings of love."
        }))
        .unwrap();
        assert_eq!(wisdom.verse_reference, "BG 9.26");

        let value = serde_json::to_value(&wisdom).unwrap();
        assert!(value.get("verseReference").is_some());
    }

    #[test]
    fn test_news_item_defaults() {
        let item: NewsItem = serde_json::from_value(json!({
            "id": 3, "title": "Ratha Yatra", "date": "2026-07-01", "source": "ISKCON News"
        }))
        .unwrap();
        assert_eq!(item.id, "3");
        assert_eq!(item.summary, "Read more.");
    }

    #[test]
    fn test_calendar_event_numeric_day() {
        let event: CalendarEvent = serde_json::from_value(json!({
            "date": "2026-11-01", "month": "Nov", "day": 1,
            "title": "Rama Ekadashi", "description": "Fasting day"
        }))
        .unwrap();
        assert_eq!(event.day, "1");
        assert_eq!(event.month, "Nov");
    }

    #[test]
    fn test_coordinates_rounded() {
        let c = Coordinates {
            lat: 27.58123,
            lng: 77.69456,
        }
        .rounded();
        assert_eq!(c.lat, 27.58);
        assert_eq!(c.lng, 77.69);
    }
}
