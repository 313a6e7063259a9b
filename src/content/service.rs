//! Per-operation content fetch functions
//!
//! Each function builds a request descriptor, runs it through the dispatcher
//! and applies that operation's failure policy:
//!
//! | Operation          | On failure                        |
//! |--------------------|-----------------------------------|
//! | verse              | error                             |
//! | chapter summary    | placeholder summary               |
//! | affirmation        | error                             |
//! | bhajan lyrics      | error                             |
//! | temples            | empty list                        |
//! | temple wisdom      | placeholder verse                 |
//! | news               | empty list                        |
//! | saint / holy place | placeholder named after the query |
//! | leela story        | error                             |
//! | leelas list        | empty list                        |
//! | calendar events    | empty list                        |
//! | image              | no image                          |

use chrono::Local;

use super::{
    Affirmation, CalendarEvent, ChapterSummary, Coordinates, HolyPlace, KrishnaLeela, NewsItem,
    Saint, Song, Temple, TempleWisdom, Verse,
};
use crate::dispatch::{Degradation, Dispatcher, Operation, RequestDescriptor, normalize_text, propagate};
use crate::error::{Error, Result};
use crate::gateway::Gateway;

/// Summary shown when a chapter summary cannot be fetched
pub const CHAPTER_UNAVAILABLE: &str = "Unable to load summary at this time.";

/// Summary shown when no gateway is configured at all
pub const CHAPTER_UNCONFIGURED: &str =
    "Content service not configured. Please set the gateway URL.";

/// Images do not vary by language
const IMAGE_LOCALE: &str = "";

/// Entry point used by the CLI (and any other front end)
pub struct ContentService<G: Gateway> {
    dispatcher: Dispatcher<G>,
}

impl<G: Gateway> ContentService<G> {
    pub fn new(dispatcher: Dispatcher<G>) -> Self {
        Self { dispatcher }
    }

    #[allow(dead_code)]
    pub fn dispatcher(&self) -> &Dispatcher<G> {
        &self.dispatcher
    }

    /// Gita verse. Failures propagate so the caller can offer a retry.
    pub async fn get_verse(&self, chapter: u32, verse: u32, locale: &str) -> Result<Verse> {
        let request = RequestDescriptor::new(Operation::Verse, locale)
            .param("chapter", chapter)
            .param("verse", verse);

        let result = self.dispatcher.dispatch(&request).await;
        propagate(Operation::Verse, result)
    }

    /// Chapter title and summary. Never fails.
    pub async fn get_chapter_summary(&self, chapter: u32, locale: &str) -> ChapterSummary {
        let request =
            RequestDescriptor::new(Operation::ChapterSummary, locale).param("chapter", chapter);

        let result = self.dispatcher.dispatch(&request).await;
        let policy = Degradation::Recover(Box::new(move |err: &Error| ChapterSummary {
            title: format!("Chapter {}", chapter),
            summary: if err.is_config() {
                CHAPTER_UNCONFIGURED
            } else {
                CHAPTER_UNAVAILABLE
            }
            .to_string(),
        }));

        policy.resolve(Operation::ChapterSummary, result)
    }

    /// Affirmation for a mood. Failures propagate.
    pub async fn get_affirmation(&self, mood: &str, locale: &str) -> Result<Affirmation> {
        let request = RequestDescriptor::new(Operation::Affirmation, locale)
            .param("mood", normalize_text(mood));

        let result = self.dispatcher.dispatch(&request).await;
        propagate(Operation::Affirmation, result)
    }

    /// Song lyrics and translation. Failures propagate.
    pub async fn get_bhajan_lyrics(&self, title: &str, locale: &str) -> Result<Song> {
        let request = RequestDescriptor::new(Operation::BhajanLyrics, locale)
            .param("title", normalize_text(title));

        let result = self.dispatcher.dispatch(&request).await;
        propagate(Operation::BhajanLyrics, result)
    }

    /// Temples near a location. Empty on failure.
    pub async fn find_temples(&self, location: &str, locale: &str) -> Vec<Temple> {
        let request = RequestDescriptor::new(Operation::Temples, locale)
            .param("location", normalize_text(location));

        let result = self.dispatcher.dispatch(&request).await;
        Degradation::empty().resolve(Operation::Temples, result)
    }

    /// A Gita verse chosen for a temple. Placeholder verse on failure.
    pub async fn get_temple_wisdom(
        &self,
        temple: &str,
        location: &str,
        locale: &str,
    ) -> TempleWisdom {
        let request = RequestDescriptor::new(Operation::TempleWisdom, locale)
            .param("temple", normalize_text(temple))
            .param("location", normalize_text(location));

        let result = self.dispatcher.dispatch(&request).await;
        Degradation::Fallback(placeholder_wisdom()).resolve(Operation::TempleWisdom, result)
    }

    /// News, local when coordinates are given, otherwise global. Empty on failure.
    pub async fn get_news(&self, location: Option<Coordinates>, locale: &str) -> Vec<NewsItem> {
        let request = match location.map(|c| c.rounded()) {
            Some(c) => RequestDescriptor::new(Operation::News, locale)
                .param("scope", "local")
                .param("lat", c.lat)
                .param("lng", c.lng),
            None => RequestDescriptor::new(Operation::News, locale).param("scope", "global"),
        };

        let result = self.dispatcher.dispatch(&request).await;
        Degradation::empty().resolve(Operation::News, result)
    }

    /// Saint biography. Placeholder on failure.
    pub async fn get_saint_details(&self, name: &str, locale: &str) -> Saint {
        let request =
            RequestDescriptor::new(Operation::Saint, locale).param("name", normalize_text(name));

        let result = self.dispatcher.dispatch(&request).await;
        Degradation::Fallback(placeholder_saint(name)).resolve(Operation::Saint, result)
    }

    /// Holy place of Braj. Placeholder on failure.
    pub async fn get_holy_place_details(&self, name: &str, locale: &str) -> HolyPlace {
        let request = RequestDescriptor::new(Operation::HolyPlace, locale)
            .param("name", normalize_text(name));

        let result = self.dispatcher.dispatch(&request).await;
        Degradation::Fallback(placeholder_place(name)).resolve(Operation::HolyPlace, result)
    }

    /// Full story of a pastime. Failures propagate.
    pub async fn get_krishna_leela(&self, title: &str, locale: &str) -> Result<KrishnaLeela> {
        let request = RequestDescriptor::new(Operation::Leela, locale)
            .param("title", normalize_text(title));

        let result = self.dispatcher.dispatch(&request).await;
        propagate(Operation::Leela, result)
    }

    /// Titles of well-known pastimes. Empty on failure.
    pub async fn list_leelas(&self, locale: &str) -> Vec<String> {
        let request = RequestDescriptor::new(Operation::LeelaList, locale);

        let result = self.dispatcher.dispatch(&request).await;
        Degradation::empty().resolve(Operation::LeelaList, result)
    }

    /// Next upcoming calendar events, keyed by today's date. Empty on failure.
    pub async fn get_calendar_events(&self, locale: &str) -> Vec<CalendarEvent> {
        let today = Local::now().date_naive().to_string();
        let request =
            RequestDescriptor::new(Operation::CalendarEvents, locale).param("date", today);

        let result = self.dispatcher.dispatch(&request).await;
        Degradation::empty().resolve(Operation::CalendarEvents, result)
    }

    /// Generated image as a data URL. `None` on failure or when none was produced.
    pub async fn generate_image(&self, prompt: &str) -> Option<String> {
        let request = RequestDescriptor::new(Operation::Image, IMAGE_LOCALE)
            .param("prompt", normalize_text(prompt));

        let result = self.dispatcher.dispatch(&request).await;
        Degradation::absent().resolve(Operation::Image, result)
    }
}

fn placeholder_wisdom() -> TempleWisdom {
    TempleWisdom {
        verse_reference: "BG 9.26".to_string(),
        translation: "If one offers Me with love and devotion a leaf, a flower, fruit or water, I will accept it.".to_string(),
        significance: "Every temple is a place where the simplest offering made with love is accepted.".to_string(),
    }
}

fn placeholder_saint(name: &str) -> Saint {
    Saint {
        name: name.trim().to_string(),
        title: "Vaishnava Acharya".to_string(),
        bio: "Details about this saint are unavailable right now. Please try again later."
            .to_string(),
        contributions: Vec::new(),
        places_found: None,
        image_description: None,
    }
}

fn placeholder_place(name: &str) -> HolyPlace {
    HolyPlace {
        name: name.trim().to_string(),
        location: "Braj Mandala".to_string(),
        description: "Details about this holy place are unavailable right now. Please try again later.".to_string(),
        pastime: String::new(),
        significance: String::new(),
        image_description: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, MemoryStore};
    use crate::gateway::{MockGateway, ParamValue};
    use crate::retry::RetryPolicy;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn build(gateway: MockGateway) -> (ContentService<MockGateway>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Dispatcher::new(gateway, CacheStore::new(store.clone()))
            .with_retry(RetryPolicy::new(3, Duration::from_millis(1)));
        (ContentService::new(dispatcher), store)
    }

    fn calls(service: &ContentService<MockGateway>) -> usize {
        service.dispatcher().gateway().total_calls()
    }

    #[tokio::test]
    async fn test_verse_end_to_end() {
        let stub = json!({
            "chapter": 2,
            "verse": 47,
            "sanskrit": "...",
            "transliteration": "...",
            "translation": "...",
            "purport": "..."
        });
        let (service, _store) =
            build(MockGateway::new().with_response(Operation::Verse, stub.clone()));

        let first = service.get_verse(2, 47, "en").await.unwrap();
        let expected: Verse = serde_json::from_value(stub).unwrap();
        assert_eq!(first, expected);

        let second = service.get_verse(2, 47, "en").await.unwrap();
        assert_eq!(second, expected);
        assert_eq!(calls(&service), 1);
    }

    #[tokio::test]
    async fn test_verse_failure_propagates() {
        let (service, _store) = build(MockGateway::new().failing());
        assert!(service.get_verse(2, 47, "en").await.is_err());
    }

    #[tokio::test]
    async fn test_chapter_summary_placeholder_on_failure() {
        let (service, store) = build(MockGateway::new().failing());

        let summary = service.get_chapter_summary(5, "en").await;

        assert_eq!(
            summary,
            ChapterSummary {
                title: "Chapter 5".to_string(),
                summary: "Unable to load summary at this time.".to_string(),
            }
        );
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_chapter_summary_unconfigured_skips_network() {
        let (service, _store) = build(MockGateway::new().unconfigured());

        let summary = service.get_chapter_summary(3, "en").await;

        assert_eq!(summary.title, "Chapter 3");
        assert_eq!(summary.summary, CHAPTER_UNCONFIGURED);
        assert_eq!(calls(&service), 0);
    }

    #[tokio::test]
    async fn test_news_empty_on_failure() {
        let (service, _store) = build(MockGateway::new().failing());
        assert!(service.get_news(None, "en").await.is_empty());
    }

    #[tokio::test]
    async fn test_news_nearby_coordinates_share_cache() {
        let (service, _store) = build(MockGateway::new().with_response(
            Operation::News,
            json!({"news": [{
                "id": "n1", "title": "Kartik festival", "date": "2026-10-20",
                "summary": "Lamps offered.", "source": "ISKCON Desire Tree"
            }]}),
        ));

        let a = service
            .get_news(Some(Coordinates { lat: 27.5812, lng: 77.6912 }), "en")
            .await;
        let b = service
            .get_news(Some(Coordinates { lat: 27.5839, lng: 77.6938 }), "en")
            .await;

        assert_eq!(a.len(), 1);
        assert_eq!(a, b);
        assert_eq!(calls(&service), 1);

        let request = &service.dispatcher().gateway().requests()[0];
        assert_eq!(request.params.get("lat"), Some(&ParamValue::from(27.58)));
        assert_eq!(
            request.body(),
            json!({"coords": {"lat": 27.58, "lng": 77.69}, "language": "en"})
        );
    }

    #[tokio::test]
    async fn test_global_and_local_news_cached_separately() {
        let (service, _store) =
            build(MockGateway::new().with_response(Operation::News, json!([])));

        service.get_news(None, "en").await;
        service
            .get_news(Some(Coordinates { lat: 1.0, lng: 2.0 }), "en")
            .await;

        assert_eq!(calls(&service), 2);
    }

    #[tokio::test]
    async fn test_temples_empty_on_failure_and_unconfigured() {
        let (service, _store) = build(MockGateway::new().failing());
        assert!(service.find_temples("Mayapur", "en").await.is_empty());

        let (service, _store) = build(MockGateway::new().unconfigured());
        assert!(service.find_temples("Mayapur", "en").await.is_empty());
        assert_eq!(calls(&service), 0);
    }

    #[tokio::test]
    async fn test_temple_query_normalized_for_cache() {
        let (service, _store) = build(MockGateway::new().with_response(
            Operation::Temples,
            json!([{
                "name": "ISKCON Vrindavan", "address": "Bhaktivedanta Swami Marg",
                "city": "Vrindavan", "country": "India",
                "coordinates": {"lat": 27.57, "lng": 77.68}
            }]),
        ));

        let a = service.find_temples("Vrindavan", "en").await;
        let b = service.find_temples("  vrindavan ", "en").await;

        assert_eq!(a, b);
        assert_eq!(a[0].coordinates, Some(Coordinates { lat: 27.57, lng: 77.68 }));
        assert_eq!(calls(&service), 1);
    }

    #[tokio::test]
    async fn test_temple_wisdom_placeholder() {
        let (service, _store) = build(MockGateway::new().failing());
        let wisdom = service
            .get_temple_wisdom("ISKCON Juhu", "Mumbai", "en")
            .await;
        assert_eq!(wisdom, placeholder_wisdom());
    }

    #[tokio::test]
    async fn test_saint_and_place_placeholders_named_after_query() {
        let (service, _store) = build(MockGateway::new().failing());

        let saint = service.get_saint_details("Haridasa Thakura", "en").await;
        assert_eq!(saint.name, "Haridasa Thakura");
        assert!(saint.contributions.is_empty());

        let place = service.get_holy_place_details("Govardhan Hill", "en").await;
        assert_eq!(place.name, "Govardhan Hill");
        assert_eq!(place.location, "Braj Mandala");
    }

    #[tokio::test]
    async fn test_affirmation_lyrics_and_leela_propagate() {
        let (service, _store) = build(MockGateway::new().failing());

        assert!(service.get_affirmation("anxious", "en").await.is_err());
        assert!(service.get_bhajan_lyrics("Jaya Radha Madhava", "en").await.is_err());
        assert!(service.get_krishna_leela("Damodara Lila", "en").await.is_err());
    }

    #[tokio::test]
    async fn test_affirmation_cached_per_mood() {
        let (service, _store) = build(MockGateway::new().with_response(
            Operation::Affirmation,
            json!({"quote": "q", "verse": "2.47", "meaning": "m", "theme": "duty"}),
        ));

        service.get_affirmation("anxious", "en").await.unwrap();
        service.get_affirmation("Anxious", "en").await.unwrap();
        service.get_affirmation("grateful", "en").await.unwrap();

        assert_eq!(calls(&service), 2);
    }

    #[tokio::test]
    async fn test_leela_list_accepts_wrapped_payload() {
        let (service, _store) = build(MockGateway::new().with_response(
            Operation::LeelaList,
            json!({"leelas": ["Damodara Lila", "Govardhan Lila"]}),
        ));

        let leelas = service.list_leelas("en").await;
        assert_eq!(leelas, vec!["Damodara Lila", "Govardhan Lila"]);
    }

    #[tokio::test]
    async fn test_leela_list_malformed_degrades_to_empty() {
        let (service, store) = build(
            MockGateway::new().with_response(Operation::LeelaList, json!({"leelas": "none"})),
        );

        assert!(service.list_leelas("en").await.is_empty());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_calendar_events_sends_today() {
        let (service, _store) = build(MockGateway::new().with_response(
            Operation::CalendarEvents,
            json!({"events": [{
                "date": "2026-11-01", "month": "Nov", "day": 1,
                "title": "Rama Ekadashi", "description": "Fasting"
            }]}),
        ));

        let events = service.get_calendar_events("en").await;

        assert_eq!(events.len(), 1);
        let request = &service.dispatcher().gateway().requests()[0];
        assert_eq!(
            request.params.get("date").map(|d| d.to_string()),
            Some(Local::now().date_naive().to_string())
        );
    }

    #[tokio::test]
    async fn test_image_absent_on_failure() {
        let (service, _store) = build(MockGateway::new().failing());
        assert_eq!(service.generate_image("Radha Krishna in Vrindavan").await, None);
    }

    #[tokio::test]
    async fn test_image_cached_when_produced() {
        let (service, store) = build(MockGateway::new().with_response(
            Operation::Image,
            json!({"image": "data:image/png;base64,iVBORw0KGgo="}),
        ));

        let first = service.generate_image("Lotus feet").await;
        let second = service.generate_image("lotus  feet").await;

        assert_eq!(first.as_deref(), Some("data:image/png;base64,iVBORw0KGgo="));
        assert_eq!(first, second);
        assert_eq!(calls(&service), 1);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_reach_caller() {
        let (service, store) = build(MockGateway::new().with_response(
            Operation::ChapterSummary,
            json!({"title": "Sankhya Yoga", "summary": "The eternal soul."}),
        ));
        store.fail_writes(true);

        let summary = service.get_chapter_summary(2, "en").await;

        assert_eq!(summary.title, "Sankhya Yoga");
    }
}
