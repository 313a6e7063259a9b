//! Calendar event display model

use serde::Serialize;
use tabled::Tabled;

use super::common::truncate_string;
use crate::content::CalendarEvent;

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct EventDisplay {
    #[tabled(rename = "DATE")]
    pub date: String,

    #[tabled(rename = "EVENT")]
    pub title: String,

    #[tabled(rename = "DESCRIPTION")]
    pub description: String,
}

impl From<&CalendarEvent> for EventDisplay {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            date: event.date.clone(),
            title: event.title.clone(),
            description: truncate_string(&event.description, 60),
        }
    }
}
