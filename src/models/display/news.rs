//! News display model

use serde::Serialize;
use tabled::Tabled;

use super::common::truncate_string;
use crate::content::NewsItem;

#[derive(Debug, Clone, Tabled, Serialize)]
pub struct NewsDisplay {
    #[tabled(rename = "DATE")]
    pub date: String,

    #[tabled(rename = "TITLE")]
    pub title: String,

    #[tabled(rename = "SOURCE")]
    pub source: String,

    #[tabled(rename = "SUMMARY")]
    pub summary: String,
}

impl From<&NewsItem> for NewsDisplay {
    fn from(item: &NewsItem) -> Self {
        Self {
            date: item.date.clone(),
            title: truncate_string(&item.title, 50),
            source: item.source.clone(),
            summary: truncate_string(&item.summary, 60),
        }
    }
}
