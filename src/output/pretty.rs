//! Human-oriented colored output

use colored::Colorize;

use crate::content::{
    Affirmation, CalendarEvent, ChapterSummary, HolyPlace, KrishnaLeela, NewsItem, Saint, Song,
    Temple, TempleWisdom, Verse,
};

/// Rich terminal rendering of a content item
pub trait Pretty {
    fn pretty(&self) -> String;
}

/// Render every item, separated by blank lines
pub fn format_all<T: Pretty>(items: &[T]) -> String {
    if items.is_empty() {
        return "No results found.".to_string();
    }
    items
        .iter()
        .map(Pretty::pretty)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn heading(text: &str) -> String {
    text.bold().to_string()
}

fn label(text: &str) -> String {
    format!("{}:", text).dimmed().to_string()
}

impl Pretty for Verse {
    fn pretty(&self) -> String {
        let mut out = vec![
            heading(&format!("Bhagavad Gita {}.{}", self.chapter, self.verse)),
            String::new(),
            self.sanskrit.yellow().to_string(),
            self.transliteration.italic().to_string(),
            String::new(),
            self.translation.clone(),
        ];
        if let Some(purport) = &self.purport {
            out.push(String::new());
            out.push(label("Purport"));
            out.push(purport.clone());
        }
        out.join("\n")
    }
}

impl Pretty for ChapterSummary {
    fn pretty(&self) -> String {
        format!("{}\n{}", heading(&self.title), self.summary)
    }
}

impl Pretty for Affirmation {
    fn pretty(&self) -> String {
        format!(
            "\"{}\"\n{} {}\n\n{}\n{} {}",
            self.quote.italic(),
            label("Bhagavad Gita"),
            self.verse,
            self.meaning,
            label("Theme"),
            self.theme.cyan()
        )
    }
}

impl Pretty for Song {
    fn pretty(&self) -> String {
        let mut out = vec![
            heading(&self.title),
            format!("{} {}", label("by"), self.author),
            String::new(),
        ];
        out.extend(self.lyrics.iter().cloned());
        if let Some(translation) = &self.translation {
            out.push(String::new());
            out.push(label("Translation"));
            out.extend(translation.iter().map(|line| line.dimmed().to_string()));
        }
        if let Some(url) = &self.audio_url {
            out.push(String::new());
            out.push(format!("{} {}", label("Audio"), url.cyan()));
        }
        out.join("\n")
    }
}

impl Pretty for Temple {
    fn pretty(&self) -> String {
        let mut out = vec![
            heading(&self.name),
            format!("{}, {}, {}", self.address, self.city, self.country),
        ];
        if let Some(timings) = &self.timings {
            out.push(format!("{} {}", label("Timings"), timings));
        }
        if let Some(website) = &self.website {
            out.push(format!("{} {}", label("Website"), website.cyan()));
        }
        if let Some(description) = &self.description {
            out.push(description.dimmed().to_string());
        }
        out.join("\n")
    }
}

impl Pretty for TempleWisdom {
    fn pretty(&self) -> String {
        format!(
            "{}\n{}\n\n{}",
            heading(&self.verse_reference),
            self.translation.italic(),
            self.significance
        )
    }
}

impl Pretty for NewsItem {
    fn pretty(&self) -> String {
        let mut out = vec![
            heading(&self.title),
            format!("{} · {}", self.date, self.source).dimmed().to_string(),
            self.summary.clone(),
        ];
        if let Some(link) = &self.link {
            out.push(link.cyan().to_string());
        }
        out.join("\n")
    }
}

impl Pretty for Saint {
    fn pretty(&self) -> String {
        let mut out = vec![
            heading(&self.name),
            self.title.italic().to_string(),
            String::new(),
            self.bio.clone(),
        ];
        if !self.contributions.is_empty() {
            out.push(String::new());
            out.push(label("Contributions"));
            out.extend(self.contributions.iter().map(|c| format!("  • {}", c)));
        }
        if let Some(places) = &self.places_found {
            out.push(format!("{} {}", label("Places"), places.join(", ")));
        }
        out.join("\n")
    }
}

impl Pretty for HolyPlace {
    fn pretty(&self) -> String {
        let mut out = vec![
            heading(&self.name),
            self.location.dimmed().to_string(),
            String::new(),
            self.description.clone(),
        ];
        if !self.pastime.is_empty() {
            out.push(String::new());
            out.push(label("Pastime"));
            out.push(self.pastime.clone());
        }
        if !self.significance.is_empty() {
            out.push(String::new());
            out.push(label("Significance"));
            out.push(self.significance.clone());
        }
        out.join("\n")
    }
}

impl Pretty for KrishnaLeela {
    fn pretty(&self) -> String {
        let mut out = vec![
            format!("{} {}", heading(&self.title), format!("({})", self.category).dimmed()),
            self.description.italic().to_string(),
            String::new(),
            self.full_story.clone(),
            String::new(),
            format!("{} {}", label("Lesson"), self.moral_lesson),
        ];
        if !self.related_verses.is_empty() {
            out.push(format!("{} {}", label("Verses"), self.related_verses.join(", ")));
        }
        out.join("\n")
    }
}

impl Pretty for CalendarEvent {
    fn pretty(&self) -> String {
        let mut line = format!("{}  {}", self.date.cyan(), heading(&self.title));
        if !self.description.is_empty() {
            line.push_str(&format!("\n    {}", self.description.dimmed()));
        }
        line
    }
}

impl Pretty for String {
    fn pretty(&self) -> String {
        format!("• {}", self)
    }
}
