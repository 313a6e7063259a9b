//! Content command handlers

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use colored::Colorize;

use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::content::Coordinates;
use crate::error::{Error, Result};
use crate::models::{EventDisplay, LeelaDisplay, NewsDisplay, TempleDisplay};
use crate::output::{self, json::format_json, table::format_table};

pub async fn verse(opts: &GlobalOptions, chapter: u32, verse: u32) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let verse = ctx.service.get_verse(chapter, verse, ctx.locale()).await?;
    output::print_item(&verse, ctx.format)
}

pub async fn chapter(opts: &GlobalOptions, chapter: u32) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let summary = ctx.service.get_chapter_summary(chapter, ctx.locale()).await;
    output::print_item(&summary, ctx.format)
}

pub async fn affirmation(opts: &GlobalOptions, mood: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let affirmation = ctx.service.get_affirmation(mood, ctx.locale()).await?;
    output::print_item(&affirmation, ctx.format)
}

pub async fn lyrics(opts: &GlobalOptions, title: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let song = ctx.service.get_bhajan_lyrics(title, ctx.locale()).await?;
    output::print_item(&song, ctx.format)
}

pub async fn temples(opts: &GlobalOptions, location: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let temples = ctx.service.find_temples(location, ctx.locale()).await;
    output::print_list::<_, TempleDisplay>(&temples, ctx.format)
}

pub async fn wisdom(opts: &GlobalOptions, temple: &str, location: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let wisdom = ctx
        .service
        .get_temple_wisdom(temple, location, ctx.locale())
        .await;
    output::print_item(&wisdom, ctx.format)
}

pub async fn news(opts: &GlobalOptions, lat: Option<f64>, lng: Option<f64>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let location = match (lat, lng) {
        (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
        _ => None,
    };
    let news = ctx.service.get_news(location, ctx.locale()).await;
    output::print_list::<_, NewsDisplay>(&news, ctx.format)
}

pub async fn saint(opts: &GlobalOptions, name: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let saint = ctx.service.get_saint_details(name, ctx.locale()).await;
    output::print_item(&saint, ctx.format)
}

pub async fn place(opts: &GlobalOptions, name: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let place = ctx.service.get_holy_place_details(name, ctx.locale()).await;
    output::print_item(&place, ctx.format)
}

pub async fn leela(opts: &GlobalOptions, title: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let leela = ctx.service.get_krishna_leela(title, ctx.locale()).await?;
    output::print_item(&leela, ctx.format)
}

pub async fn leelas(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let titles = ctx.service.list_leelas(ctx.locale()).await;

    match ctx.format {
        OutputFormat::Json => println!("{}", format_json(&titles)?),
        OutputFormat::Table => println!("{}", format_table(&LeelaDisplay::list(&titles))),
        OutputFormat::Pretty => println!("{}", output::pretty::format_all(&titles)),
    }
    Ok(())
}

pub async fn calendar(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let events = ctx.service.get_calendar_events(ctx.locale()).await;
    output::print_list::<_, EventDisplay>(&events, ctx.format)
}

pub async fn image(opts: &GlobalOptions, prompt: &str, out: Option<&str>) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let image = ctx.service.generate_image(prompt).await;

    if let (Some(data_url), Some(path)) = (&image, out) {
        let bytes = decode_data_url(data_url)?;
        std::fs::write(path, &bytes)?;
        log::info!("Wrote {} bytes to {}", bytes.len(), path);
    }

    match ctx.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "prompt": prompt,
                "image": image,
                "file": out.filter(|_| image.is_some()),
            });
            println!("{}", format_json(&json)?);
        }
        _ => match (&image, out) {
            (Some(_), Some(path)) => println!("{} Image saved to {}", "✓".green(), path.bold()),
            (Some(data_url), None) => println!("{}", data_url),
            (None, _) => println!("{} No image could be generated", "○".dimmed()),
        },
    }

    Ok(())
}

/// Decode the payload of a `data:<mime>;base64,<payload>` URL
fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let payload = match data_url.split_once(',') {
        Some((header, payload)) if header.starts_with("data:") && header.ends_with(";base64") => {
            payload
        }
        _ => return Err(Error::Other("Image is not a base64 data URL".to_string())),
    };

    STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::Other(format!("Invalid image data: {}", e)))
}
