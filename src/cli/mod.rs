//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod args;
pub mod cache;
pub mod config;
pub mod content;
pub mod context;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// hkconnect - cached devotional content from a generation gateway
#[derive(Parser, Debug)]
#[command(name = "hkconnect")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "HKCONNECT_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "HKCONNECT_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Content gateway base URL
    #[arg(long, global = true, env = "HKCONNECT_GATEWAY_URL", hide_env = true)]
    pub gateway_url: Option<String>,

    /// Content language (e.g. en, hi, ru)
    #[arg(long, global = true, env = "HKCONNECT_LANG", hide_env = true)]
    pub lang: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "HKCONNECT_DEBUG", hide_env = true)]
    pub debug: bool,

    /// Bypass cache, fetch fresh content from the gateway
    #[arg(long, global = true, env = "HKCONNECT_NO_CACHE", hide_env = true)]
    pub no_cache: bool,

    /// Keep cached content in memory for this run only
    #[arg(
        long,
        global = true,
        env = "HKCONNECT_NO_PERSIST",
        hide_env = true,
        conflicts_with = "no_cache"
    )]
    pub no_persist: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a Bhagavad Gita verse
    #[command(after_help = "EXAMPLES:\n  \
            hkconnect verse 2 47\n  \
            hkconnect verse 18 66 --lang hi")]
    Verse {
        /// Chapter number (1-18)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=18))]
        chapter: u32,
        /// Verse number
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        verse: u32,
    },

    /// Show a chapter title and summary
    Chapter {
        /// Chapter number (1-18)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=18))]
        chapter: u32,
    },

    /// Show a Gita affirmation for a mood
    Affirmation {
        /// Mood to match (e.g. anxious, grateful, confused)
        #[arg(long, short = 'm', default_value = "peaceful")]
        mood: String,
    },

    /// Show song lyrics with translation
    Lyrics {
        /// Song title
        title: String,
    },

    /// Find temples near a location
    Temples {
        /// City, region or country
        location: String,
    },

    /// Show a Gita verse chosen for a temple
    Wisdom {
        /// Temple name
        temple: String,
        /// Temple location
        location: String,
    },

    /// Show devotional news, local when coordinates are given
    News {
        /// Latitude
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },

    /// Show a saint's biography
    Saint {
        /// Saint name
        name: String,
    },

    /// Show a holy place of Braj
    Place {
        /// Place name
        name: String,
    },

    /// Tell the story of a pastime
    Leela {
        /// Pastime title
        title: String,
    },

    /// List well-known pastimes
    Leelas,

    /// Show upcoming Vaishnava calendar events
    Calendar,

    /// Generate a devotional image
    #[command(after_help = "EXAMPLES:\n  \
            hkconnect image \"Radha Krishna in Vrindavan\" --out art.png\n  \
            hkconnect image \"Lotus feet\" --format json")]
    Image {
        /// Image prompt
        prompt: String,
        /// Write the decoded image to this file
        #[arg(long, short = 'o')]
        out: Option<String>,
    },

    /// Manage local response cache
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Display version information
    Version,
}

/// Cache management subcommands
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,
    /// Clear cached content
    Clear {
        /// Only clear entries for one operation (e.g. news, verse)
        #[arg(long)]
        operation: Option<String>,
    },
    /// Print cache directory path
    Path,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a config file with defaults (and any --gateway-url / --lang given)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
