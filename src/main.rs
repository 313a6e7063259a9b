//! hkconnect CLI - cached devotional content from a generation gateway

use clap::Parser;

mod cache;
mod cli;
mod config;
mod content;
mod dispatch;
mod error;
mod gateway;
mod models;
mod output;
mod retry;

use cli::args::GlobalOptions;
use cli::{CacheCommands, Cli, Commands, ConfigCommands};
use error::Result;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let opts = GlobalOptions::from_cli(&cli);

    match cli.command {
        Commands::Verse { chapter, verse } => cli::content::verse(&opts, chapter, verse).await,
        Commands::Chapter { chapter } => cli::content::chapter(&opts, chapter).await,
        Commands::Affirmation { mood } => cli::content::affirmation(&opts, &mood).await,
        Commands::Lyrics { title } => cli::content::lyrics(&opts, &title).await,
        Commands::Temples { location } => cli::content::temples(&opts, &location).await,
        Commands::Wisdom { temple, location } => {
            cli::content::wisdom(&opts, &temple, &location).await
        }
        Commands::News { lat, lng } => cli::content::news(&opts, lat, lng).await,
        Commands::Saint { name } => cli::content::saint(&opts, &name).await,
        Commands::Place { name } => cli::content::place(&opts, &name).await,
        Commands::Leela { title } => cli::content::leela(&opts, &title).await,
        Commands::Leelas => cli::content::leelas(&opts).await,
        Commands::Calendar => cli::content::calendar(&opts).await,
        Commands::Image { prompt, out } => {
            cli::content::image(&opts, &prompt, out.as_deref()).await
        }
        Commands::Cache(cache_cmd) => match cache_cmd {
            CacheCommands::Status => cli::cache::status(&opts),
            CacheCommands::Clear { operation } => cli::cache::clear(&opts, operation.as_deref()),
            CacheCommands::Path => cli::cache::path(),
        },
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Show => cli::config::show(&opts),
            ConfigCommands::Init { force } => cli::config::init(&opts, force),
        },
        Commands::Version => {
            println!("hkconnect version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
