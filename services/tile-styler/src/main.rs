//! Tile styler command-line tool.
//!
//! Runs the map styling pipeline outside a browser host:
//! - Recolor terrain-RGB tiles by elevation class
//! - Style decoded vector features for a schema and resolution
//! - Build the contour band table and legend for a viewport
//! - Expand tile source URLs

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use map_common::MapConfig;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use commands::{bands::BandsArgs, classify::ClassifyArgs, style::StyleArgs, tile_url::TileUrlArgs};

#[derive(Parser, Debug)]
#[command(name = "tile-styler")]
#[command(about = "Style terrain and vector map tiles")]
struct Args {
    /// Style configuration file (YAML or JSON); built-in defaults if omitted
    #[arg(short, long, env = "TILE_STYLER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recolor a terrain-RGB tile by tile-local elevation percentiles
    Classify(ClassifyArgs),
    /// Style a JSON array of vector features
    Style(StyleArgs),
    /// Compute contour band colors for a viewport
    Bands(BandsArgs),
    /// Print the URL of one tile from a configured source
    TileUrl(TileUrlArgs),
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "Loading style configuration");
            MapConfig::from_file(path)?
        }
        None => MapConfig::default(),
    };

    match args.command {
        Command::Classify(cmd) => commands::classify::run(&config, &cmd),
        Command::Style(cmd) => commands::style::run(config, &cmd),
        Command::Bands(cmd) => commands::bands::run(&config, &cmd),
        Command::TileUrl(cmd) => commands::tile_url::run(&config, &cmd),
    }
}
