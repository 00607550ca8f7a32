//! `tile-url`: expand a configured source URL.

use anyhow::Result;
use clap::Args;
use map_common::MapConfig;
use tracing::warn;

#[derive(Args, Debug)]
pub struct TileUrlArgs {
    /// Source name from the configuration
    #[arg(short, long)]
    pub source: String,
    #[arg(long)]
    pub z: u8,
    #[arg(long)]
    pub x: u32,
    #[arg(long)]
    pub y: u32,
}

pub fn run(config: &MapConfig, args: &TileUrlArgs) -> Result<()> {
    println!("{}", tile_url(config, args)?);
    Ok(())
}

pub fn tile_url(config: &MapConfig, args: &TileUrlArgs) -> Result<String> {
    let source = config.source(&args.source)?;
    if args.z < source.min_zoom || args.z > source.max_zoom {
        warn!(
            source = %args.source,
            z = args.z,
            min_zoom = source.min_zoom,
            max_zoom = source.max_zoom,
            "Zoom outside the source's range"
        );
    }
    Ok(source.tile_url(args.z, args.x, args.y)?)
}
