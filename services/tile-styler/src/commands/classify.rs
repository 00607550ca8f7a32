//! `classify`: recolor a terrain-RGB tile.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use map_common::MapConfig;
use map_style::elevation::{approximate_meters, ClassifiedTile, Threshold};
use map_style::{ElevationClassifier, RasterTile};
use tracing::info;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Terrain-RGB tile (PNG or any format the image crate reads)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Where to write the recolored PNG
    #[arg(short, long)]
    pub output: PathBuf,
}

pub fn run(config: &MapConfig, args: &ClassifyArgs) -> Result<()> {
    let classifier = ElevationClassifier::from_config(&config.elevation)?;
    let tile = load_tile(&args.input)?;
    let classified = classifier.classify_detailed(&tile);

    log_thresholds(&classified);
    save_tile(&classified.tile, &args.output)?;

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        width = tile.width(),
        height = tile.height(),
        data_pixels = classified.data_pixels,
        "Classified tile"
    );
    Ok(())
}

pub fn load_tile(path: &Path) -> Result<RasterTile> {
    let image = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok(RasterTile::from_rgba(
        width as usize,
        height as usize,
        image.into_raw(),
    )?)
}

pub fn save_tile(tile: &RasterTile, path: &Path) -> Result<()> {
    let image = image::RgbaImage::from_raw(
        tile.width() as u32,
        tile.height() as u32,
        tile.data().to_vec(),
    )
    .context("Tile buffer does not match its dimensions")?;
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn log_thresholds(classified: &ClassifiedTile) {
    for (class, threshold) in classified.thresholds.iter().enumerate() {
        match threshold {
            Threshold::Code(code) => info!(
                class,
                code,
                approx_m = approximate_meters(*code),
                "Class upper bound"
            ),
            Threshold::Unbounded => info!(class, "Class unbounded"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{ramp_tile, NO_DATA_PIXEL};

    #[test]
    fn test_classify_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("terrain.png");
        let output = dir.path().join("classified.png");

        let mut data = ramp_tile(16, 16, 1000, 2000);
        data[..4].copy_from_slice(&NO_DATA_PIXEL);
        image::RgbaImage::from_raw(16, 16, data)
            .unwrap()
            .save(&input)
            .unwrap();

        let config = MapConfig::default();
        run(
            &config,
            &ClassifyArgs {
                input,
                output: output.clone(),
            },
        )
        .unwrap();

        let result = load_tile(&output).unwrap();
        assert_eq!(result.width(), 16);
        assert_eq!(result.pixel(0, 0), Some(NO_DATA_PIXEL));
        let first = config.elevation.palette[0];
        assert_eq!(result.pixel(1, 0).map(|p| [p[0], p[1], p[2]]), Some(first));
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let args = ClassifyArgs {
            input: dir.path().join("absent.png"),
            output: dir.path().join("out.png"),
        };
        assert!(run(&MapConfig::default(), &args).is_err());
    }
}
