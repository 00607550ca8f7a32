//! `bands`: contour band table and legend for one viewport.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use map_common::{BoundingBox, MapConfig};
use map_style::{contour_fragments, ContourBand, ContourBandColorer, ContourBands};
use serde::Serialize;
use tracing::info;

use super::{read_features, write_json};

#[derive(Args, Debug)]
pub struct BandsArgs {
    /// JSON array of terrain features (`-` for stdin)
    #[arg(short, long)]
    pub features: PathBuf,

    /// Zoom level of the viewport
    #[arg(short, long)]
    pub zoom: f64,

    /// Map units per pixel of the viewport, for the log summary
    #[arg(short, long)]
    pub resolution: Option<f64>,

    /// Visible extent as `minx,miny,maxx,maxy`
    #[arg(long)]
    pub extent: BoundingBox,

    /// Output file; stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct BandReport<'a> {
    pub zoom: Option<u8>,
    pub index_multiple: f64,
    pub bands: &'a [ContourBand],
    pub legend: Option<String>,
}

pub fn run(config: &MapConfig, args: &BandsArgs) -> Result<()> {
    let features = read_features(&args.features)?;
    let fragments = contour_fragments(&features, &args.extent);
    let zoom = args.zoom.round().clamp(0.0, f64::from(u8::MAX)) as u8;

    let bands = ContourBandColorer::new(&config.contour, &config.labels)
        .compute_bands(&fragments, zoom);
    info!(
        features = features.len(),
        fragments = fragments.len(),
        bands = bands.len(),
        zoom,
        resolution = ?args.resolution,
        "Computed contour bands"
    );

    write_json(&report(config, &bands, zoom), args.output.as_deref())
}

pub fn report<'a>(config: &MapConfig, bands: &'a ContourBands, zoom: u8) -> BandReport<'a> {
    BandReport {
        zoom: bands.zoom(),
        index_multiple: config.contour.index_multiple(zoom),
        bands: bands.bands(),
        legend: bands.legend_gradient(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::contour_feature;

    #[test]
    fn test_report_json() {
        let config = MapConfig::default();
        let features = vec![
            contour_feature(100.0, BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
            contour_feature(150.0, BoundingBox::new(0.0, 0.0, 3.0, 1.0)),
        ];
        let fragments = contour_fragments(&features, &BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        let bands = ContourBandColorer::new(&config.contour, &config.labels)
            .compute_bands(&fragments, 14);

        let json = serde_json::to_value(report(&config, &bands, 14)).unwrap();
        assert_eq!(json["zoom"], 14);
        assert_eq!(json["index_multiple"], 100.0);
        assert_eq!(json["bands"].as_array().unwrap().len(), 2);
        assert_eq!(json["bands"][0]["elevation"], 100.0);
        assert_eq!(json["bands"][0]["cumulative"], 0.25);
        assert_eq!(json["bands"][0]["style"]["text"]["text"], "100");
        assert!(json["legend"]
            .as_str()
            .unwrap()
            .starts_with("linear-gradient(to top, "));
    }
}
