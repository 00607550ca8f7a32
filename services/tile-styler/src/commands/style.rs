//! `style`: run the style callback over a batch of features.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use map_common::{BoundingBox, Feature, MapConfig, VectorFeature};
use map_style::{zoom_for_resolution, FeatureStyle, RenderContext, TileSchema, Viewport};
use serde::Serialize;
use tracing::{debug, info};

use super::{read_features, write_json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaArg {
    /// Pick overview or detail tiles from the zoom level
    Auto,
    Openmaptiles,
    Streets,
    Terrain,
}

#[derive(Args, Debug)]
pub struct StyleArgs {
    /// JSON array of features (`-` for stdin)
    #[arg(short, long)]
    pub features: PathBuf,

    /// Vector tile schema the features come from
    #[arg(short, long, value_enum, default_value = "auto")]
    pub schema: SchemaArg,

    /// Map units per pixel
    #[arg(short, long)]
    pub resolution: f64,

    /// Zoom level, used for schema selection and contour intervals;
    /// derived from the resolution if omitted
    #[arg(short, long)]
    pub zoom: Option<f64>,

    /// Visible extent as `minx,miny,maxx,maxy`; defaults to the extent of
    /// all features
    #[arg(long)]
    pub extent: Option<BoundingBox>,

    /// Output file; stdout if omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct StyledFeature {
    pub index: usize,
    pub style: Option<FeatureStyle>,
}

pub fn run(config: MapConfig, args: &StyleArgs) -> Result<()> {
    let features = read_features(&args.features)?;
    let context = RenderContext::new(config)?;
    let styled = style_features(&context, &features, args);

    let drawn = styled.iter().filter(|s| s.style.is_some()).count();
    info!(
        features = features.len(),
        drawn,
        resolution = args.resolution,
        zoom = args.zoom(),
        "Styled features"
    );
    write_json(&styled, args.output.as_deref())
}

impl StyleArgs {
    pub fn zoom(&self) -> f64 {
        self.zoom
            .unwrap_or_else(|| zoom_for_resolution(self.resolution))
    }
}

pub fn resolve_schema(schema: SchemaArg, zoom: f64, detail_min_zoom: u8) -> TileSchema {
    match schema {
        SchemaArg::Auto => TileSchema::for_zoom(zoom, detail_min_zoom),
        SchemaArg::Openmaptiles => TileSchema::OpenMapTiles,
        SchemaArg::Streets => TileSchema::MapboxStreets,
        SchemaArg::Terrain => TileSchema::MapboxTerrain,
    }
}

/// Settle the viewport on the batch, then style every feature.
pub fn style_features(
    context: &RenderContext,
    features: &[VectorFeature],
    args: &StyleArgs,
) -> Vec<StyledFeature> {
    let extent = args.extent.or_else(|| features_extent(features));
    if let Some(extent) = extent {
        let viewport = Viewport::new(args.resolution, args.zoom(), extent);
        let bands = context.on_viewport_settled(&viewport, features);
        debug!(bands = ?bands, "Contour table settled");
    }

    let schema = resolve_schema(args.schema, args.zoom(), context.config().detail_min_zoom);
    let callback = context.style_callback::<VectorFeature>(schema);
    features
        .iter()
        .enumerate()
        .map(|(index, feature)| StyledFeature {
            index,
            style: callback(feature, args.resolution),
        })
        .collect()
}

fn features_extent(features: &[VectorFeature]) -> Option<BoundingBox> {
    features
        .iter()
        .filter_map(|f| f.extent())
        .reduce(|mut acc, extent| {
            acc.extend(extent.min_x, extent.min_y);
            acc.extend(extent.max_x, extent.max_y);
            acc
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{contour_feature, feature, line_feature};

    fn args(schema: SchemaArg) -> StyleArgs {
        StyleArgs {
            features: PathBuf::from("-"),
            schema,
            resolution: 10.0,
            zoom: Some(15.0),
            extent: None,
            output: None,
        }
    }

    #[test]
    fn test_auto_schema_follows_zoom() {
        assert_eq!(resolve_schema(SchemaArg::Auto, 10.0, 14), TileSchema::OpenMapTiles);
        assert_eq!(resolve_schema(SchemaArg::Auto, 14.0, 14), TileSchema::MapboxStreets);
        assert_eq!(resolve_schema(SchemaArg::Terrain, 3.0, 14), TileSchema::MapboxTerrain);
    }

    #[test]
    fn test_zoom_defaults_from_resolution() {
        let mut args = args(SchemaArg::Auto);
        args.zoom = None;
        args.resolution = 78271.51696402048 / 1024.0;
        assert!((args.zoom() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_style_batch() {
        let context = RenderContext::new(MapConfig::default()).unwrap();
        let features = vec![
            feature("road", "primary"),
            feature("road", "runway"),
            line_feature("waterway", "river", &[[0.0, 0.0], [1.0, 0.0], [2.0, 1.0]]),
        ];
        let styled = style_features(&context, &features, &args(SchemaArg::Streets));

        assert_eq!(styled.len(), 3);
        assert!(styled[0].style.is_some());
        assert!(styled[1].style.is_none());
        assert_eq!(styled[2].style.as_ref().unwrap().specs().len(), 2);
    }

    #[test]
    fn test_contours_use_batch_extent() {
        let context = RenderContext::new(MapConfig::default()).unwrap();
        let features = vec![
            contour_feature(100.0, BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
            contour_feature(110.0, BoundingBox::new(5.0, 5.0, 8.0, 8.0)),
        ];
        let styled = style_features(&context, &features, &args(SchemaArg::Terrain));
        assert!(styled.iter().all(|s| s.style.is_some()));
    }

    #[test]
    fn test_features_extent() {
        let features = vec![
            contour_feature(1.0, BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
            feature("water", "lake"),
            contour_feature(2.0, BoundingBox::new(-2.0, 3.0, 0.5, 4.0)),
        ];
        assert_eq!(
            features_extent(&features),
            Some(BoundingBox::new(-2.0, 0.0, 1.0, 4.0))
        );
        assert_eq!(features_extent(&[]), None);
    }
}
