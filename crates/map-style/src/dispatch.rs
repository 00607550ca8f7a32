//! Feature style dispatch.
//!
//! The host calls [`RenderContext::style_for`] once per visible feature and
//! render pass. The decision depends on the vector schema of the tile the
//! feature came from, its `layer` and `class` attributes and the current
//! resolution. `None` means the feature is not drawn.
//!
//! Widths and dash lengths are `table value * factor / resolution`, which
//! keeps them constant in screen pixels as the map zooms.

use map_common::{Attr, Color, Feature, LineParams};
use serde::Serialize;
use tracing::trace;

use crate::context::RenderContext;
use crate::contour::CONTOUR_LAYER;
use crate::elevation::RasterTile;
use crate::flow::place_arrows;
use crate::style_spec::{LineCap, LineJoin, Stroke, StyleSpec, TextStyle};
use crate::tables::{Category, StyleParams};

/// Vector tile schema a feature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileSchema {
    /// OpenMapTiles overview tiles
    OpenMapTiles,
    /// Mapbox Streets v8 detail tiles
    MapboxStreets,
    /// Mapbox Terrain v2 contour tiles
    MapboxTerrain,
}

impl TileSchema {
    /// Street schema in use at a zoom level: overview tiles below
    /// `detail_min_zoom`, detail tiles from there on.
    pub fn for_zoom(zoom: f64, detail_min_zoom: u8) -> Self {
        if zoom < f64::from(detail_min_zoom) {
            TileSchema::OpenMapTiles
        } else {
            TileSchema::MapboxStreets
        }
    }
}

/// The style decision for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureStyle {
    Single(StyleSpec),
    /// Several styles drawn in order (a line plus its arrows)
    Layered(Vec<StyleSpec>),
}

impl FeatureStyle {
    pub fn specs(&self) -> &[StyleSpec] {
        match self {
            FeatureStyle::Single(spec) => std::slice::from_ref(spec),
            FeatureStyle::Layered(specs) => specs,
        }
    }

    pub fn into_specs(self) -> Vec<StyleSpec> {
        match self {
            FeatureStyle::Single(spec) => vec![spec],
            FeatureStyle::Layered(specs) => specs,
        }
    }
}

impl RenderContext {
    /// Style one feature at the given resolution (map units per pixel).
    pub fn style_for<F: Feature + ?Sized>(
        &self,
        schema: TileSchema,
        feature: &F,
        resolution: f64,
    ) -> Option<FeatureStyle> {
        if !(resolution > 0.0) || !resolution.is_finite() {
            trace!(resolution, "Non-positive resolution, nothing to draw");
            return None;
        }
        let Some(layer) = feature.get("layer").as_str() else {
            trace!("Feature without layer attribute");
            return None;
        };

        use TileSchema::*;
        let style = match (schema, layer) {
            (OpenMapTiles, "landcover") | (MapboxStreets, "landuse") => self.landuse_style(feature),
            (OpenMapTiles, "transportation") | (MapboxStreets, "road") => {
                self.road_style(feature, resolution)
            }
            (OpenMapTiles, "water") => Some(self.water_style()),
            (OpenMapTiles, "waterway") | (MapboxStreets, "waterway") => {
                self.waterway_style(feature, resolution)
            }
            (OpenMapTiles, "place") => self.place_style(feature),
            (OpenMapTiles, "mountain_peak") => self.elevation_label_style(feature, "ele"),
            (MapboxStreets, "place_label") => self.settlement_style(feature),
            (MapboxStreets, "natural_label") if feature.get("class").is("landform") => {
                self.elevation_label_style(feature, "elevation_m")
            }
            (MapboxTerrain, CONTOUR_LAYER) => self.contour_style(feature),
            _ => None,
        };

        if style.is_none() {
            trace!(
                ?schema,
                layer,
                class = %feature.get("class"),
                "No style for feature"
            );
        }
        style
    }

    /// Style callback for one layer of the host map.
    pub fn style_callback<F: Feature + ?Sized>(
        &self,
        schema: TileSchema,
    ) -> impl Fn(&F, f64) -> Option<FeatureStyle> + '_ {
        move |feature: &F, resolution: f64| self.style_for(schema, feature, resolution)
    }

    /// Raster operation for the elevation image layer.
    pub fn raster_operation(&self) -> impl Fn(&RasterTile) -> RasterTile + '_ {
        move |tile: &RasterTile| self.classifier().classify(tile)
    }

    fn landuse_style<F: Feature + ?Sized>(&self, feature: &F) -> Option<FeatureStyle> {
        let class = feature.get("class").as_str()?;
        let Some(StyleParams::Fill(color)) = self.tables().lookup(Category::Landuse, class) else {
            return None;
        };
        Some(FeatureStyle::Single(
            StyleSpec::new().with_fill(color).with_z_index(-1),
        ))
    }

    fn water_style(&self) -> FeatureStyle {
        let water = &self.config().water;
        FeatureStyle::Single(
            StyleSpec::new()
                .with_fill(water.color)
                .with_z_index(water.area_z_index),
        )
    }

    fn road_style<F: Feature + ?Sized>(&self, feature: &F, resolution: f64) -> Option<FeatureStyle> {
        let class = feature.get("class").as_str()?;
        let Some(StyleParams::Line(params)) = self.tables().lookup(Category::Road, class) else {
            return None;
        };
        Some(FeatureStyle::Single(
            StyleSpec::new().with_stroke(self.road_stroke(params, feature, resolution)),
        ))
    }

    fn road_stroke<F: Feature + ?Sized>(
        &self,
        params: &LineParams,
        feature: &F,
        resolution: f64,
    ) -> Stroke {
        let scale_config = &self.config().scale;
        let scale = scale_config.road_width_factor / resolution;

        let dash: Vec<f64> = if feature.get("structure").is("tunnel") {
            scale_config
                .tunnel_dash
                .iter()
                .map(|m| params.width * m)
                .collect()
        } else {
            params.dash.clone().unwrap_or_default()
        };

        let color = match feature.get("bicycle") {
            Attr::Absent => {
                if feature.get("bike_lane").is_one_of(&["yes", "both"]) {
                    Color::BLACK
                } else {
                    params.color
                }
            }
            bicycle if bicycle.is("no") => Color::WHITE,
            _ => Color::BLACK,
        };

        Stroke::new(color, scale_config.min_road_width.max(params.width * scale))
            .dashed(dash.into_iter().map(|d| d * scale).collect())
            .cap(LineCap::Butt)
            .join(LineJoin::Round)
    }

    fn waterway_style<F: Feature + ?Sized>(
        &self,
        feature: &F,
        resolution: f64,
    ) -> Option<FeatureStyle> {
        let class = feature.get("class").as_str()?;
        let Some(StyleParams::Waterway(width)) = self.tables().lookup(Category::Water, class)
        else {
            return None;
        };
        let config = self.config();

        let mut base = StyleSpec::new()
            .with_stroke(
                Stroke::new(
                    config.water.color,
                    width * config.scale.waterway_width_factor / resolution,
                )
                // square caps hide gaps at tile boundaries
                .cap(LineCap::Square)
                .join(LineJoin::Bevel),
            )
            .with_z_index(config.water.line_z_index);
        let name = feature.get("name");
        if !name.is_absent() {
            base = base.with_text(TextStyle::label(
                name.to_string(),
                config.labels.default_size,
                &config.labels,
            ));
        }

        let styles = match feature.geometry() {
            Some(line) => place_arrows(line, base, &config.water),
            None => vec![base],
        };
        Some(FeatureStyle::Layered(styles))
    }

    fn place_style<F: Feature + ?Sized>(&self, feature: &F) -> Option<FeatureStyle> {
        let labels = &self.config().labels;
        let rank = feature.get("rank").as_number()?;
        if rank > labels.max_place_rank {
            return None;
        }
        let name = feature.get("name");
        if name.is_absent() {
            return None;
        }

        let size = labels.place_size_base - labels.place_size_step * rank;
        Some(FeatureStyle::Single(
            StyleSpec::new()
                .with_z_index(rank.round() as i32)
                .with_text(TextStyle::label(name.to_string(), size, labels)),
        ))
    }

    fn settlement_style<F: Feature + ?Sized>(&self, feature: &F) -> Option<FeatureStyle> {
        let labels = &self.config().labels;
        if !feature.get("class").is("settlement") {
            return None;
        }
        let rank = feature.get("symbolrank").as_number()?;
        if rank > labels.max_settlement_rank {
            return None;
        }
        let name = feature.get("name");
        if name.is_absent() {
            return None;
        }

        let name_en = feature.get("name_en");
        let bilingual = !feature.get("name_script").is("Latin")
            && name_en.as_str().is_some_and(|s| !s.is_empty());
        let text = if bilingual {
            format!("{}\n{}", name, name_en)
        } else {
            name.to_string()
        };

        let size = labels.settlement_size_base - rank;
        Some(FeatureStyle::Single(
            StyleSpec::new()
                .with_z_index(rank.round() as i32)
                .with_text(TextStyle::label(text, size, labels)),
        ))
    }

    /// `name` over `<elevation>m`; just the name when the elevation is
    /// missing.
    fn elevation_label_style<F: Feature + ?Sized>(
        &self,
        feature: &F,
        elevation_attr: &str,
    ) -> Option<FeatureStyle> {
        let labels = &self.config().labels;
        let name = feature.get("name");
        if name.is_absent() {
            return None;
        }
        let text = match feature.get(elevation_attr) {
            Attr::Absent => name.to_string(),
            elevation => format!("{}\n{}m", name, elevation),
        };
        Some(FeatureStyle::Single(StyleSpec::new().with_text(
            TextStyle::label(text, labels.default_size, labels),
        )))
    }

    fn contour_style<F: Feature + ?Sized>(&self, feature: &F) -> Option<FeatureStyle> {
        let elevation = feature.get("ele").as_number()?;
        self.contour_bands()
            .get(elevation)
            .cloned()
            .map(FeatureStyle::Single)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_for_zoom() {
        assert_eq!(TileSchema::for_zoom(10.5, 14), TileSchema::OpenMapTiles);
        assert_eq!(TileSchema::for_zoom(13.99, 14), TileSchema::OpenMapTiles);
        assert_eq!(TileSchema::for_zoom(14.0, 14), TileSchema::MapboxStreets);
    }

    #[test]
    fn test_feature_style_specs() {
        let single = FeatureStyle::Single(StyleSpec::new().with_z_index(2));
        assert_eq!(single.specs().len(), 1);
        let layered = FeatureStyle::Layered(vec![StyleSpec::new(), StyleSpec::new()]);
        assert_eq!(layered.clone().into_specs().len(), 2);
        assert_eq!(layered.specs().len(), 2);
    }
}
