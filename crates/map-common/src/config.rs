//! Styling configuration.
//!
//! Every table the styling code reads (road classes, landuse fills,
//! waterway widths, contour intervals, the elevation palette, tile
//! sources) lives here as plain data. Defaults reproduce the authored
//! cartography; a JSON or YAML file can override any section.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use crate::color::Color;
use crate::error::{MapError, MapResult};

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Road and rail classes
    pub roads: BTreeMap<String, LineParams>,

    /// Landuse/landcover class fills
    pub landuse: BTreeMap<String, Color>,

    /// Waterway class stroke widths (before resolution scaling)
    pub waterway_widths: BTreeMap<String, f64>,

    pub water: WaterConfig,
    pub scale: ScaleConfig,
    pub labels: LabelConfig,
    pub contour: ContourConfig,
    pub elevation: ElevationConfig,

    /// Zoom at which the detail vector schema replaces the overview one
    pub detail_min_zoom: u8,

    /// Named tile sources
    pub sources: BTreeMap<String, SourceConfig>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            roads: default_roads(),
            landuse: default_landuse(),
            waterway_widths: [
                ("river", 8.0),
                ("canal", 4.0),
                ("stream", 2.0),
                ("drain", 1.0),
                ("ditch", 1.0),
            ]
            .into_iter()
            .map(|(class, width)| (class.to_string(), width))
            .collect(),
            water: WaterConfig::default(),
            scale: ScaleConfig::default(),
            labels: LabelConfig::default(),
            contour: ContourConfig::default(),
            elevation: ElevationConfig::default(),
            detail_min_zoom: 14,
            sources: default_sources(),
        }
    }
}

impl MapConfig {
    /// Load from a file; `.yaml`/`.yml` is parsed as YAML, anything else
    /// as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> MapResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MapError::ConfigIo(format!("{}: {}", path.display(), e)))?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let config = if is_yaml {
            Self::from_yaml(&content)?
        } else {
            Self::from_json(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> MapResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_yaml(yaml: &str) -> MapResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Check the invariants the styling code relies on.
    pub fn validate(&self) -> MapResult<()> {
        if self.elevation.palette.is_empty() {
            return Err(MapError::InvalidConfig(
                "elevation palette must contain at least one color".to_string(),
            ));
        }
        if self.elevation.palette.len() > u8::MAX as usize {
            return Err(MapError::InvalidConfig(format!(
                "elevation palette has {} colors, at most 255 supported",
                self.elevation.palette.len()
            )));
        }
        if self.contour.intervals.is_empty() {
            return Err(MapError::InvalidConfig(
                "contour interval table must not be empty".to_string(),
            ));
        }
        if let Some(bad) = self.contour.intervals.iter().find(|i| !(**i > 0.0)) {
            return Err(MapError::InvalidConfig(format!(
                "contour intervals must be positive, got {}",
                bad
            )));
        }
        if !(self.contour.min_index_multiple > 0.0) {
            return Err(MapError::InvalidConfig(
                "contour.min_index_multiple must be positive".to_string(),
            ));
        }
        for (class, params) in &self.roads {
            if !(params.width > 0.0) {
                return Err(MapError::InvalidConfig(format!(
                    "road class '{}': width must be positive",
                    class
                )));
            }
        }
        for (class, width) in &self.waterway_widths {
            if !(*width > 0.0) {
                return Err(MapError::InvalidConfig(format!(
                    "waterway class '{}': width must be positive",
                    class
                )));
            }
        }
        if self.sources.is_empty() {
            warn!("No tile sources configured");
        }
        Ok(())
    }

    /// Look up a tile source by name.
    pub fn source(&self, name: &str) -> MapResult<&SourceConfig> {
        self.sources
            .get(name)
            .ok_or_else(|| MapError::UnknownSource(name.to_string()))
    }
}

/// Stroke parameters of one road class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineParams {
    pub color: Color,
    pub width: f64,
    #[serde(default)]
    pub dash: Option<Vec<f64>>,
}

impl LineParams {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f64, dash: &[f64]) -> Self {
        Self {
            color,
            width,
            dash: Some(dash.to_vec()),
        }
    }
}

fn default_roads() -> BTreeMap<String, LineParams> {
    let white = Color::WHITE;
    let red = Color::rgb(0xff, 0, 0);
    let orange = Color::rgb(0xff, 0x88, 0);
    let maroon = Color::rgb(0x88, 0, 0);
    let black = Color::BLACK;
    let gray = Color::rgb(128, 128, 128);

    [
        ("motorway", LineParams::solid(white, 8.0)),
        ("motorway_link", LineParams::solid(white, 4.0)),
        ("trunk", LineParams::solid(red, 4.0)),
        ("trunk_link", LineParams::solid(red, 2.0)),
        ("primary", LineParams::solid(orange, 3.0)),
        ("secondary", LineParams::solid(maroon, 2.0)),
        ("tertiary", LineParams::solid(black, 2.0)),
        ("street", LineParams::solid(black, 1.0)),
        // probable access restrictions
        ("street_limited", LineParams::dashed(black, 1.0, &[3.0, 3.0])),
        ("pedestrian", LineParams::dashed(black, 1.0, &[3.0, 3.0])),
        ("track", LineParams::dashed(black, 1.0, &[1.0, 1.0])),
        ("service", LineParams::solid(gray, 1.0)),
        ("path", LineParams::dashed(black, 1.0, &[6.0, 6.0])),
        ("major_rail", LineParams::dashed(gray, 1.0, &[6.0, 6.0])),
        ("minor_rail", LineParams::dashed(gray, 1.0, &[6.0, 6.0])),
        ("service_rail", LineParams::dashed(gray, 1.0, &[6.0, 6.0])),
    ]
    .into_iter()
    .map(|(class, params)| (class.to_string(), params))
    .collect()
}

fn default_landuse() -> BTreeMap<String, Color> {
    let agriculture = Color::rgba(0xaa, 0xaa, 0x00, 0x33);
    let green = Color::rgba(0x00, 0xaa, 0x00, 0x33);

    [
        ("agriculture", agriculture),
        ("farmland", agriculture),
        ("grass", green),
        ("park", green),
        ("rock", Color::rgba(0xaa, 0xaa, 0xaa, 0xaa)),
        ("scrub", Color::rgba(0x00, 0xaa, 0x00, 0x66)),
        ("wood", Color::rgba(0x00, 0x22, 0x00, 0x66)),
    ]
    .into_iter()
    .map(|(class, color)| (class.to_string(), color))
    .collect()
}

/// Water areas, waterway lines and flow arrows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    pub color: Color,
    pub area_z_index: i32,
    pub line_z_index: i32,
    pub arrow_color: Color,
    pub arrow_points: u8,
    pub arrow_radius: f64,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            color: Color::rgb(0x66, 0xaa, 0xff),
            area_z_index: 3,
            line_z_index: 1,
            arrow_color: Color::rgb(0x00, 0x00, 0xaa),
            arrow_points: 3,
            arrow_radius: 3.0,
        }
    }
}

/// Factors turning table widths into resolution-normalized pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub road_width_factor: f64,
    pub min_road_width: f64,
    /// Tunnel dash as multiples of the road width: `[on, off]`
    pub tunnel_dash: [f64; 2],
    pub waterway_width_factor: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            road_width_factor: 10.0,
            min_road_width: 0.5,
            tunnel_dash: [10.0, 20.0],
            waterway_width_factor: 8.0,
        }
    }
}

/// Text label appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub font_family: String,
    pub default_size: f64,
    pub fill: Color,
    pub halo_color: Color,
    pub halo_width: f64,
    /// Overview places are labelled while `rank <= max_place_rank`
    pub max_place_rank: f64,
    /// Font size of an overview place is `place_size_base - place_size_step * rank`
    pub place_size_base: f64,
    pub place_size_step: f64,
    /// Detail settlements are labelled while `symbolrank <= max_settlement_rank`
    pub max_settlement_rank: f64,
    /// Font size of a settlement is `settlement_size_base - symbolrank`
    pub settlement_size_base: f64,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_family: "Courier".to_string(),
            default_size: 10.0,
            fill: Color::BLACK,
            halo_color: Color::WHITE,
            halo_width: 1.0,
            max_place_rank: 12.0,
            place_size_base: 40.0,
            place_size_step: 2.5,
            max_settlement_rank: 14.0,
            settlement_size_base: 22.0,
        }
    }
}

/// Contour band coloring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Contour interval in meters, indexed by rounded zoom level
    pub intervals: Vec<f64>,
    /// Index contours are multiples of `max(min_index_multiple, index_factor * interval)`
    pub min_index_multiple: f64,
    pub index_factor: f64,
    pub line_color: Color,
    pub thin_width: f64,
    pub thick_width: f64,
    /// Hue (degrees) of the lowest cumulative share
    pub hue_start: f64,
    /// Hue decrease across the full cumulative range
    pub hue_span: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            intervals: vec![
                500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, 500.0, // 0 - 8
                500.0, 200.0, 100.0, 50.0, 20.0, 10.0, 10.0, 10.0, 10.0, // 9 - 17
            ],
            min_index_multiple: 100.0,
            index_factor: 4.0,
            line_color: Color::rgb(0x44, 0x44, 0x44),
            thin_width: 0.1,
            thick_width: 0.3,
            hue_start: 150.0,
            hue_span: 170.0,
            saturation: 1.0,
            lightness: 0.92,
        }
    }
}

impl ContourConfig {
    /// Contour interval at a zoom level; zooms past the table use its
    /// last entry.
    pub fn interval_at(&self, zoom: u8) -> f64 {
        match self.intervals.get(zoom as usize) {
            Some(interval) => *interval,
            None => {
                let last = self.intervals.last().copied().unwrap_or(10.0);
                warn!(zoom, interval = last, "Zoom beyond contour interval table");
                last
            }
        }
    }

    /// Spacing of labelled index contours at a zoom level.
    pub fn index_multiple(&self, zoom: u8) -> f64 {
        self.min_index_multiple
            .max(self.index_factor * self.interval_at(zoom))
    }
}

/// Elevation raster recoloring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationConfig {
    /// Ordered palette, lowest elevation class first
    pub palette: Vec<[u8; 3]>,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            palette: vec![
                [173, 235, 204],
                [173, 235, 179],
                [194, 235, 173],
                [219, 235, 173],
                [235, 224, 173],
                [235, 199, 173],
                [235, 173, 173],
                [235, 173, 199],
            ],
        }
    }
}

/// One tile provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL template with `{z}`, `{x}`, `{y}`, optional `{a-d}` style
    /// subdomain range and `{token}`
    pub url: String,
    #[serde(default)]
    pub attribution: String,
    #[serde(default)]
    pub min_zoom: u8,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Environment variable holding the access token
    #[serde(default)]
    pub token_env: Option<String>,
}

fn default_max_zoom() -> u8 {
    22
}

fn default_tile_size() -> u32 {
    256
}

impl SourceConfig {
    /// Expand the URL template for one tile. The token is read from the
    /// configured environment variable.
    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> MapResult<String> {
        let token = match &self.token_env {
            Some(var) => Some(
                std::env::var(var)
                    .ok()
                    .filter(|v| !v.is_empty())
                    .ok_or_else(|| MapError::MissingAccessToken(var.clone()))?,
            ),
            None => None,
        };
        Ok(self.expand(z, x, y, token.as_deref()))
    }

    /// Expand the URL template with an explicit token.
    pub fn expand(&self, z: u8, x: u32, y: u32, token: Option<&str>) -> String {
        let mut url = self
            .url
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string());
        if let Some(token) = token {
            url = url.replace("{token}", token);
        }
        expand_subdomain(&url, x, y)
    }
}

/// Replace a `{a-d}` range with one letter, rotating on tile position.
fn expand_subdomain(url: &str, x: u32, y: u32) -> String {
    let Some(start) = url.find('{') else {
        return url.to_string();
    };
    let Some(len) = url[start..].find('}') else {
        return url.to_string();
    };
    let inner = &url[start + 1..start + len];
    let bytes = inner.as_bytes();
    if bytes.len() != 3 || bytes[1] != b'-' || bytes[0] > bytes[2] {
        return url.to_string();
    }
    let count = (bytes[2] - bytes[0] + 1) as u64;
    let pick = bytes[0] + ((x as u64 + y as u64) % count) as u8;
    format!(
        "{}{}{}",
        &url[..start],
        pick as char,
        &url[start + len + 1..]
    )
}

fn default_sources() -> BTreeMap<String, SourceConfig> {
    let mapbox = "© <a href=\"https://www.mapbox.com/map-feedback/\">Mapbox</a>";
    [
        (
            "terrain_rgb",
            SourceConfig {
                url: "https://api.mapbox.com/v4/mapbox.terrain-rgb/{z}/{x}/{y}.png?access_token={token}"
                    .to_string(),
                attribution: mapbox.to_string(),
                min_zoom: 0,
                max_zoom: 20,
                tile_size: 256,
                token_env: Some("MAPBOX_ACCESS_TOKEN".to_string()),
            },
        ),
        (
            "openmaptiles",
            SourceConfig {
                url: "https://api.maptiler.com/tiles/v3/{z}/{x}/{y}.pbf?key={token}".to_string(),
                attribution: "OpenMapTiles by MapTiler".to_string(),
                min_zoom: 0,
                max_zoom: 14,
                tile_size: 128,
                token_env: Some("MAPTILER_KEY".to_string()),
            },
        ),
        (
            "mapbox_streets",
            SourceConfig {
                url: "https://{a-d}.tiles.mapbox.com/v4/mapbox.mapbox-streets-v8/{z}/{x}/{y}.vector.pbf?access_token={token}"
                    .to_string(),
                attribution: mapbox.to_string(),
                min_zoom: 14,
                max_zoom: 22,
                tile_size: 512,
                token_env: Some("MAPBOX_ACCESS_TOKEN".to_string()),
            },
        ),
        (
            "mapbox_terrain",
            SourceConfig {
                url: "https://{a-d}.tiles.mapbox.com/v4/mapbox.mapbox-terrain-v2/{z}/{x}/{y}.vector.pbf?access_token={token}"
                    .to_string(),
                attribution: format!(
                    "{} © <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap contributors</a>",
                    mapbox
                ),
                min_zoom: 0,
                max_zoom: 15,
                tile_size: 256,
                token_env: Some("MAPBOX_ACCESS_TOKEN".to_string()),
            },
        ),
    ]
    .into_iter()
    .map(|(name, source)| (name.to_string(), source))
    .collect()
}
