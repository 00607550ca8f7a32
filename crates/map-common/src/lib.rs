//! Common types shared by the map styling crates and the tile-styler CLI.

pub mod bbox;
pub mod color;
pub mod config;
pub mod error;
pub mod feature;

pub use bbox::BoundingBox;
pub use color::Color;
pub use config::{
    ContourConfig, ElevationConfig, LabelConfig, LineParams, MapConfig, ScaleConfig,
    SourceConfig, WaterConfig,
};
pub use error::{MapError, MapResult};
pub use feature::{Attr, AttrValue, Feature, Geometry, GeometryKind, VectorFeature};
