//! Cartographic styling for a composed raster/vector web map.
//!
//! Implements the per-feature style decisions the rendering host asks for:
//! - Style tables (road, waterway, landuse classes)
//! - Elevation raster recoloring by tile-local percentiles
//! - Flow-direction arrows along waterways
//! - Area-weighted contour band colors
//! - The feature style dispatcher tying them together

pub mod context;
pub mod contour;
pub mod dispatch;
pub mod distribution;
pub mod elevation;
pub mod flow;
pub mod style_spec;
pub mod tables;

pub use context::{zoom_for_resolution, ContourTableCell, RenderContext, UpdateTicket, Viewport};
pub use contour::{contour_fragments, ContourBand, ContourBandColorer, ContourBands, ContourFragment};
pub use dispatch::{FeatureStyle, TileSchema};
pub use elevation::{ElevationClassifier, Histogram, RasterTile, Threshold};
pub use flow::{flow_vertices, place_arrows, FlowVertex};
pub use style_spec::{Fill, LineCap, LineJoin, Marker, Stroke, StyleSpec, TextPlacement, TextStyle};
pub use tables::{Category, StyleParams, StyleTable};
