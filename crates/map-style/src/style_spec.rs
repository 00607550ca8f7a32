//! Style descriptors handed back to the rendering host.
//!
//! A [`StyleSpec`] is plain data: the host decides how to paint it. All
//! widths and sizes are in screen pixels.

use map_common::{Color, LabelConfig};
use serde::Serialize;

/// One drawable style: any combination of fill, stroke, point marker and
/// text, with an optional z-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyleSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    /// Draw at this point instead of the feature geometry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<[f64; 2]>,
}

impl StyleSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(Fill { color });
        self
    }

    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn with_text(mut self, text: TextStyle) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    pub fn at(mut self, point: [f64; 2]) -> Self {
        self.geometry = Some(point);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fill {
    pub color: Color,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineJoin {
    Bevel,
    #[default]
    Round,
    Miter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// Alternating on/off lengths; empty means solid
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dash: Vec<f64>,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Stroke {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
            cap: LineCap::default(),
            join: LineJoin::default(),
        }
    }

    pub fn dashed(mut self, dash: Vec<f64>) -> Self {
        self.dash = dash;
        self
    }

    pub fn cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }
}

/// A filled regular polygon (triangle for flow arrows).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub fill: Color,
    pub points: u8,
    pub radius: f64,
    /// Rotation in radians, clockwise on screen
    pub rotation: f64,
    /// Orientation of the first vertex, radians
    pub angle: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextPlacement {
    #[default]
    Point,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub text: String,
    /// CSS font shorthand, e.g. `10px Courier`
    pub font: String,
    pub font_size: f64,
    pub placement: TextPlacement,
    pub baseline: &'static str,
    pub fill: Color,
    pub halo: Stroke,
}

impl TextStyle {
    /// A line-placed label with the configured font, fill and halo.
    pub fn label(text: impl Into<String>, size: f64, labels: &LabelConfig) -> Self {
        Self {
            text: text.into(),
            font: format!("{}px {}", size, labels.font_family),
            font_size: size,
            placement: TextPlacement::Line,
            baseline: "middle",
            fill: labels.fill,
            halo: Stroke::new(labels.halo_color, labels.halo_width),
        }
    }
}
