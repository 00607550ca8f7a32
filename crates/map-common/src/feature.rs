//! Feature and geometry model consumed by the styling code.
//!
//! Features come from decoded vector tiles owned by the rendering host.
//! The styling code only reads them: attributes through [`Feature::get`],
//! which never fails and reports missing attributes as [`Attr::Absent`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::bbox::BoundingBox;
use crate::error::MapError;

/// Borrowed view of one attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Attr<'a> {
    Text(&'a str),
    Number(f64),
    Absent,
}

impl<'a> Attr<'a> {
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Attr::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value. Numeric strings (as some tile encoders emit) are
    /// parsed too.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Attr::Number(n) => Some(*n),
            Attr::Text(s) => s.trim().parse().ok(),
            Attr::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Attr::Absent)
    }

    /// True when the attribute is text equal to `value`.
    pub fn is(&self, value: &str) -> bool {
        self.as_str() == Some(value)
    }

    /// True when the attribute is text and one of `values`.
    pub fn is_one_of(&self, values: &[&str]) -> bool {
        self.as_str().is_some_and(|s| values.contains(&s))
    }
}

impl fmt::Display for Attr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attr::Text(s) => f.write_str(s),
            Attr::Number(n) => write!(f, "{}", format_number(*n)),
            Attr::Absent => Ok(()),
        }
    }
}

/// Formats a number the way labels show it: integers without a decimal
/// point, everything else with its shortest representation.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Owned attribute value as stored on a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_attr(&self) -> Attr<'_> {
        match self {
            AttrValue::Number(n) => Attr::Number(*n),
            AttrValue::Text(s) => Attr::Text(s),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Number(value)
    }
}

/// Geometry type of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

/// A geometry stored as interleaved `x, y` coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub struct Geometry {
    #[serde(rename = "type")]
    kind: GeometryKind,
    flat_coordinates: Vec<f64>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: GeometryKind,
    flat_coordinates: Vec<f64>,
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = MapError;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        Geometry::new(raw.kind, raw.flat_coordinates)
    }
}

impl Geometry {
    /// Build a geometry, rejecting odd-length coordinate sequences.
    pub fn new(kind: GeometryKind, flat_coordinates: Vec<f64>) -> Result<Self, MapError> {
        if flat_coordinates.len() % 2 != 0 {
            return Err(MapError::InvalidGeometry(format!(
                "flat coordinate sequence has odd length {}",
                flat_coordinates.len()
            )));
        }
        if kind == GeometryKind::Point && flat_coordinates.len() != 2 {
            return Err(MapError::InvalidGeometry(format!(
                "point needs exactly one vertex, got {}",
                flat_coordinates.len() / 2
            )));
        }
        Ok(Self {
            kind,
            flat_coordinates,
        })
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self {
            kind: GeometryKind::Point,
            flat_coordinates: vec![x, y],
        }
    }

    pub fn line_string(flat_coordinates: Vec<f64>) -> Result<Self, MapError> {
        Self::new(GeometryKind::LineString, flat_coordinates)
    }

    pub fn polygon(flat_coordinates: Vec<f64>) -> Result<Self, MapError> {
        Self::new(GeometryKind::Polygon, flat_coordinates)
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn flat_coordinates(&self) -> &[f64] {
        &self.flat_coordinates
    }

    pub fn vertex_count(&self) -> usize {
        self.flat_coordinates.len() / 2
    }

    pub fn extent(&self) -> Option<BoundingBox> {
        BoundingBox::from_flat_coordinates(&self.flat_coordinates)
    }
}

/// Read-only access to a feature handed over by the rendering host.
pub trait Feature {
    /// Attribute lookup. Missing attributes are [`Attr::Absent`].
    fn get(&self, name: &str) -> Attr<'_>;

    fn geometry(&self) -> Option<&Geometry>;

    fn extent(&self) -> Option<BoundingBox> {
        self.geometry().and_then(Geometry::extent)
    }
}

/// A decoded vector tile feature: an attribute bag plus geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorFeature {
    #[serde(default)]
    pub properties: HashMap<String, AttrValue>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl VectorFeature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.properties.insert(name.to_string(), value.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

impl Feature for VectorFeature {
    fn get(&self, name: &str) -> Attr<'_> {
        self.properties
            .get(name)
            .map(AttrValue::as_attr)
            .unwrap_or(Attr::Absent)
    }

    fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_attribute() {
        let feature = VectorFeature::new().with("class", "river");
        assert!(feature.get("name").is_absent());
        assert!(feature.get("class").is("river"));
        assert!(feature.get("class").is_one_of(&["canal", "river"]));
        assert!(!feature.get("name").is_one_of(&["yes", "both"]));
    }

    #[test]
    fn test_number_attribute() {
        let feature = VectorFeature::new().with("rank", 7.0).with("ele", "2345");
        assert_eq!(feature.get("rank").as_number(), Some(7.0));
        assert_eq!(feature.get("ele").as_number(), Some(2345.0));
        assert_eq!(feature.get("rank").to_string(), "7");
        assert_eq!(Attr::Number(12.5).to_string(), "12.5");
    }

    #[test]
    fn test_geometry_rejects_odd_coordinates() {
        assert!(Geometry::line_string(vec![0.0, 1.0, 2.0]).is_err());
        let line = Geometry::line_string(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0]).unwrap();
        assert_eq!(line.vertex_count(), 3);
        assert_eq!(&line.flat_coordinates()[4..], &[1.0, 1.0]);
    }

    #[test]
    fn test_deserialize_feature() {
        let json = r#"{
            "properties": {"layer": "waterway", "class": "river", "rank": 3},
            "geometry": {"type": "line_string", "flat_coordinates": [0, 0, 1, 0]}
        }"#;
        let feature: VectorFeature = serde_json::from_str(json).unwrap();
        assert!(feature.get("layer").is("waterway"));
        assert_eq!(feature.get("rank").as_number(), Some(3.0));
        assert_eq!(feature.geometry().unwrap().vertex_count(), 2);

        let bad = r#"{"geometry": {"type": "line_string", "flat_coordinates": [0, 0, 1]}}"#;
        assert!(serde_json::from_str::<VectorFeature>(bad).is_err());
    }
}
