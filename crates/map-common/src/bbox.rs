//! Bounding box types and operations.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MapError;

/// An axis-aligned extent in map units (EPSG:3857 meters for web tiles).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Smallest box containing every `[x, y]` pair of a flat coordinate
    /// sequence. Returns `None` when there is no complete pair.
    pub fn from_flat_coordinates(flat: &[f64]) -> Option<Self> {
        let mut pairs = flat.chunks_exact(2);
        let first = pairs.next()?;
        let mut bbox = Self::new(first[0], first[1], first[0], first[1]);
        for pair in pairs {
            bbox.extend(pair[0], pair[1]);
        }
        Some(bbox)
    }

    /// Grow the box to include a point.
    pub fn extend(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Area of the box. Empty (inverted) boxes have zero area.
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// True when min exceeds max on either axis.
    pub fn is_empty(&self) -> bool {
        self.max_x < self.min_x || self.max_y < self.min_y
    }

    /// Check if this bbox intersects another. Touching edges count.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}

/// Parses `"minx,miny,maxx,maxy"`.
impl FromStr for BoundingBox {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(MapError::InvalidBbox(format!(
                "{}: expected 'minx,miny,maxx,maxy'",
                s
            )));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| MapError::InvalidBbox(format!("invalid number '{}'", part)))?;
        }

        let bbox = Self::new(values[0], values[1], values[2], values[3]);
        if bbox.is_empty() {
            return Err(MapError::InvalidBbox(format!("{}: min exceeds max", s)));
        }
        Ok(bbox)
    }
}
