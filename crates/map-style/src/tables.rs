//! Category-keyed style tables.
//!
//! Plain lookups from a class attribute to authored style parameters. An
//! unknown class is `None`, which the dispatcher turns into "do not draw".

use map_common::{Color, LineParams, MapConfig};
use std::collections::HashMap;

/// Which table to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Road,
    Water,
    Landuse,
}

/// Parameters found for one class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleParams<'a> {
    /// Road or rail stroke
    Line(&'a LineParams),
    /// Waterway stroke width before resolution scaling
    Waterway(f64),
    /// Area fill
    Fill(Color),
}

/// Immutable lookup tables built once from the configuration.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    roads: HashMap<String, LineParams>,
    waterways: HashMap<String, f64>,
    landuse: HashMap<String, Color>,
}

impl StyleTable {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            roads: config
                .roads
                .iter()
                .map(|(class, params)| (class.clone(), params.clone()))
                .collect(),
            waterways: config
                .waterway_widths
                .iter()
                .map(|(class, width)| (class.clone(), *width))
                .collect(),
            landuse: config
                .landuse
                .iter()
                .map(|(class, color)| (class.clone(), *color))
                .collect(),
        }
    }

    pub fn lookup(&self, category: Category, class: &str) -> Option<StyleParams<'_>> {
        match category {
            Category::Road => self.roads.get(class).map(StyleParams::Line),
            Category::Water => self.waterways.get(class).copied().map(StyleParams::Waterway),
            Category::Landuse => self.landuse.get(class).copied().map(StyleParams::Fill),
        }
    }
}
