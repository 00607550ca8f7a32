//! Common test fixtures for the terrain-map tests.
//!
//! This module provides pre-defined values that represent common
//! scenarios when styling web map tiles.

/// Web Mercator resolutions.
pub mod resolution {
    /// Resolution of zoom 0 for 256px tiles, in meters per pixel
    pub const ZOOM_0: f64 = 78271.51696402048;

    /// Resolution at an integer zoom level.
    pub fn at_zoom(zoom: u8) -> f64 {
        ZOOM_0 / f64::from(1u32 << zoom)
    }

    /// Zoom 14, where detail tiles take over
    pub const ZOOM_14: f64 = 4.777314267823516;
}

/// Common extents in EPSG:3857 meters.
pub mod extent {
    use map_common::BoundingBox;

    /// Kunming area (initial view of the map)
    pub const KUNMING: BoundingBox = BoundingBox {
        min_x: 11_400_000.0,
        min_y: 2_850_000.0,
        max_x: 11_480_000.0,
        max_y: 2_930_000.0,
    };

    /// Unit square, handy for area arithmetic
    pub const UNIT: BoundingBox = BoundingBox {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 1.0,
        max_y: 1.0,
    };
}

/// Class names present in the default style tables.
pub mod classes {
    pub const ROADS: [&str; 16] = [
        "motorway",
        "motorway_link",
        "trunk",
        "trunk_link",
        "primary",
        "secondary",
        "tertiary",
        "street",
        "street_limited",
        "pedestrian",
        "track",
        "service",
        "path",
        "major_rail",
        "minor_rail",
        "service_rail",
    ];

    pub const WATERWAYS: [&str; 5] = ["river", "canal", "stream", "drain", "ditch"];

    pub const LANDUSE: [&str; 7] = [
        "agriculture",
        "farmland",
        "grass",
        "park",
        "rock",
        "scrub",
        "wood",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_halves_per_zoom() {
        assert_eq!(resolution::at_zoom(0), resolution::ZOOM_0);
        assert!((resolution::at_zoom(14) - resolution::ZOOM_14).abs() < 1e-9);
        assert_eq!(resolution::at_zoom(3) * 2.0, resolution::at_zoom(2));
    }

    #[test]
    fn test_extent_area() {
        assert_eq!(extent::UNIT.area(), 1.0);
        assert!(extent::KUNMING.area() > 0.0);
    }
}
