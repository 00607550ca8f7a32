//! Generators for synthetic terrain tiles and vector features.
//!
//! These generators create predictable, verifiable inputs that can be used
//! across the test suite.

use map_common::{BoundingBox, Geometry, VectorFeature};

/// Encodes an elevation code as a terrain-RGB pixel.
///
/// The code goes into the red (high byte) and green (low byte) channels.
/// Blue is set to a non-zero value so the pixel counts as data.
///
/// # Example
///
/// ```
/// use test_utils::encode_elevation;
///
/// assert_eq!(encode_elevation(258), [1, 2, 128, 255]);
/// ```
pub fn encode_elevation(code: u16) -> [u8; 4] {
    [(code >> 8) as u8, (code & 0xff) as u8, 128, 255]
}

/// A missing-data pixel: zero blue channel, everything else arbitrary.
pub const NO_DATA_PIXEL: [u8; 4] = [12, 34, 0, 0];

/// Creates an RGBA terrain tile from a per-pixel elevation function.
///
/// `None` from the function produces a [`NO_DATA_PIXEL`].
///
/// # Arguments
///
/// * `width` - Number of columns
/// * `height` - Number of rows
/// * `elevation` - Called with `(col, row)`
///
/// # Returns
///
/// RGBA bytes in row-major order.
pub fn terrain_tile<F>(width: usize, height: usize, elevation: F) -> Vec<u8>
where
    F: Fn(usize, usize) -> Option<u16>,
{
    let mut data = Vec::with_capacity(width * height * 4);
    for row in 0..height {
        for col in 0..width {
            let pixel = match elevation(col, row) {
                Some(code) => encode_elevation(code),
                None => NO_DATA_PIXEL,
            };
            data.extend_from_slice(&pixel);
        }
    }
    data
}

/// Creates a tile whose codes ramp linearly from `low` (left) to `high`
/// (right).
pub fn ramp_tile(width: usize, height: usize, low: u16, high: u16) -> Vec<u8> {
    let span = f64::from(high) - f64::from(low);
    terrain_tile(width, height, |col, _| {
        let t = col as f64 / (width.max(2) - 1) as f64;
        Some((f64::from(low) + span * t).round() as u16)
    })
}

/// Creates a tile with a conical peak in the center and a ring of missing
/// data in the corners, similar to a coastline tile.
pub fn peak_tile(width: usize, height: usize, base: u16, summit: u16) -> Vec<u8> {
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt();
    terrain_tile(width, height, |col, row| {
        let dx = col as f64 - cx;
        let dy = row as f64 - cy;
        let dist = (dx * dx + dy * dy).sqrt() / max_dist;
        if dist > 0.9 {
            return None;
        }
        let rise = f64::from(summit - base) * (1.0 - dist);
        Some(base + rise.round() as u16)
    })
}

/// Creates a tile with deterministic pseudo-random codes in `[low, high]`.
pub fn noisy_tile(width: usize, height: usize, low: u16, high: u16, seed: u32) -> Vec<u8> {
    let span = u32::from(high - low) + 1;
    terrain_tile(width, height, |col, row| {
        let hash = simple_hash(col as u32, row as u32, seed);
        Some(low + (hash % span) as u16)
    })
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// A feature with `layer` and `class` attributes and no geometry.
pub fn feature(layer: &str, class: &str) -> VectorFeature {
    VectorFeature::new().with("layer", layer).with("class", class)
}

/// A line feature from `[x, y]` vertices.
///
/// # Panics
///
/// Never: vertex pairs always give an even coordinate count.
pub fn line_feature(layer: &str, class: &str, vertices: &[[f64; 2]]) -> VectorFeature {
    let flat = vertices.iter().flat_map(|v| [v[0], v[1]]).collect();
    let line = Geometry::line_string(flat).expect("vertex pairs are always even");
    feature(layer, class).with_geometry(line)
}

/// A `contour` feature at `elevation` covering `extent` with a closed ring.
pub fn contour_feature(elevation: f64, extent: BoundingBox) -> VectorFeature {
    let ring = vec![
        extent.min_x,
        extent.min_y,
        extent.max_x,
        extent.min_y,
        extent.max_x,
        extent.max_y,
        extent.min_x,
        extent.max_y,
        extent.min_x,
        extent.min_y,
    ];
    let polygon = Geometry::polygon(ring).expect("ring has an even coordinate count");
    VectorFeature::new()
        .with("layer", "contour")
        .with("ele", elevation)
        .with_geometry(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use map_common::Feature;

    #[test]
    fn test_terrain_tile_layout() {
        let tile = terrain_tile(2, 1, |col, _| if col == 0 { Some(513) } else { None });
        assert_eq!(tile.len(), 8);
        assert_eq!(&tile[0..4], &[2, 1, 128, 255]);
        assert_eq!(&tile[4..8], &NO_DATA_PIXEL);
    }

    #[test]
    fn test_ramp_tile_endpoints() {
        let tile = ramp_tile(11, 1, 100, 200);
        assert_eq!(&tile[0..2], &[0, 100]);
        assert_eq!(&tile[40..42], &[0, 200]);
    }

    #[test]
    fn test_noisy_tile_is_deterministic() {
        assert_eq!(noisy_tile(8, 8, 0, 999, 7), noisy_tile(8, 8, 0, 999, 7));
        assert_ne!(noisy_tile(8, 8, 0, 999, 7), noisy_tile(8, 8, 0, 999, 8));
    }

    #[test]
    fn test_contour_feature_extent() {
        let extent = BoundingBox::new(0.0, 0.0, 2.0, 3.0);
        let feature = contour_feature(100.0, extent);
        assert_eq!(feature.extent(), Some(extent));
        assert_eq!(feature.get("ele").as_number(), Some(100.0));
    }
}
