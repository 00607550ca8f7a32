//! Elevation raster recoloring by tile-local percentiles.
//!
//! Source tiles are terrain-RGB images. The top two channels form a 16-bit
//! elevation code (`r * 256 + g`); a zero blue channel marks missing data.
//! Each tile is classified on its own: the cumulative distribution of codes
//! in the tile is cut into equal-mass classes, one per palette color, so
//! every tile uses the whole palette regardless of its relief.

use map_common::{ElevationConfig, MapError, MapResult};
use rayon::prelude::*;
use tracing::debug;

use crate::distribution::cumulative_proportions;

/// Number of distinct elevation codes (full 16-bit domain).
pub const CODE_SPACE: usize = 1 << 16;

/// Minimum pixels to benefit from a parallel recolor pass
const PARALLEL_THRESHOLD: usize = 4096; // 64x64 or larger

/// A width x height RGBA tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterTile {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RasterTile {
    /// Wrap an RGBA buffer. The buffer must hold exactly `width * height`
    /// pixels of 4 bytes.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> MapResult<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| MapError::MalformedTile(format!("{}x{} overflows", width, height)))?;
        if data.len() != expected {
            return Err(MapError::MalformedTile(format!(
                "expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }
}

/// Elevation code of one RGBA pixel, `None` for missing data.
#[inline(always)]
pub fn elevation_code(pixel: &[u8]) -> Option<u16> {
    if pixel[2] == 0 {
        None
    } else {
        Some(u16::from(pixel[0]) << 8 | u16::from(pixel[1]))
    }
}

/// Rough elevation in meters for a code (terrain-RGB with the blue channel
/// dropped).
pub fn approximate_meters(code: u16) -> f64 {
    -10000.0 + f64::from(code) * 25.6
}

/// Frequency of each elevation code within one tile.
#[derive(Debug, Clone)]
pub struct Histogram {
    counts: Vec<u64>,
    total: u64,
    range: Option<(u16, u16)>,
}

impl Histogram {
    /// Count every data pixel of a tile.
    pub fn from_tile(tile: &RasterTile) -> Self {
        Self::from_codes(tile.data.chunks_exact(4).filter_map(elevation_code))
    }

    pub fn from_codes(codes: impl IntoIterator<Item = u16>) -> Self {
        let mut counts = vec![0u64; CODE_SPACE];
        let mut total = 0u64;
        let mut range: Option<(u16, u16)> = None;

        for code in codes {
            counts[code as usize] += 1;
            total += 1;
            range = Some(match range {
                Some((lo, hi)) => (lo.min(code), hi.max(code)),
                None => (code, code),
            });
        }

        Self {
            counts,
            total,
            range,
        }
    }

    /// Number of data pixels.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn count(&self, code: u16) -> u64 {
        self.counts[code as usize]
    }

    /// Lowest and highest code seen.
    pub fn range(&self) -> Option<(u16, u16)> {
        self.range
    }

    /// Cumulative share per code over the whole code space; `None` for an
    /// empty histogram.
    pub fn cumulative(&self) -> Option<Vec<f64>> {
        let weights: Vec<f64> = self.counts.iter().map(|&c| c as f64).collect();
        cumulative_proportions(&weights)
    }

    /// Upper bound of each of `classes` equal-mass classes.
    ///
    /// Class `j` ends at the first code whose cumulative share reaches
    /// `(j + 1) / classes`; the last class is always unbounded. The
    /// comparison runs on integer counts, so boundaries that fall exactly
    /// on a code are not lost to rounding.
    pub fn thresholds(&self, classes: usize) -> Vec<Threshold> {
        if classes == 0 {
            return Vec::new();
        }
        let mut thresholds = Vec::with_capacity(classes);
        let k = classes as u128;
        let total = self.total as u128;

        if total > 0 {
            let mut running = 0u128;
            for (code, &count) in self.counts.iter().enumerate() {
                running += count as u128;
                while thresholds.len() + 1 < classes
                    && running * k >= (thresholds.len() as u128 + 1) * total
                {
                    thresholds.push(Threshold::Code(code as u16));
                }
                if thresholds.len() + 1 >= classes {
                    break;
                }
            }
        }

        thresholds.resize(classes, Threshold::Unbounded);
        thresholds
    }
}

/// Inclusive upper bound of one elevation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Threshold {
    Code(u16),
    Unbounded,
}

impl Threshold {
    #[inline(always)]
    pub fn admits(&self, code: u16) -> bool {
        match self {
            Threshold::Code(limit) => code <= *limit,
            Threshold::Unbounded => true,
        }
    }
}

/// Index of the first class admitting `code`; the last class otherwise.
#[inline(always)]
pub fn class_of(code: u16, thresholds: &[Threshold]) -> usize {
    thresholds
        .iter()
        .position(|t| t.admits(code))
        .unwrap_or(thresholds.len().saturating_sub(1))
}

/// Result of classifying one tile.
#[derive(Debug, Clone)]
pub struct ClassifiedTile {
    pub tile: RasterTile,
    pub thresholds: Vec<Threshold>,
    pub data_pixels: u64,
}

/// Recolors elevation tiles with a fixed ordered palette.
#[derive(Debug, Clone)]
pub struct ElevationClassifier {
    palette: Vec<[u8; 3]>,
}

impl ElevationClassifier {
    pub fn new(palette: Vec<[u8; 3]>) -> MapResult<Self> {
        if palette.is_empty() {
            return Err(MapError::InvalidConfig(
                "elevation palette must contain at least one color".to_string(),
            ));
        }
        Ok(Self { palette })
    }

    pub fn from_config(config: &ElevationConfig) -> MapResult<Self> {
        Self::new(config.palette.clone())
    }

    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    /// Recolor a tile. Data pixels get their class color at full opacity;
    /// missing-data pixels are copied unchanged.
    pub fn classify(&self, tile: &RasterTile) -> RasterTile {
        self.classify_detailed(tile).tile
    }

    pub fn classify_detailed(&self, tile: &RasterTile) -> ClassifiedTile {
        let histogram = Histogram::from_tile(tile);
        let thresholds = histogram.thresholds(self.palette.len());

        if histogram.is_empty() {
            debug!(
                width = tile.width,
                height = tile.height,
                "Elevation tile has no data, passing through"
            );
            return ClassifiedTile {
                tile: tile.clone(),
                thresholds,
                data_pixels: 0,
            };
        }

        let mut data = tile.data.clone();
        let recolor = |pixel: &mut [u8]| {
            if let Some(code) = elevation_code(pixel) {
                let [r, g, b] = self.palette[class_of(code, &thresholds)];
                pixel[0] = r;
                pixel[1] = g;
                pixel[2] = b;
                pixel[3] = 255;
            }
        };
        if data.len() / 4 >= PARALLEL_THRESHOLD {
            data.par_chunks_exact_mut(4).for_each(recolor);
        } else {
            data.chunks_exact_mut(4).for_each(recolor);
        }

        if let Some((lo, hi)) = histogram.range() {
            debug!(
                width = tile.width,
                height = tile.height,
                data_pixels = histogram.total(),
                min_code = lo,
                max_code = hi,
                min_m = approximate_meters(lo),
                max_m = approximate_meters(hi),
                "Classified elevation tile"
            );
        }

        ClassifiedTile {
            tile: RasterTile {
                width: tile.width,
                height: tile.height,
                data,
            },
            thresholds,
            data_pixels: histogram.total(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevation_code() {
        assert_eq!(elevation_code(&[1, 2, 3, 255]), Some(258));
        assert_eq!(elevation_code(&[255, 255, 1, 255]), Some(u16::MAX));
        assert_eq!(elevation_code(&[1, 2, 0, 255]), None);
    }

    #[test]
    fn test_two_bucket_thresholds() {
        let codes = std::iter::repeat(10u16)
            .take(100)
            .chain(std::iter::repeat(20u16).take(100));
        let histogram = Histogram::from_codes(codes);
        let thresholds = histogram.thresholds(2);
        assert_eq!(thresholds, vec![Threshold::Code(10), Threshold::Unbounded]);
        assert_eq!(class_of(10, &thresholds), 0);
        assert_eq!(class_of(15, &thresholds), 1);
        assert_eq!(class_of(20, &thresholds), 1);
    }

    #[test]
    fn test_high_codes_are_counted() {
        let histogram = Histogram::from_codes([60000u16, 65535]);
        assert_eq!(histogram.count(65535), 1);
        assert_eq!(histogram.range(), Some((60000, 65535)));
        assert_eq!(
            histogram.thresholds(2),
            vec![Threshold::Code(60000), Threshold::Unbounded]
        );
    }

    #[test]
    fn test_empty_histogram_thresholds() {
        let histogram = Histogram::from_codes(std::iter::empty());
        assert!(histogram.cumulative().is_none());
        assert_eq!(histogram.thresholds(3), vec![Threshold::Unbounded; 3]);
        assert!(histogram.thresholds(0).is_empty());
    }

    #[test]
    fn test_from_rgba_rejects_wrong_length() {
        assert!(RasterTile::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(RasterTile::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(RasterTile::from_rgba(0, 0, vec![]).is_ok());
    }
}
