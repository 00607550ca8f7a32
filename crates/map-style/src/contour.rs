//! Contour band coloring by on-screen area share.
//!
//! Coloring contour bands by elevation alone gives the peaks most of the
//! hue range and leaves broad valleys in one shade. Instead each band's
//! hue follows the cumulative share of visible area up to that elevation,
//! so every part of the ramp covers a similar amount of screen.
//!
//! Areas are those of the fragments' bounding boxes, not of the polygons
//! themselves.

use map_common::feature::format_number;
use map_common::{BoundingBox, Color, ContourConfig, Feature, LabelConfig};
use serde::Serialize;
use tracing::{debug, trace};

use crate::distribution::cumulative_proportions;
use crate::style_spec::{Stroke, StyleSpec, TextStyle};

/// Layer name of contour features in the terrain vector tiles.
pub const CONTOUR_LAYER: &str = "contour";

/// One visible piece of a contour polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourFragment {
    pub elevation: f64,
    pub extent: BoundingBox,
}

/// Style and statistics of one distinct elevation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourBand {
    pub elevation: f64,
    /// Summed bounding-box area of the fragments at this elevation
    pub area: f64,
    /// Share of the total area at or below this elevation
    pub cumulative: f64,
    /// Fill hue in degrees
    pub hue: f64,
    /// Index contours get a thick stroke and a label
    pub indexed: bool,
    pub style: StyleSpec,
}

/// Band table for the current viewport, ascending by elevation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourBands {
    bands: Vec<ContourBand>,
    zoom: Option<u8>,
}

impl ContourBands {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bands(&self) -> &[ContourBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Zoom level the table was computed for.
    pub fn zoom(&self) -> Option<u8> {
        self.zoom
    }

    pub fn band(&self, elevation: f64) -> Option<&ContourBand> {
        // -0.0 and 0.0 are one band
        let elevation = elevation + 0.0;
        self.bands
            .binary_search_by(|band| band.elevation.total_cmp(&elevation))
            .ok()
            .map(|i| &self.bands[i])
    }

    /// Style for contours at `elevation`, if that elevation was visible
    /// when the table was built.
    pub fn get(&self, elevation: f64) -> Option<&StyleSpec> {
        self.band(elevation).map(|band| &band.style)
    }

    /// CSS gradient of the band fills, lowest band at the bottom, each
    /// band an equal-height hard stop.
    pub fn legend_gradient(&self) -> Option<String> {
        if self.bands.is_empty() {
            return None;
        }
        let n = self.bands.len() as f64;
        let stops: Vec<String> = self
            .bands
            .iter()
            .enumerate()
            .map(|(i, band)| {
                let color = band
                    .style
                    .fill
                    .map(|f| f.color)
                    .unwrap_or(Color::TRANSPARENT);
                format!(
                    "{} {}%, {} {}%",
                    color,
                    format_number(100.0 * i as f64 / n),
                    color,
                    format_number(100.0 * (i + 1) as f64 / n)
                )
            })
            .collect();
        Some(format!("linear-gradient(to top, {})", stops.join(", ")))
    }
}

/// Hue for a cumulative area share on the configured linear ramp.
pub fn hue_for(cumulative: f64, config: &ContourConfig) -> f64 {
    config.hue_start - config.hue_span * cumulative
}

/// Whether an elevation is a multiple of the index spacing.
pub fn is_index_elevation(elevation: f64, multiple: f64) -> bool {
    let rem = elevation.rem_euclid(multiple);
    rem < 1e-9 || (multiple - rem) < 1e-9
}

/// Builds band tables from the fragments in view.
#[derive(Debug, Clone, Copy)]
pub struct ContourBandColorer<'a> {
    config: &'a ContourConfig,
    labels: &'a LabelConfig,
}

impl<'a> ContourBandColorer<'a> {
    pub fn new(config: &'a ContourConfig, labels: &'a LabelConfig) -> Self {
        Self { config, labels }
    }

    /// Compute one style per distinct elevation.
    ///
    /// Fragments are grouped by exact elevation and sorted numerically
    /// before accumulating. When every extent is degenerate (zero total
    /// area) each elevation is weighted equally instead.
    pub fn compute_bands(&self, fragments: &[ContourFragment], zoom: u8) -> ContourBands {
        let mut sorted: Vec<&ContourFragment> = fragments
            .iter()
            .filter(|f| f.elevation.is_finite())
            .collect();
        sorted.sort_by(|a, b| a.elevation.total_cmp(&b.elevation));

        let mut groups: Vec<(f64, f64)> = Vec::new();
        for fragment in sorted {
            let area = fragment.extent.area();
            let elevation = fragment.elevation + 0.0;
            match groups.last_mut() {
                Some((last, total)) if *last == elevation => *total += area,
                _ => groups.push((elevation, area)),
            }
        }

        if groups.is_empty() {
            debug!(zoom, "No contour fragments in view");
            return ContourBands {
                bands: Vec::new(),
                zoom: Some(zoom),
            };
        }

        let areas: Vec<f64> = groups.iter().map(|(_, area)| *area).collect();
        let cumulative = cumulative_proportions(&areas).unwrap_or_else(|| {
            debug!(bands = groups.len(), "Contour extents have no area, weighting bands equally");
            let equal = vec![1.0; groups.len()];
            cumulative_proportions(&equal).unwrap_or_default()
        });

        let multiple = self.config.index_multiple(zoom);
        let bands: Vec<ContourBand> = groups
            .iter()
            .zip(&cumulative)
            .map(|(&(elevation, area), &cum)| self.band(elevation, area, cum, multiple))
            .collect();

        debug!(
            zoom,
            fragments = fragments.len(),
            bands = bands.len(),
            index_multiple = multiple,
            lowest = bands.first().map(|b| b.elevation),
            highest = bands.last().map(|b| b.elevation),
            "Computed contour bands"
        );

        ContourBands {
            bands,
            zoom: Some(zoom),
        }
    }

    fn band(&self, elevation: f64, area: f64, cumulative: f64, multiple: f64) -> ContourBand {
        let hue = hue_for(cumulative, self.config);
        let indexed = is_index_elevation(elevation, multiple);
        let width = if indexed {
            self.config.thick_width
        } else {
            self.config.thin_width
        };

        let mut style = StyleSpec::new()
            .with_fill(Color::hsl(hue, self.config.saturation, self.config.lightness))
            .with_stroke(Stroke::new(self.config.line_color, width));
        if indexed {
            style = style.with_text(TextStyle::label(
                format_number(elevation),
                self.labels.default_size,
                self.labels,
            ));
        }

        ContourBand {
            elevation,
            area,
            cumulative,
            hue,
            indexed,
            style,
        }
    }
}

/// Collect `(ele, extent)` of contour features whose extent intersects
/// the visible extent. Features without a numeric `ele` or a geometry are
/// skipped.
pub fn contour_fragments<'f, F, I>(features: I, view: &BoundingBox) -> Vec<ContourFragment>
where
    F: Feature + ?Sized + 'f,
    I: IntoIterator<Item = &'f F>,
{
    features
        .into_iter()
        .filter(|f| f.get("layer").is(CONTOUR_LAYER))
        .filter_map(|f| {
            let Some(elevation) = f.get("ele").as_number() else {
                trace!("Skipping contour without numeric ele");
                return None;
            };
            let extent = f.extent()?;
            extent
                .intersects(view)
                .then_some(ContourFragment { elevation, extent })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_index_elevation() {
        assert!(is_index_elevation(200.0, 100.0));
        assert!(is_index_elevation(0.0, 100.0));
        assert!(is_index_elevation(-300.0, 100.0));
        assert!(!is_index_elevation(250.0, 100.0));
        assert!(!is_index_elevation(10.0, 100.0));
    }

    #[test]
    fn test_hue_ramp_endpoints() {
        let config = ContourConfig::default();
        assert_eq!(hue_for(0.0, &config), 150.0);
        assert_eq!(hue_for(1.0, &config), -20.0);
    }

    #[test]
    fn test_lookup_by_elevation() {
        let config = ContourConfig::default();
        let labels = LabelConfig::default();
        let colorer = ContourBandColorer::new(&config, &labels);
        let bands = colorer.compute_bands(
            &[
                ContourFragment {
                    elevation: 120.0,
                    extent: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
                },
                ContourFragment {
                    elevation: 100.0,
                    extent: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
                },
            ],
            15,
        );
        assert!(bands.get(100.0).is_some());
        assert!(bands.get(120.0).is_some());
        assert!(bands.get(110.0).is_none());
        assert_eq!(bands.zoom(), Some(15));
    }
}
