//! Rendering context shared by the style callback and viewport events.
//!
//! The only mutable state is the contour band table. It is rebuilt on
//! every viewport settle and replaced wholesale; style calls read whatever
//! table is published at that moment, so a render pass may lag one
//! update behind.

use map_common::{BoundingBox, Feature, MapConfig, MapResult};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::contour::{contour_fragments, ContourBandColorer, ContourBands};
use crate::elevation::ElevationClassifier;
use crate::tables::StyleTable;

/// Web Mercator resolution of zoom 0 for 256px tiles, meters per pixel.
pub const ZOOM_0_RESOLUTION: f64 = 78271.51696402048;

/// Fractional zoom level at which a resolution is reached.
pub fn zoom_for_resolution(resolution: f64) -> f64 {
    (ZOOM_0_RESOLUTION / resolution).log2()
}

/// What the host reports about the current view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Map units per pixel
    pub resolution: f64,
    /// Fractional zoom level
    pub zoom: f64,
    pub extent: BoundingBox,
}

impl Viewport {
    pub fn new(resolution: f64, zoom: f64, extent: BoundingBox) -> Self {
        Self {
            resolution,
            zoom,
            extent,
        }
    }

    /// Zoom rounded to the nearest level, clamped to `0..=255`.
    pub fn rounded_zoom(&self) -> u8 {
        self.zoom.round().clamp(0.0, u8::MAX as f64) as u8
    }
}

/// Ordering token for one contour table update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UpdateTicket(u64);

#[derive(Debug)]
struct Published {
    ticket: UpdateTicket,
    bands: Arc<ContourBands>,
}

/// Single-writer cell holding the current contour band table.
///
/// Updates are ordered by the ticket taken when the computation starts:
/// a result is only published if no later-started computation has
/// published already, so the most recent viewport wins.
#[derive(Debug)]
pub struct ContourTableCell {
    next_ticket: AtomicU64,
    published: RwLock<Published>,
}

impl Default for ContourTableCell {
    fn default() -> Self {
        Self {
            next_ticket: AtomicU64::new(1),
            published: RwLock::new(Published {
                ticket: UpdateTicket(0),
                bands: Arc::new(ContourBands::empty()),
            }),
        }
    }
}

impl ContourTableCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a position in the update order before computing.
    pub fn begin_update(&self) -> UpdateTicket {
        UpdateTicket(self.next_ticket.fetch_add(1, Ordering::Relaxed))
    }

    /// Replace the table unless a later update was already published.
    /// Returns whether `bands` became current.
    pub fn publish(&self, ticket: UpdateTicket, bands: ContourBands) -> bool {
        let mut published = match self.published.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if ticket < published.ticket {
            debug!(
                ticket = ticket.0,
                current = published.ticket.0,
                "Dropping stale contour table"
            );
            return false;
        }
        published.ticket = ticket;
        published.bands = Arc::new(bands);
        true
    }

    /// The current table. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Arc<ContourBands> {
        let published = match self.published.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        Arc::clone(&published.bands)
    }
}

/// Everything the style callback needs, owned in one place.
#[derive(Debug)]
pub struct RenderContext {
    config: Arc<MapConfig>,
    tables: StyleTable,
    classifier: ElevationClassifier,
    contours: ContourTableCell,
}

impl RenderContext {
    pub fn new(config: MapConfig) -> MapResult<Self> {
        config.validate()?;
        let tables = StyleTable::from_config(&config);
        let classifier = ElevationClassifier::from_config(&config.elevation)?;
        Ok(Self {
            config: Arc::new(config),
            tables,
            classifier,
            contours: ContourTableCell::new(),
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn tables(&self) -> &StyleTable {
        &self.tables
    }

    pub fn classifier(&self) -> &ElevationClassifier {
        &self.classifier
    }

    pub fn contour_table(&self) -> &ContourTableCell {
        &self.contours
    }

    /// Current contour band table.
    pub fn contour_bands(&self) -> Arc<ContourBands> {
        self.contours.snapshot()
    }

    /// Rebuild the contour band table from the features materialized in
    /// the viewport. Returns the number of bands published, or `None` if a
    /// newer update won.
    pub fn on_viewport_settled<'f, F, I>(&self, viewport: &Viewport, features: I) -> Option<usize>
    where
        F: Feature + ?Sized + 'f,
        I: IntoIterator<Item = &'f F>,
    {
        let ticket = self.contours.begin_update();
        let fragments = contour_fragments(features, &viewport.extent);
        let colorer = ContourBandColorer::new(&self.config.contour, &self.config.labels);
        let bands = colorer.compute_bands(&fragments, viewport.rounded_zoom());
        let count = bands.len();
        self.contours.publish(ticket, bands).then_some(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::ContourFragment;
    use map_common::{ContourConfig, LabelConfig};

    fn bands_for(elevation: f64) -> ContourBands {
        let config = ContourConfig::default();
        let labels = LabelConfig::default();
        ContourBandColorer::new(&config, &labels).compute_bands(
            &[ContourFragment {
                elevation,
                extent: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            }],
            12,
        )
    }

    #[test]
    fn test_later_update_wins() {
        let cell = ContourTableCell::new();
        let first = cell.begin_update();
        let second = cell.begin_update();

        assert!(cell.publish(second, bands_for(200.0)));
        // The earlier computation finishing late must not overwrite
        assert!(!cell.publish(first, bands_for(100.0)));

        let current = cell.snapshot();
        assert!(current.get(200.0).is_some());
        assert!(current.get(100.0).is_none());
    }

    #[test]
    fn test_snapshot_survives_replacement() {
        let cell = ContourTableCell::new();
        assert!(cell.snapshot().is_empty());

        let ticket = cell.begin_update();
        cell.publish(ticket, bands_for(100.0));
        let old = cell.snapshot();

        let ticket = cell.begin_update();
        cell.publish(ticket, bands_for(300.0));

        assert!(old.get(100.0).is_some());
        assert!(cell.snapshot().get(300.0).is_some());
    }

    #[test]
    fn test_zoom_for_resolution() {
        assert!(zoom_for_resolution(ZOOM_0_RESOLUTION).abs() < 1e-12);
        assert!((zoom_for_resolution(ZOOM_0_RESOLUTION / 16384.0) - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounded_zoom() {
        let extent = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(Viewport::new(1.0, 10.5, extent).rounded_zoom(), 11);
        assert_eq!(Viewport::new(1.0, 10.49, extent).rounded_zoom(), 10);
        assert_eq!(Viewport::new(1.0, -2.0, extent).rounded_zoom(), 0);
    }
}
