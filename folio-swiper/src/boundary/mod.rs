//! Boundary markers and crossing detection.
//!
//! Markers are thin anchors at the top edge, the bottom edge and every seam
//! between two sets. A [`BoundaryObserver`] reports when they enter or
//! leave view; the [`monitor::BoundaryMonitor`] turns those reports into
//! directional [`BoundaryCrossing`]s.

pub mod geometry;
pub mod monitor;

use folio_model::{MarkerId, PaneSide, ScrollDirection};

use crate::swiper::SwiperState;

pub use geometry::GeometryObserver;
pub use monitor::{BoundaryMonitor, BoundaryPolicy};

/// A marker and its position in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryMarker {
    pub id: MarkerId,
    pub offset_px: f64,
}

/// Scroll geometry of a pane at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset_px: f64,
    pub viewport_px: f64,
    pub content_px: f64,
}

impl ScrollMetrics {
    /// Largest reachable scroll offset.
    pub fn max_offset(&self) -> f64 {
        (self.content_px - self.viewport_px).max(0.0)
    }

    /// Distance left before the bottom edge.
    pub fn distance_to_bottom(&self) -> f64 {
        self.max_offset() - self.offset_px
    }
}

/// A visibility transition reported by an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityChange {
    pub marker: MarkerId,
    pub visible: bool,
    /// First report after the marker started being observed
    pub initial: bool,
}

/// Qualified crossing: the window should shift in `direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryCrossing {
    pub marker: MarkerId,
    pub direction: ScrollDirection,
}

/// Visibility detection capability.
///
/// Implementations are pull based: the pane hands over the current scroll
/// geometry once per frame and receives every transition since the last
/// call.
pub trait BoundaryObserver: Send + std::fmt::Debug {
    /// Replace the watched markers. Each one gets an initial report.
    fn observe(&mut self, markers: &[BoundaryMarker], metrics: &ScrollMetrics);

    /// Drain pending transitions.
    fn take_changes(
        &mut self,
        metrics: &ScrollMetrics,
    ) -> Vec<VisibilityChange>;

    /// Stop watching everything.
    fn disconnect(&mut self);
}

/// Markers for the rendered window: top at 0, the seam above set `i` at
/// `i * height` (for `i > 0`), bottom at `len * height`. Nothing is rendered
/// before the height is known.
pub fn markers_for(state: &SwiperState, side: PaneSide) -> Vec<BoundaryMarker> {
    let height = state.set_height_px;
    if state.sets.is_empty() || !(height > 0.0) {
        return Vec::new();
    }

    let mut markers = Vec::with_capacity(state.sets.len() + 1);
    markers.push(BoundaryMarker {
        id: MarkerId::top(side),
        offset_px: 0.0,
    });
    markers.extend(state.sets.iter().enumerate().skip(1).map(|(i, set)| {
        BoundaryMarker {
            id: MarkerId::seam(side, set.set_number),
            offset_px: i as f64 * height,
        }
    }));
    markers.push(BoundaryMarker {
        id: MarkerId::bottom(side),
        offset_px: state.sets.len() as f64 * height,
    });
    markers
}
