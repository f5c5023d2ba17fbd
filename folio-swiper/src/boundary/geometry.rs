use super::{BoundaryMarker, BoundaryObserver, ScrollMetrics, VisibilityChange};
use crate::infra::constants::boundary::ROOT_MARGIN_PX;

#[derive(Debug, Clone, Copy)]
struct Watched {
    marker: BoundaryMarker,
    visible: bool,
}

/// Headless observer that derives visibility from the pane's own scroll
/// geometry, the way an intersection observer with a root margin would.
#[derive(Debug, Clone)]
pub struct GeometryObserver {
    root_margin_px: f64,
    watched: Vec<Watched>,
    initial: Vec<VisibilityChange>,
}

impl Default for GeometryObserver {
    fn default() -> Self {
        Self::new(ROOT_MARGIN_PX)
    }
}

impl GeometryObserver {
    pub fn new(root_margin_px: f64) -> Self {
        Self {
            root_margin_px,
            watched: Vec::new(),
            initial: Vec::new(),
        }
    }

    /// A marker counts as visible inside the viewport grown by the margin.
    pub fn is_visible(&self, offset_px: f64, metrics: &ScrollMetrics) -> bool {
        let top = metrics.offset_px - self.root_margin_px;
        let bottom =
            metrics.offset_px + metrics.viewport_px + self.root_margin_px;
        offset_px >= top && offset_px <= bottom
    }

    pub fn watched_len(&self) -> usize {
        self.watched.len()
    }
}

impl BoundaryObserver for GeometryObserver {
    fn observe(&mut self, markers: &[BoundaryMarker], metrics: &ScrollMetrics) {
        self.watched = markers
            .iter()
            .map(|&marker| Watched {
                marker,
                visible: self.is_visible(marker.offset_px, metrics),
            })
            .collect();
        self.initial = self
            .watched
            .iter()
            .map(|w| VisibilityChange {
                marker: w.marker.id,
                visible: w.visible,
                initial: true,
            })
            .collect();
    }

    fn take_changes(
        &mut self,
        metrics: &ScrollMetrics,
    ) -> Vec<VisibilityChange> {
        let mut changes = std::mem::take(&mut self.initial);
        let margin = self.root_margin_px;
        let top = metrics.offset_px - margin;
        let bottom = metrics.offset_px + metrics.viewport_px + margin;

        for watched in &mut self.watched {
            let offset = watched.marker.offset_px;
            let visible = offset >= top && offset <= bottom;
            if visible != watched.visible {
                watched.visible = visible;
                changes.push(VisibilityChange {
                    marker: watched.marker.id,
                    visible,
                    initial: false,
                });
            }
        }
        changes
    }

    fn disconnect(&mut self) {
        self.watched.clear();
        self.initial.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::{MarkerId, PaneSide};

    fn metrics(offset_px: f64) -> ScrollMetrics {
        ScrollMetrics {
            offset_px,
            viewport_px: 800.0,
            content_px: 5_000.0,
        }
    }

    fn seam(n: u64, offset_px: f64) -> BoundaryMarker {
        BoundaryMarker {
            id: MarkerId::seam(PaneSide::Left, n),
            offset_px,
        }
    }

    #[test]
    fn observe_reports_initial_state_once() {
        let mut observer = GeometryObserver::default();
        observer.observe(
            &[seam(2, 1_000.0), seam(3, 2_000.0)],
            &metrics(1_500.0),
        );

        let first = observer.take_changes(&metrics(1_500.0));
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|c| c.initial));
        assert!(!first[0].visible);
        assert!(first[1].visible);

        assert!(observer.take_changes(&metrics(1_500.0)).is_empty());
    }

    #[test]
    fn reports_leave_and_enter_transitions() {
        let mut observer = GeometryObserver::new(100.0);
        observer.observe(&[seam(3, 2_000.0)], &metrics(1_500.0));
        observer.take_changes(&metrics(1_500.0));

        // visible window is [offset - 100, offset + 900]
        let left = observer.take_changes(&metrics(2_101.0));
        assert_eq!(
            left,
            vec![VisibilityChange {
                marker: MarkerId::seam(PaneSide::Left, 3),
                visible: false,
                initial: false,
            }]
        );

        let entered = observer.take_changes(&metrics(2_100.0));
        assert_eq!(entered.len(), 1);
        assert!(entered[0].visible);
    }

    #[test]
    fn disconnect_silences_everything() {
        let mut observer = GeometryObserver::default();
        observer.observe(&[seam(2, 0.0)], &metrics(0.0));
        observer.disconnect();
        assert_eq!(observer.watched_len(), 0);
        assert!(observer.take_changes(&metrics(4_000.0)).is_empty());
    }
}
