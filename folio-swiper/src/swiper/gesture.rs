use std::time::{Duration, Instant};

use crate::infra::constants::gesture::IDLE_MS;

/// Groups wheel deltas into gestures. A gesture ends once input has been
/// idle for the configured window; its accumulated delta is reported once.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    idle: Duration,
    total_px: f64,
    events: u32,
    last_input: Option<Instant>,
    last_total_px: Option<f64>,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new(Duration::from_millis(IDLE_MS))
    }
}

impl GestureTracker {
    pub fn new(idle: Duration) -> Self {
        Self {
            idle,
            total_px: 0.0,
            events: 0,
            last_input: None,
            last_total_px: None,
        }
    }

    pub fn record(&mut self, delta_px: f64, now: Instant) {
        self.total_px += delta_px;
        self.events += 1;
        self.last_input = Some(now);
    }

    pub fn is_active(&self) -> bool {
        self.last_input.is_some()
    }

    /// Finish the gesture if it went idle, returning its total delta.
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        let last = self.last_input?;
        if now.saturating_duration_since(last) < self.idle {
            return None;
        }
        let total = std::mem::take(&mut self.total_px);
        self.events = 0;
        self.last_input = None;
        self.last_total_px = Some(total);
        Some(total)
    }

    /// Total of the most recently finished gesture.
    pub fn last_total_px(&self) -> Option<f64> {
        self.last_total_px
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gesture_ends_after_idle_window() {
        let start = Instant::now();
        let at = |ms| start + Duration::from_millis(ms);
        let mut tracker = GestureTracker::default();

        tracker.record(30.0, at(0));
        tracker.record(25.0, at(100));
        assert_eq!(tracker.poll(at(200)), None);
        tracker.record(-5.0, at(240));
        assert_eq!(tracker.poll(at(389)), None);
        assert_eq!(tracker.poll(at(390)), Some(50.0));

        assert!(!tracker.is_active());
        assert_eq!(tracker.poll(at(1_000)), None);
        assert_eq!(tracker.last_total_px(), Some(50.0));
    }
}
