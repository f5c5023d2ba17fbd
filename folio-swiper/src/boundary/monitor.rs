//! Boundary crossing policy.
//!
//! Edge markers fire when they *enter* view, qualified by the scroll
//! direction or by sitting within `edge_proximity_px` of the absolute edge.
//! Seam markers fire when they *leave* view, in the current direction,
//! provided the monitor saw them visible since they were last observed.
//! Every marker identity carries its own cooldown and streak cap.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use folio_model::{BoundaryKind, MarkerId, PaneSide, ScrollDirection};

use super::{BoundaryCrossing, ScrollMetrics, VisibilityChange};
use crate::infra::constants::boundary as defaults;
use crate::infra::runtime_config::SwiperConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryPolicy {
    /// Repeated triggers of one marker inside this window are ignored.
    pub cooldown: Duration,
    /// Accepted triggers closer than this extend the marker's streak.
    pub streak_window: Duration,
    /// Streak length that starts the penalty.
    pub max_consecutive: u32,
    /// Extended cooldown after the streak cap is hit.
    pub penalty: Duration,
    /// Absolute distance from an edge that qualifies an edge marker.
    pub edge_proximity_px: f64,
    /// Seam notifications are ignored this long after a recycle starts.
    pub seam_suppress: Duration,
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_millis(defaults::COOLDOWN_MS),
            streak_window: Duration::from_millis(defaults::STREAK_WINDOW_MS),
            max_consecutive: defaults::MAX_CONSECUTIVE,
            penalty: Duration::from_millis(defaults::PENALTY_MS),
            edge_proximity_px: defaults::EDGE_PROXIMITY_PX,
            seam_suppress: Duration::from_millis(defaults::SEAM_SUPPRESS_MS),
        }
    }
}

impl BoundaryPolicy {
    pub fn from_swiper_config(config: &SwiperConfig) -> Self {
        Self {
            cooldown: Duration::from_millis(config.cooldown_ms()),
            streak_window: Duration::from_millis(config.streak_window_ms()),
            max_consecutive: config.max_consecutive(),
            penalty: Duration::from_millis(config.penalty_ms()),
            edge_proximity_px: config.edge_proximity_px(),
            seam_suppress: Duration::from_millis(config.seam_suppress_ms()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct MarkerHistory {
    last_trigger: Option<Instant>,
    streak: u32,
    blocked_until: Option<Instant>,
}

#[derive(Debug)]
pub struct BoundaryMonitor {
    side: PaneSide,
    policy: BoundaryPolicy,
    armed: bool,
    last_offset: Option<f64>,
    /// Seams seen visible since they were (re)observed
    seen_visible: HashSet<MarkerId>,
    history: HashMap<MarkerId, MarkerHistory>,
    suppress_seams_until: Option<Instant>,
    suppressed: u64,
}

impl BoundaryMonitor {
    pub fn new(side: PaneSide, policy: BoundaryPolicy) -> Self {
        Self {
            side,
            policy,
            armed: false,
            last_offset: None,
            seen_visible: HashSet::new(),
            history: HashMap::new(),
            suppress_seams_until: None,
            suppressed: 0,
        }
    }

    pub fn policy(&self) -> &BoundaryPolicy {
        &self.policy
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Triggers swallowed by cooldown, penalty or seam suppression.
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed
    }

    /// Start acting on notifications.
    pub fn arm(&mut self, offset_px: f64) {
        self.armed = true;
        self.last_offset = Some(offset_px);
        log::info!(
            "[{}] boundary detection armed at {offset_px:.1}px",
            self.side
        );
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Forget everything, including anti-storm history.
    pub fn reset(&mut self) {
        self.armed = false;
        self.last_offset = None;
        self.seen_visible.clear();
        self.history.clear();
        self.suppress_seams_until = None;
    }

    /// Re-anchor direction tracking after a programmatic scroll so the jump
    /// is not mistaken for user motion.
    pub fn resync(&mut self, offset_px: f64) {
        self.last_offset = Some(offset_px);
    }

    /// Markers were re-observed; seam visibility memory starts over.
    pub fn rebind(&mut self) {
        self.seen_visible.clear();
    }

    pub fn suppress_seams(&mut self, now: Instant) {
        self.suppress_seams_until = Some(now + self.policy.seam_suppress);
    }

    /// Turn one batch of notifications into crossings. Direction is derived
    /// once per batch from the offset delta since the previous batch.
    pub fn evaluate(
        &mut self,
        changes: &[VisibilityChange],
        metrics: &ScrollMetrics,
        now: Instant,
    ) -> Vec<BoundaryCrossing> {
        let offset = metrics.offset_px;
        let previous = self.last_offset.replace(offset).unwrap_or(offset);
        let direction = ScrollDirection::from_offsets(previous, offset);

        let mut crossings = Vec::new();
        for change in changes {
            let marker = change.marker;
            let was_visible = if change.visible {
                !self.seen_visible.insert(marker)
            } else {
                self.seen_visible.remove(&marker)
            };

            if change.initial || !self.armed {
                continue;
            }

            let candidate = match marker.kind {
                BoundaryKind::Top if change.visible => {
                    (direction == ScrollDirection::TowardTop
                        || offset < self.policy.edge_proximity_px)
                        .then_some(ScrollDirection::TowardTop)
                }
                BoundaryKind::Bottom if change.visible => {
                    (direction == ScrollDirection::TowardBottom
                        || metrics.distance_to_bottom()
                            < self.policy.edge_proximity_px)
                        .then_some(ScrollDirection::TowardBottom)
                }
                BoundaryKind::Seam if !change.visible && was_visible => {
                    if self.seams_suppressed(now) {
                        log::debug!(
                            "[{}] {marker} left view during recycle, ignored",
                            self.side
                        );
                        self.suppressed += 1;
                        None
                    } else {
                        Some(direction)
                    }
                }
                _ => None,
            };

            let Some(direction) = candidate else {
                continue;
            };

            if self.admit(marker, now) {
                log::debug!("[{}] {marker} crossed {direction}", self.side);
                crossings.push(BoundaryCrossing { marker, direction });
            }
        }
        crossings
    }

    /// Apply the anti-storm policy to one candidate trigger.
    pub fn admit(&mut self, marker: MarkerId, now: Instant) -> bool {
        let policy = self.policy;
        let history = self.history.entry(marker).or_default();

        if let Some(until) = history.blocked_until {
            if now < until {
                log::debug!(
                    "[{}] {marker} in penalty for {:?}",
                    self.side,
                    until - now
                );
                self.suppressed += 1;
                return false;
            }
            history.blocked_until = None;
        }

        let since_last = history
            .last_trigger
            .map(|last| now.saturating_duration_since(last));

        if since_last.is_some_and(|elapsed| elapsed < policy.cooldown) {
            log::trace!("[{}] {marker} cooling down", self.side);
            self.suppressed += 1;
            return false;
        }

        history.streak = match since_last {
            Some(elapsed) if elapsed <= policy.streak_window => {
                history.streak + 1
            }
            _ => 1,
        };
        history.last_trigger = Some(now);

        if history.streak >= policy.max_consecutive {
            history.blocked_until = Some(now + policy.penalty);
            history.streak = 0;
            log::debug!(
                "[{}] {marker} hit {} consecutive triggers, pausing for {:?}",
                self.side,
                policy.max_consecutive,
                policy.penalty
            );
        }
        true
    }

    fn seams_suppressed(&self, now: Instant) -> bool {
        self.suppress_seams_until.is_some_and(|until| now < until)
    }
}
