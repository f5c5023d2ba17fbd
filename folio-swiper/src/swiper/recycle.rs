//! Recycle controller
//!
//! Serializes window shifts: at most one recycle is in flight per pane,
//! tracked by a single [`RecycleToken`]. The scroll correction that cancels
//! the shift is handed back to the pane to apply after the next render
//! commit; the token is released a short delay after that.

use std::time::{Duration, Instant};

use folio_model::{PaneSide, ScrollDirection};
use serde::{Deserialize, Serialize};

use crate::boundary::{BoundaryCrossing, ScrollMetrics};
use crate::infra::constants::recycle as defaults;
use crate::infra::runtime_config::SwiperConfig;
use crate::swiper::set_manager::{self, ShiftedWindow};
use crate::swiper::state::SwiperState;

/// What happens to a crossing that arrives while a recycle is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingPolicy {
    /// Keep the latest one and replay it after release
    #[default]
    Queue,
    /// Discard it
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecycleConfig {
    pub release: Duration,
    pub pending_policy: PendingPolicy,
}

impl Default for RecycleConfig {
    fn default() -> Self {
        Self {
            release: Duration::from_millis(defaults::RELEASE_MS),
            pending_policy: PendingPolicy::default(),
        }
    }
}

impl RecycleConfig {
    pub fn from_swiper_config(config: &SwiperConfig) -> Self {
        Self {
            release: Duration::from_millis(config.release_ms()),
            pending_policy: config.pending_policy(),
        }
    }
}

/// The single "operation in flight" marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecycleToken {
    pub id: u64,
    pub direction: ScrollDirection,
    pub started_at: Instant,
    pub correction_committed: bool,
}

/// Work produced by a started recycle.
#[derive(Debug, Clone, PartialEq)]
pub struct RecyclePlan {
    pub token: u64,
    pub direction: ScrollDirection,
    /// `+set_height` after a prepend, `-set_height` after an append
    pub correction_px: f64,
    pub shifted: ShiftedWindow,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecycleOutcome {
    Started(RecyclePlan),
    /// Stored for replay once the current recycle is released
    Queued,
    Dropped,
    /// The pane is not ready, or the correction would not fit the
    /// scrollable range
    Rejected,
}

#[derive(Debug)]
pub struct RecycleController {
    side: PaneSide,
    cfg: RecycleConfig,
    next_token: u64,
    in_flight: Option<RecycleToken>,
    pending: Option<BoundaryCrossing>,
    completed: u64,
}

impl RecycleController {
    pub fn new(side: PaneSide, cfg: RecycleConfig) -> Self {
        Self {
            side,
            cfg,
            next_token: 0,
            in_flight: None,
            pending: None,
            completed: 0,
        }
    }

    pub fn in_flight(&self) -> Option<&RecycleToken> {
        self.in_flight.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn pending(&self) -> Option<&BoundaryCrossing> {
        self.pending.as_ref()
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Try to start a recycle for `crossing` at the scroll position in
    /// `metrics`.
    ///
    /// A shift whose correction would land outside `[0, max_offset]` is
    /// rejected: the clamped correction would move the visible content.
    pub fn offer(
        &mut self,
        crossing: BoundaryCrossing,
        state: &SwiperState,
        metrics: &ScrollMetrics,
        now: Instant,
    ) -> RecycleOutcome {
        if !state.is_ready() || state.sets.is_empty() {
            log::debug!(
                "[{}] crossing {} rejected in stage {}",
                self.side,
                crossing.marker,
                state.stage
            );
            return RecycleOutcome::Rejected;
        }

        if let Some(token) = &self.in_flight {
            return match self.cfg.pending_policy {
                PendingPolicy::Queue => {
                    log::debug!(
                        "[{}] recycle #{} in flight, queued {} {}",
                        self.side,
                        token.id,
                        crossing.marker,
                        crossing.direction
                    );
                    self.pending = Some(crossing);
                    RecycleOutcome::Queued
                }
                PendingPolicy::Drop => {
                    log::debug!(
                        "[{}] recycle #{} in flight, dropped {}",
                        self.side,
                        token.id,
                        crossing.marker
                    );
                    RecycleOutcome::Dropped
                }
            };
        }

        let correction_px = match crossing.direction {
            ScrollDirection::TowardTop => state.set_height_px,
            ScrollDirection::TowardBottom => -state.set_height_px,
        };
        let corrected = metrics.offset_px + correction_px;
        if !(0.0..=metrics.max_offset()).contains(&corrected) {
            log::debug!(
                "[{}] crossing {} rejected: correction to {corrected:.1}px \
                 leaves [0, {:.1}]",
                self.side,
                crossing.marker,
                metrics.max_offset()
            );
            return RecycleOutcome::Rejected;
        }

        let shifted = set_manager::shift_window(
            &state.sets,
            state.set_counter,
            &state.media,
            crossing.direction,
        );

        self.next_token += 1;
        let token = RecycleToken {
            id: self.next_token,
            direction: crossing.direction,
            started_at: now,
            correction_committed: false,
        };
        self.in_flight = Some(token);

        log::debug!(
            "[{}] recycle #{} {}: created set {}, evicted {:?}, \
             correction {:+}px",
            self.side,
            token.id,
            crossing.direction,
            shifted.created,
            shifted.evicted.as_ref().map(|s| s.set_number),
            correction_px
        );

        RecycleOutcome::Started(RecyclePlan {
            token: token.id,
            direction: crossing.direction,
            correction_px,
            shifted,
        })
    }

    /// The correction for `token` reached the screen. Returns when the token
    /// may be released.
    pub fn mark_committed(
        &mut self,
        token: u64,
        now: Instant,
    ) -> Option<Instant> {
        let in_flight = self.in_flight.as_mut().filter(|t| t.id == token)?;
        in_flight.correction_committed = true;
        Some((in_flight.started_at + self.cfg.release).max(now))
    }

    /// Clear the in-flight token and hand back any queued crossing.
    ///
    /// A token whose correction is not committed yet stays in flight.
    pub fn release(&mut self, token: u64) -> Option<BoundaryCrossing> {
        match self.in_flight {
            Some(t) if t.id == token && t.correction_committed => {
                self.in_flight = None;
                self.completed += 1;
                log::trace!("[{}] recycle #{token} released", self.side);
                self.pending.take()
            }
            Some(t) if t.id == token => {
                log::debug!(
                    "[{}] recycle #{token} release before commit, holding",
                    self.side
                );
                None
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.in_flight = None;
        self.pending = None;
    }
}
