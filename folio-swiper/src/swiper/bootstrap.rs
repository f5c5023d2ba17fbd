//! Bootstrap state machine
//!
//! Drives a pane through `loading -> layout -> measuring -> boundaries ->
//! ready`. Preloading is split into [`BootstrapMachine::begin_load`],
//! [`PreloadJob::run`] and [`BootstrapMachine::finish_load`] so the async
//! part owns no pane state and a `reset()` in between can cancel it: every
//! job carries the epoch it was started in, and outcomes from an older
//! epoch are discarded.

use std::sync::Arc;

use folio_model::{MediaItem, PaneSide};
use futures::future::try_join_all;

use crate::capabilities::{LayoutProbe, MediaPreloader};
use crate::error::{Result, SwiperError};
use crate::swiper::set_manager::{self, ShiftedWindow};
use crate::swiper::state::{Stage, SwiperState};

/// Preload work detached from the pane.
#[derive(Debug, Clone)]
pub struct PreloadJob {
    epoch: u64,
    items: Arc<[MediaItem]>,
}

impl PreloadJob {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Preload every item concurrently. The first failure aborts the job.
    pub async fn run(&self, preloader: &dyn MediaPreloader) -> PreloadOutcome {
        let loads =
            self.items.iter().enumerate().map(|(index, item)| async move {
                if item.is_video() {
                    return Ok(());
                }
                preloader.preload(item).await.map_err(|e| {
                    SwiperError::Preload {
                        index,
                        url: item.url.clone(),
                        reason: e.to_string(),
                    }
                })
            });

        let result = try_join_all(loads)
            .await
            .map(|_| Arc::clone(&self.items));

        PreloadOutcome {
            epoch: self.epoch,
            result,
        }
    }
}

/// Result of a finished [`PreloadJob`].
#[derive(Debug, Clone)]
pub struct PreloadOutcome {
    pub epoch: u64,
    pub result: Result<Arc<[MediaItem]>>,
}

/// What [`BootstrapMachine::finish_load`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// The media list was stored and the pane moved to layout
    Resolved,
    /// The outcome belonged to a bootstrap that has since been reset
    Stale,
}

#[derive(Debug)]
pub struct BootstrapMachine {
    side: PaneSide,
    set_count: usize,
    epoch: u64,
    load_started: bool,
    state: SwiperState,
}

impl BootstrapMachine {
    pub fn new(side: PaneSide, set_count: usize) -> Self {
        Self {
            side,
            set_count,
            epoch: 0,
            load_started: false,
            state: SwiperState::new(),
        }
    }

    pub fn state(&self) -> &SwiperState {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn set_count(&self) -> usize {
        self.set_count
    }

    /// Start the single bootstrap of this epoch.
    ///
    /// An empty collection moves the pane straight to `error`.
    pub fn begin_load(&mut self, items: Vec<MediaItem>) -> Result<PreloadJob> {
        if self.load_started {
            return Err(SwiperError::AlreadyBootstrapped);
        }
        if self.state.stage != Stage::Loading {
            return Err(SwiperError::InvalidTransition {
                from: self.state.stage,
                to: Stage::Layout,
            });
        }
        self.load_started = true;

        if items.is_empty() {
            let err = SwiperError::EmptyCollection;
            self.state.fail(&err)?;
            log::warn!("[{}] bootstrap aborted: {err}", self.side);
            return Err(err);
        }

        log::info!(
            "[{}] loading {} media items (epoch {})",
            self.side,
            items.len(),
            self.epoch
        );

        Ok(PreloadJob {
            epoch: self.epoch,
            items: items.into(),
        })
    }

    /// Apply a preload outcome. Failures move the pane to `error` and are
    /// returned as well.
    pub fn finish_load(
        &mut self,
        outcome: PreloadOutcome,
    ) -> Result<LoadStatus> {
        if outcome.epoch != self.epoch
            || !self.load_started
            || self.state.stage != Stage::Loading
        {
            log::debug!(
                "[{}] discarding preload outcome from epoch {} (current {})",
                self.side,
                outcome.epoch,
                self.epoch
            );
            return Ok(LoadStatus::Stale);
        }

        match outcome.result {
            Ok(media) => {
                self.state.advance(Stage::Layout)?;
                self.state.media = media;
                log::info!("[{}] media ready, stage -> layout", self.side);
                Ok(LoadStatus::Resolved)
            }
            Err(err) => {
                self.state.fail(&err)?;
                log::warn!("[{}] preload failed: {err}", self.side);
                Err(err)
            }
        }
    }

    /// Synthesize the initial window and wait for measurement.
    pub fn layout(&mut self) -> Result<()> {
        if !self.state.stage.can_transition_to(Stage::Measuring) {
            return Err(SwiperError::InvalidTransition {
                from: self.state.stage,
                to: Stage::Measuring,
            });
        }

        let (sets, counter) = set_manager::initial_window(
            self.set_count,
            &self.state.media,
            self.side,
        );
        self.state.sets = sets;
        self.state.set_counter = counter;
        self.state.advance(Stage::Measuring)?;

        log::info!(
            "[{}] laid out {} sets, stage -> measuring",
            self.side,
            self.set_count
        );
        Ok(())
    }

    /// Read the height of the first set and finish the bootstrap.
    pub fn measure(&mut self, probe: &dyn LayoutProbe) -> Result<f64> {
        if self.state.stage != Stage::Measuring {
            return Err(SwiperError::InvalidTransition {
                from: self.state.stage,
                to: Stage::Boundaries,
            });
        }

        let anchor = self.state.sets.first().map(|set| set.id.clone());
        let height =
            anchor.as_ref().and_then(|id| probe.measure_set_height(id));

        let height = match (anchor, height) {
            (Some(_), Some(h)) if h.is_finite() && h > 0.0 => h,
            (Some(_), Some(h)) => {
                return self.abort_measure(SwiperError::InvalidSetHeight(h));
            }
            (anchor, _) => {
                let anchor = anchor
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "<no sets>".to_string());
                return self.abort_measure(
                    SwiperError::MeasurementAnchorMissing { anchor },
                );
            }
        };

        self.state.set_height_px = height;
        self.state.advance(Stage::Boundaries)?;
        self.state.boundaries_visible = true;
        self.state.advance(Stage::Ready)?;

        log::info!(
            "[{}] measured set height {height}px, stage -> ready",
            self.side
        );
        Ok(height)
    }

    fn abort_measure(&mut self, err: SwiperError) -> Result<f64> {
        self.state.fail(&err)?;
        log::warn!("[{}] measurement failed: {err}", self.side);
        Err(err)
    }

    /// Install a recycled window. Only meaningful once ready.
    pub fn apply_window(&mut self, shifted: ShiftedWindow) {
        debug_assert!(shifted.set_counter > self.state.set_counter);
        self.state.sets = shifted.sets;
        self.state.set_counter = shifted.set_counter;
    }

    /// Back to a pristine `loading` state. Any preload still running is
    /// orphaned by the epoch bump.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.load_started = false;
        self.state = SwiperState::new();
        log::info!("[{}] reset, stage -> loading", self.side);
    }
}
