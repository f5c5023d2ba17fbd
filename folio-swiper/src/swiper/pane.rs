//! One swiper pane.
//!
//! Host protocol:
//! - `begin_bootstrap` / `complete_preload` (or the async `bootstrap`) to
//!   load media,
//! - `commit()` after every render the host commits,
//! - `frame()` once per animation frame,
//! - `add_impulse`, `scroll_to` and `recenter` for input.
//!
//! Everything that must wait for a render is queued on the pane's
//! [`TaskQueue`], so a stage never starts before the previous stage's
//! output is on screen and a recycle correction never lands before the
//! window change it compensates.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use folio_model::{MarkerId, MediaItem, PaneSide};
use serde::Serialize;

use crate::boundary::{
    self, BoundaryCrossing, BoundaryMonitor, BoundaryObserver, BoundaryPolicy,
    GeometryObserver, ScrollMetrics,
};
use crate::capabilities::{LayoutProbe, MediaPreloader};
use crate::error::{Result, SwiperError};
use crate::infra::runtime_config::SwiperConfig;
use crate::infra::time::Clock;
use crate::swiper::bootstrap::{
    BootstrapMachine, LoadStatus, PreloadJob, PreloadOutcome,
};
use crate::swiper::gesture::GestureTracker;
use crate::swiper::inertia::{InertiaConfig, InertiaEngine};
use crate::swiper::messages::SwiperMessage;
use crate::swiper::recycle::{RecycleConfig, RecycleController, RecycleOutcome};
use crate::swiper::scheduler::{PaneTask, TaskQueue};
use crate::swiper::state::{Stage, SwiperState};
use crate::sync::{SyncApplyMode, SyncLink};

type ActivationCallback = Box<dyn FnMut(&str) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneTimings {
    /// Layout commit to measurement.
    pub measure_defer: Duration,
    /// Centering to boundary arming.
    pub settle: Duration,
}

impl Default for PaneTimings {
    fn default() -> Self {
        Self::from_swiper_config(&SwiperConfig::default())
    }
}

impl PaneTimings {
    pub fn from_swiper_config(config: &SwiperConfig) -> Self {
        Self {
            measure_defer: Duration::from_millis(config.measure_defer_ms()),
            settle: Duration::from_millis(config.settle_ms()),
        }
    }
}

/// Serializable snapshot for debug overlays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaneDiagnostics {
    pub side: PaneSide,
    pub stage: Stage,
    pub set_height_px: f64,
    pub items_per_set: usize,
    pub set_count: usize,
    pub set_counter: u64,
    pub set_numbers: Vec<u64>,
    pub recycle_in_flight: bool,
    pub pending_crossing: bool,
    pub recycles_completed: u64,
    pub suppressed_triggers: u64,
    pub offset_px: f64,
    pub viewport_px: f64,
    pub content_height_px: f64,
    pub velocity: f64,
    pub boundaries_armed: bool,
    pub observed_markers: Vec<String>,
    pub last_gesture_px: Option<f64>,
    pub error: Option<String>,
}

pub struct SwiperPane {
    side: PaneSide,
    timings: PaneTimings,
    clock: Arc<dyn Clock>,
    machine: BootstrapMachine,
    monitor: BoundaryMonitor,
    observer: Box<dyn BoundaryObserver>,
    recycler: RecycleController,
    inertia: InertiaEngine,
    gesture: GestureTracker,
    tasks: TaskQueue,
    probe: Box<dyn LayoutProbe>,
    sync: Option<SyncLink>,
    on_item_activated: Option<ActivationCallback>,
    offset_px: f64,
    viewport_px: f64,
    last_media: Vec<MediaItem>,
    /// Bumped whenever the rendered markers change
    window_revision: u64,
    observed_revision: Option<u64>,
    observed: Vec<MarkerId>,
    mounted: bool,
}

impl fmt::Debug for SwiperPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwiperPane")
            .field("side", &self.side)
            .field("stage", &self.state().stage)
            .field("offset_px", &self.offset_px)
            .field("viewport_px", &self.viewport_px)
            .field("synced", &self.sync.is_some())
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl SwiperPane {
    pub fn new(
        side: PaneSide,
        config: &SwiperConfig,
        clock: Arc<dyn Clock>,
        probe: Box<dyn LayoutProbe>,
    ) -> Self {
        Self {
            side,
            timings: PaneTimings::from_swiper_config(config),
            clock,
            machine: BootstrapMachine::new(side, config.set_count()),
            monitor: BoundaryMonitor::new(
                side,
                BoundaryPolicy::from_swiper_config(config),
            ),
            observer: Box::new(GeometryObserver::new(config.root_margin_px())),
            recycler: RecycleController::new(
                side,
                RecycleConfig::from_swiper_config(config),
            ),
            inertia: InertiaEngine::new(InertiaConfig::from_swiper_config(
                config,
            )),
            gesture: GestureTracker::new(Duration::from_millis(
                config.gesture_idle_ms(),
            )),
            tasks: TaskQueue::new(),
            probe,
            sync: None,
            on_item_activated: None,
            offset_px: 0.0,
            viewport_px: config.viewport_px(),
            last_media: Vec::new(),
            window_revision: 0,
            observed_revision: None,
            observed: Vec::new(),
            mounted: true,
        }
    }

    /// Replace the built-in geometry observer.
    pub fn with_observer(
        mut self,
        observer: Box<dyn BoundaryObserver>,
    ) -> Self {
        self.observer = observer;
        self
    }

    /// Join a sync group.
    pub fn with_sync(mut self, link: SyncLink) -> Self {
        self.sync = Some(link);
        self
    }

    /// Navigation callback, called with the record id of an activated item.
    pub fn on_item_activated(
        mut self,
        callback: impl FnMut(&str) + Send + 'static,
    ) -> Self {
        self.on_item_activated = Some(Box::new(callback));
        self
    }

    // ========== ACCESSORS ==========

    pub fn side(&self) -> PaneSide {
        self.side
    }

    pub fn state(&self) -> &SwiperState {
        self.machine.state()
    }

    pub fn offset_px(&self) -> f64 {
        self.offset_px
    }

    pub fn viewport_px(&self) -> f64 {
        self.viewport_px
    }

    pub fn velocity(&self) -> f64 {
        self.inertia.velocity()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn boundaries_armed(&self) -> bool {
        self.monitor.is_armed()
    }

    pub fn recycle_in_flight(&self) -> bool {
        self.recycler.is_busy()
    }

    pub fn observed_markers(&self) -> &[MarkerId] {
        &self.observed
    }

    /// When the next timer falls due, for hosts that sleep between frames.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks.next_deadline()
    }

    /// Whether the pane has work that waits for the next render commit.
    pub fn needs_commit(&self) -> bool {
        self.tasks.has_commit_work()
            || (self.state().is_ready()
                && self.observed_revision != Some(self.window_revision))
    }

    pub fn metrics(&self) -> ScrollMetrics {
        ScrollMetrics {
            offset_px: self.offset_px,
            viewport_px: self.viewport_px,
            content_px: self.state().content_height_px(),
        }
    }

    // ========== BOOTSTRAP ==========

    /// Start loading `items`. User-visible failures (an empty list) are
    /// reflected in the state and returned as well.
    pub fn begin_bootstrap(
        &mut self,
        items: Vec<MediaItem>,
    ) -> Result<PreloadJob> {
        self.ensure_mounted()?;
        let result = self.machine.begin_load(items.clone());
        if !matches!(result, Err(SwiperError::AlreadyBootstrapped)) {
            self.last_media = items;
        }
        result
    }

    /// Apply the result of a [`PreloadJob`]. Preload failures end up in the
    /// state, not in the returned error.
    pub fn complete_preload(&mut self, outcome: PreloadOutcome) -> Result<()> {
        self.ensure_mounted()?;
        match self.machine.finish_load(outcome) {
            Ok(LoadStatus::Stale) => Ok(()),
            Ok(LoadStatus::Resolved) => {
                self.machine.layout()?;
                self.window_revision += 1;
                self.tasks.after_commit_delayed(
                    PaneTask::Measure,
                    self.timings.measure_defer,
                );
                Ok(())
            }
            Err(err) if err.is_user_visible() => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Load, preload and lay out in one call.
    pub async fn bootstrap(
        &mut self,
        items: Vec<MediaItem>,
        preloader: &dyn MediaPreloader,
    ) -> Result<()> {
        let job = match self.begin_bootstrap(items) {
            Ok(job) => job,
            Err(err) if err.is_user_visible() => return Ok(()),
            Err(err) => return Err(err),
        };
        let outcome = job.run(preloader).await;
        self.complete_preload(outcome)
    }

    /// Reset and start over with the last media list.
    pub fn retry(&mut self) -> Result<PreloadJob> {
        self.ensure_mounted()?;
        self.reset();
        let items = self.last_media.clone();
        self.begin_bootstrap(items)
    }

    /// [`SwiperPane::retry`] followed by the preload.
    pub async fn retry_with(
        &mut self,
        preloader: &dyn MediaPreloader,
    ) -> Result<()> {
        self.ensure_mounted()?;
        self.reset();
        let items = self.last_media.clone();
        self.bootstrap(items, preloader).await
    }

    // ========== RENDER LOOP ==========

    /// The host committed the latest render.
    pub fn commit(&mut self) {
        if !self.mounted {
            return;
        }
        let now = self.clock.now();
        for task in self.tasks.take_commit_tasks(now) {
            self.run_task(task, now);
        }
        self.reobserve_markers();
    }

    /// One animation-frame tick.
    pub fn frame(&mut self) {
        if !self.mounted {
            return;
        }
        let now = self.clock.now();

        while let Some(task) = self.tasks.pop_due(now) {
            self.run_task(task, now);
        }

        if let Some(total) = self.gesture.poll(now) {
            log::debug!("[{}] gesture finished, total {total:.1}px", self.side);
        }

        self.apply_sync();

        if let Some(next) = self.inertia.step(self.offset_px) {
            let applied = self.move_to(next);
            if applied != next {
                self.inertia.cancel();
            }
            log::trace!("[{}] inertia -> {applied:.1}px", self.side);
        }

        self.detect_boundaries(now);
    }

    // ========== INPUT ==========

    /// Wheel/touch input. Ignored before the pane is ready.
    pub fn add_impulse(&mut self, delta_px: f64) -> bool {
        if !self.mounted || !self.state().is_ready() || !delta_px.is_finite()
        {
            log::trace!("[{}] impulse ignored", self.side);
            return false;
        }

        self.gesture.record(delta_px, self.clock.now());
        if let Some(link) = self.sync.as_mut() {
            link.publisher.emit(delta_px, self.clock.unix_ms());
        }
        self.inertia.add_impulse(delta_px);
        true
    }

    /// Native scroll (scrollbar drag, autoscroll). Returns the applied
    /// offset.
    pub fn scroll_to(&mut self, offset_px: f64) -> f64 {
        if !self.mounted || !self.state().is_ready() || !offset_px.is_finite()
        {
            return self.offset_px;
        }

        let before = self.offset_px;
        let applied = self.move_to(offset_px);
        let delta = applied - before;
        if delta != 0.0 {
            if let Some(link) = self.sync.as_mut() {
                link.publisher.emit(delta, self.clock.unix_ms());
            }
        }
        applied
    }

    /// Jump to the middle of the scrollable range.
    pub fn recenter(&mut self) {
        if !self.mounted || !self.state().is_ready() {
            return;
        }
        let target = self.inertia.recenter(&self.metrics());
        self.move_to(target);
        self.monitor.resync(self.offset_px);
    }

    pub fn set_viewport_height(&mut self, viewport_px: f64) {
        if !(viewport_px.is_finite() && viewport_px > 0.0) {
            log::warn!(
                "[{}] ignoring viewport height {viewport_px}",
                self.side
            );
            return;
        }
        self.viewport_px = viewport_px;
        self.move_to(self.offset_px);
        self.monitor.resync(self.offset_px);
    }

    /// Resolve a clicked item and notify the navigation callback.
    pub fn activate_item(
        &mut self,
        set_number: u64,
        index: usize,
    ) -> Option<MediaItem> {
        let item = self
            .state()
            .sets
            .iter()
            .find(|set| set.set_number == set_number)?
            .item(index)?
            .clone();

        if let (Some(record_id), Some(callback)) =
            (item.record_id.as_deref(), self.on_item_activated.as_mut())
        {
            callback(record_id);
        }
        Some(item)
    }

    // ========== LIFECYCLE ==========

    /// Back to a pristine `loading` state. Any running preload is orphaned.
    pub fn reset(&mut self) {
        if !self.mounted {
            return;
        }
        self.machine.reset();
        self.monitor.reset();
        self.recycler.reset();
        self.inertia.cancel();
        self.gesture.reset();
        self.tasks.clear();
        self.observer.disconnect();
        self.observed.clear();
        self.observed_revision = None;
        self.window_revision += 1;
        self.offset_px = 0.0;
    }

    /// Stop timers, motion, observers and sync. Later calls are no-ops.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.tasks.clear();
        self.inertia.cancel();
        self.observer.disconnect();
        self.observed.clear();
        self.monitor.reset();
        self.recycler.reset();
        self.sync = None;
        log::info!("[{}] unmounted", self.side);
    }

    /// Message-style entry point.
    pub fn update(&mut self, message: SwiperMessage) -> Result<()> {
        log::trace!("[{}] update {}", self.side, message.name());
        match message {
            SwiperMessage::Wheel(delta) => {
                self.add_impulse(delta);
            }
            SwiperMessage::ScrollTo(offset) => {
                self.scroll_to(offset);
            }
            SwiperMessage::Recenter => self.recenter(),
            SwiperMessage::ViewportResized(px) => self.set_viewport_height(px),
            SwiperMessage::Committed => self.commit(),
            SwiperMessage::Frame => self.frame(),
            SwiperMessage::PreloadFinished(outcome) => {
                self.complete_preload(outcome)?;
            }
            SwiperMessage::Activate { set_number, index } => {
                self.activate_item(set_number, index);
            }
            SwiperMessage::Reset => self.reset(),
            SwiperMessage::Unmount => self.unmount(),
        }
        Ok(())
    }

    pub fn diagnostics(&self) -> PaneDiagnostics {
        let state = self.state();
        PaneDiagnostics {
            side: self.side,
            stage: state.stage,
            set_height_px: state.set_height_px,
            items_per_set: state.media.len(),
            set_count: state.sets.len(),
            set_counter: state.set_counter,
            set_numbers: state.sets.iter().map(|s| s.set_number).collect(),
            recycle_in_flight: self.recycler.is_busy(),
            pending_crossing: self.recycler.pending().is_some(),
            recycles_completed: self.recycler.completed(),
            suppressed_triggers: self.monitor.suppressed_count(),
            offset_px: self.offset_px,
            viewport_px: self.viewport_px,
            content_height_px: state.content_height_px(),
            velocity: self.inertia.velocity(),
            boundaries_armed: self.monitor.is_armed(),
            observed_markers: self
                .observed
                .iter()
                .map(|m| m.dom_id())
                .collect(),
            last_gesture_px: self.gesture.last_total_px(),
            error: state.error.clone(),
        }
    }

    // ========== INTERNALS ==========

    fn ensure_mounted(&self) -> Result<()> {
        if self.mounted {
            Ok(())
        } else {
            Err(SwiperError::Unmounted)
        }
    }

    /// Clamp into the scrollable range and store.
    fn move_to(&mut self, offset_px: f64) -> f64 {
        let max = self.metrics().max_offset();
        self.offset_px = offset_px.clamp(0.0, max);
        self.offset_px
    }

    fn run_task(&mut self, task: PaneTask, now: Instant) {
        match task {
            PaneTask::Measure => self.run_measure(),
            PaneTask::Recenter => {
                if !self.state().is_ready() {
                    return;
                }
                let target = self.inertia.recenter(&self.metrics());
                self.move_to(target);
                self.monitor.resync(self.offset_px);
                log::debug!(
                    "[{}] centered at {:.1}px",
                    self.side,
                    self.offset_px
                );
                self.tasks.schedule_in(
                    now,
                    self.timings.settle,
                    PaneTask::ArmBoundaries,
                );
            }
            PaneTask::ArmBoundaries => {
                if self.state().is_ready() {
                    self.monitor.arm(self.offset_px);
                }
            }
            PaneTask::ApplyCorrection { token, delta_px } => {
                self.move_to(self.offset_px + delta_px);
                self.monitor.resync(self.offset_px);
                if let Some(deadline) = self.recycler.mark_committed(token, now)
                {
                    self.tasks.schedule_at(
                        deadline,
                        PaneTask::ReleaseRecycle { token },
                    );
                }
            }
            PaneTask::ReleaseRecycle { token } => {
                if let Some(crossing) = self.recycler.release(token) {
                    log::debug!(
                        "[{}] replaying queued crossing {}",
                        self.side,
                        crossing.marker
                    );
                    self.offer(crossing, now);
                }
            }
        }
    }

    fn run_measure(&mut self) {
        if self.state().stage != Stage::Measuring {
            return;
        }
        match self.machine.measure(self.probe.as_ref()) {
            Ok(_) => {
                self.window_revision += 1;
                self.tasks.after_commit(PaneTask::Recenter);
            }
            Err(err) => {
                log::debug!("[{}] bootstrap stopped: {err}", self.side);
            }
        }
    }

    fn reobserve_markers(&mut self) {
        if !self.state().is_ready()
            || self.observed_revision == Some(self.window_revision)
        {
            return;
        }
        let markers = boundary::markers_for(self.state(), self.side);
        let metrics = self.metrics();
        self.observer.observe(&markers, &metrics);
        self.observed = markers.iter().map(|m| m.id).collect();
        self.monitor.rebind();
        self.observed_revision = Some(self.window_revision);
        log::trace!(
            "[{}] observing {} markers",
            self.side,
            self.observed.len()
        );
    }

    fn apply_sync(&mut self) {
        let now_ms = self.clock.unix_ms();
        let Some(link) = self.sync.as_mut() else {
            return;
        };
        let deltas = link.subscription.drain(now_ms);
        let mode = link.apply_mode;
        if deltas.is_empty() || !self.state().is_ready() {
            return;
        }

        for delta in deltas {
            match mode {
                SyncApplyMode::Offset => {
                    self.move_to(self.offset_px + delta);
                }
                SyncApplyMode::Impulse => {
                    self.inertia.add_impulse(delta);
                }
            }
        }
    }

    fn detect_boundaries(&mut self, now: Instant) {
        if !self.state().is_ready() {
            return;
        }
        let metrics = self.metrics();
        let changes = self.observer.take_changes(&metrics);
        let crossings = self.monitor.evaluate(&changes, &metrics, now);
        for crossing in crossings {
            self.offer(crossing, now);
        }
    }

    fn offer(&mut self, crossing: BoundaryCrossing, now: Instant) {
        let metrics = self.metrics();
        match self.recycler.offer(
            crossing,
            self.machine.state(),
            &metrics,
            now,
        ) {
            RecycleOutcome::Started(plan) => {
                self.machine.apply_window(plan.shifted);
                self.window_revision += 1;
                self.monitor.suppress_seams(now);
                self.tasks.after_commit(PaneTask::ApplyCorrection {
                    token: plan.token,
                    delta_px: plan.correction_px,
                });
            }
            RecycleOutcome::Queued
            | RecycleOutcome::Dropped
            | RecycleOutcome::Rejected => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{MockLayoutProbe, MockMediaPreloader};
    use crate::infra::time::ManualClock;
    use parking_lot::Mutex;

    const HEIGHT: f64 = 1_000.0;

    fn probe(height: f64) -> Box<MockLayoutProbe> {
        let mut probe = MockLayoutProbe::new();
        probe
            .expect_measure_set_height()
            .returning(move |_| Some(height));
        Box::new(probe)
    }

    fn preloader() -> MockMediaPreloader {
        let mut preloader = MockMediaPreloader::new();
        preloader.expect_preload().returning(|_| Ok(()));
        preloader
    }

    fn items() -> Vec<MediaItem> {
        (0..4)
            .map(|i| {
                MediaItem::image(format!("/img/{i}.jpg"))
                    .with_record_id(format!("rec-{i}"))
            })
            .collect()
    }

    fn pane(clock: &ManualClock) -> SwiperPane {
        let config = SwiperConfig {
            viewport_px: Some(600.0),
            ..SwiperConfig::default()
        };
        SwiperPane::new(
            PaneSide::Left,
            &config,
            Arc::new(clock.clone()),
            probe(HEIGHT),
        )
    }

    async fn ready_pane(clock: &ManualClock) -> SwiperPane {
        let mut pane = pane(clock);
        pane.bootstrap(items(), &preloader()).await.unwrap();
        pane.commit();
        clock.advance_ms(100);
        pane.frame();
        pane.commit();
        clock.advance_ms(200);
        pane.frame();
        pane
    }

    #[tokio::test]
    async fn stages_wait_for_commits_and_timers() {
        let clock = ManualClock::new();
        let mut pane = pane(&clock);
        pane.bootstrap(items(), &preloader()).await.unwrap();
        assert_eq!(pane.state().stage, Stage::Measuring);

        // no commit yet: measurement never starts
        clock.advance_ms(1_000);
        pane.frame();
        assert_eq!(pane.state().stage, Stage::Measuring);

        pane.commit();
        clock.advance_ms(99);
        pane.frame();
        assert_eq!(pane.state().stage, Stage::Measuring);
        clock.advance_ms(1);
        pane.frame();
        assert_eq!(pane.state().stage, Stage::Ready);
        assert_eq!(pane.offset_px(), 0.0);

        pane.commit();
        assert_eq!(pane.offset_px(), (5.0 * HEIGHT - 600.0) / 2.0);
        assert!(!pane.boundaries_armed());
        assert_eq!(pane.observed_markers().len(), 6);

        clock.advance_ms(199);
        pane.frame();
        assert!(!pane.boundaries_armed());
        clock.advance_ms(1);
        pane.frame();
        assert!(pane.boundaries_armed());
    }

    #[tokio::test]
    async fn impulses_before_ready_are_ignored() {
        let clock = ManualClock::new();
        let mut pane = pane(&clock);
        assert!(!pane.add_impulse(50.0));
        pane.bootstrap(items(), &preloader()).await.unwrap();
        assert!(!pane.add_impulse(50.0));
        assert_eq!(pane.velocity(), 0.0);
    }

    #[tokio::test]
    async fn impulse_moves_offset_over_frames() {
        let clock = ManualClock::new();
        let mut pane = ready_pane(&clock).await;
        let start = pane.offset_px();

        assert!(pane.add_impulse(50.0));
        clock.advance_ms(16);
        pane.frame();
        assert_eq!(pane.offset_px(), start + 20.0);
    }

    #[tokio::test]
    async fn activation_reports_record_id() {
        let clock = ManualClock::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut pane = pane(&clock).on_item_activated(move |id| {
            sink.lock().push(id.to_string());
        });
        pane.bootstrap(items(), &preloader()).await.unwrap();

        let item = pane.activate_item(3, 2).unwrap();
        assert_eq!(item.url, "/img/2.jpg");
        assert_eq!(*seen.lock(), vec!["rec-2".to_string()]);
        assert!(pane.activate_item(99, 0).is_none());
        assert!(pane.activate_item(1, 10).is_none());
    }

    #[tokio::test]
    async fn unmount_makes_everything_inert() {
        let clock = ManualClock::new();
        let mut pane = ready_pane(&clock).await;
        pane.add_impulse(100.0);
        pane.unmount();

        let offset = pane.offset_px();
        clock.advance_ms(16);
        pane.frame();
        pane.commit();
        assert_eq!(pane.offset_px(), offset);
        assert!(!pane.add_impulse(10.0));
        assert_eq!(
            pane.begin_bootstrap(items()).unwrap_err(),
            SwiperError::Unmounted
        );
        assert!(pane.next_deadline().is_none());
    }

    #[tokio::test]
    async fn retry_reloads_last_media() {
        let clock = ManualClock::new();
        let mut pane = pane(&clock);
        pane.bootstrap(Vec::new(), &preloader()).await.unwrap();
        assert_eq!(pane.state().stage, Stage::Error);

        pane.bootstrap(items(), &preloader())
            .await
            .expect_err("a second bootstrap needs a reset");

        pane.retry_with(&preloader()).await.unwrap();
        // the failed attempt had no media, so retry fails the same way
        assert_eq!(pane.state().stage, Stage::Error);

        pane.reset();
        pane.bootstrap(items(), &preloader()).await.unwrap();
        pane.reset();
        pane.retry_with(&preloader()).await.unwrap();
        assert_eq!(pane.state().stage, Stage::Measuring);
        assert_eq!(pane.state().media.len(), 4);
    }

    #[tokio::test]
    async fn diagnostics_serialize() {
        let clock = ManualClock::new();
        let pane = ready_pane(&clock).await;
        let diag = pane.diagnostics();
        assert_eq!(diag.stage, Stage::Ready);
        assert_eq!(diag.set_numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(diag.items_per_set, 4);

        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["stage"], "ready");
        assert_eq!(json["side"], "left");
        assert_eq!(json["observed_markers"][0], "boundary-top-left");
    }

    #[tokio::test]
    async fn update_dispatches_messages() {
        let clock = ManualClock::new();
        let mut pane = ready_pane(&clock).await;
        pane.update(SwiperMessage::ViewportResized(800.0)).unwrap();
        assert_eq!(pane.viewport_px(), 800.0);

        pane.update(SwiperMessage::ScrollTo(1_500.0)).unwrap();
        assert_eq!(pane.offset_px(), 1_500.0);

        pane.update(SwiperMessage::Recenter).unwrap();
        assert_eq!(pane.offset_px(), 2_100.0);

        pane.update(SwiperMessage::Reset).unwrap();
        assert_eq!(pane.state(), &SwiperState::new());
    }
}
