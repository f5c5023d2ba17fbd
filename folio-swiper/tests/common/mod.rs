#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use folio_model::{MarkerId, MediaItem, PaneSide, SetId};
use folio_swiper::boundary::{
    BoundaryMarker, BoundaryObserver, ScrollMetrics, VisibilityChange,
};
use folio_swiper::{
    LayoutProbe, ManualClock, MediaPreloader, PreloadError, Stage, SwiperConfig,
    SwiperPane,
};
use parking_lot::Mutex;

pub const SET_HEIGHT: f64 = 1_000.0;
pub const VIEWPORT: f64 = 600.0;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn media(n: usize) -> Vec<MediaItem> {
    (0..n)
        .map(|i| {
            MediaItem::image(format!("/media/work-{i}.webp"))
                .with_record_id(format!("work-{i}"))
        })
        .collect()
}

pub fn config() -> SwiperConfig {
    SwiperConfig {
        viewport_px: Some(VIEWPORT),
        ..SwiperConfig::default()
    }
}

/// Preloader that fails for a fixed set of URLs and records every call.
#[derive(Debug, Default)]
pub struct FakePreloader {
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakePreloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(urls: &[&str]) -> Self {
        Self {
            failing: urls.iter().map(|u| u.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MediaPreloader for FakePreloader {
    async fn preload(&self, item: &MediaItem) -> Result<(), PreloadError> {
        self.calls.lock().push(item.url.clone());
        if self.failing.contains(&item.url) {
            return Err(PreloadError::NotFound(item.url.clone()));
        }
        Ok(())
    }
}

/// Probe returning the same height for every rendered set.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub Option<f64>);

impl LayoutProbe for FixedProbe {
    fn measure_set_height(&self, _set: &SetId) -> Option<f64> {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct ScriptState {
    pub markers: Vec<BoundaryMarker>,
    pub queued: Vec<VisibilityChange>,
    pub observe_calls: usize,
    pub disconnected: bool,
}

/// Observer fed by the test instead of by geometry.
#[derive(Debug, Clone, Default)]
pub struct ScriptedObserver {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> Arc<Mutex<ScriptState>> {
        Arc::clone(&self.state)
    }
}

impl BoundaryObserver for ScriptedObserver {
    fn observe(
        &mut self,
        markers: &[BoundaryMarker],
        _metrics: &ScrollMetrics,
    ) {
        let mut state = self.state.lock();
        state.markers = markers.to_vec();
        state.observe_calls += 1;
        state.disconnected = false;
    }

    fn take_changes(
        &mut self,
        _metrics: &ScrollMetrics,
    ) -> Vec<VisibilityChange> {
        std::mem::take(&mut self.state.lock().queued)
    }

    fn disconnect(&mut self) {
        let mut state = self.state.lock();
        state.markers.clear();
        state.disconnected = true;
    }
}

pub fn entered(marker: MarkerId) -> VisibilityChange {
    VisibilityChange {
        marker,
        visible: true,
        initial: false,
    }
}

pub fn left_view(marker: MarkerId) -> VisibilityChange {
    VisibilityChange {
        marker,
        visible: false,
        initial: false,
    }
}

pub fn pane(side: PaneSide, clock: &ManualClock) -> SwiperPane {
    SwiperPane::new(
        side,
        &config(),
        Arc::new(clock.clone()),
        Box::new(FixedProbe(Some(SET_HEIGHT))),
    )
}

/// Walk a bootstrapped pane through measurement, centering and arming.
pub fn settle(pane: &mut SwiperPane, clock: &ManualClock) {
    pane.commit();
    clock.advance_ms(100);
    pane.frame();
    pane.commit();
    clock.advance_ms(200);
    pane.frame();
    assert_eq!(pane.state().stage, Stage::Ready);
    assert!(pane.boundaries_armed());
}

/// Set number and in-set offset at the top of the viewport.
pub fn anchor(pane: &SwiperPane) -> (u64, f64) {
    let state = pane.state();
    let index = (pane.offset_px() / state.set_height_px).floor() as usize;
    let set = &state.sets[index.min(state.sets.len() - 1)];
    (
        set.set_number,
        pane.offset_px() - index as f64 * state.set_height_px,
    )
}
