use std::fmt::{self, Display};
use std::sync::Arc;

use folio_model::{MediaItem, MediaSet};
use serde::Serialize;

use crate::error::{Result, SwiperError};

/// Bootstrap stage of a pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Preloading the media collection
    #[default]
    Loading,
    /// Synthesizing the initial window of sets
    Layout,
    /// Waiting to read the rendered height of the first set
    Measuring,
    /// Height known; boundary markers are being made visible
    Boundaries,
    /// Steady state: detection and recycling are live
    Ready,
    /// Bootstrap failed; only `reset()` leaves this stage
    Error,
}

impl Stage {
    /// Central transition table. `reset()` bypasses it on purpose: it is
    /// the single way back to [`Stage::Loading`].
    pub fn can_transition_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Loading, Stage::Layout)
                | (Stage::Loading, Stage::Error)
                | (Stage::Layout, Stage::Measuring)
                | (Stage::Measuring, Stage::Boundaries)
                | (Stage::Measuring, Stage::Error)
                | (Stage::Boundaries, Stage::Ready)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Loading => "loading",
            Stage::Layout => "layout",
            Stage::Measuring => "measuring",
            Stage::Boundaries => "boundaries",
            Stage::Ready => "ready",
            Stage::Error => "error",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a presentation layer needs to render one pane.
#[derive(Debug, Clone, PartialEq)]
pub struct SwiperState {
    pub stage: Stage,
    /// Height of one set. Measured once per bootstrap and then constant.
    pub set_height_px: f64,
    /// Rendered window, top to bottom
    pub sets: Vec<MediaSet>,
    /// Highest set number handed out so far
    pub set_counter: u64,
    pub boundaries_visible: bool,
    pub error: Option<String>,
    /// Resolved base collection every set repeats
    pub media: Arc<[MediaItem]>,
}

impl Default for SwiperState {
    fn default() -> Self {
        Self {
            stage: Stage::Loading,
            set_height_px: 0.0,
            sets: Vec::new(),
            set_counter: 0,
            boundaries_visible: false,
            error: None,
            media: Arc::from(Vec::new()),
        }
    }
}

impl SwiperState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.stage == Stage::Ready
    }

    /// Total scrollable content height of the window.
    pub fn content_height_px(&self) -> f64 {
        self.sets.len() as f64 * self.set_height_px
    }

    /// Move to `next`, validated against [`Stage::can_transition_to`].
    pub fn advance(&mut self, next: Stage) -> Result<()> {
        if !self.stage.can_transition_to(next) {
            return Err(SwiperError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        self.stage = next;
        Ok(())
    }

    /// Record a user-visible failure and move to [`Stage::Error`].
    pub fn fail(&mut self, error: &SwiperError) -> Result<()> {
        self.advance(Stage::Error)?;
        self.error = Some(error.to_string());
        Ok(())
    }
}
