//! Runtime configuration for swiper tunables
//!
//! [`SwiperConfig`] holds `Option<T>` overrides for the compiled constants.
//! Accessor methods fall back to [`crate::infra::constants`] when a field is
//! `None`, and each component derives its own config struct from it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::infra::constants::{
    bootstrap, boundary, gesture, inertia, recycle, sync, window,
};
use crate::swiper::recycle::PendingPolicy;
use crate::sync::SyncApplyMode;

/// Swiper configuration with optional overrides for constants.
/// Fields are None by default, falling back to compiled constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwiperConfig {
    // ========== WINDOW ==========
    /// Sets rendered per pane
    pub set_count: Option<usize>,
    /// Viewport height until the host reports one (px)
    pub viewport_px: Option<f64>,

    // ========== BOOTSTRAP ==========
    /// Delay between layout commit and measurement (ms)
    pub measure_defer_ms: Option<u64>,
    /// Delay between centering and arming detection (ms)
    pub settle_ms: Option<u64>,

    // ========== BOUNDARIES ==========
    pub cooldown_ms: Option<u64>,
    pub streak_window_ms: Option<u64>,
    pub max_consecutive: Option<u32>,
    pub penalty_ms: Option<u64>,
    pub edge_proximity_px: Option<f64>,
    pub root_margin_px: Option<f64>,
    pub seam_suppress_ms: Option<u64>,

    // ========== RECYCLE ==========
    /// In-flight token lifetime (ms)
    pub release_ms: Option<u64>,
    /// What happens to crossings that arrive mid-recycle
    pub pending_policy: Option<PendingPolicy>,

    // ========== INERTIA ==========
    pub inertia_gain: Option<f64>,
    pub inertia_damping: Option<f64>,
    pub inertia_floor: Option<f64>,

    // ========== SYNC ==========
    pub sync_min_emit_interval_ms: Option<u64>,
    pub sync_stale_after_ms: Option<u64>,
    pub sync_channel_capacity: Option<usize>,
    pub sync_apply_mode: Option<SyncApplyMode>,

    // ========== GESTURE ==========
    pub gesture_idle_ms: Option<u64>,
}

impl SwiperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SwiperConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }

    /// Reject combinations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.set_count() < window::MIN_SET_COUNT {
            return Err(ConfigError::Invalid(format!(
                "set_count must be at least {}, got {}",
                window::MIN_SET_COUNT,
                self.set_count()
            )));
        }

        let damping = self.inertia_damping();
        if !(damping > 0.0 && damping < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "inertia_damping must be in (0, 1), got {damping}"
            )));
        }

        for (name, value) in [
            ("inertia_gain", self.inertia_gain()),
            ("inertia_floor", self.inertia_floor()),
            ("viewport_px", self.viewport_px()),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        if self.cooldown_ms() == 0 {
            return Err(ConfigError::Invalid(
                "cooldown_ms must be non-zero".to_string(),
            ));
        }

        if self.max_consecutive() == 0 {
            return Err(ConfigError::Invalid(
                "max_consecutive must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Render the effective overrides back to TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    // ========== WINDOW ACCESSORS ==========

    pub fn set_count(&self) -> usize {
        self.set_count.unwrap_or(window::SET_COUNT)
    }

    pub fn viewport_px(&self) -> f64 {
        self.viewport_px.unwrap_or(window::DEFAULT_VIEWPORT_PX)
    }

    // ========== BOOTSTRAP ACCESSORS ==========

    pub fn measure_defer_ms(&self) -> u64 {
        self.measure_defer_ms
            .unwrap_or(bootstrap::MEASURE_DEFER_MS)
    }

    pub fn settle_ms(&self) -> u64 {
        self.settle_ms.unwrap_or(bootstrap::SETTLE_MS)
    }

    // ========== BOUNDARY ACCESSORS ==========

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms.unwrap_or(boundary::COOLDOWN_MS)
    }

    pub fn streak_window_ms(&self) -> u64 {
        self.streak_window_ms
            .unwrap_or(boundary::STREAK_WINDOW_MS)
    }

    pub fn max_consecutive(&self) -> u32 {
        self.max_consecutive.unwrap_or(boundary::MAX_CONSECUTIVE)
    }

    pub fn penalty_ms(&self) -> u64 {
        self.penalty_ms.unwrap_or(boundary::PENALTY_MS)
    }

    pub fn edge_proximity_px(&self) -> f64 {
        self.edge_proximity_px
            .unwrap_or(boundary::EDGE_PROXIMITY_PX)
    }

    pub fn root_margin_px(&self) -> f64 {
        self.root_margin_px.unwrap_or(boundary::ROOT_MARGIN_PX)
    }

    pub fn seam_suppress_ms(&self) -> u64 {
        self.seam_suppress_ms
            .unwrap_or(boundary::SEAM_SUPPRESS_MS)
    }

    // ========== RECYCLE ACCESSORS ==========

    pub fn release_ms(&self) -> u64 {
        self.release_ms.unwrap_or(recycle::RELEASE_MS)
    }

    pub fn pending_policy(&self) -> PendingPolicy {
        self.pending_policy.unwrap_or_default()
    }

    // ========== INERTIA ACCESSORS ==========

    pub fn inertia_gain(&self) -> f64 {
        self.inertia_gain.unwrap_or(inertia::GAIN)
    }

    pub fn inertia_damping(&self) -> f64 {
        self.inertia_damping.unwrap_or(inertia::DAMPING)
    }

    pub fn inertia_floor(&self) -> f64 {
        self.inertia_floor.unwrap_or(inertia::VELOCITY_FLOOR)
    }

    // ========== SYNC ACCESSORS ==========

    pub fn sync_min_emit_interval_ms(&self) -> u64 {
        self.sync_min_emit_interval_ms
            .unwrap_or(sync::MIN_EMIT_INTERVAL_MS)
    }

    pub fn sync_stale_after_ms(&self) -> u64 {
        self.sync_stale_after_ms.unwrap_or(sync::STALE_AFTER_MS)
    }

    pub fn sync_channel_capacity(&self) -> usize {
        self.sync_channel_capacity
            .unwrap_or(sync::CHANNEL_CAPACITY)
            .max(1)
    }

    pub fn sync_apply_mode(&self) -> SyncApplyMode {
        self.sync_apply_mode.unwrap_or_default()
    }

    // ========== GESTURE ACCESSORS ==========

    pub fn gesture_idle_ms(&self) -> u64 {
        self.gesture_idle_ms.unwrap_or(gesture::IDLE_MS)
    }
}
