//! Inertial scroll engine
//!
//! Discrete exponential decay driven by the animation-frame clock: every
//! impulse adds `delta * gain` to the velocity, every frame moves the offset
//! by the velocity and multiplies it by `damping` until it falls under the
//! floor.

use crate::boundary::ScrollMetrics;
use crate::infra::constants::inertia as defaults;
use crate::infra::runtime_config::SwiperConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaConfig {
    /// Fraction of an impulse added to the velocity.
    pub gain: f64,
    /// Per-frame velocity multiplier, in (0, 1).
    pub damping: f64,
    /// Velocity magnitude (px/frame) under which the loop stops.
    pub floor: f64,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            gain: defaults::GAIN,
            damping: defaults::DAMPING,
            floor: defaults::VELOCITY_FLOOR,
        }
    }
}

impl InertiaConfig {
    pub fn from_swiper_config(config: &SwiperConfig) -> Self {
        Self {
            gain: config.inertia_gain(),
            damping: config.inertia_damping(),
            floor: config.inertia_floor(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct InertiaEngine {
    cfg: InertiaConfig,
    /// Signed velocity in px per frame
    velocity: f64,
    /// Whether the frame loop is running
    running: bool,
}

impl InertiaEngine {
    pub fn new(cfg: InertiaConfig) -> Self {
        Self {
            cfg,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &InertiaConfig {
        &self.cfg
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Accumulate an impulse. Returns `true` when this started the loop.
    pub fn add_impulse(&mut self, delta_px: f64) -> bool {
        if !delta_px.is_finite() {
            return false;
        }
        self.velocity += delta_px * self.cfg.gain;
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Advance one frame from `offset`, returning the new offset while the
    /// loop is running.
    pub fn step(&mut self, offset: f64) -> Option<f64> {
        if !self.running {
            return None;
        }

        let next = offset + self.velocity;
        self.velocity *= self.cfg.damping;

        if self.velocity.abs() < self.cfg.floor {
            self.velocity = 0.0;
            self.running = false;
        }

        Some(next)
    }

    /// Stop immediately.
    pub fn cancel(&mut self) {
        self.velocity = 0.0;
        self.running = false;
    }

    /// Cancel motion and return the midpoint of the scrollable range.
    pub fn recenter(&mut self, metrics: &ScrollMetrics) -> f64 {
        self.cancel();
        metrics.max_offset() / 2.0
    }
}
