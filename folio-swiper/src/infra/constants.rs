//! Swiper constants
//!
//! Compiled defaults for every tunable. [`super::runtime_config::SwiperConfig`]
//! overrides fall back to these, so tuning should happen here to keep both
//! panes consistent.

/// Window of repeated sets rendered per pane.
pub mod window {
    /// Sets rendered at once after bootstrap.
    pub const SET_COUNT: usize = 5;
    /// Smallest window that still leaves a set on each side of the viewer.
    pub const MIN_SET_COUNT: usize = 3;
    /// Viewport height assumed until the host reports one (px).
    pub const DEFAULT_VIEWPORT_PX: f64 = 800.0;
}

/// Stage pipeline timing.
pub mod bootstrap {
    /// Delay between the layout commit and reading the set height (ms).
    pub const MEASURE_DEFER_MS: u64 = 100;
    /// Delay between centering and arming boundary detection (ms).
    pub const SETTLE_MS: u64 = 200;
}

/// Boundary detection and anti-storm policy.
pub mod boundary {
    /// Per-marker window during which repeated triggers are ignored (ms).
    pub const COOLDOWN_MS: u64 = 500;
    /// Accepted triggers closer together than this extend a streak (ms).
    pub const STREAK_WINDOW_MS: u64 = 1_500;
    /// Streak length that puts a marker into the penalty box.
    pub const MAX_CONSECUTIVE: u32 = 3;
    /// Extended cooldown once the streak cap is hit (ms).
    pub const PENALTY_MS: u64 = 2_000;
    /// Distance from an absolute edge that qualifies an edge marker
    /// regardless of direction (px).
    pub const EDGE_PROXIMITY_PX: f64 = 10.0;
    /// Margin added around the viewport when deciding visibility (px).
    pub const ROOT_MARGIN_PX: f64 = 100.0;
    /// Seams are ignored this long after a recycle starts (ms).
    pub const SEAM_SUPPRESS_MS: u64 = 100;
}

/// Recycle serialization.
pub mod recycle {
    /// In-flight token lifetime after a recycle starts (ms).
    pub const RELEASE_MS: u64 = 200;
}

/// Discrete exponential-decay inertia.
pub mod inertia {
    /// Fraction of each impulse added to the velocity.
    pub const GAIN: f64 = 0.4;
    /// Per-frame velocity multiplier.
    pub const DAMPING: f64 = 0.92;
    /// Velocity magnitude (px/frame) below which motion stops.
    pub const VELOCITY_FLOOR: f64 = 0.1;
}

/// Cross-pane sync.
pub mod sync {
    /// Minimum spacing between emits from one publisher (ms), one frame.
    pub const MIN_EMIT_INTERVAL_MS: u64 = 16;
    /// Received events older than this are discarded (ms).
    pub const STALE_AFTER_MS: u64 = 100;
    /// Broadcast buffer per group.
    pub const CHANNEL_CAPACITY: usize = 64;
    /// Group joined by the dual swiper when none is configured.
    pub const DEFAULT_GROUP: &str = "main";
}

/// Wheel gesture bookkeeping.
pub mod gesture {
    /// Input idle time after which a gesture is considered finished (ms).
    pub const IDLE_MS: u64 = 150;
}
