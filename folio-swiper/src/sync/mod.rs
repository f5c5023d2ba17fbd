//! Cross-pane scroll synchronization.
//!
//! A [`SyncBus`] is an explicitly constructed registry of sync groups. Each
//! layer in a group gets a [`SyncPublisher`] for its own input and a
//! [`SyncSubscription`] that yields the routed deltas of the other layers.

pub mod bus;

use std::collections::HashMap;

use folio_model::LayerId;
use serde::{Deserialize, Serialize};

use crate::infra::constants::sync as defaults;
use crate::infra::runtime_config::SwiperConfig;

pub use bus::{SyncBus, SyncPublisher, SyncSubscription};

/// How a received delta is applied relative to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    Same,
    Reverse,
}

impl SyncDirection {
    pub fn apply(self, delta_px: f64) -> f64 {
        match self {
            SyncDirection::Same => delta_px,
            SyncDirection::Reverse => -delta_px,
        }
    }
}

/// How a pane applies the deltas it receives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncApplyMode {
    /// Move the scroll offset directly
    #[default]
    Offset,
    /// Feed the delta into the inertia engine like local wheel input
    Impulse,
}

/// Per-source direction table of one subscriber.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncRoutes {
    routes: HashMap<LayerId, SyncDirection>,
    fallback: Option<SyncDirection>,
}

impl SyncRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(
        mut self,
        source: impl Into<LayerId>,
        direction: SyncDirection,
    ) -> Self {
        self.routes.insert(source.into(), direction);
        self
    }

    /// Direction used for sources without an explicit route.
    pub fn with_default(mut self, direction: SyncDirection) -> Self {
        self.fallback = Some(direction);
        self
    }

    pub fn resolve(&self, source: &LayerId) -> Option<SyncDirection> {
        self.routes.get(source).copied().or(self.fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncConfig {
    /// Minimum spacing between two emits of one publisher.
    pub min_emit_interval_ms: u64,
    /// Events older than this on receipt are discarded.
    pub stale_after_ms: u64,
    pub channel_capacity: usize,
    pub apply_mode: SyncApplyMode,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            min_emit_interval_ms: defaults::MIN_EMIT_INTERVAL_MS,
            stale_after_ms: defaults::STALE_AFTER_MS,
            channel_capacity: defaults::CHANNEL_CAPACITY,
            apply_mode: SyncApplyMode::default(),
        }
    }
}

impl SyncConfig {
    pub fn from_swiper_config(config: &SwiperConfig) -> Self {
        Self {
            min_emit_interval_ms: config.sync_min_emit_interval_ms(),
            stale_after_ms: config.sync_stale_after_ms(),
            channel_capacity: config.sync_channel_capacity(),
            apply_mode: config.sync_apply_mode(),
        }
    }
}

/// A pane's membership in a sync group.
#[derive(Debug)]
pub struct SyncLink {
    pub publisher: SyncPublisher,
    pub subscription: SyncSubscription,
    pub apply_mode: SyncApplyMode,
}
