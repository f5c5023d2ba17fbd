use crate::ids::{GroupId, LayerId};

/// Scroll delta broadcast from one layer to the rest of its sync group.
/// Transient: published and consumed within roughly one hundred
/// milliseconds, never persisted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncEvent {
    pub delta_px: f64,
    pub source_id: LayerId,
    /// Wall-clock milliseconds since the Unix epoch at publish time
    pub timestamp_ms: u64,
    pub group_id: GroupId,
}

impl SyncEvent {
    /// Milliseconds elapsed between publish and `now_ms`. Events stamped in
    /// the future report zero.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.timestamp_ms)
    }
}
