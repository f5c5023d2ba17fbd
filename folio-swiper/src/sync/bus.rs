use std::collections::HashMap;
use std::sync::Arc;

use folio_model::{GroupId, LayerId, SyncEvent};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use super::{SyncConfig, SyncLink, SyncRoutes};

#[derive(Debug)]
struct GroupSlot {
    sender: broadcast::Sender<SyncEvent>,
    subscribers: usize,
}

/// Registry of sync groups. Cloning shares the registry.
///
/// A group exists while it has at least one subscription; it is created by
/// the first [`SyncBus::subscribe`] and removed when the last
/// [`SyncSubscription`] drops. Each group fans out over its own broadcast
/// channel, so groups never cross-talk.
#[derive(Debug, Clone)]
pub struct SyncBus {
    groups: Arc<Mutex<HashMap<GroupId, GroupSlot>>>,
    cfg: SyncConfig,
}

impl Default for SyncBus {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}

impl SyncBus {
    pub fn new(cfg: SyncConfig) -> Self {
        Self {
            groups: Arc::new(Mutex::new(HashMap::new())),
            cfg,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.cfg
    }

    pub fn publisher(&self, group: GroupId, layer: LayerId) -> SyncPublisher {
        SyncPublisher {
            bus: self.clone(),
            group,
            layer,
            last_emit_ms: None,
        }
    }

    pub fn subscribe(
        &self,
        group: GroupId,
        layer: LayerId,
        routes: SyncRoutes,
    ) -> SyncSubscription {
        let receiver = {
            let mut groups = self.groups.lock();
            let slot = groups.entry(group.clone()).or_insert_with(|| {
                log::debug!("sync group {group} created");
                GroupSlot {
                    sender: broadcast::channel(self.cfg.channel_capacity).0,
                    subscribers: 0,
                }
            });
            slot.subscribers += 1;
            slot.sender.subscribe()
        };

        SyncSubscription {
            bus: self.clone(),
            group,
            layer,
            routes,
            receiver,
            stats: SyncStats::default(),
        }
    }

    /// Publisher and subscription for one layer.
    pub fn link(
        &self,
        group: GroupId,
        layer: LayerId,
        routes: SyncRoutes,
    ) -> SyncLink {
        SyncLink {
            publisher: self.publisher(group.clone(), layer.clone()),
            subscription: self.subscribe(group, layer, routes),
            apply_mode: self.cfg.apply_mode,
        }
    }

    /// Fan an event out to its group. Returns the number of receivers.
    pub fn publish(&self, event: SyncEvent) -> usize {
        let groups = self.groups.lock();
        match groups.get(&event.group_id) {
            Some(slot) => slot.sender.send(event).unwrap_or(0),
            None => {
                log::trace!("sync group {} has no subscribers", event.group_id);
                0
            }
        }
    }

    pub fn group_count(&self) -> usize {
        self.groups.lock().len()
    }

    pub fn subscriber_count(&self, group: &GroupId) -> usize {
        self.groups
            .lock()
            .get(group)
            .map(|slot| slot.subscribers)
            .unwrap_or(0)
    }

    fn leave(&self, group: &GroupId) {
        let mut groups = self.groups.lock();
        let Some(slot) = groups.get_mut(group) else {
            return;
        };
        slot.subscribers = slot.subscribers.saturating_sub(1);
        if slot.subscribers == 0 {
            groups.remove(group);
            log::debug!("sync group {group} removed");
        }
    }
}

/// Throttled emitter for one layer's local input.
#[derive(Debug)]
pub struct SyncPublisher {
    bus: SyncBus,
    group: GroupId,
    layer: LayerId,
    last_emit_ms: Option<u64>,
}

impl SyncPublisher {
    pub fn layer(&self) -> &LayerId {
        &self.layer
    }

    /// Publish `delta_px` stamped with `now_ms`. Returns `false` when the
    /// emit was throttled or the delta carries no motion.
    pub fn emit(&mut self, delta_px: f64, now_ms: u64) -> bool {
        if delta_px == 0.0 || !delta_px.is_finite() {
            return false;
        }

        let interval = self.bus.cfg.min_emit_interval_ms;
        if self
            .last_emit_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < interval)
        {
            log::trace!("[{}] sync emit throttled", self.layer);
            return false;
        }

        self.bus.publish(SyncEvent {
            delta_px,
            source_id: self.layer.clone(),
            timestamp_ms: now_ms,
            group_id: self.group.clone(),
        });
        self.last_emit_ms = Some(now_ms);
        true
    }
}

/// Counters of what a subscription filtered out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub delivered: u64,
    pub self_echo: u64,
    pub stale: u64,
    pub unrouted: u64,
    pub lagged: u64,
}

/// Receiving side of one layer. Leaves the group on drop.
#[derive(Debug)]
pub struct SyncSubscription {
    bus: SyncBus,
    group: GroupId,
    layer: LayerId,
    routes: SyncRoutes,
    receiver: broadcast::Receiver<SyncEvent>,
    stats: SyncStats,
}

impl SyncSubscription {
    pub fn layer(&self) -> &LayerId {
        &self.layer
    }

    pub fn group(&self) -> &GroupId {
        &self.group
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Drain everything received so far, returning the routed deltas in
    /// arrival order.
    pub fn drain(&mut self, now_ms: u64) -> Vec<f64> {
        let mut deltas = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if let Some(delta) = self.route(&event, now_ms) {
                        deltas.push(delta);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    log::warn!(
                        "[{}] sync receiver lagged, skipped {skipped} events",
                        self.layer
                    );
                    self.stats.lagged += skipped;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        deltas
    }

    fn route(&mut self, event: &SyncEvent, now_ms: u64) -> Option<f64> {
        if event.source_id == self.layer {
            self.stats.self_echo += 1;
            return None;
        }

        let age = event.age_ms(now_ms);
        if age > self.bus.cfg.stale_after_ms {
            log::debug!(
                "[{}] stale sync event from {} ({age}ms old)",
                self.layer,
                event.source_id
            );
            self.stats.stale += 1;
            return None;
        }

        let Some(direction) = self.routes.resolve(&event.source_id) else {
            log::trace!("[{}] no route from {}", self.layer, event.source_id);
            self.stats.unrouted += 1;
            return None;
        };

        self.stats.delivered += 1;
        Some(direction.apply(event.delta_px))
    }
}

impl Drop for SyncSubscription {
    fn drop(&mut self) {
        self.bus.leave(&self.group);
    }
}
