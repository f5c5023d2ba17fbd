//! Two panes wired to one sync group.

use std::sync::Arc;

use folio_model::{GroupId, LayerId, MediaItem, PaneSide};

use crate::capabilities::{LayoutProbe, MediaPreloader};
use crate::error::Result;
use crate::infra::constants::sync as defaults;
use crate::infra::runtime_config::SwiperConfig;
use crate::infra::time::Clock;
use crate::swiper::SwiperPane;
use crate::sync::{SyncBus, SyncDirection, SyncRoutes};

#[derive(Debug, Clone, PartialEq)]
pub struct DualSwiperOptions {
    pub group: GroupId,
    /// How the right pane follows the left one.
    pub left_to_right: SyncDirection,
    /// How the left pane follows the right one.
    pub right_to_left: SyncDirection,
}

impl Default for DualSwiperOptions {
    fn default() -> Self {
        Self {
            group: GroupId::new(defaults::DEFAULT_GROUP),
            left_to_right: SyncDirection::Reverse,
            right_to_left: SyncDirection::Reverse,
        }
    }
}

/// Left and right gallery panes scrolling against each other.
#[derive(Debug)]
pub struct DualSwiper {
    left: SwiperPane,
    right: SwiperPane,
    bus: SyncBus,
}

impl DualSwiper {
    pub fn new(
        config: &SwiperConfig,
        clock: Arc<dyn Clock>,
        bus: SyncBus,
        options: DualSwiperOptions,
        left_probe: Box<dyn LayoutProbe>,
        right_probe: Box<dyn LayoutProbe>,
    ) -> Self {
        let left_layer = LayerId::from(PaneSide::Left);
        let right_layer = LayerId::from(PaneSide::Right);

        let left = SwiperPane::new(
            PaneSide::Left,
            config,
            Arc::clone(&clock),
            left_probe,
        )
        .with_sync(bus.link(
            options.group.clone(),
            left_layer.clone(),
            SyncRoutes::new()
                .with_route(right_layer.clone(), options.right_to_left),
        ));

        let right = SwiperPane::new(PaneSide::Right, config, clock, right_probe)
            .with_sync(bus.link(
                options.group,
                right_layer,
                SyncRoutes::new().with_route(left_layer, options.left_to_right),
            ));

        Self { left, right, bus }
    }

    pub fn left(&self) -> &SwiperPane {
        &self.left
    }

    pub fn right(&self) -> &SwiperPane {
        &self.right
    }

    pub fn pane(&self, side: PaneSide) -> &SwiperPane {
        match side {
            PaneSide::Left => &self.left,
            PaneSide::Right => &self.right,
        }
    }

    pub fn pane_mut(&mut self, side: PaneSide) -> &mut SwiperPane {
        match side {
            PaneSide::Left => &mut self.left,
            PaneSide::Right => &mut self.right,
        }
    }

    pub fn bus(&self) -> &SyncBus {
        &self.bus
    }

    /// Wheel input on one pane; the other follows through the bus.
    pub fn wheel(&mut self, side: PaneSide, delta_px: f64) -> bool {
        self.pane_mut(side).add_impulse(delta_px)
    }

    pub fn frame(&mut self) {
        self.left.frame();
        self.right.frame();
    }

    pub fn commit(&mut self) {
        self.left.commit();
        self.right.commit();
    }

    /// Bootstrap both panes concurrently with the same media.
    pub async fn bootstrap(
        &mut self,
        items: Vec<MediaItem>,
        preloader: &dyn MediaPreloader,
    ) -> Result<()> {
        let (left, right) = futures::join!(
            self.left.bootstrap(items.clone(), preloader),
            self.right.bootstrap(items, preloader),
        );
        left?;
        right
    }

    pub fn unmount(&mut self) {
        self.left.unmount();
        self.right.unmount();
    }
}
