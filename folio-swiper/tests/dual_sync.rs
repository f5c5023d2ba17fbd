mod common;

use std::sync::Arc;

use common::*;
use folio_model::{GroupId, PaneSide};
use folio_swiper::sync::{SyncApplyMode, SyncConfig};
use folio_swiper::{
    Clock, DualSwiper, DualSwiperOptions, ManualClock, SwiperConfig, SyncBus,
    SyncDirection, SyncRoutes,
};

const CENTER: f64 = (5.0 * SET_HEIGHT - VIEWPORT) / 2.0;

async fn ready_dual(
    config: &SwiperConfig,
    options: DualSwiperOptions,
    clock: &ManualClock,
) -> (DualSwiper, SyncBus) {
    let bus = SyncBus::new(SyncConfig::from_swiper_config(config));
    let mut dual = DualSwiper::new(
        config,
        Arc::new(clock.clone()),
        bus.clone(),
        options,
        Box::new(FixedProbe(Some(SET_HEIGHT))),
        Box::new(FixedProbe(Some(SET_HEIGHT))),
    );
    dual.bootstrap(media(4), &FakePreloader::new()).await.unwrap();

    dual.commit();
    clock.advance_ms(100);
    dual.frame();
    dual.commit();
    clock.advance_ms(200);
    dual.frame();

    for side in PaneSide::ALL {
        assert!(dual.pane(side).boundaries_armed(), "{side} not armed");
        assert_eq!(dual.pane(side).offset_px(), CENTER);
    }
    (dual, bus)
}

#[tokio::test]
async fn reverse_sync_mirrors_wheel_delta() {
    init_logger();
    let clock = ManualClock::new();
    let (mut dual, _bus) =
        ready_dual(&config(), DualSwiperOptions::default(), &clock).await;

    assert!(dual.wheel(PaneSide::Left, 40.0));
    dual.frame();

    assert_eq!(dual.right().offset_px(), CENTER - 40.0);
    // the left pane only follows its own inertia, never its echo
    assert_eq!(dual.left().offset_px(), CENTER + 16.0);
}

#[tokio::test]
async fn same_direction_route_follows_source() {
    let clock = ManualClock::new();
    let options = DualSwiperOptions {
        left_to_right: SyncDirection::Same,
        ..DualSwiperOptions::default()
    };
    let (mut dual, _bus) = ready_dual(&config(), options, &clock).await;

    dual.wheel(PaneSide::Left, 40.0);
    dual.frame();
    assert_eq!(dual.right().offset_px(), CENTER + 40.0);

    // right -> left keeps the default reverse route
    clock.advance_ms(400);
    dual.frame();
    let left = dual.left().offset_px();
    let drift = dual.left().velocity();
    dual.wheel(PaneSide::Right, 30.0);
    dual.frame();
    assert_eq!(dual.left().offset_px(), left - 30.0 + drift);
}

#[tokio::test]
async fn native_scroll_is_mirrored_and_noops_publish_nothing() {
    let clock = ManualClock::new();
    let (mut dual, bus) =
        ready_dual(&config(), DualSwiperOptions::default(), &clock).await;
    let mut overlay = bus.subscribe(
        GroupId::default(),
        "overlay".into(),
        SyncRoutes::new().with_default(SyncDirection::Same),
    );

    dual.pane_mut(PaneSide::Left).scroll_to(CENTER + 30.0);
    assert_eq!(overlay.drain(clock.unix_ms()), vec![30.0]);
    dual.frame();
    assert_eq!(dual.right().offset_px(), CENTER - 30.0);

    clock.advance_ms(20);
    dual.pane_mut(PaneSide::Left).scroll_to(CENTER + 30.0);
    assert!(overlay.drain(clock.unix_ms()).is_empty());

    let max = dual.left().metrics().max_offset();
    clock.advance_ms(20);
    assert_eq!(dual.pane_mut(PaneSide::Left).scroll_to(10_000.0), max);
    assert_eq!(
        overlay.drain(clock.unix_ms()),
        vec![max - (CENTER + 30.0)]
    );

    // already at the bottom: the clamp leaves nothing to publish
    clock.advance_ms(20);
    assert_eq!(dual.pane_mut(PaneSide::Left).scroll_to(20_000.0), max);
    assert!(overlay.drain(clock.unix_ms()).is_empty());
}

#[tokio::test]
async fn throttled_and_stale_events_do_not_move_partner() {
    let clock = ManualClock::new();
    let (mut dual, _bus) =
        ready_dual(&config(), DualSwiperOptions::default(), &clock).await;

    dual.wheel(PaneSide::Left, 40.0);
    dual.wheel(PaneSide::Left, 40.0);
    dual.frame();
    assert_eq!(dual.right().offset_px(), CENTER - 40.0);

    clock.advance_ms(20);
    dual.wheel(PaneSide::Left, 40.0);
    clock.advance_ms(150);
    let right = dual.right().offset_px();
    dual.frame();
    assert_eq!(dual.right().offset_px(), right);
}

#[tokio::test]
async fn impulse_mode_feeds_partner_inertia() {
    let clock = ManualClock::new();
    let config = SwiperConfig {
        sync_apply_mode: Some(SyncApplyMode::Impulse),
        ..config()
    };
    let (mut dual, _bus) =
        ready_dual(&config, DualSwiperOptions::default(), &clock).await;

    dual.wheel(PaneSide::Left, 40.0);
    dual.frame();
    assert_eq!(dual.right().offset_px(), CENTER - 16.0);
    assert!(dual.right().velocity() < 0.0);
}

#[tokio::test]
async fn unmount_leaves_the_group() {
    let clock = ManualClock::new();
    let options = DualSwiperOptions {
        group: GroupId::new("works"),
        ..DualSwiperOptions::default()
    };
    let (mut dual, bus) = ready_dual(&config(), options, &clock).await;
    assert_eq!(bus.subscriber_count(&GroupId::new("works")), 2);

    dual.unmount();
    assert_eq!(bus.group_count(), 0);
    assert!(!dual.wheel(PaneSide::Left, 40.0));
}
