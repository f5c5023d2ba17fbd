mod common;

use std::sync::Arc;

use common::*;
use folio_model::{MediaItem, PaneSide};
use folio_swiper::swiper::SwiperMessage;
use folio_swiper::{ManualClock, Stage, SwiperError, SwiperPane, SwiperState};

#[tokio::test]
async fn bootstrap_reaches_ready_with_full_window() {
    init_logger();
    let clock = ManualClock::new();
    let mut pane = pane(PaneSide::Left, &clock);

    pane.bootstrap(media(6), &FakePreloader::new()).await.unwrap();
    settle(&mut pane, &clock);

    let state = pane.state();
    assert_eq!(state.sets.len(), 5);
    assert_eq!(state.set_counter, 5);
    assert_eq!(state.set_height_px, SET_HEIGHT);
    assert!(state.boundaries_visible);
    assert!(state.error.is_none());
    assert!(state.sets.iter().all(|set| set.len() == 6));
    assert_eq!(pane.offset_px(), (5.0 * SET_HEIGHT - VIEWPORT) / 2.0);
}

#[tokio::test]
async fn videos_are_not_preloaded() {
    let clock = ManualClock::new();
    let mut pane = pane(PaneSide::Right, &clock);
    let preloader = FakePreloader::new();
    let items = vec![
        MediaItem::image("/media/a.webp"),
        MediaItem::video("/media/b.mp4"),
        MediaItem::image("/media/c.webp"),
    ];

    pane.bootstrap(items, &preloader).await.unwrap();

    let mut calls = preloader.calls();
    calls.sort();
    assert_eq!(calls, vec!["/media/a.webp", "/media/c.webp"]);
    assert_eq!(pane.state().stage, Stage::Measuring);
}

#[tokio::test]
async fn preload_failure_is_reported_in_state() {
    init_logger();
    let clock = ManualClock::new();
    let mut pane = pane(PaneSide::Left, &clock);
    let preloader = FakePreloader::failing_on(&["/media/work-2.webp"]);

    pane.bootstrap(media(4), &preloader).await.unwrap();

    let state = pane.state();
    assert_eq!(state.stage, Stage::Error);
    assert!(state.sets.is_empty());
    let message = state.error.as_deref().unwrap();
    assert!(message.contains("item 2"), "unexpected message: {message}");
    assert!(message.contains("/media/work-2.webp"));

    // frames and commits do nothing in the error stage
    pane.commit();
    clock.advance_ms(1_000);
    pane.frame();
    assert_eq!(pane.state().stage, Stage::Error);
    assert!(!pane.add_impulse(30.0));
}

#[tokio::test]
async fn empty_collection_is_an_error() {
    let clock = ManualClock::new();
    let mut pane = pane(PaneSide::Left, &clock);
    let result = pane.begin_bootstrap(Vec::new());
    match result {
        Err(SwiperError::EmptyCollection) => {}
        other => panic!("expected EmptyCollection, got {other:?}"),
    }
    assert_eq!(pane.state().stage, Stage::Error);
    assert_eq!(pane.state().error.as_deref(), Some("no media to display"));
}

#[tokio::test]
async fn missing_anchor_fails_measurement() {
    let clock = ManualClock::new();
    let mut pane = SwiperPane::new(
        PaneSide::Left,
        &config(),
        Arc::new(clock.clone()),
        Box::new(FixedProbe(None)),
    );
    pane.bootstrap(media(3), &FakePreloader::new()).await.unwrap();
    pane.commit();
    clock.advance_ms(100);
    pane.frame();

    assert_eq!(pane.state().stage, Stage::Error);
    let message = pane.state().error.clone().unwrap();
    assert!(message.contains("set-left-1"), "unexpected message: {message}");
}

#[tokio::test]
async fn zero_height_fails_measurement() {
    let clock = ManualClock::new();
    let mut pane = SwiperPane::new(
        PaneSide::Right,
        &config(),
        Arc::new(clock.clone()),
        Box::new(FixedProbe(Some(0.0))),
    );
    pane.bootstrap(media(3), &FakePreloader::new()).await.unwrap();
    pane.commit();
    clock.advance_ms(100);
    pane.frame();
    assert_eq!(pane.state().stage, Stage::Error);
}

#[tokio::test]
async fn retry_recovers_after_failure() {
    let clock = ManualClock::new();
    let mut pane = pane(PaneSide::Left, &clock);
    pane.bootstrap(
        media(4),
        &FakePreloader::failing_on(&["/media/work-0.webp"]),
    )
    .await
    .unwrap();
    assert_eq!(pane.state().stage, Stage::Error);

    pane.retry_with(&FakePreloader::new()).await.unwrap();
    settle(&mut pane, &clock);
    assert!(pane.state().error.is_none());
    assert_eq!(pane.state().media.len(), 4);
}

#[tokio::test]
async fn reset_orphans_running_preload() {
    let clock = ManualClock::new();
    let mut pane = pane(PaneSide::Left, &clock);
    let job = pane.begin_bootstrap(media(2)).unwrap();

    pane.reset();
    let outcome = job.run(&FakePreloader::new()).await;
    pane.complete_preload(outcome).unwrap();
    assert_eq!(pane.state(), &SwiperState::new());

    pane.reset();
    pane.reset();
    assert_eq!(pane.state(), &SwiperState::new());
}

#[tokio::test]
async fn preload_outcome_can_arrive_as_message() {
    let clock = ManualClock::new();
    let mut pane = pane(PaneSide::Left, &clock);
    let job = pane.begin_bootstrap(media(2)).unwrap();
    let outcome = job.run(&FakePreloader::new()).await;

    pane.update(SwiperMessage::PreloadFinished(outcome)).unwrap();
    pane.update(SwiperMessage::Committed).unwrap();
    clock.advance_ms(100);
    pane.update(SwiperMessage::Frame).unwrap();
    assert_eq!(pane.state().stage, Stage::Ready);
}

#[tokio::test]
async fn unmount_is_final_and_idempotent() {
    let clock = ManualClock::new();
    let mut pane = pane(PaneSide::Left, &clock);
    let job = pane.begin_bootstrap(media(2)).unwrap();

    pane.unmount();
    pane.unmount();

    let outcome = job.run(&FakePreloader::new()).await;
    match pane.complete_preload(outcome) {
        Err(SwiperError::Unmounted) => {}
        other => panic!("expected Unmounted, got {other:?}"),
    }
    assert_eq!(pane.state().stage, Stage::Loading);
    assert!(pane.next_deadline().is_none());
}
