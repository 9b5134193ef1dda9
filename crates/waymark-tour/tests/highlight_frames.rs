#![forbid(unsafe_code)]

//! Frame-by-frame highlight behavior through `Tour::tick`.
//!
//! Run:
//!   cargo test -p waymark-tour --test highlight_frames

use waymark_core::{CutoutGeometry, ElementId, Rect};
use waymark_harness::{Clock, Effect, FakeDocument};
use waymark_tour::{PanelContent, ScrollBehavior, Side, StepDefinition, Tour, TourConfig};

const A: Rect = Rect::new(100.0, 100.0, 100.0, 40.0);
const B: Rect = Rect::new(400.0, 200.0, 100.0, 40.0);

fn tour(config: TourConfig) -> (Tour<FakeDocument>, ElementId, ElementId) {
    let mut doc = FakeDocument::default();
    let a = doc.add("#a", A);
    let b = doc.add("#b", B);
    let tour = Tour::new(doc, config).with_steps(vec![
        StepDefinition::new("#a").with_panel(PanelContent::new("A")),
        StepDefinition::new("#b").with_panel(PanelContent::new("B")),
    ]);
    (tour, a, b)
}

#[test]
fn first_highlight_snaps_then_eases_to_the_next_target() {
    let (mut tour, _, b) = tour(TourConfig::default());
    let mut clock = Clock::new();
    let at_a = CutoutGeometry::from_rect(A, 10.0, 5.0);
    let at_b = CutoutGeometry::from_rect(B, 10.0, 5.0);

    tour.start(0);
    assert!(tour.env().overlays().is_empty());
    tour.tick(clock.now());
    assert_eq!(tour.env().last_overlay(), Some(at_a));
    tour.tick(clock.advance(400));
    assert!(!tour.tracker().is_animating());

    tour.next();
    assert_eq!(tour.highlighted_element(), Some(b));
    tour.tick(clock.advance(16));
    assert_eq!(tour.env().last_overlay(), Some(at_a));
    assert!(tour.tracker().is_animating());

    tour.tick(clock.advance(200));
    let mid = tour.env().last_overlay().expect("mid-transition push");
    assert!((mid.x - 250.0).abs() < 1e-9, "{mid:?}");
    assert!((mid.y - 150.0).abs() < 1e-9, "{mid:?}");

    tour.tick(clock.advance(200));
    assert_eq!(tour.env().last_overlay(), Some(at_b));
    assert!(!tour.tracker().is_animating());
}

#[test]
fn animation_off_jumps_straight_to_target() {
    let config = TourConfig {
        animate: false,
        ..TourConfig::default()
    };
    let (mut tour, _, _) = tour(config);
    let mut clock = Clock::new();

    tour.start(0);
    tour.tick(clock.now());
    tour.next();
    tour.tick(clock.advance(16));
    assert_eq!(
        tour.env().last_overlay(),
        Some(CutoutGeometry::from_rect(B, 10.0, 5.0))
    );
    assert!(!tour.tracker().is_animating());
}

#[test]
fn steady_state_only_pushes_on_change() {
    let (mut tour, a, _) = tour(TourConfig::default());
    let mut clock = Clock::new();

    tour.start(0);
    tour.tick(clock.now());
    tour.tick(clock.advance(400));
    let settled = tour.env().overlays().len();

    for _ in 0..5 {
        tour.tick(clock.advance(16));
    }
    assert_eq!(tour.env().overlays().len(), settled);

    let moved = Rect::new(120.0, 300.0, 100.0, 40.0);
    tour.env_mut().set_rect(a, moved);
    tour.tick(clock.advance(16));
    assert_eq!(tour.env().overlays().len(), settled + 1);
    assert_eq!(
        tour.env().last_overlay(),
        Some(CutoutGeometry::from_rect(moved, 10.0, 5.0))
    );
}

#[test]
fn panel_follows_the_cutout() {
    let (mut tour, _, _) = tour(TourConfig::default());
    let mut clock = Clock::new();

    tour.start(0);
    tour.tick(clock.now());
    // Box is 240x120 grown by 10 padding + 10 offset; no room above #a.
    let placement = *tour.env().last_placement().expect("placed");
    assert_eq!(placement.side, Some(Side::Bottom));
    // 800 - (140 + 140)
    assert_eq!(placement.bottom, Some(520.0));
    assert_eq!(placement.left, Some(90.0));
    assert_eq!(
        tour.active_panel().and_then(|panel| panel.placement()).copied(),
        Some(placement)
    );
}

#[test]
fn detached_target_keeps_last_geometry() {
    let (mut tour, a, _) = tour(TourConfig::default());
    let mut clock = Clock::new();

    tour.start(0);
    tour.tick(clock.now());
    tour.tick(clock.advance(400));
    let settled = tour.env().overlays().len();

    tour.env_mut().detach(a);
    tour.tick(clock.advance(16));
    tour.tick(clock.advance(16));
    assert!(tour.is_active());
    assert_eq!(tour.highlighted_element(), Some(a));
    assert_eq!(tour.env().overlays().len(), settled);
    assert_eq!(
        tour.env().last_overlay(),
        Some(CutoutGeometry::from_rect(A, 10.0, 5.0))
    );
}

#[test]
fn scrolls_only_when_outside_viewport() {
    let mut doc = FakeDocument::default();
    let visible = doc.add("#visible", A);
    let below = doc.add("#below", Rect::new(100.0, 1200.0, 100.0, 40.0));
    let pinned = doc.add("#pinned", Rect::new(100.0, 1400.0, 100.0, 40.0));
    let mut tour = Tour::new(doc, TourConfig::default()).with_steps(vec![
        StepDefinition::new("#visible"),
        StepDefinition::new("#below"),
        StepDefinition::new("#pinned").with_scroll(ScrollBehavior::Disabled),
    ]);

    tour.start(0);
    tour.next();
    tour.next();
    assert_eq!(tour.env().scrolled(), vec![below]);
    assert!(
        tour.env()
            .journal()
            .contains(&Effect::Scrolled(below, ScrollBehavior::Smooth))
    );
    assert!(!tour.env().scrolled().contains(&visible));
    assert!(!tour.env().scrolled().contains(&pinned));
}

#[test]
fn superseded_frame_loop_does_not_double_push() {
    let (mut tour, _, _) = tour(TourConfig::default());
    let mut clock = Clock::new();

    tour.start(0);
    tour.next();
    tour.previous();
    // Three highlights, one live loop: one push per tick.
    tour.tick(clock.now());
    assert_eq!(tour.env().overlays().len(), 1);
    tour.tick(clock.advance(16));
    assert_eq!(tour.env().overlays().len(), 2);
    assert!(tour.tracker().has_pending_frame());
}

#[test]
fn reset_stops_the_frame_loop() {
    let (mut tour, _, _) = tour(TourConfig::default());
    let mut clock = Clock::new();

    tour.start(0);
    tour.tick(clock.now());
    tour.reset(true, waymark_tour::ExitReason::Cancel);
    let pushes = tour.env().overlays().len();
    tour.tick(clock.advance(16));
    assert_eq!(tour.env().overlays().len(), pushes);
    assert!(!tour.tracker().has_pending_frame());
    assert_eq!(tour.env().count(&Effect::OverlayUnmounted), 1);
}
