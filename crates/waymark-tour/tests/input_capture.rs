#![forbid(unsafe_code)]

//! Keyboard and pointer handling while a tour is active.
//!
//! Run:
//!   cargo test -p waymark-tour --test input_capture

use waymark_core::{
    ElementId, Event, Hit, KeyCode, KeyEvent, KeyEventKind, PanelButton, PointerEvent,
    PointerKind, Point, Rect, Size,
};
use waymark_harness::{Clock, FakeDocument};
use waymark_tour::{
    ButtonVisibility, PanelContent, Propagation, StepDefinition, StrictClick, Tour, TourConfig,
};

struct Fixture {
    tour: Tour<FakeDocument>,
    target: ElementId,
    child: ElementId,
    other: ElementId,
}

fn fixture(config: TourConfig, steps: impl FnOnce(&str) -> Vec<StepDefinition>) -> Fixture {
    let mut doc = FakeDocument::default();
    let target = doc.add("#form", Rect::new(100.0, 100.0, 300.0, 200.0));
    let child = doc.add_child(target, "#form-submit", Rect::new(120.0, 250.0, 80.0, 30.0));
    let other = doc.add("#sidebar", Rect::new(900.0, 100.0, 200.0, 500.0));
    let mut tour = Tour::new(doc, config).with_steps(steps("#form"));
    tour.start(0);
    Fixture {
        tour,
        target,
        child,
        other,
    }
}

fn two_steps(first: &str) -> Vec<StepDefinition> {
    vec![
        StepDefinition::new(first).with_panel(PanelContent::new("Form")),
        StepDefinition::new("#sidebar").with_panel(PanelContent::new("Sidebar")),
    ]
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code))
}

fn click(hit: Hit) -> Event {
    Event::Pointer(PointerEvent::click(hit))
}

// ============================================================================
// Idle
// ============================================================================

#[test]
fn idle_tour_passes_everything_through() {
    let mut tour = Tour::new(FakeDocument::default(), TourConfig::default());
    assert_eq!(tour.handle_event(&key(KeyCode::Escape)), Propagation::Continue);
    assert_eq!(tour.handle_event(&click(Hit::Overlay)), Propagation::Continue);
    assert!(tour.env().journal().is_empty());
}

// ============================================================================
// Keyboard
// ============================================================================

#[test]
fn arrow_keys_navigate() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), two_steps);

    assert_eq!(tour.handle_event(&key(KeyCode::Right)), Propagation::Stop);
    assert_eq!(tour.current_index(), Some(1));
    assert_eq!(tour.handle_event(&key(KeyCode::Up)), Propagation::Stop);
    assert_eq!(tour.current_index(), Some(0));
    assert_eq!(tour.handle_event(&key(KeyCode::Down)), Propagation::Stop);
    assert_eq!(tour.current_index(), Some(1));
    assert_eq!(tour.handle_event(&key(KeyCode::Left)), Propagation::Stop);
    assert_eq!(tour.current_index(), Some(0));
}

#[test]
fn key_release_and_other_keys_pass_through() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), two_steps);

    let release = Event::Key(KeyEvent::new(KeyCode::Right).with_kind(KeyEventKind::Release));
    assert_eq!(tour.handle_event(&release), Propagation::Continue);
    assert_eq!(tour.handle_event(&key(KeyCode::Char('x'))), Propagation::Continue);
    assert_eq!(tour.current_index(), Some(0));
}

#[test]
fn escape_cancels_when_allowed() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), two_steps);
    assert_eq!(tour.handle_event(&key(KeyCode::Escape)), Propagation::Stop);
    assert!(!tour.is_active());

    let config = TourConfig {
        allow_outside_click_close: false,
        ..TourConfig::default()
    };
    let Fixture { mut tour, .. } = fixture(config, two_steps);
    assert_eq!(tour.handle_event(&key(KeyCode::Escape)), Propagation::Continue);
    assert!(tour.is_active());
}

#[test]
fn keyboard_control_off_ignores_keys() {
    let config = TourConfig {
        keyboard_control: false,
        ..TourConfig::default()
    };
    let Fixture { mut tour, .. } = fixture(config, two_steps);

    assert_eq!(tour.handle_event(&key(KeyCode::Right)), Propagation::Continue);
    assert_eq!(tour.handle_event(&key(KeyCode::Escape)), Propagation::Continue);
    assert_eq!(tour.current_index(), Some(0));
    assert!(tour.is_active());
}

#[test]
fn keys_respect_button_whitelist() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), |first| {
        vec![
            StepDefinition::new(first).with_panel(
                PanelContent::new("Form")
                    .with_show_buttons(ButtonVisibility::Only(vec![PanelButton::Close])),
            ),
            StepDefinition::new("#sidebar"),
        ]
    });

    assert_eq!(tour.handle_event(&key(KeyCode::Right)), Propagation::Continue);
    assert_eq!(tour.current_index(), Some(0));
}

#[test]
fn keys_respect_disabled_buttons() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), |first| {
        vec![
            StepDefinition::new(first)
                .with_panel(PanelContent::new("Form").with_disabled_buttons([PanelButton::Next])),
            StepDefinition::new("#sidebar"),
        ]
    });

    assert_eq!(tour.handle_event(&key(KeyCode::Right)), Propagation::Continue);
    assert_eq!(tour.current_index(), Some(0));
}

// ============================================================================
// Panel and overlay
// ============================================================================

#[test]
fn panel_buttons_drive_the_tour() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), two_steps);

    // Previous is disabled on the first step.
    assert_eq!(
        tour.handle_event(&click(Hit::PanelButton(PanelButton::Previous))),
        Propagation::Stop
    );
    assert_eq!(tour.current_index(), Some(0));

    assert_eq!(
        tour.handle_event(&click(Hit::PanelButton(PanelButton::Next))),
        Propagation::Stop
    );
    assert_eq!(tour.current_index(), Some(1));

    assert_eq!(
        tour.handle_event(&click(Hit::PanelButton(PanelButton::Previous))),
        Propagation::Stop
    );
    assert_eq!(tour.current_index(), Some(0));

    assert_eq!(
        tour.handle_event(&click(Hit::PanelButton(PanelButton::Close))),
        Propagation::Stop
    );
    assert!(!tour.is_active());
}

#[test]
fn pointer_down_on_button_does_not_press_it() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), two_steps);
    let down = Event::Pointer(PointerEvent::new(
        PointerKind::Down,
        Point::new(10.0, 10.0),
        Hit::PanelButton(PanelButton::Next),
    ));
    assert_eq!(tour.handle_event(&down), Propagation::Stop);
    assert_eq!(tour.current_index(), Some(0));
}

#[test]
fn panel_body_clicks_pass_through() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), two_steps);
    assert_eq!(tour.handle_event(&click(Hit::Panel)), Propagation::Continue);
    assert!(tour.is_active());
}

#[test]
fn overlay_click_closes_by_default() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), two_steps);
    assert_eq!(tour.handle_event(&click(Hit::Overlay)), Propagation::Stop);
    assert!(!tour.is_active());
}

#[test]
fn overlay_click_can_advance() {
    let config = TourConfig {
        overlay_click_advances: true,
        ..TourConfig::default()
    };
    let Fixture { mut tour, .. } = fixture(config, two_steps);
    assert_eq!(tour.handle_event(&click(Hit::Overlay)), Propagation::Stop);
    assert_eq!(tour.current_index(), Some(1));
}

#[test]
fn overlay_click_swallowed_when_closing_disallowed() {
    let config = TourConfig {
        allow_outside_click_close: false,
        ..TourConfig::default()
    };
    let Fixture { mut tour, .. } = fixture(config, two_steps);
    assert_eq!(tour.handle_event(&click(Hit::Overlay)), Propagation::Stop);
    assert!(tour.is_active());
    assert_eq!(tour.current_index(), Some(0));
}

// ============================================================================
// Strict click
// ============================================================================

#[test]
fn strict_click_off_lets_page_clicks_through() {
    let Fixture {
        mut tour, other, ..
    } = fixture(TourConfig::default(), two_steps);
    assert_eq!(tour.env().strict_click(), None);
    assert_eq!(tour.handle_event(&click(Hit::Element(other))), Propagation::Continue);
}

#[test]
fn strict_click_target_only_allows_target_subtree() {
    let config = TourConfig {
        strict_click: StrictClick::TargetOnly,
        ..TourConfig::default()
    };
    let Fixture {
        mut tour,
        target,
        child,
        other,
    } = fixture(config, two_steps);

    assert_eq!(tour.env().strict_click(), Some(StrictClick::TargetOnly));
    assert_eq!(tour.handle_event(&click(Hit::Element(target))), Propagation::Continue);
    assert_eq!(tour.handle_event(&click(Hit::Element(child))), Propagation::Continue);
    assert_eq!(tour.handle_event(&click(Hit::Element(other))), Propagation::Stop);
}

#[test]
fn strict_click_block_all_blocks_target_too() {
    let Fixture {
        mut tour, target, ..
    } = fixture(TourConfig::default(), |first| {
        vec![StepDefinition::new(first).with_strict_click(StrictClick::BlockAll)]
    });

    assert_eq!(tour.env().strict_click(), Some(StrictClick::BlockAll));
    assert_eq!(tour.handle_event(&click(Hit::Element(target))), Propagation::Stop);
}

#[test]
fn strict_click_is_per_step_and_cleared_on_reset() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), |first| {
        vec![
            StepDefinition::new(first).with_strict_click(StrictClick::TargetOnly),
            StepDefinition::new("#sidebar"),
        ]
    });

    assert_eq!(tour.env().strict_click(), Some(StrictClick::TargetOnly));
    tour.next();
    assert_eq!(tour.env().strict_click(), None);
    tour.previous();
    assert_eq!(tour.env().strict_click(), Some(StrictClick::TargetOnly));
    tour.reset(false, waymark_tour::ExitReason::Cancel);
    assert_eq!(tour.env().strict_click(), None);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn resize_forces_a_push() {
    let Fixture { mut tour, .. } = fixture(TourConfig::default(), two_steps);
    let mut clock = Clock::new();

    tour.tick(clock.now());
    tour.tick(clock.advance(500));
    let settled = tour.env().overlays().len();
    tour.tick(clock.advance(16));
    assert_eq!(tour.env().overlays().len(), settled);

    assert_eq!(
        tour.handle_event(&Event::Resize {
            width: 1024.0,
            height: 768.0
        }),
        Propagation::Continue
    );
    tour.tick(clock.advance(16));
    assert_eq!(tour.env().overlays().len(), settled + 1);

    // A viewport change alone is noticed without an event.
    tour.env_mut().set_viewport(Size::new(800.0, 600.0));
    tour.tick(clock.advance(16));
    assert_eq!(tour.env().overlays().len(), settled + 2);
}
