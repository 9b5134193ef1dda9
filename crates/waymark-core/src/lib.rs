#![forbid(unsafe_code)]

//! Core: geometry, easing, highlight cutouts, and input events.
//!
//! # Role in Waymark
//! `waymark-core` is the leaf layer. It has no notion of tours or steps; it
//! owns the pure math the engine runs every frame and the canonical event
//! types a host forwards into the engine.
//!
//! # Primary responsibilities
//! - **Rect / Size / Point**: viewport-space geometry in CSS-pixel units.
//! - **Easing**: normalized easing curves and interpolation helpers.
//! - **CutoutGeometry**: the highlight hole punched into the dimmed overlay.
//! - **Event**: keyboard, pointer and resize input.

pub mod animation;
pub mod cutout;
pub mod element;
pub mod event;
pub mod geometry;

pub use animation::{Easing, ease_in_out_quad, lerp};
pub use cutout::{CutoutGeometry, CutoutMask};
pub use element::ElementId;
pub use event::{
    Event, Hit, KeyCode, KeyEvent, KeyEventKind, Modifiers, PanelButton, PointerEvent,
    PointerKind,
};
pub use geometry::{Point, Rect, Size};
