#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! A host forwards its native input into the engine as [`Event`] values.
//! Pointer events carry a pre-computed [`Hit`]: the host knows its own
//! layering (page element, overlay, panel) far better than the engine could.
//!
//! # Design Notes
//!
//! - `KeyEventKind` defaults to `Press` when the host cannot distinguish.
//! - `Modifiers` use bitflags for easy combination.
//! - Positions are viewport-relative pixels, like every other coordinate.

use bitflags::bitflags;

use crate::element::ElementId;
use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),

    /// A pointer (mouse, pen, touch) event.
    Pointer(PointerEvent),

    /// Viewport was resized.
    Resize {
        /// New viewport width.
        width: f64,
        /// New viewport height.
        height: f64,
    },
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether this event is a key release.
    #[must_use]
    pub const fn is_release(&self) -> bool {
        matches!(self.kind, KeyEventKind::Release)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    Enter,
    Escape,
    Tab,
    /// Shift+Tab (back-tab).
    BackTab,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during an event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Buttons in the information panel footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PanelButton {
    Previous,
    Next,
    Close,
}

impl PanelButton {
    /// All buttons in footer order.
    pub const ALL: [PanelButton; 3] = [PanelButton::Previous, PanelButton::Next, PanelButton::Close];
}

/// What a pointer event landed on, as determined by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// A page element (possibly nested inside the highlighted one).
    Element(ElementId),
    /// The dimmed overlay outside the cutout.
    Overlay,
    /// The information panel, away from any button.
    Panel,
    /// A footer button of the information panel.
    PanelButton(PanelButton),
}

impl Hit {
    /// Whether the hit belongs to engine-owned UI rather than the page.
    #[must_use]
    pub const fn is_engine_ui(&self) -> bool {
        !matches!(self, Self::Element(_))
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Up,
    Click,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    pub hit: Hit,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerKind, position: Point, hit: Hit) -> Self {
        Self {
            kind,
            position,
            hit,
            modifiers: Modifiers::NONE,
        }
    }

    /// A click on `hit` at the origin; handy for hosts that don't track position.
    #[must_use]
    pub const fn click(hit: Hit) -> Self {
        Self::new(PointerKind::Click, Point::new(0.0, 0.0), hit)
    }

    /// Create a pointer event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
