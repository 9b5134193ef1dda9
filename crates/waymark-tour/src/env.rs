#![forbid(unsafe_code)]

//! The host document, as seen by the engine.
//!
//! Everything the engine needs from the outside world goes through
//! [`Environment`]: selector resolution, live geometry, and the side effects
//! of rendering a tour. The queries are required; every side effect has a
//! no-op default so a host only implements what its backend draws.
//!
//! Implementations must be cheap to query. The tracker calls
//! [`Environment::element_rect`] and [`Environment::viewport`] once per
//! frame while a tour is active.

use waymark_core::{CutoutGeometry, ElementId, PanelButton, Rect, Size};

use crate::config::{ScrollBehavior, StrictClick};
use crate::panel::PanelView;
use crate::position::PanelPlacement;
use crate::step::Selector;

/// A successful selector resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    /// First match in document order.
    pub element: ElementId,
    /// Total number of matches; more than one is worth a warning.
    pub match_count: usize,
}

impl Resolved {
    pub const fn unique(element: ElementId) -> Self {
        Self {
            element,
            match_count: 1,
        }
    }
}

/// Why a selector did not yield an element.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no element matches selector `{selector}`")]
    NotFound { selector: String },
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },
    #[error("element {0} is no longer attached to the document")]
    Detached(ElementId),
}

/// Measured panel size plus the size of its pointer tip.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelMetrics {
    pub size: Size,
    /// Edge length of the tip; also the minimum distance kept from the
    /// viewport edge on the cross axis.
    pub tip: f64,
}

/// Host capabilities the tour depends on.
pub trait Environment {
    /// Resolve a query selector.
    fn resolve(&self, selector: &str) -> Result<Resolved, ResolveError>;

    /// Whether `element` is still attached to the document.
    fn is_connected(&self, element: ElementId) -> bool;

    /// Live viewport-space rect, or `None` when it cannot be read.
    fn element_rect(&self, element: ElementId) -> Option<Rect>;

    /// Current viewport size.
    fn viewport(&self) -> Size;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        ancestor == node
    }

    fn scroll_into_view(&mut self, _element: ElementId, _behavior: ScrollBehavior) {}

    /// Toggle the "active highlight" marker on an element.
    fn set_element_active(&mut self, _element: ElementId, _active: bool) {}

    fn set_strict_click(&mut self, _mode: StrictClick) {}

    fn clear_strict_click(&mut self) {}

    /// Start forwarding keyboard and pointer input to the tour.
    fn attach_listeners(&mut self) {}

    fn detach_listeners(&mut self) {}

    /// Draw (or redraw) the dimmed overlay with its cutout.
    fn render_overlay(&mut self, _cutout: &CutoutGeometry, _viewport: Size) {}

    fn unmount_overlay(&mut self) {}

    /// Render the information panel.
    fn render_panel(&mut self, _view: &PanelView) {}

    /// Measure the rendered panel.
    fn measure_panel(&self) -> PanelMetrics {
        PanelMetrics::default()
    }

    fn place_panel(&mut self, _placement: &PanelPlacement) {}

    fn hide_panel(&mut self) {}

    fn focus_button(&mut self, _button: PanelButton) {}
}

/// Resolve a query through `env`, or verify a direct handle is attached.
pub fn resolve_selector<E: Environment + ?Sized>(
    env: &E,
    selector: &Selector,
) -> Result<Resolved, ResolveError> {
    match selector {
        Selector::Query(query) => env.resolve(query),
        Selector::Element(id) if env.is_connected(*id) => Ok(Resolved::unique(*id)),
        Selector::Element(id) => Err(ResolveError::Detached(*id)),
    }
}
