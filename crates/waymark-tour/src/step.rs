#![forbid(unsafe_code)]

//! Step definitions and lifecycle hooks.
//!
//! A [`StepDefinition`] names the element to highlight and, optionally, the
//! content of the information panel shown next to it. Steps are immutable
//! from the engine's point of view; the tour clones what it needs per
//! activation.
//!
//! Hooks are plain closures taking a [`HookContext`]. A hook cannot borrow
//! the tour that invoked it, so it pauses a movement by calling
//! [`HookContext::prevent_move`]; the tour applies the request after the hook
//! returns. The host resumes later with `Tour::continue_move`.

use std::fmt;
use std::rc::Rc;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};
use waymark_core::{ElementId, PanelButton};

use crate::config::{Alignment, ButtonVisibility, ExitReason, ScrollBehavior, Side, StrictClick};

/// Lifecycle callback.
pub type Hook = Rc<dyn Fn(&mut HookContext)>;

/// Exit callback, invoked with the highlighted element and the reason.
pub type ExitHook = Rc<dyn Fn(ElementId, ExitReason)>;

/// Why an element is being prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Initiator {
    /// `start` or an ad-hoc `highlight`.
    Init,
    /// Forward movement.
    Next,
    /// Backward movement.
    Prev,
}

/// What a hook sees, and its one lever on the tour.
#[derive(Debug, Clone, Default)]
pub struct HookContext {
    /// Element the hook concerns, when one is resolved.
    pub element: Option<ElementId>,
    /// Index of the active step; `None` for ad-hoc highlights.
    pub step_index: Option<usize>,
    /// Set for `prepare_element` hooks.
    pub initiator: Option<Initiator>,
    prevent_requested: bool,
}

impl HookContext {
    pub(crate) fn new(element: Option<ElementId>, step_index: Option<usize>) -> Self {
        Self {
            element,
            step_index,
            initiator: None,
            prevent_requested: false,
        }
    }

    #[must_use]
    pub(crate) fn with_initiator(mut self, initiator: Initiator) -> Self {
        self.initiator = Some(initiator);
        self
    }

    /// Pause the movement that triggered this hook.
    pub fn prevent_move(&mut self) {
        self.prevent_requested = true;
    }

    /// Whether [`prevent_move`](Self::prevent_move) was called.
    pub fn prevent_requested(&self) -> bool {
        self.prevent_requested
    }
}

/// What to highlight: a selector resolved through the environment, or an
/// element the host already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(untagged))]
pub enum Selector {
    Query(String),
    Element(ElementId),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(query) => f.write_str(query),
            Self::Element(id) => write!(f, "{id}"),
        }
    }
}

impl From<&str> for Selector {
    fn from(query: &str) -> Self {
        Self::Query(query.to_owned())
    }
}

impl From<String> for Selector {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}

impl From<ElementId> for Selector {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

/// Panel content and per-step overrides of the panel defaults.
///
/// A panel is only presented when `title` is set.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PanelContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub side: Option<Side>,
    pub alignment: Option<Alignment>,
    pub next_text: Option<String>,
    pub previous_text: Option<String>,
    pub done_text: Option<String>,
    pub close_text: Option<String>,
    pub show_buttons: Option<ButtonVisibility>,
    pub disabled_buttons: Option<Vec<PanelButton>>,
}

impl PanelContent {
    /// Panel with a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    #[must_use]
    pub fn with_done_text(mut self, text: impl Into<String>) -> Self {
        self.done_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_show_buttons(mut self, visibility: ButtonVisibility) -> Self {
        self.show_buttons = Some(visibility);
        self
    }

    #[must_use]
    pub fn with_disabled_buttons(mut self, buttons: impl Into<Vec<PanelButton>>) -> Self {
        self.disabled_buttons = Some(buttons.into());
        self
    }
}

/// Hooks a single step can override.
#[derive(Clone, Default)]
pub struct StepHooks {
    pub on_next: Option<Hook>,
    pub on_previous: Option<Hook>,
    pub on_before_highlighted: Option<Hook>,
    pub on_highlighted: Option<Hook>,
    pub on_deselected: Option<Hook>,
}

impl StepHooks {
    /// Field-wise merge; `self` wins over `fallback`.
    #[must_use]
    pub fn or(&self, fallback: &StepHooks) -> StepHooks {
        StepHooks {
            on_next: self.on_next.clone().or_else(|| fallback.on_next.clone()),
            on_previous: self
                .on_previous
                .clone()
                .or_else(|| fallback.on_previous.clone()),
            on_before_highlighted: self
                .on_before_highlighted
                .clone()
                .or_else(|| fallback.on_before_highlighted.clone()),
            on_highlighted: self
                .on_highlighted
                .clone()
                .or_else(|| fallback.on_highlighted.clone()),
            on_deselected: self
                .on_deselected
                .clone()
                .or_else(|| fallback.on_deselected.clone()),
        }
    }

    fn names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.on_next.is_some() {
            names.push("on_next");
        }
        if self.on_previous.is_some() {
            names.push("on_previous");
        }
        if self.on_before_highlighted.is_some() {
            names.push("on_before_highlighted");
        }
        if self.on_highlighted.is_some() {
            names.push("on_highlighted");
        }
        if self.on_deselected.is_some() {
            names.push("on_deselected");
        }
        names
    }
}

impl fmt::Debug for StepHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Tour-wide hooks: the step defaults plus start and exit callbacks.
#[derive(Clone, Default)]
pub struct TourHooks {
    pub step: StepHooks,
    pub on_start: Option<Hook>,
    pub on_reset: Option<ExitHook>,
}

impl TourHooks {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_start(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.on_start = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_reset(mut self, hook: impl Fn(ElementId, ExitReason) + 'static) -> Self {
        self.on_reset = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_next(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.step.on_next = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_previous(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.step.on_previous = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_before_highlighted(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.step.on_before_highlighted = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_highlighted(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.step.on_highlighted = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_deselected(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.step.on_deselected = Some(Rc::new(hook));
        self
    }
}

impl fmt::Debug for TourHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourHooks")
            .field("step", &self.step)
            .field("on_start", &self.on_start.is_some())
            .field("on_reset", &self.on_reset.is_some())
            .finish()
    }
}

/// One tour step.
#[derive(Clone)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct StepDefinition {
    pub selector: Selector,
    #[cfg_attr(feature = "config", serde(default))]
    pub panel: Option<PanelContent>,
    #[cfg_attr(feature = "config", serde(default))]
    pub padding: Option<f64>,
    #[cfg_attr(feature = "config", serde(default))]
    pub radius: Option<f64>,
    #[cfg_attr(feature = "config", serde(default))]
    pub strict_click: Option<StrictClick>,
    #[cfg_attr(feature = "config", serde(default))]
    pub scroll: Option<ScrollBehavior>,
    #[cfg_attr(feature = "config", serde(skip))]
    pub hooks: StepHooks,
    /// Runs before every activation of this step.
    #[cfg_attr(feature = "config", serde(skip))]
    pub prepare_element: Option<Hook>,
}

impl StepDefinition {
    pub fn new(selector: impl Into<Selector>) -> Self {
        Self {
            selector: selector.into(),
            panel: None,
            padding: None,
            radius: None,
            strict_click: None,
            scroll: None,
            hooks: StepHooks::default(),
            prepare_element: None,
        }
    }

    #[must_use]
    pub fn with_panel(mut self, panel: PanelContent) -> Self {
        self.panel = Some(panel);
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    #[must_use]
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    #[must_use]
    pub fn with_strict_click(mut self, mode: StrictClick) -> Self {
        self.strict_click = Some(mode);
        self
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll: ScrollBehavior) -> Self {
        self.scroll = Some(scroll);
        self
    }

    #[must_use]
    pub fn on_next(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.hooks.on_next = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_previous(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.hooks.on_previous = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_before_highlighted(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.hooks.on_before_highlighted = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_highlighted(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.hooks.on_highlighted = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn on_deselected(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.hooks.on_deselected = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn with_prepare_element(mut self, hook: impl Fn(&mut HookContext) + 'static) -> Self {
        self.prepare_element = Some(Rc::new(hook));
        self
    }

    /// Panel title, if this step presents a panel.
    pub fn title(&self) -> Option<&str> {
        self.panel.as_ref().and_then(|panel| panel.title.as_deref())
    }
}

impl fmt::Debug for StepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepDefinition")
            .field("selector", &self.selector)
            .field("panel", &self.panel)
            .field("padding", &self.padding)
            .field("radius", &self.radius)
            .field("strict_click", &self.strict_click)
            .field("scroll", &self.scroll)
            .field("hooks", &self.hooks)
            .field("prepare_element", &self.prepare_element.is_some())
            .finish()
    }
}

impl From<&str> for StepDefinition {
    fn from(selector: &str) -> Self {
        Self::new(selector)
    }
}

impl From<Selector> for StepDefinition {
    fn from(selector: Selector) -> Self {
        Self::new(selector)
    }
}

impl From<ElementId> for StepDefinition {
    fn from(id: ElementId) -> Self {
        Self::new(id)
    }
}
