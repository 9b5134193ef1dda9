#![forbid(unsafe_code)]

//! A headless document implementing [`Environment`].
//!
//! `FakeDocument` keeps a flat table of elements addressed by selector, with
//! optional parent links for containment checks. Every side effect the tour
//! performs is appended to a journal so tests can assert on exactly what the
//! host would have drawn.
//!
//! # JSONL journal
//!
//! [`FakeDocument::journal_jsonl`] renders the journal one JSON object per
//! line with a stable schema:
//!
//! ```json
//! {"effect":"listeners","attached":true}
//! {"effect":"overlay","x":10.0,"y":20.0,"width":100.0,"height":40.0,"padding":10.0,"radius":5.0}
//! {"effect":"panel","title":"Search","progress":"1/3"}
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde_json::json;
use waymark_core::{CutoutGeometry, ElementId, PanelButton, Rect, Size};
use waymark_tour::{
    Environment, PanelMetrics, PanelPlacement, PanelView, ResolveError, Resolved, ScrollBehavior,
    StrictClick,
};

/// Viewport used by [`FakeDocument::default`].
pub const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 800.0);

/// Panel size reported by [`FakeDocument::default`].
pub const DEFAULT_PANEL: Size = Size::new(240.0, 120.0);

/// One recorded side effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Scrolled(ElementId, ScrollBehavior),
    Active(ElementId, bool),
    StrictClick(StrictClick),
    StrictClickCleared,
    ListenersAttached,
    ListenersDetached,
    Overlay(CutoutGeometry),
    OverlayUnmounted,
    PanelRendered(PanelView),
    PanelPlaced(PanelPlacement),
    PanelHidden,
    Focused(PanelButton),
}

impl Effect {
    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Scrolled(element, behavior) => {
                json!({"effect": "scroll", "element": element.raw(), "behavior": format!("{behavior:?}")})
            }
            Self::Active(element, active) => {
                json!({"effect": "active", "element": element.raw(), "active": active})
            }
            Self::StrictClick(mode) => json!({"effect": "strict-click", "mode": format!("{mode:?}")}),
            Self::StrictClickCleared => json!({"effect": "strict-click", "mode": null}),
            Self::ListenersAttached => json!({"effect": "listeners", "attached": true}),
            Self::ListenersDetached => json!({"effect": "listeners", "attached": false}),
            Self::Overlay(cutout) => json!({
                "effect": "overlay",
                "x": cutout.x,
                "y": cutout.y,
                "width": cutout.width,
                "height": cutout.height,
                "padding": cutout.padding,
                "radius": cutout.radius,
            }),
            Self::OverlayUnmounted => json!({"effect": "overlay-unmounted"}),
            Self::PanelRendered(view) => json!({
                "effect": "panel",
                "title": view.title,
                "progress": view.footer.progress,
            }),
            Self::PanelPlaced(placement) => json!({
                "effect": "panel-placed",
                "side": placement.side.map(|side| format!("{side:?}")),
                "top": placement.top,
                "bottom": placement.bottom,
                "left": placement.left,
                "right": placement.right,
            }),
            Self::PanelHidden => json!({"effect": "panel-hidden"}),
            Self::Focused(button) => json!({"effect": "focus", "button": format!("{button:?}")}),
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    rect: Rect,
    connected: bool,
    parent: Option<ElementId>,
}

/// In-memory document.
#[derive(Debug, Clone)]
pub struct FakeDocument {
    nodes: BTreeMap<ElementId, Node>,
    selectors: BTreeMap<String, Vec<ElementId>>,
    next_id: u64,
    viewport: Size,
    panel: PanelMetrics,
    journal: Vec<Effect>,
    listeners: bool,
    strict_click: Option<StrictClick>,
    active: BTreeSet<ElementId>,
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT)
    }
}

impl FakeDocument {
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: BTreeMap::new(),
            selectors: BTreeMap::new(),
            next_id: 1,
            viewport,
            panel: PanelMetrics {
                size: DEFAULT_PANEL,
                tip: 5.0,
            },
            journal: Vec::new(),
            listeners: false,
            strict_click: None,
            active: BTreeSet::new(),
        }
    }

    /// Override the measured panel size.
    #[must_use]
    pub fn with_panel_metrics(mut self, size: Size, tip: f64) -> Self {
        self.panel = PanelMetrics { size, tip };
        self
    }

    /// Add an element reachable through `selector`. Repeated selectors
    /// accumulate matches in insertion order.
    pub fn add(&mut self, selector: &str, rect: Rect) -> ElementId {
        self.insert(selector, rect, None)
    }

    /// Add an element nested in `parent`.
    pub fn add_child(&mut self, parent: ElementId, selector: &str, rect: Rect) -> ElementId {
        self.insert(selector, rect, Some(parent))
    }

    fn insert(&mut self, selector: &str, rect: Rect, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                rect,
                connected: true,
                parent,
            },
        );
        self.selectors.entry(selector.to_owned()).or_default().push(id);
        id
    }

    pub fn set_rect(&mut self, element: ElementId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.rect = rect;
        }
    }

    /// Disconnect an element. It stays addressable by id but no longer
    /// resolves or reports geometry.
    pub fn detach(&mut self, element: ElementId) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.connected = false;
        }
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Everything recorded so far.
    pub fn journal(&self) -> &[Effect] {
        &self.journal
    }

    /// Drain the journal.
    pub fn take_journal(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.journal)
    }

    /// The journal as JSON lines.
    pub fn journal_jsonl(&self) -> String {
        let mut out = String::new();
        for effect in &self.journal {
            out.push_str(&effect.to_json().to_string());
            out.push('\n');
        }
        out
    }

    pub fn overlays(&self) -> Vec<CutoutGeometry> {
        self.journal
            .iter()
            .filter_map(|effect| match effect {
                Effect::Overlay(cutout) => Some(*cutout),
                _ => None,
            })
            .collect()
    }

    pub fn last_overlay(&self) -> Option<CutoutGeometry> {
        self.overlays().last().copied()
    }

    pub fn last_panel(&self) -> Option<&PanelView> {
        self.journal.iter().rev().find_map(|effect| match effect {
            Effect::PanelRendered(view) => Some(view),
            _ => None,
        })
    }

    pub fn last_placement(&self) -> Option<&PanelPlacement> {
        self.journal.iter().rev().find_map(|effect| match effect {
            Effect::PanelPlaced(placement) => Some(placement),
            _ => None,
        })
    }

    pub fn last_focus(&self) -> Option<PanelButton> {
        self.journal.iter().rev().find_map(|effect| match effect {
            Effect::Focused(button) => Some(*button),
            _ => None,
        })
    }

    pub fn scrolled(&self) -> Vec<ElementId> {
        self.journal
            .iter()
            .filter_map(|effect| match effect {
                Effect::Scrolled(element, _) => Some(*element),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Effect) -> usize {
        self.journal.iter().filter(|effect| *effect == wanted).count()
    }

    pub fn listeners_attached(&self) -> bool {
        self.listeners
    }

    pub fn strict_click(&self) -> Option<StrictClick> {
        self.strict_click
    }

    pub fn is_marked_active(&self, element: ElementId) -> bool {
        self.active.contains(&element)
    }
}

impl Environment for FakeDocument {
    fn resolve(&self, selector: &str) -> Result<Resolved, ResolveError> {
        if selector.trim().is_empty() {
            return Err(ResolveError::InvalidSelector {
                selector: selector.to_owned(),
                reason: "empty selector".into(),
            });
        }
        let matches: Vec<ElementId> = self
            .selectors
            .get(selector)
            .into_iter()
            .flatten()
            .copied()
            .filter(|id| self.is_connected(*id))
            .collect();
        match matches.first() {
            Some(&element) => Ok(Resolved {
                element,
                match_count: matches.len(),
            }),
            None => Err(ResolveError::NotFound {
                selector: selector.to_owned(),
            }),
        }
    }

    fn is_connected(&self, element: ElementId) -> bool {
        self.nodes.get(&element).is_some_and(|node| node.connected)
    }

    fn element_rect(&self, element: ElementId) -> Option<Rect> {
        self.nodes
            .get(&element)
            .filter(|node| node.connected)
            .map(|node| node.rect)
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    fn scroll_into_view(&mut self, element: ElementId, behavior: ScrollBehavior) {
        self.journal.push(Effect::Scrolled(element, behavior));
    }

    fn set_element_active(&mut self, element: ElementId, active: bool) {
        if active {
            self.active.insert(element);
        } else {
            self.active.remove(&element);
        }
        self.journal.push(Effect::Active(element, active));
    }

    fn set_strict_click(&mut self, mode: StrictClick) {
        self.strict_click = Some(mode);
        self.journal.push(Effect::StrictClick(mode));
    }

    fn clear_strict_click(&mut self) {
        self.strict_click = None;
        self.journal.push(Effect::StrictClickCleared);
    }

    fn attach_listeners(&mut self) {
        self.listeners = true;
        self.journal.push(Effect::ListenersAttached);
    }

    fn detach_listeners(&mut self) {
        self.listeners = false;
        self.journal.push(Effect::ListenersDetached);
    }

    fn render_overlay(&mut self, cutout: &CutoutGeometry, _viewport: Size) {
        self.journal.push(Effect::Overlay(*cutout));
    }

    fn unmount_overlay(&mut self) {
        self.journal.push(Effect::OverlayUnmounted);
    }

    fn render_panel(&mut self, view: &PanelView) {
        self.journal.push(Effect::PanelRendered(view.clone()));
    }

    fn measure_panel(&self) -> PanelMetrics {
        self.panel
    }

    fn place_panel(&mut self, placement: &PanelPlacement) {
        self.journal.push(Effect::PanelPlaced(*placement));
    }

    fn hide_panel(&mut self) {
        self.journal.push(Effect::PanelHidden);
    }

    fn focus_button(&mut self, button: PanelButton) {
        self.journal.push(Effect::Focused(button));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_first_connected_match() {
        let mut doc = FakeDocument::default();
        let a = doc.add(".item", Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = doc.add(".item", Rect::new(0.0, 20.0, 10.0, 10.0));
        assert_eq!(
            doc.resolve(".item"),
            Ok(Resolved {
                element: a,
                match_count: 2
            })
        );
        doc.detach(a);
        assert_eq!(doc.resolve(".item"), Ok(Resolved::unique(b)));
        assert_eq!(doc.element_rect(a), None);
    }

    #[test]
    fn empty_selector_is_invalid() {
        let doc = FakeDocument::default();
        assert!(matches!(
            doc.resolve("  "),
            Err(ResolveError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn containment_walks_parents() {
        let mut doc = FakeDocument::default();
        let form = doc.add("#form", Rect::new(0.0, 0.0, 100.0, 100.0));
        let field = doc.add_child(form, "#field", Rect::new(10.0, 10.0, 50.0, 20.0));
        let other = doc.add("#other", Rect::new(200.0, 0.0, 10.0, 10.0));
        assert!(doc.contains(form, field));
        assert!(doc.contains(form, form));
        assert!(!doc.contains(field, form));
        assert!(!doc.contains(form, other));
    }

    #[test]
    fn journal_renders_jsonl() {
        let mut doc = FakeDocument::default();
        doc.attach_listeners();
        doc.render_overlay(
            &CutoutGeometry::from_rect(Rect::new(1.0, 2.0, 3.0, 4.0), 5.0, 6.0),
            DEFAULT_VIEWPORT,
        );
        let jsonl = doc.journal_jsonl();
        let lines: Vec<serde_json::Value> = jsonl
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["effect"], "listeners");
        assert_eq!(lines[1]["width"], 3.0);
    }
}
