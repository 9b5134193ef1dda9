#![forbid(unsafe_code)]

//! The element being highlighted, with everything resolved for it.

use std::fmt;

use waymark_core::{CutoutGeometry, ElementId, Rect};

use crate::config::{ScrollBehavior, StrictClick, TourConfig};
use crate::env::Environment;
use crate::panel::PanelPresenter;
use crate::step::{Hook, HookContext, StepDefinition, StepHooks};

/// How a target came to be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetOrigin {
    /// Activated as step `n` of the tour.
    Step(usize),
    /// Activated through an ad-hoc `highlight`.
    Adhoc,
}

impl TargetOrigin {
    pub fn step_index(self) -> Option<usize> {
        match self {
            Self::Step(index) => Some(index),
            Self::Adhoc => None,
        }
    }
}

/// Effective per-target options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetOptions {
    pub padding: f64,
    pub radius: f64,
    pub scroll: ScrollBehavior,
    pub strict_click: StrictClick,
}

impl TargetOptions {
    /// Step overrides on top of the tour config.
    pub fn merge(config: &TourConfig, step: &StepDefinition) -> Self {
        Self {
            padding: step.padding.unwrap_or(config.padding),
            radius: step.radius.unwrap_or(config.radius),
            scroll: step.scroll.unwrap_or(config.scroll),
            strict_click: step.strict_click.unwrap_or(config.strict_click),
        }
    }
}

/// One resolved element for one activation.
pub struct Target {
    element: ElementId,
    origin: TargetOrigin,
    options: TargetOptions,
    hooks: StepHooks,
    panel: Option<PanelPresenter>,
    last_rect: Option<Rect>,
}

impl Target {
    pub fn new(
        element: ElementId,
        origin: TargetOrigin,
        options: TargetOptions,
        hooks: StepHooks,
        panel: Option<PanelPresenter>,
    ) -> Self {
        Self {
            element,
            origin,
            options,
            hooks,
            panel,
            last_rect: None,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn origin(&self) -> TargetOrigin {
        self.origin
    }

    pub fn options(&self) -> &TargetOptions {
        &self.options
    }

    pub fn panel(&self) -> Option<&PanelPresenter> {
        self.panel.as_ref()
    }

    pub fn panel_mut(&mut self) -> Option<&mut PanelPresenter> {
        self.panel.as_mut()
    }

    /// Same underlying element, however it was activated.
    pub fn is_same(&self, other: Option<&Target>) -> bool {
        other.is_some_and(|other| self.element == other.element)
    }

    /// Live rect, or the last one read if the element has been detached.
    pub fn rect<E: Environment + ?Sized>(&mut self, env: &E) -> Rect {
        let live = if env.is_connected(self.element) {
            env.element_rect(self.element)
        } else {
            None
        };
        match live {
            Some(rect) => {
                self.last_rect = Some(rect);
                rect
            }
            None => {
                tracing::trace!(
                    target: "waymark.tracker",
                    element = %self.element,
                    "element detached; reusing last known rect"
                );
                self.last_rect.unwrap_or_default()
            }
        }
    }

    /// Cutout geometry around the current rect.
    pub fn geometry<E: Environment + ?Sized>(&mut self, env: &E) -> CutoutGeometry {
        let rect = self.rect(env);
        CutoutGeometry::from_rect(rect, self.options.padding, self.options.radius)
    }

    fn context(&self) -> HookContext {
        HookContext::new(Some(self.element), self.origin.step_index())
    }

    fn run(&self, hook: Option<&Hook>) -> bool {
        let Some(hook) = hook else {
            return false;
        };
        let mut ctx = self.context();
        hook(&mut ctx);
        ctx.prevent_requested()
    }

    pub fn on_before_highlighted(&self) {
        self.run(self.hooks.on_before_highlighted.as_ref());
    }

    /// Bring into view, show the panel, mark active, notify.
    pub fn on_highlighted<E: Environment + ?Sized>(&mut self, env: &mut E) {
        if self.options.scroll != ScrollBehavior::Disabled {
            let rect = self.rect(&*env);
            if !env.viewport().to_rect().contains_rect(&rect) {
                env.scroll_into_view(self.element, self.options.scroll);
            }
        }
        if let Some(panel) = &self.panel {
            panel.show(env);
        }
        env.set_element_active(self.element, true);
        self.run(self.hooks.on_highlighted.as_ref());
    }

    pub fn on_deselected<E: Environment + ?Sized>(&mut self, env: &mut E) {
        if let Some(panel) = &self.panel {
            panel.hide(env);
        }
        env.set_element_active(self.element, false);
        self.run(self.hooks.on_deselected.as_ref());
    }

    /// Fire `on_next`; returns whether the hook asked to prevent the move.
    pub fn fire_on_next(&self) -> bool {
        self.run(self.hooks.on_next.as_ref())
    }

    /// Fire `on_previous`; returns whether the hook asked to prevent the move.
    pub fn fire_on_previous(&self) -> bool {
        self.run(self.hooks.on_previous.as_ref())
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("element", &self.element)
            .field("origin", &self.origin)
            .field("options", &self.options)
            .field("hooks", &self.hooks)
            .field("panel", &self.panel.is_some())
            .field("last_rect", &self.last_rect)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use waymark_core::Size;

    use crate::env::{ResolveError, Resolved};

    #[derive(Default)]
    struct Page {
        rect: Option<Rect>,
        connected: bool,
        scrolled: Vec<ElementId>,
        active: Vec<(ElementId, bool)>,
    }

    impl Environment for Page {
        fn resolve(&self, selector: &str) -> Result<Resolved, ResolveError> {
            Err(ResolveError::NotFound {
                selector: selector.to_owned(),
            })
        }

        fn is_connected(&self, _element: ElementId) -> bool {
            self.connected
        }

        fn element_rect(&self, _element: ElementId) -> Option<Rect> {
            self.rect
        }

        fn viewport(&self) -> Size {
            Size::new(800.0, 600.0)
        }

        fn scroll_into_view(&mut self, element: ElementId, _behavior: ScrollBehavior) {
            self.scrolled.push(element);
        }

        fn set_element_active(&mut self, element: ElementId, active: bool) {
            self.active.push((element, active));
        }
    }

    fn target(origin: TargetOrigin, hooks: StepHooks) -> Target {
        let options = TargetOptions::merge(&TourConfig::default(), &StepDefinition::new("#a"));
        Target::new(ElementId(1), origin, options, hooks, None)
    }

    #[test]
    fn identity_is_the_element() {
        let step = target(TargetOrigin::Step(0), StepHooks::default());
        let later_step = target(TargetOrigin::Step(1), StepHooks::default());
        let adhoc = target(TargetOrigin::Adhoc, StepHooks::default());
        assert!(step.is_same(Some(&later_step)));
        assert!(step.is_same(Some(&adhoc)));
        assert!(!step.is_same(None));

        let options = TargetOptions::merge(&TourConfig::default(), &StepDefinition::new("#b"));
        let other = Target::new(ElementId(2), TargetOrigin::Step(0), options, StepHooks::default(), None);
        assert!(!step.is_same(Some(&other)));
    }

    #[test]
    fn detached_element_keeps_last_rect() {
        let mut page = Page {
            rect: Some(Rect::new(10.0, 20.0, 30.0, 40.0)),
            connected: true,
            ..Page::default()
        };
        let mut t = target(TargetOrigin::Step(0), StepHooks::default());
        assert_eq!(t.rect(&page), Rect::new(10.0, 20.0, 30.0, 40.0));

        page.connected = false;
        page.rect = Some(Rect::default());
        assert_eq!(t.rect(&page), Rect::new(10.0, 20.0, 30.0, 40.0));
    }

    #[test]
    fn scrolls_only_when_out_of_view() {
        let mut page = Page {
            rect: Some(Rect::new(10.0, 20.0, 30.0, 40.0)),
            connected: true,
            ..Page::default()
        };
        let mut t = target(TargetOrigin::Step(0), StepHooks::default());
        t.on_highlighted(&mut page);
        assert!(page.scrolled.is_empty());
        assert_eq!(page.active, vec![(ElementId(1), true)]);

        page.rect = Some(Rect::new(10.0, 900.0, 30.0, 40.0));
        t.on_highlighted(&mut page);
        assert_eq!(page.scrolled, vec![ElementId(1)]);
    }

    #[test]
    fn disabled_scroll_never_scrolls() {
        let mut page = Page {
            rect: Some(Rect::new(10.0, 900.0, 30.0, 40.0)),
            connected: true,
            ..Page::default()
        };
        let step = StepDefinition::new("#a").with_scroll(ScrollBehavior::Disabled);
        let options = TargetOptions::merge(&TourConfig::default(), &step);
        let mut t = Target::new(ElementId(1), TargetOrigin::Adhoc, options, StepHooks::default(), None);
        t.on_highlighted(&mut page);
        assert!(page.scrolled.is_empty());
    }

    #[test]
    fn hooks_see_element_and_index() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let prevent = Rc::new(Cell::new(true));
        let hooks = StepHooks {
            on_next: Some(Rc::new({
                let seen = Rc::clone(&seen);
                let prevent = Rc::clone(&prevent);
                move |ctx: &mut HookContext| {
                    seen.borrow_mut().push((ctx.element, ctx.step_index));
                    if prevent.get() {
                        ctx.prevent_move();
                    }
                }
            })),
            ..StepHooks::default()
        };
        let t = target(TargetOrigin::Step(2), hooks);
        assert!(t.fire_on_next());
        prevent.set(false);
        assert!(!t.fire_on_next());
        assert!(!t.fire_on_previous());
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[0], (Some(ElementId(1)), Some(2)));
    }
}
