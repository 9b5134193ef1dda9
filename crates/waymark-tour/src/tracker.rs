#![forbid(unsafe_code)]

//! Highlight tracking.
//!
//! The [`HighlightTracker`] owns the highlighted [`Target`] and keeps the
//! overlay cutout glued to it. Each `highlight` starts a fresh frame loop:
//! the first frames ease the cutout from wherever it was toward the new
//! target, after which the loop re-reads the target's geometry every frame
//! and only pushes when something changed.
//!
//! # Frame loop
//!
//! Frame requests go through a [`FrameScheduler`] and carry a token from the
//! loop's [`CancellationSource`]. Starting a new loop cancels the old source,
//! so a frame queued by the superseded loop is dropped instead of running.
//!
//! # Invariants
//!
//! 1. At most one live frame loop.
//! 2. Every push renders the overlay, then refreshes the panel.
//! 3. In steady state, identical geometry and viewport are never re-pushed
//!    unless [`HighlightTracker::refresh`] forced it.

use std::time::Duration;

use waymark_core::animation::progress;
use waymark_core::{CutoutGeometry, Easing, ElementId, Size};
use waymark_runtime::{CancellationSource, FrameScheduler};
use web_time::Instant;

use crate::config::ExitReason;
use crate::env::Environment;
use crate::step::ExitHook;
use crate::target::Target;

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: CutoutGeometry,
    started_at: Option<Instant>,
}

/// Animated highlight follower.
#[derive(Debug)]
pub struct HighlightTracker {
    current: Option<Target>,
    previous: Option<Target>,
    window: Duration,
    easing: Easing,
    source: Option<CancellationSource>,
    frames: FrameScheduler,
    transition: Option<Transition>,
    last_pushed: Option<CutoutGeometry>,
    last_viewport: Option<Size>,
    dirty: bool,
}

impl HighlightTracker {
    /// Tracker easing over `window`; a zero window snaps.
    pub fn new(window: Duration) -> Self {
        Self {
            current: None,
            previous: None,
            window,
            easing: Easing::EaseInOutQuad,
            source: None,
            frames: FrameScheduler::new(),
            transition: None,
            last_pushed: None,
            last_viewport: None,
            dirty: false,
        }
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn current(&self) -> Option<&Target> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Target> {
        self.current.as_mut()
    }

    pub fn previous(&self) -> Option<&Target> {
        self.previous.as_ref()
    }

    pub fn highlighted_element(&self) -> Option<ElementId> {
        self.current.as_ref().map(Target::element)
    }

    pub fn previous_element(&self) -> Option<ElementId> {
        self.previous.as_ref().map(Target::element)
    }

    /// Whether a transition is still easing.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Geometry of the last push.
    pub fn last_pushed(&self) -> Option<&CutoutGeometry> {
        self.last_pushed.as_ref()
    }

    /// Whether a frame is queued for the live loop.
    pub fn has_pending_frame(&self) -> bool {
        self.frames.has_pending()
    }

    /// Move the highlight to `target`.
    pub fn highlight<E: Environment + ?Sized>(&mut self, mut target: Target, env: &mut E) {
        if target.is_same(self.current.as_ref()) {
            tracing::trace!(
                target: "waymark.tracker",
                element = %target.element(),
                "already highlighted"
            );
            return;
        }

        target.on_before_highlighted();

        let previous = self.previous.as_ref();
        if let Some(old) = self.current.as_mut()
            && !old.is_same(previous)
        {
            old.on_deselected(env);
        }

        let from = match (self.last_pushed, self.current.as_mut()) {
            (Some(pushed), _) => pushed,
            (None, Some(old)) => old.geometry(&*env),
            (None, None) => target.geometry(&*env),
        };
        self.transition = Some(Transition {
            from,
            started_at: None,
        });
        self.restart_loop();

        tracing::debug!(
            target: "waymark.tracker",
            element = %target.element(),
            origin = ?target.origin(),
            "highlight"
        );

        self.previous = self.current.take();
        let current = self.current.insert(target);
        current.on_highlighted(env);
    }

    fn restart_loop(&mut self) {
        if let Some(old) = self.source.take() {
            old.cancel();
        }
        let source = CancellationSource::new();
        self.frames.request(source.token());
        self.source = Some(source);
        self.dirty = true;
    }

    /// Force the next frame to push even if geometry is unchanged.
    pub fn refresh(&mut self) {
        self.dirty = true;
    }

    /// Run the frame requested by the live loop, if any.
    pub fn run_frames<E: Environment + ?Sized>(&mut self, now: Instant, env: &mut E) {
        for token in self.frames.drain() {
            if !self
                .source
                .as_ref()
                .is_some_and(|source| token.is_from(source))
            {
                continue;
            }
            self.frame(now, env);
            self.frames.request(token);
        }
    }

    fn frame<E: Environment + ?Sized>(&mut self, now: Instant, env: &mut E) {
        let Some(current) = self.current.as_mut() else {
            tracing::error!(target: "waymark.tracker", "frame loop running without a target");
            return;
        };
        let to = current.geometry(&*env);
        let viewport = env.viewport();

        let next = match self.transition.as_mut() {
            Some(transition) => {
                let started = *transition.started_at.get_or_insert(now);
                let t = progress(now.saturating_duration_since(started), self.window);
                let eased = transition.from.interpolate(&to, self.easing.apply(t));
                if t >= 1.0 {
                    self.transition = None;
                }
                Some(eased)
            }
            None => {
                let changed =
                    self.last_pushed != Some(to) || self.last_viewport != Some(viewport);
                (self.dirty || changed).then_some(to)
            }
        };

        if let Some(geometry) = next {
            self.push(geometry, viewport, env);
        }
    }

    fn push<E: Environment + ?Sized>(
        &mut self,
        geometry: CutoutGeometry,
        viewport: Size,
        env: &mut E,
    ) {
        env.render_overlay(&geometry, viewport);
        if let Some(panel) = self.current.as_mut().and_then(Target::panel_mut) {
            panel.refresh(env, geometry.anchor(), geometry.padding);
        }
        self.last_pushed = Some(geometry);
        self.last_viewport = Some(viewport);
        self.dirty = false;
    }

    /// Tear down the highlight.
    ///
    /// `immediate` is accepted for hosts that distinguish animated exits; it
    /// currently behaves the same as a regular clear.
    pub fn clear<E: Environment + ?Sized>(
        &mut self,
        immediate: bool,
        reason: ExitReason,
        on_reset: Option<&ExitHook>,
        env: &mut E,
    ) {
        if let Some(mut current) = self.current.take() {
            if let Some(hook) = on_reset {
                hook(current.element(), reason);
            }
            current.on_deselected(env);
        }
        self.previous = None;
        if let Some(source) = self.source.take() {
            source.cancel();
        }
        self.frames.clear();
        self.transition = None;
        self.last_pushed = None;
        self.last_viewport = None;
        self.dirty = false;
        env.unmount_overlay();
        tracing::debug!(target: "waymark.tracker", immediate, %reason, "highlight cleared");
    }
}
