#![forbid(unsafe_code)]

//! The tour state machine.
//!
//! A [`Tour`] is either idle (no session) or active. Every movement
//! (`start`, `highlight`, `next`, `previous`) is recorded with a fresh
//! [`MovementId`] before any hook runs, then walks through up to two pause
//! points:
//!
//! 1. The incoming step's `prepare_element` hook.
//! 2. For `next`/`previous`, the outgoing step's `on_next`/`on_previous`.
//!
//! A hook that calls `prevent_move` halts the movement at that point. The
//! host resumes it with [`Tour::continue_move`], which replays the recorded
//! phase on the next [`Tour::tick`].
//!
//! # Skipping
//!
//! Steps whose selector does not resolve are skipped with a warning. The
//! skip always moves in the direction of travel and is bounded by the step
//! count: forward skips end in `reset(false, Finish)`, backward skips rewind
//! to the first step and retry forward.
//!
//! # Failure Modes
//!
//! Misuse of the prevent/continue protocol is logged at `warn` and changes
//! nothing. Internal state that should exist but does not is logged at
//! `error` and the operation is abandoned.

mod input;

pub use input::Propagation;

use waymark_core::ElementId;
use waymark_runtime::TaskQueue;
use web_time::Instant;

use crate::config::{ExitReason, StrictClick, TourConfig};
use crate::env::{Environment, resolve_selector};
use crate::movement::{Movement, MovementCounter, MovementId, MovementKind, MovementPayload};
use crate::panel::{PanelIndices, PanelOptions, PanelPresenter};
use crate::step::{Hook, HookContext, Initiator, StepDefinition, TourHooks};
use crate::target::{Target, TargetOptions, TargetOrigin};
use crate::tracker::HighlightTracker;

/// Where a paused `next`/`previous` will land when it resumes.
#[derive(Debug)]
enum Staged {
    Step(usize, Target),
    Finish,
}

#[derive(Debug, Default)]
struct Session {
    /// `None` while an ad-hoc highlight is shown.
    current_index: Option<usize>,
    last_movement: Option<Movement>,
    prevented: Option<MovementId>,
    staged: Option<Staged>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Continue,
}

/// A guided tour over an [`Environment`].
#[derive(Debug)]
pub struct Tour<E: Environment> {
    env: E,
    config: TourConfig,
    hooks: TourHooks,
    steps: Vec<StepDefinition>,
    session: Option<Session>,
    tracker: HighlightTracker,
    tasks: TaskQueue<Deferred>,
    movements: MovementCounter,
}

impl<E: Environment> Tour<E> {
    pub fn new(env: E, config: TourConfig) -> Self {
        let tracker = HighlightTracker::new(config.transition()).with_easing(config.easing);
        Self {
            env,
            config,
            hooks: TourHooks::default(),
            steps: Vec::new(),
            session: None,
            tracker,
            tasks: TaskQueue::new(),
            movements: MovementCounter::default(),
        }
    }

    /// Build a tour from a loaded manifest.
    #[cfg(feature = "config")]
    pub fn from_manifest(env: E, manifest: crate::config::TourManifest) -> Self {
        Self::new(env, manifest.config).with_steps(manifest.steps)
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: TourHooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[must_use]
    pub fn with_steps(mut self, steps: Vec<StepDefinition>) -> Self {
        self.steps = steps;
        self
    }

    // ---------------------------------------------------------------------
    // Movements
    // ---------------------------------------------------------------------

    /// Start the tour at step `index`.
    pub fn start(&mut self, index: usize) {
        if index >= self.steps.len() {
            tracing::warn!(
                target: "waymark.tour",
                index,
                steps = self.steps.len(),
                "start index out of range; nothing to start"
            );
            return;
        }
        let _span = tracing::debug_span!("tour.start", index).entered();
        self.ensure_session();
        self.record(MovementKind::Start, MovementPayload::Index(index));
        if self.prepare(index, Initiator::Init) {
            return;
        }
        self.handle_start(index);
    }

    /// Highlight a single element outside the step sequence.
    pub fn highlight(&mut self, step: impl Into<StepDefinition>) {
        let step = step.into();
        let _span = tracing::debug_span!("tour.highlight", selector = %step.selector).entered();
        self.ensure_session();
        self.record(
            MovementKind::Highlight,
            MovementPayload::Step(Box::new(step.clone())),
        );
        if let Some(hook) = step.prepare_element.clone()
            && self.run_prepare(&hook, None, Initiator::Init)
        {
            return;
        }
        self.handle_highlight(step);
    }

    /// Move forward one step; finishes the tour past the last one.
    pub fn next(&mut self) {
        let Some(index) = self.step_position("next") else {
            return;
        };
        let _span = tracing::debug_span!("tour.next", from = index).entered();
        self.request_next(index + 1);
    }

    /// Move back one step.
    pub fn previous(&mut self) {
        let Some(index) = self.step_position("previous") else {
            return;
        };
        let _span = tracing::debug_span!("tour.previous", from = index).entered();
        self.request_previous(index.checked_sub(1));
    }

    /// End the tour.
    ///
    /// `immediate` is forwarded to the tracker and currently has no distinct
    /// effect.
    pub fn reset(&mut self, immediate: bool, reason: ExitReason) {
        if self.session.take().is_none() {
            tracing::debug!(target: "waymark.tour", %reason, "reset while idle");
            return;
        }
        self.tracker
            .clear(immediate, reason, self.hooks.on_reset.as_ref(), &mut self.env);
        self.env.detach_listeners();
        self.env.clear_strict_click();
        self.tasks.clear();
        tracing::info!(target: "waymark.tour", %reason, "tour ended");
    }

    // ---------------------------------------------------------------------
    // Prevent / continue
    // ---------------------------------------------------------------------

    /// Pause the most recent movement. Returns whether it took effect.
    pub fn prevent_move(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            tracing::warn!(target: "waymark.tour", "prevent_move called while no tour is active");
            return false;
        };
        let Some(last) = session.last_movement.as_ref() else {
            tracing::warn!(target: "waymark.tour", "prevent_move called with no movement requested");
            return false;
        };
        match session.prevented {
            Some(id) if id == last.id => {
                tracing::warn!(
                    target: "waymark.tour",
                    movement = %id,
                    "movement already prevented"
                );
                false
            }
            Some(id) => {
                tracing::warn!(
                    target: "waymark.tour",
                    prevented = %id,
                    requested = %last.id,
                    "another movement is already prevented"
                );
                false
            }
            None => {
                tracing::debug!(
                    target: "waymark.tour",
                    movement = %last.id,
                    kind = %last.kind,
                    "movement prevented"
                );
                session.prevented = Some(last.id);
                true
            }
        }
    }

    /// Resume the prevented movement on the next [`tick`](Self::tick).
    pub fn continue_move(&mut self) {
        self.tasks.defer(Deferred::Continue);
    }

    /// Drop the pause without resuming.
    pub fn clear_move_prevented(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.prevented = None;
        }
    }

    pub fn is_move_prevented(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.prevented.is_some())
    }

    // ---------------------------------------------------------------------
    // Driving
    // ---------------------------------------------------------------------

    /// Advance one host frame: run deferred continuations, then the
    /// highlight frame loop.
    pub fn tick(&mut self, now: Instant) {
        for task in self.tasks.drain() {
            match task {
                Deferred::Continue => self.run_continue(),
            }
        }
        self.tracker.run_frames(now, &mut self.env);
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Active step index; `None` when idle or showing an ad-hoc highlight.
    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().and_then(|session| session.current_index)
    }

    pub fn has_next_step(&self) -> bool {
        self.current_index()
            .is_some_and(|index| index + 1 < self.steps.len())
    }

    pub fn has_previous_step(&self) -> bool {
        self.current_index().is_some_and(|index| index > 0)
    }

    pub fn highlighted_element(&self) -> Option<ElementId> {
        self.tracker.highlighted_element()
    }

    /// Element highlighted before the current one.
    pub fn last_highlighted_element(&self) -> Option<ElementId> {
        self.tracker.previous_element()
    }

    pub fn last_movement(&self) -> Option<&Movement> {
        self.session
            .as_ref()
            .and_then(|session| session.last_movement.as_ref())
    }

    /// Panel of the highlighted target, if it has one.
    pub fn active_panel(&self) -> Option<&PanelPresenter> {
        self.tracker.current().and_then(Target::panel)
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Replace the step list. An active tour is cancelled first.
    pub fn define_steps(&mut self, steps: Vec<StepDefinition>) {
        if self.is_active() {
            tracing::warn!(
                target: "waymark.tour",
                "steps redefined while a tour is active; cancelling it"
            );
            self.reset(false, ExitReason::Cancel);
        }
        self.steps = steps;
    }

    pub fn config(&self) -> &TourConfig {
        &self.config
    }

    pub fn tracker(&self) -> &HighlightTracker {
        &self.tracker
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_env(self) -> E {
        self.env
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn ensure_session(&mut self) {
        if self.session.is_none() {
            self.session = Some(Session::default());
            self.env.attach_listeners();
            tracing::info!(target: "waymark.tour", steps = self.steps.len(), "tour started");
        }
    }

    fn step_position(&self, action: &'static str) -> Option<usize> {
        let Some(session) = self.session.as_ref() else {
            tracing::warn!(target: "waymark.tour", action, "no active tour");
            return None;
        };
        if session.current_index.is_none() {
            tracing::warn!(
                target: "waymark.tour",
                action,
                "ad-hoc highlight has no neighboring steps"
            );
        }
        session.current_index
    }

    fn record(&mut self, kind: MovementKind, payload: MovementPayload) {
        let movement = self.movements.record(kind, payload);
        tracing::trace!(
            target: "waymark.tour",
            movement = %movement.id,
            kind = %movement.kind,
            "movement requested"
        );
        match self.session.as_mut() {
            Some(session) => session.last_movement = Some(movement),
            None => tracing::error!(
                target: "waymark.tour",
                kind = %kind,
                "movement recorded without an active tour"
            ),
        }
    }

    /// Run step `index`'s `prepare_element`. Returns whether it halted the
    /// movement.
    fn prepare(&mut self, index: usize, initiator: Initiator) -> bool {
        let Some(hook) = self
            .steps
            .get(index)
            .and_then(|step| step.prepare_element.clone())
        else {
            return false;
        };
        self.run_prepare(&hook, Some(index), initiator)
    }

    fn run_prepare(&mut self, hook: &Hook, index: Option<usize>, initiator: Initiator) -> bool {
        let mut ctx = HookContext::new(None, index).with_initiator(initiator);
        hook(&mut ctx);
        ctx.prevent_requested() && self.prevent_move()
    }

    fn handle_start(&mut self, index: usize) {
        let target = self.resolve_step(index);
        if let Some(session) = self.session.as_mut() {
            session.current_index = Some(index);
        }
        if let Some(hook) = self.hooks.on_start.clone() {
            let mut ctx = HookContext::new(target.as_ref().map(Target::element), Some(index));
            hook(&mut ctx);
            if ctx.prevent_requested() {
                tracing::debug!(target: "waymark.tour", "on_start cannot prevent the start");
            }
        }
        match target {
            Some(target) => self.activate(target),
            None => self.request_next(index + 1),
        }
    }

    fn handle_highlight(&mut self, step: StepDefinition) {
        let Some(target) = self.resolve_definition(&step, TargetOrigin::Adhoc, PanelIndices::new(0, 1))
        else {
            if self.tracker.current().is_none() {
                self.reset(false, ExitReason::Cancel);
            }
            return;
        };
        if target.is_same(self.tracker.current()) {
            tracing::debug!(
                target: "waymark.tour",
                element = %target.element(),
                "element already highlighted"
            );
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.current_index = None;
        }
        self.activate(target);
    }

    fn request_next(&mut self, index: usize) {
        self.record(MovementKind::PrepareNext, MovementPayload::Index(index));
        if index < self.steps.len() && self.prepare(index, Initiator::Next) {
            return;
        }
        self.handle_next(index);
    }

    fn handle_next(&mut self, index: usize) {
        let staged = if index >= self.steps.len() {
            Staged::Finish
        } else {
            match self.resolve_step(index) {
                Some(target) => Staged::Step(index, target),
                None => {
                    self.request_next(index + 1);
                    return;
                }
            }
        };
        self.stage(staged);
        self.record(MovementKind::Next, MovementPayload::Index(index));
        let halted = self.tracker.current().is_some_and(Target::fire_on_next);
        if halted && self.prevent_move() {
            return;
        }
        self.move_next();
    }

    fn move_next(&mut self) {
        match self.take_staged() {
            Some(Staged::Step(index, target)) => self.land(index, target),
            Some(Staged::Finish) => self.reset(false, ExitReason::Finish),
            None => tracing::error!(target: "waymark.tour", "no staged step to move to"),
        }
    }

    fn request_previous(&mut self, index: Option<usize>) {
        let payload = index.map_or(MovementPayload::Rewind, MovementPayload::Index);
        self.record(MovementKind::PreparePrevious, payload);
        if let Some(index) = index
            && self.prepare(index, Initiator::Prev)
        {
            return;
        }
        self.handle_previous(index);
    }

    fn handle_previous(&mut self, index: Option<usize>) {
        let Some(index) = index else {
            self.rewind();
            return;
        };
        let Some(target) = self.resolve_step(index) else {
            self.request_previous(index.checked_sub(1));
            return;
        };
        self.stage(Staged::Step(index, target));
        self.record(MovementKind::Previous, MovementPayload::Index(index));
        let halted = self.tracker.current().is_some_and(Target::fire_on_previous);
        if halted && self.prevent_move() {
            return;
        }
        self.move_previous();
    }

    fn move_previous(&mut self) {
        match self.take_staged() {
            Some(Staged::Step(index, target)) => self.land(index, target),
            Some(Staged::Finish) => {
                tracing::error!(target: "waymark.tour", "backward movement staged a finish");
            }
            None => tracing::error!(target: "waymark.tour", "no staged step to move to"),
        }
    }

    /// Went back past the first step: restart at 0, skipping forward.
    fn rewind(&mut self) {
        tracing::debug!(target: "waymark.tour", "before the first step; rewinding");
        if let Some(session) = self.session.as_mut() {
            session.current_index = Some(0);
        }
        match self.resolve_step(0) {
            Some(target) => self.activate(target),
            None => self.request_next(1),
        }
    }

    fn stage(&mut self, staged: Staged) {
        match self.session.as_mut() {
            Some(session) => session.staged = Some(staged),
            None => tracing::error!(target: "waymark.tour", "cannot stage a step without a session"),
        }
    }

    fn take_staged(&mut self) -> Option<Staged> {
        self.session.as_mut().and_then(|session| session.staged.take())
    }

    fn land(&mut self, index: usize, target: Target) {
        if let Some(session) = self.session.as_mut() {
            session.current_index = Some(index);
        }
        self.activate(target);
    }

    fn activate(&mut self, target: Target) {
        self.env.clear_strict_click();
        let mode = target.options().strict_click;
        if mode != StrictClick::Off {
            self.env.set_strict_click(mode);
        }
        self.tracker.highlight(target, &mut self.env);
    }

    fn run_continue(&mut self) {
        let Some(session) = self.session.as_mut() else {
            tracing::warn!(target: "waymark.tour", "continue_move with no active tour");
            return;
        };
        let Some(prevented) = session.prevented else {
            tracing::warn!(target: "waymark.tour", "continue_move with no prevented movement");
            return;
        };
        let Some(last) = session.last_movement.as_ref() else {
            tracing::warn!(target: "waymark.tour", "continue_move with no movement requested");
            return;
        };
        if last.id != prevented {
            tracing::warn!(
                target: "waymark.tour",
                prevented = %prevented,
                latest = %last.id,
                "stale continuation; a newer movement superseded it"
            );
            return;
        }
        session.prevented = None;
        let kind = last.kind;
        let payload = last.payload.clone();
        let _span = tracing::debug_span!("tour.continue", movement = %prevented, kind = %kind).entered();

        match (kind, payload) {
            (MovementKind::Start, MovementPayload::Index(index)) => self.handle_start(index),
            (MovementKind::Highlight, MovementPayload::Step(step)) => self.handle_highlight(*step),
            (MovementKind::PrepareNext, MovementPayload::Index(index)) => self.handle_next(index),
            (MovementKind::Next, _) => self.move_next(),
            (MovementKind::PreparePrevious, MovementPayload::Index(index)) => {
                self.handle_previous(Some(index));
            }
            (MovementKind::PreparePrevious, MovementPayload::Rewind) => self.handle_previous(None),
            (MovementKind::Previous, _) => self.move_previous(),
            (kind, payload) => tracing::error!(
                target: "waymark.tour",
                kind = %kind,
                payload = ?payload,
                "movement payload does not match its kind"
            ),
        }
    }

    fn resolve_step(&self, index: usize) -> Option<Target> {
        let Some(step) = self.steps.get(index) else {
            tracing::error!(target: "waymark.tour", index, "step index out of range");
            return None;
        };
        let target = self.resolve_definition(
            step,
            TargetOrigin::Step(index),
            PanelIndices::new(index, self.steps.len()),
        );
        if target.is_none() {
            tracing::warn!(target: "waymark.tour", index, "skipping step");
        }
        target
    }

    fn resolve_definition(
        &self,
        step: &StepDefinition,
        origin: TargetOrigin,
        indices: PanelIndices,
    ) -> Option<Target> {
        let resolved = match resolve_selector(&self.env, &step.selector) {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!(
                    target: "waymark.tour",
                    selector = %step.selector,
                    error = %err,
                    "target not found"
                );
                return None;
            }
        };
        if resolved.match_count > 1 {
            tracing::warn!(
                target: "waymark.tour",
                selector = %step.selector,
                matches = resolved.match_count,
                "selector matches several elements; using the first"
            );
        }
        let panel = step
            .panel
            .as_ref()
            .and_then(|content| PanelOptions::merge(&self.config.panel, content))
            .map(|options| PanelPresenter::new(options, indices));
        Some(Target::new(
            resolved.element,
            origin,
            TargetOptions::merge(&self.config, step),
            step.hooks.or(&self.hooks.step),
            panel,
        ))
    }
}
