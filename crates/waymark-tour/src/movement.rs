#![forbid(unsafe_code)]

//! Movement bookkeeping for the prevent/continue protocol.

use std::fmt;

use crate::step::StepDefinition;

/// Monotonic movement identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MovementId(u64);

impl MovementId {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MovementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Phase of a movement a continuation resumes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementKind {
    Start,
    Highlight,
    /// Before the next step's `prepare_element` ran to completion.
    PrepareNext,
    /// Next step resolved; waiting on the current step's `on_next`.
    Next,
    PreparePrevious,
    Previous,
}

impl MovementKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Highlight => "highlight",
            Self::PrepareNext => "prepare-next",
            Self::Next => "next",
            Self::PreparePrevious => "prepare-previous",
            Self::Previous => "previous",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the movement was heading for.
#[derive(Debug, Clone)]
pub enum MovementPayload {
    /// A step index; may equal the step count when finishing.
    Index(usize),
    /// Backward past the first step.
    Rewind,
    /// An ad-hoc step.
    Step(Box<StepDefinition>),
}

/// One recorded movement request.
#[derive(Debug, Clone)]
pub struct Movement {
    pub id: MovementId,
    pub kind: MovementKind,
    pub payload: MovementPayload,
}

/// Hands out increasing [`MovementId`]s.
#[derive(Debug, Default)]
pub(crate) struct MovementCounter {
    next: u64,
}

impl MovementCounter {
    pub(crate) fn record(&mut self, kind: MovementKind, payload: MovementPayload) -> Movement {
        self.next += 1;
        Movement {
            id: MovementId(self.next),
            kind,
            payload,
        }
    }
}
