#![forbid(unsafe_code)]

//! Host-driven macrotask queue and animation-frame requests.
//!
//! Waymark never owns an event loop. The host calls its driver once per
//! animation frame; the driver drains work through the two queues here:
//!
//! - [`TaskQueue`]: deferred macrotasks. Work queued while a drain is running
//!   lands in the *next* drain, which is what makes a deferral last at least
//!   one tick.
//! - [`FrameScheduler`]: one-shot frame requests, each guarded by a
//!   [`CancellationToken`]. Requests whose token was cancelled are dropped
//!   when drained.
//!
//! # Invariants
//!
//! 1. Tasks drain in FIFO order.
//! 2. `drain` only returns work queued before the call.
//! 3. A cancelled frame request is never returned.

use std::collections::VecDeque;

use crate::cancellation::CancellationToken;

/// FIFO queue of deferred macrotasks.
#[derive(Debug)]
pub struct TaskQueue<T> {
    tasks: VecDeque<T>,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Defer `task` to the next drain.
    pub fn defer(&mut self, task: T) {
        self.tasks.push_back(task);
    }

    /// Take every task queued so far.
    pub fn drain(&mut self) -> Vec<T> {
        self.tasks.drain(..).collect()
    }

    /// Number of queued tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Drop every queued task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

/// Token-guarded animation-frame requests.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    requests: Vec<CancellationToken>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a callback on the next frame for the loop owning `token`.
    pub fn request(&mut self, token: CancellationToken) {
        self.requests.push(token);
    }

    /// Take every live request queued so far.
    pub fn drain(&mut self) -> Vec<CancellationToken> {
        let requested = self.requests.len();
        let live: Vec<CancellationToken> = self
            .requests
            .drain(..)
            .filter(|token| !token.is_cancelled())
            .collect();
        let dropped = requested - live.len();
        if dropped > 0 {
            tracing::trace!(
                target: "waymark.scheduler",
                dropped,
                "dropped superseded frame requests"
            );
        }
        live
    }

    /// Whether any request (live or not) is queued.
    pub fn has_pending(&self) -> bool {
        !self.requests.is_empty()
    }

    /// Drop every queued request.
    pub fn clear(&mut self) {
        self.requests.clear();
    }
}
