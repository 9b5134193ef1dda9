#![forbid(unsafe_code)]

//! Test fixtures for Waymark.
//!
//! - [`FakeDocument`]: an in-memory [`Environment`](waymark_tour::Environment)
//!   that journals every side effect.
//! - [`with_captured_tracing`]: run code under a capturing subscriber and
//!   inspect the spans and events it emitted.
//! - [`Clock`]: deterministic frame timestamps.

pub mod document;
pub mod logs;

use std::time::Duration;

use web_time::Instant;

pub use document::{DEFAULT_PANEL, DEFAULT_VIEWPORT, Effect, FakeDocument};
pub use logs::{CaptureHandle, CapturedEvent, CapturedSpan, with_captured_tracing};

/// Hands out monotonically increasing frame timestamps.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    now: Instant,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            now: Instant::now(),
        }
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    /// Advance by `ms` milliseconds and return the new time.
    pub fn advance(&mut self, ms: u64) -> Instant {
        self.now += Duration::from_millis(ms);
        self.now
    }
}
