#![forbid(unsafe_code)]

//! Runtime plumbing for Waymark: cancellation and host-driven scheduling.
//!
//! The engine is single-threaded and cooperative. It is driven entirely by
//! the host's per-frame callback; this crate provides the two primitives that
//! model the host's event loop headlessly:
//!
//! - [`cancellation`]: tokens that let a newer frame loop supersede an older
//!   one without explicit bookkeeping.
//! - [`scheduler`]: a macrotask queue (for deferred continuations) and
//!   token-guarded frame requests.

pub mod cancellation;
pub mod scheduler;

pub use cancellation::{CancellationSource, CancellationToken};
pub use scheduler::{FrameScheduler, TaskQueue};
