// SPDX-License-Identifier: MIT
//! Cooperative cancellation tokens for frame loops.
//!
//! [`CancellationToken`] is a cloneable signal a per-frame loop polls to find
//! out it has been superseded. Starting a new loop cancels the previous
//! source; any frame request still carrying the old token becomes a silent
//! no-op the next time it is polled.
//!
//! Everything in Waymark runs on the host's UI thread, so the shared flag is
//! an `Rc<Cell<bool>>` rather than an atomic.
//!
//! # Example
//!
//! ```
//! use waymark_runtime::cancellation::CancellationSource;
//!
//! let first = CancellationSource::new();
//! let stale = first.token();
//!
//! // A newer loop supersedes the first one.
//! first.cancel();
//! let second = CancellationSource::new();
//!
//! assert!(stale.is_cancelled());
//! assert!(!second.token().is_cancelled());
//! assert!(!stale.is_from(&second));
//! ```

#![forbid(unsafe_code)]

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// A cloneable cancellation token.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Rc<Cell<bool>>,
}

/// The control handle that triggers cancellation.
///
/// Dropping the source does **not** cancel the token; call
/// [`cancel`](Self::cancel) explicitly.
pub struct CancellationSource {
    inner: Rc<Cell<bool>>,
}

impl CancellationSource {
    /// Create a new cancellation source with an uncancelled token.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Cell::new(false)),
        }
    }

    /// Obtain a cloneable token that observes this source's state.
    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Signal cancellation to every token derived from this source.
    pub fn cancel(&self) {
        self.inner.set(true);
    }

    /// Check whether cancellation has already been requested.
    pub fn is_cancelled(&self) -> bool {
        self.inner.get()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSource")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancellationToken {
    /// Returns `true` if cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.get()
    }

    /// Whether this token was handed out by `source`.
    #[inline]
    pub fn is_from(&self, source: &CancellationSource) -> bool {
        Rc::ptr_eq(&self.inner, &source.inner)
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_starts_uncancelled() {
        let source = CancellationSource::new();
        let token = source.token();
        assert!(!token.is_cancelled());
        assert!(!source.is_cancelled());
    }

    #[test]
    fn cancel_propagates_to_all_clones() {
        let source = CancellationSource::new();
        let t1 = source.token();
        let t2 = t1.clone();
        let t3 = source.token();
        source.cancel();
        assert!(t1.is_cancelled());
        assert!(t2.is_cancelled());
        assert!(t3.is_cancelled());
    }

    #[test]
    fn drop_source_does_not_cancel() {
        let source = CancellationSource::new();
        let token = source.token();
        drop(source);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let source = CancellationSource::new();
        let token = source.token();
        source.cancel();
        source.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn token_identity_tracks_source() {
        let a = CancellationSource::new();
        let b = CancellationSource::new();
        assert!(a.token().is_from(&a));
        assert!(!a.token().is_from(&b));
    }

    #[test]
    fn default_creates_uncancelled_source() {
        let source = CancellationSource::default();
        assert!(!source.is_cancelled());
    }
}
