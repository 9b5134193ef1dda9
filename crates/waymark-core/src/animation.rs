#![forbid(unsafe_code)]

//! Easing curves and interpolation helpers.
//!
//! Everything here is a pure function of normalized progress so the same math
//! can drive an SVG mask, a canvas, or a terminal overlay.
//!
//! # Invariants
//!
//! - `Easing::apply` clamps its input to `[0.0, 1.0]`.
//! - Every curve maps `0.0 -> 0.0` and `1.0 -> 1.0`.
//! - Zero-length windows report full progress instead of dividing by zero.

use std::time::Duration;

/// Easing curve applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Easing {
    /// Linear interpolation.
    Linear,
    /// Quadratic S-curve; the highlight transition default.
    #[default]
    EaseInOutQuad,
    /// Cubic deceleration.
    EaseOutCubic,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0).
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInOutQuad => ease_in_out_quad(t),
            Self::EaseOutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

/// Quadratic ease-in-out on normalized progress.
#[inline]
pub fn ease_in_out_quad(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv / 2.0
    }
}

/// Linear interpolation between `from` and `to`.
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Normalized progress of `elapsed` through a `window`.
///
/// A zero window is already complete.
pub fn progress(elapsed: Duration, window: Duration) -> f64 {
    if window.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / window.as_secs_f64()).clamp(0.0, 1.0)
}
