#![forbid(unsafe_code)]

//! Highlight cutout geometry.
//!
//! A [`CutoutGeometry`] describes the rounded hole punched into the dimmed
//! overlay around the highlighted element. It is plain data: the tracker
//! interpolates it every frame and a backend turns it into pixels.
//!
//! # Invariants
//!
//! 1. The hole is the element rect grown by `padding` on every side.
//! 2. The effective corner radius never exceeds half of the hole's width or
//!    height, is never negative, and is floored to whole pixels.
//! 3. Interpolation is component-wise; `interpolate(a, b, 0) == a` and
//!    `interpolate(a, b, 1) == b`.

use std::fmt::Write as _;

use crate::animation::lerp;
use crate::geometry::{Point, Rect, Size};

/// Geometry of the highlight hole.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CutoutGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Breathing room around the element.
    pub padding: f64,
    /// Requested corner radius.
    pub radius: f64,
}

impl CutoutGeometry {
    /// Build cutout geometry around an element rect.
    pub const fn from_rect(rect: Rect, padding: f64, radius: f64) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            padding,
            radius,
        }
    }

    /// The unpadded element rect.
    #[inline]
    pub const fn anchor(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// The padded hole.
    #[inline]
    pub fn hole(&self) -> Rect {
        self.anchor().inflate(self.padding)
    }

    /// Corner radius after limiting it to the hole size.
    pub fn effective_radius(&self) -> f64 {
        let hole = self.hole();
        self.radius
            .min(hole.width / 2.0)
            .min(hole.height / 2.0)
            .max(0.0)
            .floor()
    }

    /// Component-wise interpolation toward `to` at eased progress `t`.
    #[must_use]
    pub fn interpolate(&self, to: &CutoutGeometry, t: f64) -> CutoutGeometry {
        CutoutGeometry {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            width: lerp(self.width, to.width, t),
            height: lerp(self.height, to.height, t),
            padding: lerp(self.padding, to.padding, t),
            radius: lerp(self.radius, to.radius, t),
        }
    }

    /// Resolve the mask for a viewport.
    pub fn mask(&self, viewport: Size) -> CutoutMask {
        CutoutMask {
            viewport: viewport.to_rect(),
            hole: self.hole(),
            radius: self.effective_radius(),
        }
    }

    /// SVG path for the overlay: the viewport rectangle followed by the
    /// rounded hole, drawn with opposite winding so `fill-rule: evenodd`
    /// leaves the hole transparent.
    pub fn svg_path(&self, viewport: Size) -> String {
        let vw = viewport.width;
        let vh = viewport.height;
        let hole = self.hole();
        let r = self.effective_radius();

        let box_x = hole.x + r;
        let box_y = hole.y;
        let box_w = hole.width - r * 2.0;
        let box_h = hole.height - r * 2.0;

        let mut path = String::with_capacity(192);
        let _ = write!(path, "M{vw},0L0,0L0,{vh}L{vw},{vh}L{vw},0Z");
        let _ = write!(
            path,
            "M{box_x},{box_y} h{box_w} a{r},{r} 0 0 1 {r},{r} v{box_h} \
             a{r},{r} 0 0 1 -{r},{r} h-{box_w} a{r},{r} 0 0 1 -{r},-{r} \
             v-{box_h} a{r},{r} 0 0 1 {r},-{r} z"
        );
        path
    }
}

/// A resolved overlay mask: the dimmed viewport minus a rounded hole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutoutMask {
    pub viewport: Rect,
    pub hole: Rect,
    pub radius: f64,
}

impl CutoutMask {
    /// Whether `point` falls inside the rounded hole.
    pub fn in_hole(&self, point: Point) -> bool {
        if !self.hole.contains(point) {
            return false;
        }
        let r = self.radius;
        if r <= 0.0 {
            return true;
        }

        // Only the four corner squares need the circle test.
        let cx = if point.x < self.hole.x + r {
            self.hole.x + r
        } else if point.x > self.hole.right() - r {
            self.hole.right() - r
        } else {
            return true;
        };
        let cy = if point.y < self.hole.y + r {
            self.hole.y + r
        } else if point.y > self.hole.bottom() - r {
            self.hole.bottom() - r
        } else {
            return true;
        };

        let dx = point.x - cx;
        let dy = point.y - cy;
        dx * dx + dy * dy <= r * r
    }

    /// Whether `point` is covered by the dimmed overlay.
    pub fn is_dimmed(&self, point: Point) -> bool {
        self.viewport.contains(point) && !self.in_hole(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom() -> CutoutGeometry {
        CutoutGeometry::from_rect(Rect::new(100.0, 50.0, 200.0, 40.0), 10.0, 5.0)
    }

    #[test]
    fn hole_adds_padding() {
        assert_eq!(geom().hole(), Rect::new(90.0, 40.0, 220.0, 60.0));
    }

    #[test]
    fn radius_limited_by_small_hole() {
        let g = CutoutGeometry::from_rect(Rect::new(0.0, 0.0, 6.0, 4.0), 0.0, 50.0);
        assert_eq!(g.effective_radius(), 2.0);
    }

    #[test]
    fn radius_never_negative_and_floored() {
        let g = CutoutGeometry::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0, -4.0);
        assert_eq!(g.effective_radius(), 0.0);
        let g = CutoutGeometry::from_rect(Rect::new(0.0, 0.0, 100.0, 100.0), 0.0, 3.7);
        assert_eq!(g.effective_radius(), 3.0);
    }

    #[test]
    fn interpolate_endpoints() {
        let a = geom();
        let b = CutoutGeometry::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, 0.0);
        assert_eq!(a.interpolate(&b, 0.0), a);
        assert_eq!(a.interpolate(&b, 1.0), b);
        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.x, 50.0);
        assert_eq!(mid.padding, 5.0);
        assert_eq!(mid.radius, 2.5);
    }

    #[test]
    fn svg_path_contains_viewport_and_hole() {
        let path = geom().svg_path(Size::new(800.0, 600.0));
        assert!(path.starts_with("M800,0L0,0L0,600L800,600L800,0Z"));
        assert!(path.contains("M95,40 h210 a5,5 0 0 1 5,5 v50"));
        assert!(path.ends_with('z'));
    }

    #[test]
    fn mask_hole_corners_are_rounded() {
        let g = CutoutGeometry::from_rect(Rect::new(10.0, 10.0, 20.0, 20.0), 0.0, 5.0);
        let mask = g.mask(Size::new(100.0, 100.0));
        assert!(mask.in_hole(Point::new(20.0, 20.0)));
        // Extreme corner sits outside the arc.
        assert!(!mask.in_hole(Point::new(10.2, 10.2)));
        assert!(mask.is_dimmed(Point::new(10.2, 10.2)));
        // Edge midpoints are inside.
        assert!(mask.in_hole(Point::new(10.0, 20.0)));
    }

    #[test]
    fn outside_viewport_is_not_dimmed() {
        let mask = geom().mask(Size::new(800.0, 600.0));
        assert!(!mask.is_dimmed(Point::new(-1.0, 10.0)));
        assert!(mask.is_dimmed(Point::new(1.0, 1.0)));
        assert!(!mask.is_dimmed(Point::new(150.0, 60.0)));
    }
}
