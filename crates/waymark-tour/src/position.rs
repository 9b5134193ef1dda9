#![forbid(unsafe_code)]

//! Panel placement relative to an anchor rect.
//!
//! [`PositionRequest::solve`] picks the side of the anchor the panel goes on,
//! aligns it along the cross axis, and orients the pointer tip.
//!
//! # Algorithm
//!
//! 1. The panel's *box* is its measured size grown by the cutout padding and
//!    the panel offset. A side is *optimal* when the box fits between the
//!    anchor and that viewport edge.
//! 2. The preferred side wins when optimal; otherwise the first optimal side
//!    of [`Side::PRIORITY`].
//! 3. Main axis: the panel sits one box-length away from the anchor edge,
//!    capped so the panel plus tip stays inside the viewport.
//! 4. Cross axis: aligned per [`Alignment`], clamped to
//!    `[tip, extent - length - tip]`.
//! 5. No optimal side: horizontally centered, 10 px above the bottom edge,
//!    no tip.
//!
//! # Invariants
//!
//! - Exactly one of `top`/`bottom` and one of `left`/`right` is set.
//! - A side is only chosen when its box fits; an anchor flush with the top
//!   edge never gets a `Top` panel.

use waymark_core::{Rect, Size};

use crate::config::{Alignment, Side};

/// Distance from the bottom edge when no side fits.
pub const FALLBACK_BOTTOM: f64 = 10.0;

/// Edge and alignment of the panel's pointer tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tip {
    /// Edge of the panel the tip sits on.
    pub side: Side,
    pub alignment: Alignment,
}

/// Solved panel position, in viewport coordinates.
///
/// `top`/`left` are distances from the top/left viewport edge to the
/// panel's top/left edge; `bottom`/`right` are measured from the opposite
/// edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPlacement {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
    /// Chosen side; `None` when nothing fit.
    pub side: Option<Side>,
    pub alignment: Alignment,
    pub tip: Option<Tip>,
}

impl PanelPlacement {
    /// Top-left corner of the panel, given its size and the viewport.
    pub fn origin(&self, panel: Size, viewport: Size) -> (f64, f64) {
        let x = match (self.left, self.right) {
            (Some(left), _) => left,
            (None, Some(right)) => viewport.width - right - panel.width,
            (None, None) => 0.0,
        };
        let y = match (self.top, self.bottom) {
            (Some(top), _) => top,
            (None, Some(bottom)) => viewport.height - bottom - panel.height,
            (None, None) => 0.0,
        };
        (x, y)
    }
}

/// Inputs to the placement solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRequest {
    /// Highlighted element rect (unpadded).
    pub anchor: Rect,
    /// Measured panel size.
    pub panel: Size,
    /// Tip edge length.
    pub tip: f64,
    pub alignment: Alignment,
    pub preferred_side: Option<Side>,
    /// Cutout padding.
    pub padding: f64,
    /// Gap between cutout and panel.
    pub offset: f64,
    pub viewport: Size,
}

impl PositionRequest {
    fn box_size(&self) -> Size {
        self.panel.grow(self.padding + self.offset)
    }

    /// Room left between the anchor and the viewport edge on `side` once the
    /// box is placed there. Non-negative means the side is optimal.
    fn room(&self, side: Side) -> f64 {
        let boxed = self.box_size();
        match side {
            Side::Top => self.anchor.top() - boxed.height,
            Side::Bottom => self.viewport.height - (self.anchor.bottom() + boxed.height),
            Side::Left => self.anchor.left() - boxed.width,
            Side::Right => self.viewport.width - (self.anchor.right() + boxed.width),
        }
    }

    /// Whether the panel fits on `side`.
    pub fn is_optimal(&self, side: Side) -> bool {
        self.room(side) >= 0.0
    }

    /// Side the solver will use, if any.
    pub fn pick_side(&self) -> Option<Side> {
        if let Some(side) = self.preferred_side
            && self.is_optimal(side)
        {
            return Some(side);
        }
        Side::PRIORITY
            .into_iter()
            .find(|&side| self.is_optimal(side))
    }

    /// Solve the placement.
    pub fn solve(&self) -> PanelPlacement {
        let Some(side) = self.pick_side() else {
            return PanelPlacement {
                top: None,
                bottom: Some(FALLBACK_BOTTOM),
                left: Some(self.viewport.width / 2.0 - self.panel.width / 2.0),
                right: None,
                side: None,
                alignment: self.alignment,
                tip: None,
            };
        };

        let main = self.main_axis(side);
        let cross = self.cross_axis(side);
        let (top, bottom, left, right) = match side {
            Side::Top => (Some(main), None, Some(cross), None),
            Side::Bottom => (None, Some(main), Some(cross), None),
            Side::Left => (Some(cross), None, Some(main), None),
            Side::Right => (Some(cross), None, None, Some(main)),
        };

        PanelPlacement {
            top,
            bottom,
            left,
            right,
            side: Some(side),
            alignment: self.alignment,
            tip: Some(self.tip_for(side)),
        }
    }

    fn main_axis(&self, side: Side) -> f64 {
        let extent_room = if side.is_vertical() {
            self.viewport.height - self.panel.height
        } else {
            self.viewport.width - self.panel.width
        };
        self.room(side).min(extent_room - self.tip)
    }

    fn cross_axis(&self, side: Side) -> f64 {
        let (start, length, extent, panel) = if side.is_vertical() {
            (
                self.anchor.left(),
                self.anchor.width,
                self.viewport.width,
                self.panel.width,
            )
        } else {
            (
                self.anchor.top(),
                self.anchor.height,
                self.viewport.height,
                self.panel.height,
            )
        };
        let aligned = match self.alignment {
            Alignment::Start => start - self.padding,
            Alignment::End => start + length + self.padding - panel,
            Alignment::Center => start + length / 2.0 - panel / 2.0,
        };
        aligned.min(extent - panel - self.tip).max(self.tip)
    }

    /// Tip orientation. Normally the mirror of `side`; when the anchor has
    /// scrolled partly or fully out of view along the cross axis the tip
    /// slides to the matching end or moves to the panel edge facing it.
    fn tip_for(&self, side: Side) -> Tip {
        let boxed = self.box_size();
        let (start, length, extent, panel, before, after) = if side.is_vertical() {
            (
                self.anchor.left(),
                self.anchor.width,
                self.viewport.width,
                boxed.width,
                Side::Left,
                Side::Right,
            )
        } else {
            (
                self.anchor.top(),
                self.anchor.height,
                self.viewport.height,
                boxed.height,
                Side::Top,
                Side::Bottom,
            )
        };
        let outside_alignment = match side {
            Side::Top | Side::Left => Alignment::End,
            Side::Bottom | Side::Right => Alignment::Start,
        };

        let mut tip = Tip {
            side: side.mirror(),
            alignment: self.alignment,
        };
        if start + length <= 0.0 {
            tip = Tip {
                side: before,
                alignment: outside_alignment,
            };
        } else if start + length - panel <= 0.0 {
            tip = Tip {
                side: side.mirror(),
                alignment: Alignment::Start,
            };
        }
        if start >= extent {
            tip = Tip {
                side: after,
                alignment: outside_alignment,
            };
        } else if start + panel >= extent {
            tip = Tip {
                side: side.mirror(),
                alignment: Alignment::End,
            };
        }
        tip
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(anchor: Rect) -> PositionRequest {
        PositionRequest {
            anchor,
            panel: Size::new(200.0, 100.0),
            tip: 5.0,
            alignment: Alignment::Start,
            preferred_side: None,
            padding: 10.0,
            offset: 10.0,
            viewport: Size::new(1000.0, 800.0),
        }
    }

    #[test]
    fn prefers_top_when_room() {
        let placement = request(Rect::new(300.0, 400.0, 100.0, 40.0)).solve();
        assert_eq!(placement.side, Some(Side::Top));
        // 400 - (100 + 20)
        assert_eq!(placement.top, Some(280.0));
        assert_eq!(placement.left, Some(290.0));
        assert_eq!(placement.bottom, None);
        assert_eq!(placement.right, None);
        assert_eq!(
            placement.tip,
            Some(Tip {
                side: Side::Bottom,
                alignment: Alignment::Start
            })
        );
    }

    #[test]
    fn flush_top_anchor_goes_below() {
        let placement = request(Rect::new(300.0, 0.0, 100.0, 40.0)).solve();
        assert_eq!(placement.side, Some(Side::Bottom));
        // 800 - (40 + 120)
        assert_eq!(placement.bottom, Some(640.0));
        assert_eq!(placement.top, None);
    }

    #[test]
    fn preferred_side_wins_when_optimal() {
        let mut req = request(Rect::new(400.0, 300.0, 100.0, 40.0));
        req.preferred_side = Some(Side::Right);
        let placement = req.solve();
        assert_eq!(placement.side, Some(Side::Right));
        // 1000 - (500 + 220)
        assert_eq!(placement.right, Some(280.0));
        assert_eq!(placement.top, Some(290.0));
        assert_eq!(placement.left, None);
    }

    #[test]
    fn preferred_side_ignored_when_it_does_not_fit() {
        let mut req = request(Rect::new(10.0, 300.0, 100.0, 40.0));
        req.preferred_side = Some(Side::Left);
        assert_eq!(req.solve().side, Some(Side::Top));
    }

    #[test]
    fn nothing_fits_centers_at_bottom() {
        let mut req = request(Rect::new(0.0, 0.0, 1000.0, 800.0));
        req.viewport = Size::new(1000.0, 800.0);
        let placement = req.solve();
        assert_eq!(placement.side, None);
        assert_eq!(placement.tip, None);
        assert_eq!(placement.bottom, Some(FALLBACK_BOTTOM));
        assert_eq!(placement.left, Some(400.0));
    }

    #[test]
    fn alignment_end_and_center() {
        let mut req = request(Rect::new(300.0, 400.0, 100.0, 40.0));
        req.alignment = Alignment::End;
        // 300 + 100 + 10 - 200
        assert_eq!(req.solve().left, Some(210.0));
        req.alignment = Alignment::Center;
        // 350 - 100
        assert_eq!(req.solve().left, Some(250.0));
    }

    #[test]
    fn cross_axis_clamps_to_viewport() {
        let mut req = request(Rect::new(950.0, 400.0, 40.0, 40.0));
        let placement = req.solve();
        // 1000 - 200 - 5
        assert_eq!(placement.left, Some(795.0));

        req.anchor = Rect::new(2.0, 400.0, 40.0, 40.0);
        assert_eq!(req.solve().left, Some(5.0));
    }

    #[test]
    fn tip_follows_anchor_out_of_view() {
        let mut req = request(Rect::new(-200.0, 400.0, 100.0, 40.0));
        let placement = req.solve();
        assert_eq!(placement.side, Some(Side::Top));
        assert_eq!(
            placement.tip,
            Some(Tip {
                side: Side::Left,
                alignment: Alignment::End
            })
        );

        req.anchor = Rect::new(1100.0, 400.0, 100.0, 40.0);
        assert_eq!(
            req.solve().tip,
            Some(Tip {
                side: Side::Right,
                alignment: Alignment::End
            })
        );

        req.anchor = Rect::new(900.0, 400.0, 50.0, 40.0);
        assert_eq!(
            req.solve().tip,
            Some(Tip {
                side: Side::Bottom,
                alignment: Alignment::End
            })
        );
    }

    #[test]
    fn origin_resolves_opposite_offsets() {
        let placement = PanelPlacement {
            top: None,
            bottom: Some(10.0),
            left: None,
            right: Some(20.0),
            side: None,
            alignment: Alignment::Start,
            tip: None,
        };
        assert_eq!(
            placement.origin(Size::new(100.0, 50.0), Size::new(1000.0, 800.0)),
            (880.0, 740.0)
        );
    }
}
