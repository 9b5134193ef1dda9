#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use waymark_core::{Rect, Size};
use waymark_tour::position::FALLBACK_BOTTOM;
use waymark_tour::{Alignment, PositionRequest, Side};

#[derive(Debug, Arbitrary)]
struct Input {
    anchor: (i16, i16, u16, u16),
    panel: (u16, u16),
    viewport: (u16, u16),
    tip: u8,
    padding: u8,
    offset: u8,
    alignment: u8,
    preferred: Option<u8>,
}

fn side(raw: u8) -> Side {
    Side::PRIORITY[usize::from(raw) % Side::PRIORITY.len()]
}

fn alignment(raw: u8) -> Alignment {
    match raw % 3 {
        0 => Alignment::Start,
        1 => Alignment::Center,
        _ => Alignment::End,
    }
}

fuzz_target!(|input: Input| {
    let (x, y, w, h) = input.anchor;
    let req = PositionRequest {
        anchor: Rect::new(f64::from(x), f64::from(y), f64::from(w), f64::from(h)),
        panel: Size::new(f64::from(input.panel.0), f64::from(input.panel.1)),
        tip: f64::from(input.tip % 32),
        alignment: alignment(input.alignment),
        preferred_side: input.preferred.map(side),
        padding: f64::from(input.padding),
        offset: f64::from(input.offset),
        viewport: Size::new(f64::from(input.viewport.0), f64::from(input.viewport.1)),
    };

    // Solving must never panic and always yields one offset per axis.
    let placement = req.solve();
    assert!(placement.top.is_some() ^ placement.bottom.is_some());
    assert!(placement.left.is_some() ^ placement.right.is_some());
    assert_eq!(placement.tip.is_some(), placement.side.is_some());

    match placement.side {
        Some(chosen) => assert!(req.is_optimal(chosen), "{chosen:?} does not fit"),
        None => assert_eq!(placement.bottom, Some(FALLBACK_BOTTOM)),
    }

    for offset in [placement.top, placement.bottom, placement.left, placement.right]
        .into_iter()
        .flatten()
    {
        assert!(offset.is_finite(), "non-finite offset in {placement:?}");
    }
});
