//! Pure calculation functions for image geometry.
//!
//! All functions here are pure and testable without any I/O or pixels.
//!
//! Every rounding goes through [`round_half_away`]: ties move away from
//! zero, so `12.5 → 13` and `-12.5 → -13`. Centre offsets are computed from
//! the exact scaled extent and rounded only where they are used.

use super::params::{WATERMARK_MARGIN, WATERMARK_MAX_WIDTH_FRACTION};

/// Round to the nearest integer, ties away from zero.
pub fn round_half_away(value: f64) -> i64 {
    // f64::round already rounds half away from zero.
    value.round() as i64
}

/// Fill in a missing target dimension from the source aspect ratio.
///
/// Returns `None` when neither dimension is given (identity clone).
///
/// # Examples
/// ```
/// # use img_resize::imaging::complete_dimensions;
/// // 400x300 source, width 200 → 200x150
/// assert_eq!(complete_dimensions((400, 300), Some(200), None), Some((200, 150)));
/// assert_eq!(complete_dimensions((400, 300), None, None), None);
/// ```
pub fn complete_dimensions(
    source: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
) -> Option<(u32, u32)> {
    let (src_w, src_h) = (source.0 as f64, source.1 as f64);
    match (width, height) {
        (Some(w), Some(h)) => Some((w, h)),
        (Some(w), None) => Some((w, round_half_away(w as f64 * src_h / src_w) as u32)),
        (None, Some(h)) => Some((round_half_away(h as f64 * src_w / src_h) as u32, h)),
        (None, None) => None,
    }
}

/// How the source is fitted into the target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fit {
    /// Scale to fit inside, pad the short axis with transparency.
    Letterbox,
    /// Scale to cover, clip the long axis.
    Cover,
}

impl Fit {
    pub fn from_extend(extend: bool) -> Self {
        if extend { Fit::Letterbox } else { Fit::Cover }
    }
}

/// Destination rectangle of a scaled draw. The offset may be negative and
/// the extent may overflow the canvas; drawing clips to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Where the scaled source lands on a `target` canvas.
///
/// The ratios are compared by cross-multiplication, so equal aspect ratios
/// are detected exactly and take the "not taller" branch: a plain stretch
/// with zero offset.
///
/// # Examples
/// ```
/// # use img_resize::imaging::{plan_fit, Fit, Placement};
/// // 800x600 letterboxed into 100x100 → 100x75 at y = 13
/// assert_eq!(
///     plan_fit((800, 600), (100, 100), Fit::Letterbox),
///     Placement { x: 0, y: 13, width: 100, height: 75 }
/// );
/// ```
pub fn plan_fit(source: (u32, u32), target: (u32, u32), fit: Fit) -> Placement {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    // src_w / src_h < tgt_w / tgt_h
    let source_taller = (src_w as u64) * (tgt_h as u64) < (tgt_w as u64) * (src_h as u64);

    let scale_to_height = match fit {
        Fit::Letterbox => source_taller,
        Fit::Cover => !source_taller,
    };

    if scale_to_height {
        let exact_w = src_w as f64 * tgt_h as f64 / src_h as f64;
        Placement {
            x: round_half_away((tgt_w as f64 - exact_w) / 2.0),
            y: 0,
            width: scaled_extent(exact_w),
            height: tgt_h,
        }
    } else {
        let exact_h = src_h as f64 * tgt_w as f64 / src_w as f64;
        Placement {
            x: 0,
            y: round_half_away((tgt_h as f64 - exact_h) / 2.0),
            width: tgt_w,
            height: scaled_extent(exact_h),
        }
    }
}

/// Rounded scaled size, never collapsing to zero.
fn scaled_extent(exact: f64) -> u32 {
    round_half_away(exact).max(1) as u32
}

/// Watermark rectangle on a `primary` image for a mark of native size `mark`.
///
/// The mark is scaled to a quarter of the primary width, never enlarged past
/// its own width, and anchored 10px from the left and bottom edges.
pub fn plan_watermark(primary: (u32, u32), mark: (u32, u32)) -> Placement {
    let (primary_w, primary_h) = (primary.0 as f64, primary.1 as f64);
    let (mark_w, mark_h) = (mark.0 as f64, mark.1 as f64);

    let width = (primary_w * WATERMARK_MAX_WIDTH_FRACTION).min(mark_w);
    let height = width * mark_h / mark_w;
    let margin = WATERMARK_MARGIN as f64;

    Placement {
        x: WATERMARK_MARGIN as i64,
        y: round_half_away(primary_h - height - margin),
        width: round_half_away(width).max(0) as u32,
        height: round_half_away(height).max(0) as u32,
    }
}
