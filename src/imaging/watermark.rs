//! Watermark overlay anchored to the bottom-left corner.

use super::calculations::plan_watermark;
use super::compositor::{SourceRect, blend_resample};
use super::params::Filter;
use super::pixel::{BlendMode, PixelBuffer};

/// Scale `mark` and blend it onto `primary`.
///
/// Returns `false` and leaves `primary` untouched when there is nothing to
/// draw (an empty mark, or a placement that rounds to zero pixels).
pub fn apply_watermark(primary: &mut PixelBuffer, mark: &PixelBuffer, filter: Filter) -> bool {
    let (mark_w, mark_h) = mark.dimensions();
    if mark_w == 0 || mark_h == 0 {
        return false;
    }

    let placement = plan_watermark(primary.dimensions(), (mark_w, mark_h));
    if placement.width == 0 || placement.height == 0 {
        log::warn!(
            "Watermark {mark_w}x{mark_h} scales to nothing on a {}x{} image",
            primary.width(),
            primary.height()
        );
        return false;
    }
    log::debug!("Watermark placement {placement:?}");

    blend_resample(
        primary,
        placement,
        mark,
        SourceRect::full(mark),
        filter,
        BlendMode::Blend,
    )
    .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn solid(w: u32, h: u32, color: Rgba<u8>) -> PixelBuffer {
        PixelBuffer::from_rgba(RgbaImage::from_pixel(w, h, color))
    }

    #[test]
    fn mark_lands_bottom_left_at_quarter_width() {
        let mut primary = solid(400, 300, WHITE);
        let mark = solid(200, 100, INK);
        assert!(apply_watermark(&mut primary, &mark, Filter::Triangle));

        // 100x50 at (10, 240)
        assert_eq!(primary.get_pixel(10, 240), INK);
        assert_eq!(primary.get_pixel(109, 289), INK);
        assert_eq!(primary.get_pixel(9, 260), WHITE);
        assert_eq!(primary.get_pixel(110, 260), WHITE);
        assert_eq!(primary.get_pixel(50, 239), WHITE);
        assert_eq!(primary.get_pixel(50, 290), WHITE);
    }

    #[test]
    fn small_mark_is_not_enlarged() {
        let mut primary = solid(400, 300, WHITE);
        let mark = solid(20, 10, INK);
        assert!(apply_watermark(&mut primary, &mark, Filter::Triangle));
        assert_eq!(primary.get_pixel(29, 289), INK);
        assert_eq!(primary.get_pixel(30, 289), WHITE);
        assert_eq!(primary.get_pixel(10, 279), WHITE);
    }

    #[test]
    fn transparent_mark_areas_keep_primary() {
        let mut primary = solid(80, 80, WHITE);
        let mark = solid(20, 20, Rgba([0, 0, 0, 0]));
        assert!(apply_watermark(&mut primary, &mark, Filter::Triangle));
        assert!(primary.to_rgba().pixels().all(|p| *p == WHITE));
    }

    #[test]
    fn empty_mark_is_rejected() {
        let mut primary = solid(10, 10, WHITE);
        let before = primary.clone();
        assert!(!apply_watermark(&mut primary, &PixelBuffer::true_color(0, 0), Filter::Triangle));
        assert_eq!(primary, before);
    }

    #[test]
    fn tiny_primary_rejects_zero_sized_mark() {
        let mut primary = solid(1, 1, WHITE);
        let before = primary.clone();
        assert!(!apply_watermark(&mut primary, &solid(100, 100, INK), Filter::Triangle));
        assert_eq!(primary, before);
    }
}
