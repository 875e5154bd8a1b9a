//! Canvas creation and resampled drawing.
//!
//! The blend mode is an argument of each draw, never state on the canvas.
//! A fresh canvas is filled with [`BlendMode::Replace`] so the transparent
//! fill is written as-is; everything drawn afterwards uses
//! [`BlendMode::Blend`]. Filling in blend mode would composite transparency
//! over whatever the buffer held and leave it unchanged.

use super::calculations::{Placement, round_half_away};
use super::error::{ImageError, Result};
use super::params::Filter;
use super::pixel::{BlendMode, PixelBuffer, PixelData, TRANSPARENT};
use image::{Pixel, RgbaImage, imageops};
use std::collections::HashMap;

/// Source rectangle of a resampled draw, inside the source bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    /// The whole of `buffer`.
    pub fn full(buffer: &PixelBuffer) -> Self {
        Self {
            x: 0,
            y: 0,
            width: buffer.width(),
            height: buffer.height(),
        }
    }
}

/// The part of a resampled draw that lands on the canvas: a source window
/// and the destination rectangle it scales to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedDraw {
    pub src: SourceRect,
    pub dst: Placement,
}

/// Source pixels kept beyond the visible window on each side, so the
/// resampling kernel sees the same neighbours it would in a full draw.
const KERNEL_MARGIN: f64 = 3.0;

/// Narrow a draw of `src_rect` into `dst_rect` to what a canvas of
/// `canvas` (width, height) can show. `None` when nothing is visible.
///
/// A draw that is already fully visible is returned unchanged. Otherwise the
/// source window covers the visible part plus a kernel margin, and the
/// destination rectangle shrinks to keep the original scale factor.
pub fn clip_to_canvas(
    canvas: (u32, u32),
    dst_rect: Placement,
    src_rect: SourceRect,
) -> Option<ClippedDraw> {
    let (src_x, src_w, dst_x, dst_w) =
        clip_axis(canvas.0, dst_rect.x, dst_rect.width, src_rect.x, src_rect.width)?;
    let (src_y, src_h, dst_y, dst_h) =
        clip_axis(canvas.1, dst_rect.y, dst_rect.height, src_rect.y, src_rect.height)?;
    Some(ClippedDraw {
        src: SourceRect { x: src_x, y: src_y, width: src_w, height: src_h },
        dst: Placement { x: dst_x, y: dst_y, width: dst_w, height: dst_h },
    })
}

/// One axis of [`clip_to_canvas`]: `(src_pos, src_len, dst_pos, dst_len)`.
fn clip_axis(
    canvas: u32,
    dst_pos: i64,
    dst_len: u32,
    src_pos: u32,
    src_len: u32,
) -> Option<(u32, u32, i64, u32)> {
    let dst_end = dst_pos + dst_len as i64;
    let visible_start = dst_pos.max(0);
    let visible_end = dst_end.min(canvas as i64);
    if visible_start >= visible_end {
        return None;
    }
    if visible_start == dst_pos && visible_end == dst_end {
        return Some((src_pos, src_len, dst_pos, dst_len));
    }

    // Source pixels per destination pixel.
    let scale = src_len as f64 / dst_len as f64;
    let margin = (KERNEL_MARGIN * scale.max(1.0)).ceil() as u32;
    let first = (((visible_start - dst_pos) as f64 * scale).floor() as u32).saturating_sub(margin);
    let last = (((visible_end - dst_pos) as f64 * scale).ceil() as u32)
        .saturating_add(margin)
        .min(src_len);

    let start = dst_pos + round_half_away(first as f64 / scale);
    let end = dst_pos + round_half_away(last as f64 / scale);
    Some((src_pos + first, last - first, start, (end - start).max(1) as u32))
}

/// True-color, alpha-saving canvas with every pixel fully transparent.
pub fn new_transparent_canvas(width: u32, height: u32) -> PixelBuffer {
    let mut canvas = PixelBuffer::true_color(width, height);
    canvas.fill(TRANSPARENT, BlendMode::Replace);
    canvas.set_save_alpha(true);
    canvas
}

/// Resample `src_rect` of `src` to the size of `dst_rect` and draw it at the
/// `dst_rect` offset. Pixels falling outside `dst` are clipped.
///
/// Only the source window that reaches the canvas is resampled, so a cover
/// fit that overflows the canvas by orders of magnitude costs no more than
/// the visible area.
///
/// The source alpha is resampled with the colour channels, so transparent
/// regions of `src` stay transparent when blended.
pub fn blend_resample(
    dst: &mut PixelBuffer,
    dst_rect: Placement,
    src: &PixelBuffer,
    src_rect: SourceRect,
    filter: Filter,
    mode: BlendMode,
) -> Result<()> {
    let (src_w, src_h) = src.dimensions();
    if src_rect.x as u64 + src_rect.width as u64 > src_w as u64
        || src_rect.y as u64 + src_rect.height as u64 > src_h as u64
    {
        return Err(ImageError::InvalidSpec(format!(
            "source rectangle {}x{}+{}+{} exceeds {}x{} source",
            src_rect.width, src_rect.height, src_rect.x, src_rect.y, src_w, src_h
        )));
    }
    if src_rect.width == 0 || src_rect.height == 0 || dst_rect.width == 0 || dst_rect.height == 0
    {
        return Ok(());
    }

    let Some(clip) = clip_to_canvas(dst.dimensions(), dst_rect, src_rect) else {
        return Ok(());
    };
    let scaled = resample(src, clip.src, clip.dst.width, clip.dst.height, filter);
    draw(dst, &scaled, clip.dst.x, clip.dst.y, mode);
    Ok(())
}

fn resample(
    src: &PixelBuffer,
    src_rect: SourceRect,
    width: u32,
    height: u32,
    filter: Filter,
) -> RgbaImage {
    let pixels = src.to_rgba();
    let region = if src_rect == SourceRect::full(src) {
        pixels.into_owned()
    } else {
        imageops::crop_imm(
            &*pixels,
            src_rect.x,
            src_rect.y,
            src_rect.width,
            src_rect.height,
        )
        .to_image()
    };
    if region.dimensions() == (width, height) {
        return region;
    }
    imageops::resize(&region, width, height, filter.filter_type())
}

fn draw(dst: &mut PixelBuffer, top: &RgbaImage, x: i64, y: i64, mode: BlendMode) {
    if let PixelData::TrueColor(canvas) = dst.data_mut() {
        match mode {
            BlendMode::Blend => imageops::overlay(canvas, top, x, y),
            BlendMode::Replace => imageops::replace(canvas, top, x, y),
        }
        return;
    }

    // Palette lookups are linear in the table size; most draws repeat a
    // handful of colours.
    let mut cache: HashMap<[u8; 4], u8> = HashMap::new();
    let (dst_w, dst_h) = (dst.width() as i64, dst.height() as i64);
    for (tx, ty, px) in top.enumerate_pixels() {
        let (dx, dy) = (x + tx as i64, y + ty as i64);
        if !(0..dst_w).contains(&dx) || !(0..dst_h).contains(&dy) {
            continue;
        }
        let (dx, dy) = (dx as u32, dy as u32);
        let color = match mode {
            BlendMode::Replace => *px,
            BlendMode::Blend => {
                let mut base = dst.get_pixel(dx, dy);
                base.blend(px);
                base
            }
        };
        let index = match cache.get(&color.0).copied() {
            Some(index) => index,
            None => match dst.resolve_color(color) {
                Some(index) => *cache.entry(color.0).or_insert(index),
                None => continue,
            },
        };
        dst.set_index(dx, dy, index);
    }
}
