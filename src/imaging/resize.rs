//! The resizer: dimension completion, fit policy and resampled blit.
//!
//! ```text
//! complete_dimensions ──► new_transparent_canvas ──► plan_fit ──► blend_resample
//!        │ (no target)
//!        └──────────────► clone_buffer
//! ```
//!
//! Every call returns a new buffer; the input is only read.

use super::calculations::{Fit, complete_dimensions, plan_fit};
use super::compositor::{SourceRect, blend_resample, new_transparent_canvas};
use super::error::{ImageError, Result};
use super::params::ResizeSpec;
use super::pixel::{BlendMode, PixelBuffer, TRANSPARENT};

/// Produce the variant of `buffer` described by `spec`.
///
/// Without target dimensions this is [`clone_buffer`] with alpha saving
/// switched on. Otherwise the output is a true-color canvas of exactly the
/// target size.
pub fn resize(buffer: &PixelBuffer, spec: &ResizeSpec) -> Result<PixelBuffer> {
    let source = buffer.dimensions();
    if source.0 == 0 || source.1 == 0 {
        return Err(ImageError::InvalidSpec(format!(
            "cannot resize an empty {}x{} image",
            source.0, source.1
        )));
    }
    if spec.width == Some(0) || spec.height == Some(0) {
        return Err(ImageError::InvalidSpec(format!(
            "target dimensions must be positive, got {:?}x{:?}",
            spec.width, spec.height
        )));
    }

    let Some((target_w, target_h)) = complete_dimensions(source, spec.width, spec.height) else {
        let mut clone = clone_buffer(buffer);
        clone.set_save_alpha(true);
        return Ok(clone);
    };
    if target_w == 0 || target_h == 0 {
        return Err(ImageError::InvalidSpec(format!(
            "derived size {target_w}x{target_h} from {}x{} source collapses to zero",
            source.0, source.1
        )));
    }

    let fit = Fit::from_extend(spec.extend);
    let placement = plan_fit(source, (target_w, target_h), fit);
    log::debug!(
        "Resizing {}x{} → {target_w}x{target_h} ({fit:?}): {placement:?}",
        source.0,
        source.1
    );

    let mut canvas = new_transparent_canvas(target_w, target_h);
    blend_resample(
        &mut canvas,
        placement,
        buffer,
        SourceRect::full(buffer),
        spec.filter,
        BlendMode::Blend,
    )?;
    Ok(canvas)
}

/// Pixel-identical copy that keeps the colour mode.
///
/// True-color buffers are copied with alpha saving on. Palette buffers are
/// rebuilt entry by entry with the transparent key moved to index 0, and
/// pixels are copied by index. Entries that repeat the key's colour stay
/// distinct, so opaque pixels never collapse into the key.
pub fn clone_buffer(buffer: &PixelBuffer) -> PixelBuffer {
    if buffer.is_true_color() {
        let mut clone = PixelBuffer::from_rgba(buffer.to_rgba().into_owned());
        clone.set_save_alpha(true);
        return clone;
    }

    let (w, h) = buffer.dimensions();
    let entries = buffer.palette().map(|p| p.entries()).unwrap_or_default();
    let key = buffer.transparent_index();
    let first = key.unwrap_or(0) as usize;

    let background = entries.get(first).copied().unwrap_or(TRANSPARENT);
    let mut clone = PixelBuffer::indexed(w, h, background);
    if key.is_some() {
        clone.set_save_alpha(true);
        clone.set_transparent_index(Some(0));
    }

    let mut remap = [0u8; 256];
    for (i, &color) in entries.iter().enumerate() {
        if i != first {
            remap[i] = clone.allocate_color(color).unwrap_or(0);
        }
    }

    for y in 0..h {
        for x in 0..w {
            if let Some(index) = buffer.index_at(x, y) {
                clone.set_index(x, y, remap[index as usize]);
            }
        }
    }
    clone
}
