//! EXIF orientation correction.
//!
//! Only the three pure rotations are corrected. The mirrored orientations
//! (2, 4, 5, 7) pass through unchanged, as do 0 (no tag) and 1 (upright).

use super::pixel::{PixelBuffer, PixelData};
use image::imageops;

/// Clockwise rotation applied to bring an image upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Rotation for an EXIF orientation tag.
    ///
    /// | Tag | Camera held | Rotation |
    /// |---|---|---|
    /// | 3 | upside down | 180° |
    /// | 6 | rotated right | 90° clockwise |
    /// | 8 | rotated left | 90° counter-clockwise |
    pub fn for_orientation(tag: u16) -> Self {
        match tag {
            3 => Rotation::Cw180,
            6 => Rotation::Cw90,
            8 => Rotation::Cw270,
            _ => Rotation::None,
        }
    }

    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Cw90 | Rotation::Cw270)
    }
}

/// Rotate `buffer` upright according to `tag`. Consumes the input; the
/// caller's old buffer is released here.
pub fn correct(buffer: PixelBuffer, tag: u16) -> PixelBuffer {
    let rotation = Rotation::for_orientation(tag);
    if rotation == Rotation::None {
        return buffer;
    }
    log::debug!("Correcting orientation {tag}: {rotation:?}");
    rotate(&buffer, rotation)
}

fn rotate(buffer: &PixelBuffer, rotation: Rotation) -> PixelBuffer {
    let data = match buffer.data() {
        PixelData::TrueColor(img) => PixelData::TrueColor(match rotation {
            Rotation::Cw90 => imageops::rotate90(img),
            Rotation::Cw180 => imageops::rotate180(img),
            Rotation::Cw270 => imageops::rotate270(img),
            Rotation::None => img.clone(),
        }),
        PixelData::Palette { palette, indices } => PixelData::Palette {
            palette: palette.clone(),
            indices: match rotation {
                Rotation::Cw90 => imageops::rotate90(indices),
                Rotation::Cw180 => imageops::rotate180(indices),
                Rotation::Cw270 => imageops::rotate270(indices),
                Rotation::None => indices.clone(),
            },
        },
    };
    buffer.with_data(data)
}
