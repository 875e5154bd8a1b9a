//! Path or bytes → upright [`DecodedImage`].
//!
//! The format is sniffed from magic bytes, never from the file extension.
//! Orientation metadata is advisory: a missing or broken EXIF block yields
//! tag 0 and the pixels are used as decoded.

use super::backend::ImageBackend;
use super::error::{ImageError, Result};
use super::orientation;
use super::params::Mime;
use super::pixel::PixelBuffer;
use std::path::Path;

/// A decoded, orientation-corrected image.
///
/// `width`/`height` are read from the pixels, so they are always the
/// post-rotation dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub pixels: PixelBuffer,
    pub mime: Mime,
    /// EXIF orientation tag found at load time (0 when absent).
    pub orientation: u16,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Identify the format of encoded bytes by their signature.
pub fn sniff_mime(bytes: &[u8]) -> Result<Mime> {
    let format = image::guess_format(bytes)
        .map_err(|_| ImageError::UnsupportedFormat("unrecognised image signature".to_string()))?;
    Mime::try_from(format)
}

/// Read and decode an image file.
pub fn load(backend: &impl ImageBackend, path: &Path) -> Result<DecodedImage> {
    if !path.is_file() {
        return Err(ImageError::NotFound(path.to_path_buf()));
    }
    let bytes = std::fs::read(path).map_err(|e| {
        log::debug!("Reading {} failed: {e}", path.display());
        ImageError::NotFound(path.to_path_buf())
    })?;
    load_bytes(backend, &bytes)
}

/// Decode an in-memory image.
pub fn load_bytes(backend: &impl ImageBackend, bytes: &[u8]) -> Result<DecodedImage> {
    let mime = sniff_mime(bytes)?;
    let decoded = backend.decode(bytes, mime)?;
    let orientation = backend.read_orientation(bytes);
    log::debug!(
        "Decoded {mime} {}x{} ({:?}), orientation {orientation}",
        decoded.width(),
        decoded.height(),
        decoded.color_mode()
    );

    Ok(DecodedImage {
        pixels: orientation::correct(decoded, orientation),
        mime,
        orientation,
    })
}
