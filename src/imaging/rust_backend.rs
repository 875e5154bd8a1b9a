//! Pure Rust codec backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF, WebP) | `image::load_from_memory_with_format` |
//! | GIF → palette buffer | [`PixelBuffer::quantize`] (exact, no dithering) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` with quality |
//! | Encode → PNG, GIF, WebP | `DynamicImage::write_to` (lossless WebP) |
//! | Orientation | in-crate [`exif_parser`](super::exif_parser) |

use super::backend::ImageBackend;
use super::error::{ImageError, Result};
use super::exif_parser;
use super::params::{Mime, Quality};
use super::pixel::PixelBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder};
use std::io::Cursor;

/// Backend using the `image` crate codecs.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8], mime: Mime) -> Result<PixelBuffer> {
        let decoded = image::load_from_memory_with_format(bytes, mime.image_format())
            .map_err(|e| ImageError::Decode(format!("{mime}: {e}")))?;
        let rgba = decoded.into_rgba8();

        // GIF is an indexed format; keep it indexed when the frame allows.
        if mime == Mime::Gif {
            if let Some(indexed) = PixelBuffer::quantize(&rgba) {
                return Ok(indexed);
            }
        }
        Ok(PixelBuffer::from_rgba(rgba))
    }

    fn encode(&self, buffer: &PixelBuffer, mime: Mime, quality: Quality) -> Result<Vec<u8>> {
        let (width, height) = buffer.dimensions();
        if width == 0 || height == 0 {
            return Err(ImageError::Encode(format!(
                "cannot encode an empty {width}x{height} image"
            )));
        }

        let rgba = DynamicImage::ImageRgba8(buffer.to_rgba().into_owned());
        let keep_alpha = buffer.save_alpha() && mime.supports_alpha();
        let image = if keep_alpha {
            rgba
        } else {
            DynamicImage::ImageRgb8(rgba.to_rgb8())
        };

        let mut out = Vec::new();
        let result = match mime {
            Mime::Jpeg => {
                let rgb = image.to_rgb8();
                JpegEncoder::new_with_quality(&mut out, quality.value() as u8).write_image(
                    rgb.as_raw(),
                    width,
                    height,
                    image::ExtendedColorType::Rgb8,
                )
            }
            Mime::Png | Mime::Gif | Mime::WebP => {
                image.write_to(&mut Cursor::new(&mut out), mime.image_format())
            }
        };
        result.map_err(|e| ImageError::Encode(format!("{mime}: {e}")))?;

        if out.is_empty() {
            return Err(ImageError::Encode(format!("{mime}: encoder produced no data")));
        }
        Ok(out)
    }

    fn read_orientation(&self, bytes: &[u8]) -> u16 {
        exif_parser::read_orientation(bytes)
    }
}
