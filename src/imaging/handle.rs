//! [`ImageHandle`]: one loaded image and the operations on it.
//!
//! ```text
//! open ──► DecodedImage ──┬─► get(spec) ──► PixelBuffer
//!                         ├─► save(path?, spec) ──► file | bytes
//!                         ├─► clone_pixels
//!                         └─► apply_watermark(path) (in place)
//! ```
//!
//! Every operation except `apply_watermark` leaves the loaded pixels alone.

use super::backend::ImageBackend;
use super::error::Result;
use super::loader::{self, DecodedImage};
use super::params::{Filter, Mime, ResizeSpec};
use super::pixel::PixelBuffer;
use super::resize::{clone_buffer, resize};
use super::rust_backend::RustBackend;
use super::watermark;
use std::path::Path;

/// An opened image bound to the backend that decoded it.
pub struct ImageHandle<B: ImageBackend = RustBackend> {
    backend: B,
    image: DecodedImage,
}

impl ImageHandle<RustBackend> {
    /// Open a file with the `image`-crate backend.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with(RustBackend::new(), path)
    }

    /// Decode in-memory bytes with the `image`-crate backend.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(RustBackend::new(), bytes)
    }
}

impl<B: ImageBackend> ImageHandle<B> {
    pub fn open_with(backend: B, path: &Path) -> Result<Self> {
        let image = loader::load(&backend, path)?;
        Ok(Self { backend, image })
    }

    pub fn from_bytes_with(backend: B, bytes: &[u8]) -> Result<Self> {
        let image = loader::load_bytes(&backend, bytes)?;
        Ok(Self { backend, image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn mime(&self) -> Mime {
        self.image.mime
    }

    pub fn orientation(&self) -> u16 {
        self.image.orientation
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.image.pixels
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    /// A new buffer resized per `spec`.
    pub fn get(&self, spec: &ResizeSpec) -> Result<PixelBuffer> {
        resize(&self.image.pixels, spec)
    }

    /// Resize and encode.
    ///
    /// With a path, the file is written (replacing any existing one) and
    /// `None` is returned. Without one, the encoded bytes are returned.
    /// The output format is `spec.format`, falling back to the source format.
    pub fn save(&self, path: Option<&Path>, spec: &ResizeSpec) -> Result<Option<Vec<u8>>> {
        let variant = self.get(spec)?;
        let mime = spec.format.unwrap_or(self.image.mime);
        let bytes = self.backend.encode(&variant, mime, spec.quality)?;

        let Some(path) = path else {
            return Ok(Some(bytes));
        };
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        std::fs::write(path, &bytes)?;
        log::debug!(
            "Wrote {} ({mime}, {}x{}, {} bytes)",
            path.display(),
            variant.width(),
            variant.height(),
            bytes.len()
        );
        Ok(None)
    }

    /// Independent copy of the loaded pixels, colour mode preserved.
    pub fn clone_pixels(&self) -> PixelBuffer {
        clone_buffer(&self.image.pixels)
    }

    /// Blend the watermark at `path` onto the loaded pixels.
    ///
    /// Never fails: an unreadable or undecodable watermark is logged and
    /// reported as `false`, with the pixels left as they were.
    pub fn apply_watermark(&mut self, path: &Path) -> bool {
        self.apply_watermark_with(path, Filter::default())
    }

    pub fn apply_watermark_with(&mut self, path: &Path, filter: Filter) -> bool {
        let mark = match loader::load(&self.backend, path) {
            Ok(mark) => mark,
            Err(e) => {
                log::warn!("Skipping watermark {}: {e}", path.display());
                return false;
            }
        };
        watermark::apply_watermark(&mut self.image.pixels, &mark.pixels, filter)
    }
}
