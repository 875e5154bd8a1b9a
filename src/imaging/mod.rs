//! Image processing: decode, orient, resize, composite, encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Sniff** | `image::guess_format` |
//! | **Decode / encode** | `image` codecs (JPEG, PNG, GIF, WebP) |
//! | **Orientation** | custom EXIF parser (JPEG APP1, PNG eXIf, WebP EXIF) + `imageops::rotate*` |
//! | **Resize** | `imageops::resize` onto a transparent canvas |
//! | **Watermark** | `imageops::resize` + alpha blend |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and placement math (unit testable)
//! - **Parameters**: Data structures describing what to produce
//! - **Pixels**: [`PixelBuffer`] storage and the [`compositor`] drawing on it
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Handle**: [`ImageHandle`] combining all of the above

pub mod backend;
mod calculations;
pub mod compositor;
mod error;
pub(crate) mod exif_parser;
mod handle;
pub mod loader;
pub mod orientation;
mod params;
pub mod pixel;
pub mod resize;
pub mod rust_backend;
pub mod watermark;

pub use backend::ImageBackend;
pub use calculations::{Fit, Placement, complete_dimensions, plan_fit, plan_watermark};
pub use error::{ImageError, Result};
pub use handle::ImageHandle;
pub use loader::{DecodedImage, load, load_bytes, sniff_mime};
pub use params::{Filter, Mime, Quality, ResizeSpec, WATERMARK_MARGIN, WATERMARK_MAX_WIDTH_FRACTION};
pub use pixel::{BlendMode, ColorMode, Palette, PixelBuffer, TRANSPARENT};
pub use resize::{clone_buffer, resize};
pub use rust_backend::RustBackend;
