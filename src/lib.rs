//! # img-resize
//!
//! Decode a raster image, turn it upright from its EXIF orientation, produce
//! a resized variant, optionally stamp a watermark, and encode the result.
//!
//! # Pipeline
//!
//! ```text
//! bytes ─► sniff ─► decode ─► orient ─► resize ─► [watermark] ─► encode
//!                   (backend)           (canvas + blend)          (backend)
//! ```
//!
//! Codecs sit behind the [`imaging::ImageBackend`] trait. Everything between
//! decode and encode is pure pixel work on owned [`imaging::PixelBuffer`]s,
//! so unit tests run against a recording mock backend without touching real
//! codecs or the filesystem.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Loader, orientation, resizer, compositor, watermark, codec backend |
//! | [`config`] | `img-resize.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for `info` |
//!
//! # Design Decisions
//!
//! ## Letterbox vs Cover
//!
//! [`imaging::ResizeSpec::extend`] selects the fit policy. `true` (the
//! default) letterboxes: the whole source is visible, padded with fully
//! transparent pixels. `false` covers the target box and clips the overflow.
//! Either way the output is exactly the requested size.
//!
//! ## Explicit Blend Modes
//!
//! Canvases are cleared in replace mode and drawn onto in blend mode. The
//! mode is an argument of each draw ([`imaging::BlendMode`]) rather than a
//! flag stored on the buffer.
//!
//! ## Palette Preservation
//!
//! Identity requests clone the buffer in its own colour mode. A GIF with a
//! transparent key stays indexed and keeps its key.

pub mod config;
pub mod imaging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
