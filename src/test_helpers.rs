//! Shared test utilities for the img-resize test suite.
//!
//! Provides format signatures for sniffing tests (enough bytes for
//! `image::guess_format`, not decodable images) and real encoded fixtures
//! built in memory with the `image` crate.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let path = write_fixture(tmp.path(), "wide.png", &png_bytes(&solid(800, 600, OPAQUE)));
//! let handle = ImageHandle::open(&path).unwrap();
//! ```

use crate::imaging::exif_parser::tests::jpeg_with_orientation;
use crate::imaging::{ImageBackend, Mime, PixelBuffer, Quality, RustBackend};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

// =========================================================================
// Signatures
// =========================================================================

pub const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
pub const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
pub const GIF_HEADER: &[u8] = b"GIF89a\x01\x00\x01\x00";
pub const WEBP_HEADER: &[u8] = b"RIFF\x24\0\0\0WEBPVP8L";
pub const BMP_HEADER: &[u8] = b"BM\x3a\0\0\0\0\0\0\0";

// =========================================================================
// Encoded fixtures
// =========================================================================

pub const OPAQUE: Rgba<u8> = Rgba([40, 120, 200, 255]);

pub fn solid(width: u32, height: u32, color: Rgba<u8>) -> PixelBuffer {
    PixelBuffer::from_rgba(RgbaImage::from_pixel(width, height, color))
}

fn encode(buffer: &PixelBuffer, mime: Mime) -> Vec<u8> {
    RustBackend::new()
        .encode(buffer, mime, Quality::default())
        .unwrap()
}

pub fn png_bytes(buffer: &PixelBuffer) -> Vec<u8> {
    encode(buffer, Mime::Png)
}

pub fn gif_bytes(buffer: &PixelBuffer) -> Vec<u8> {
    encode(buffer, Mime::Gif)
}

/// A JPEG carrying an EXIF orientation tag.
pub fn jpeg_bytes_with_orientation(buffer: &PixelBuffer, orientation: u16) -> Vec<u8> {
    jpeg_with_orientation(&encode(buffer, Mime::Jpeg), orientation)
}

pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}
