//! Codec backend trait.
//!
//! The [`ImageBackend`] trait is the seam to the pixel codecs and the EXIF
//! reader: decode, encode, and read the orientation tag. Everything above it
//! (loader, resizer, handle) is codec-agnostic.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::error::Result;
use super::params::{Mime, Quality};
use super::pixel::PixelBuffer;

/// Trait for codec backends.
pub trait ImageBackend {
    /// Decode bytes already identified as `mime`.
    fn decode(&self, bytes: &[u8], mime: Mime) -> Result<PixelBuffer>;

    /// Encode a buffer. `quality` applies to lossy formats only.
    fn encode(&self, buffer: &PixelBuffer, mime: Mime, quality: Quality) -> Result<Vec<u8>>;

    /// EXIF orientation tag (1-8), or 0 when missing or unreadable.
    fn read_orientation(&self, bytes: &[u8]) -> u16;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::error::ImageError;
    use std::cell::RefCell;

    /// Mock backend that records operations and replays canned results.
    ///
    /// `decode` returns `decode_result` (or a decode error when unset),
    /// `encode` echoes the buffer dimensions as bytes unless `fail_encode`.
    #[derive(Default)]
    pub struct MockBackend {
        pub decode_result: Option<PixelBuffer>,
        pub orientation: u16,
        pub fail_encode: bool,
        pub operations: RefCell<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode { mime: Mime, len: usize },
        Encode { mime: Mime, width: u32, height: u32, quality: u32 },
        ReadOrientation,
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn decoding(buffer: PixelBuffer) -> Self {
            Self {
                decode_result: Some(buffer),
                ..Self::default()
            }
        }

        pub fn with_orientation(mut self, orientation: u16) -> Self {
            self.orientation = orientation;
            self
        }

        pub fn failing_encode(mut self) -> Self {
            self.fail_encode = true;
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.borrow().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn decode(&self, bytes: &[u8], mime: Mime) -> Result<PixelBuffer> {
            self.operations.borrow_mut().push(RecordedOp::Decode {
                mime,
                len: bytes.len(),
            });
            self.decode_result
                .clone()
                .ok_or_else(|| ImageError::Decode("No mock buffer".to_string()))
        }

        fn encode(&self, buffer: &PixelBuffer, mime: Mime, quality: Quality) -> Result<Vec<u8>> {
            self.operations.borrow_mut().push(RecordedOp::Encode {
                mime,
                width: buffer.width(),
                height: buffer.height(),
                quality: quality.value(),
            });
            if self.fail_encode {
                return Err(ImageError::Encode("mock encode failure".to_string()));
            }
            Ok(format!("{}x{}", buffer.width(), buffer.height()).into_bytes())
        }

        fn read_orientation(&self, _bytes: &[u8]) -> u16 {
            self.operations
                .borrow_mut()
                .push(RecordedOp::ReadOrientation);
            self.orientation
        }
    }

    #[test]
    fn mock_records_decode() {
        let backend = MockBackend::decoding(PixelBuffer::true_color(8, 6));
        let buf = backend.decode(b"abc", Mime::Png).unwrap();
        assert_eq!(buf.dimensions(), (8, 6));

        let ops = backend.get_operations();
        assert_eq!(ops, vec![RecordedOp::Decode { mime: Mime::Png, len: 3 }]);
    }

    #[test]
    fn mock_without_buffer_fails_decode() {
        let backend = MockBackend::new();
        assert!(matches!(
            backend.decode(b"abc", Mime::Gif),
            Err(ImageError::Decode(_))
        ));
    }

    #[test]
    fn mock_records_encode() {
        let backend = MockBackend::new();
        let bytes = backend
            .encode(&PixelBuffer::true_color(4, 2), Mime::Jpeg, Quality::new(70))
            .unwrap();
        assert_eq!(bytes, b"4x2");
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Encode {
                mime: Mime::Jpeg,
                width: 4,
                height: 2,
                quality: 70
            }
        ));
    }
}
