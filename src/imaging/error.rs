//! Error taxonomy shared by every imaging operation.
//!
//! All variants are terminal for the call in progress. Failures are
//! deterministic functions of the input, so nothing is retried. Watermarking
//! is the one operation that reports a soft `false` instead of an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Invalid resize spec: {0}")]
    InvalidSpec(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;
