//! Parameter types for image operations.
//!
//! These types describe *what* to produce, not *how*. The resizer, the
//! encoder and the [`ImageHandle`](super::ImageHandle) façade all take them
//! by reference, so the same spec can drive several outputs.
//!
//! ## Types
//!
//! - [`Mime`]: The four supported formats. Anything else is rejected before reaching a codec.
//! - [`Quality`]: Lossy encoding quality (1-100, default 90). Clamped on construction.
//! - [`Filter`]: Smooth resampling kernel used for every scaled draw.
//! - [`ResizeSpec`]: Target dimensions, fit policy, output format and quality.

use super::error::ImageError;
use image::ImageFormat;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Left and bottom margin of the watermark, in pixels.
pub const WATERMARK_MARGIN: u32 = 10;

/// Largest watermark width as a fraction of the primary image width.
pub const WATERMARK_MAX_WIDTH_FRACTION: f64 = 0.25;

/// Image formats accepted on both the decode and the encode side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mime {
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/gif")]
    Gif,
    #[serde(rename = "image/webp")]
    WebP,
}

impl Mime {
    pub fn as_str(self) -> &'static str {
        match self {
            Mime::Jpeg => "image/jpeg",
            Mime::Png => "image/png",
            Mime::Gif => "image/gif",
            Mime::WebP => "image/webp",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            Mime::Jpeg => ImageFormat::Jpeg,
            Mime::Png => ImageFormat::Png,
            Mime::Gif => ImageFormat::Gif,
            Mime::WebP => ImageFormat::WebP,
        }
    }

    /// Whether the encoded form can carry per-pixel alpha.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, Mime::Jpeg)
    }
}

impl fmt::Display for Mime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mime {
    type Err = ImageError;

    /// Accepts the full mime string or the bare subtype (`png`, `jpg`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let subtype = lower.strip_prefix("image/").unwrap_or(&lower);
        match subtype {
            "jpeg" | "jpg" => Ok(Mime::Jpeg),
            "png" => Ok(Mime::Png),
            "gif" => Ok(Mime::Gif),
            "webp" => Ok(Mime::WebP),
            _ => Err(ImageError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl TryFrom<ImageFormat> for Mime {
    type Error = ImageError;

    fn try_from(format: ImageFormat) -> Result<Self, Self::Error> {
        match format {
            ImageFormat::Jpeg => Ok(Mime::Jpeg),
            ImageFormat::Png => Ok(Mime::Png),
            ImageFormat::Gif => Ok(Mime::Gif),
            ImageFormat::WebP => Ok(Mime::WebP),
            other => Err(ImageError::UnsupportedFormat(
                other.to_mime_type().to_string(),
            )),
        }
    }
}

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Resampling kernel. All of them average neighbouring source pixels;
/// nearest-neighbour is intentionally not offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    /// Bilinear.
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl Filter {
    pub fn filter_type(self) -> FilterType {
        match self {
            Filter::Triangle => FilterType::Triangle,
            Filter::CatmullRom => FilterType::CatmullRom,
            Filter::Gaussian => FilterType::Gaussian,
            Filter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "triangle" | "bilinear" => Ok(Filter::Triangle),
            "catmull-rom" | "bicubic" => Ok(Filter::CatmullRom),
            "gaussian" => Ok(Filter::Gaussian),
            "lanczos3" | "lanczos" => Ok(Filter::Lanczos3),
            other => Err(format!(
                "unknown filter '{other}' (expected triangle, catmull-rom, gaussian or lanczos3)"
            )),
        }
    }
}

/// What to produce from a loaded image.
///
/// With neither `width` nor `height` the output is an identity clone. With
/// one of them, the other is derived from the source aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// `true` letterboxes (fit inside, transparent padding); `false` covers
    /// the target box and clips the overflow.
    pub extend: bool,
    /// Output format; `None` keeps the source format.
    pub format: Option<Mime>,
    pub quality: Quality,
    pub filter: Filter,
}

impl Default for ResizeSpec {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            extend: true,
            format: None,
            quality: Quality::default(),
            filter: Filter::default(),
        }
    }
}

impl ResizeSpec {
    /// Letterbox into an exact `width` x `height` box.
    pub fn fit(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Cover an exact `width` x `height` box, clipping the overflow.
    pub fn fill(width: u32, height: u32) -> Self {
        Self {
            extend: false,
            ..Self::fit(width, height)
        }
    }

    pub fn is_identity(&self) -> bool {
        self.width.is_none() && self.height.is_none()
    }
}
