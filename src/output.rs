//! CLI output formatting for `info` and `resize`.
//!
//! # Output Format
//!
//! ## Info
//!
//! ```text
//! photo.jpg
//!     Format: image/jpeg
//!     Size: 600x800
//!     Color: true color, alpha
//!     Orientation: 6 (rotated 90° clockwise)
//! ```
//!
//! ## Resize
//!
//! ```text
//! photo.jpg → thumb.webp
//!     800x600 → 100x100 (letterbox)
//!     Watermark: logo.png
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper. Output goes to stderr when stdout
//! carries image bytes. Format functions are pure: no I/O, no side effects.

use crate::imaging::orientation::Rotation;
use crate::imaging::{ColorMode, DecodedImage, Mime};
use serde::Serialize;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Facts about a loaded image, as shown by `info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub mime: Mime,
    pub width: u32,
    pub height: u32,
    pub color_mode: ColorMode,
    pub save_alpha: bool,
    pub transparent_index: Option<u8>,
    pub orientation: u16,
}

impl From<&DecodedImage> for ImageInfo {
    fn from(image: &DecodedImage) -> Self {
        Self {
            mime: image.mime,
            width: image.width(),
            height: image.height(),
            color_mode: image.pixels.color_mode(),
            save_alpha: image.pixels.save_alpha(),
            transparent_index: image.pixels.transparent_index(),
            orientation: image.orientation,
        }
    }
}

fn orientation_label(tag: u16) -> String {
    let note = match (tag, Rotation::for_orientation(tag)) {
        (0, _) => return "none".to_string(),
        (_, Rotation::Cw90) => "rotated 90° clockwise",
        (_, Rotation::Cw180) => "rotated 180°",
        (_, Rotation::Cw270) => "rotated 90° counter-clockwise",
        (1, Rotation::None) => "upright",
        (_, Rotation::None) => "mirrored, not corrected",
    };
    format!("{tag} ({note})")
}

fn color_label(info: &ImageInfo) -> String {
    let mode = match info.color_mode {
        ColorMode::TrueColor => "true color",
        ColorMode::Palette => "palette",
    };
    let mut parts = vec![mode.to_string()];
    if let Some(index) = info.transparent_index {
        parts.push(format!("transparent index {index}"));
    } else if info.save_alpha {
        parts.push("alpha".to_string());
    }
    parts.join(", ")
}

/// Format `info` output for one image.
pub fn format_info(source: &Path, info: &ImageInfo) -> Vec<String> {
    vec![
        source.display().to_string(),
        format!("{}Format: {}", indent(1), info.mime),
        format!("{}Size: {}x{}", indent(1), info.width, info.height),
        format!("{}Color: {}", indent(1), color_label(info)),
        format!("{}Orientation: {}", indent(1), orientation_label(info.orientation)),
    ]
}

pub fn print_info(source: &Path, info: &ImageInfo) {
    for line in format_info(source, info) {
        println!("{}", line);
    }
}

/// What a `resize` run produced.
#[derive(Debug, Clone)]
pub struct ResizeSummary<'a> {
    pub source: &'a Path,
    /// `None` when the bytes went to stdout.
    pub destination: Option<&'a Path>,
    pub from: (u32, u32),
    pub to: (u32, u32),
    pub extend: bool,
    pub watermark: Option<(&'a Path, bool)>,
}

/// Format `resize` output.
pub fn format_resize(summary: &ResizeSummary<'_>) -> Vec<String> {
    let destination = summary
        .destination
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdout".to_string());
    let policy = if summary.extend { "letterbox" } else { "crop" };

    let mut lines = vec![
        format!("{} \u{2192} {}", summary.source.display(), destination),
        format!(
            "{}{}x{} \u{2192} {}x{} ({})",
            indent(1),
            summary.from.0,
            summary.from.1,
            summary.to.0,
            summary.to.1,
            policy
        ),
    ];
    if let Some((path, applied)) = summary.watermark {
        let status = if applied { "" } else { " (skipped)" };
        lines.push(format!("{}Watermark: {}{}", indent(1), path.display(), status));
    }
    lines
}

/// Print `resize` output to stderr so it never mixes with image bytes.
pub fn print_resize(summary: &ResizeSummary<'_>) {
    for line in format_resize(summary) {
        eprintln!("{}", line);
    }
}
