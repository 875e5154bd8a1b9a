//! Tool configuration module.
//!
//! Handles loading, validating, and merging `img-resize.toml`. Stock defaults
//! are the base layer; a user file overrides just the keys it names. CLI
//! flags are applied on top of the resolved config by the binary.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! extend = true             # true = letterbox, false = crop to fill
//! filter = "triangle"       # triangle | catmull-rom | gaussian | lanczos3
//!
//! [output]
//! quality = 90              # JPEG quality (1-100)
//! # format = "image/webp"   # Output format (omit to keep the source format)
//!
//! [watermark]
//! # file = "logo.png"       # Watermark stamped bottom-left on every resize
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Filter, Mime, Quality, ResizeSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "img-resize.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `img-resize.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Fit policy and resampling kernel.
    pub resize: ResizeConfig,
    /// Encoder settings.
    pub output: OutputConfig,
    /// Optional watermark.
    pub watermark: WatermarkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub extend: bool,
    pub filter: Filter,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            extend: true,
            filter: Filter::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub quality: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Mime>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
            format: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatermarkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self
            .watermark
            .file
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation(
                "watermark.file must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Resize spec carrying the configured policy, kernel, format and quality.
    /// Target dimensions are left for the caller.
    pub fn resize_spec(&self) -> ResizeSpec {
        ResizeSpec {
            extend: self.resize.extend,
            filter: self.resize.filter,
            format: self.output.format,
            quality: Quality::new(self.output.quality),
            ..ResizeSpec::default()
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Parsed from [`stock_config_toml`] so the documented file and the base
/// layer for merging cannot drift apart.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::from_str(stock_config_toml())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ToolConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ToolConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to defaults when it is missing.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<ToolConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    if overlay.is_none() {
        log::debug!("No config at {}, using defaults", path.display());
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `img-resize.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# img-resize Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resizing
# ---------------------------------------------------------------------------
[resize]
# true: letterbox. The whole image fits inside the target box and the
#       leftover area is fully transparent.
# false: crop to fill. The image covers the target box and the overflow
#        is cut off.
extend = true

# Resampling kernel: "triangle" (bilinear), "catmull-rom" (bicubic),
# "gaussian" or "lanczos3".
filter = "triangle"

# ---------------------------------------------------------------------------
# Output encoding
# ---------------------------------------------------------------------------
[output]
# JPEG quality (1 = worst, 100 = best). PNG, GIF and WebP are lossless.
quality = 90

# Output format: "image/jpeg", "image/png", "image/gif" or "image/webp".
# Omit to keep the format of the source image.
# format = "image/webp"

# ---------------------------------------------------------------------------
# Watermark
# ---------------------------------------------------------------------------
[watermark]
# Image blended into the bottom-left corner, 10px from the edges, at most a
# quarter of the output width. A missing or unreadable file is skipped.
# file = "watermark.png"
"##
}
