//! Batch settings record and its validation.
//!
//! A [`Settings`] value is built once per batch (from a config file, flags,
//! or both), validated with [`Settings::validate`], and then only read.

use crate::{ImageError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Widths offered by the `preset` resize mode.
pub const PRESET_WIDTHS: [u32; 4] = [1920, 1200, 800, 400];

/// Largest width or height accepted by the `custom` resize mode.
pub const MAX_CUSTOM_DIMENSION: u32 = 10_000;

/// Largest scale accepted by the `percentage` resize mode.
pub const MAX_SCALE_PERCENT: u32 = 500;

/// Largest accepted target size, in kilobytes.
pub const MAX_TARGET_SIZE_KB: u32 = 10_000;

/// Watermark font size bounds, in pixels.
pub const WATERMARK_FONT_SIZES: std::ops::RangeInclusive<u32> = 10..=200;

/// How an image is split after all visual transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutMode {
    /// Single output
    #[default]
    None,
    /// Top and bottom halves
    Horizontal,
    /// Left and right halves
    Vertical,
}

impl FromStr for CutMode {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(CutMode::None),
            "horizontal" => Ok(CutMode::Horizontal),
            "vertical" => Ok(CutMode::Vertical),
            other => Err(ImageError::config(format!("unknown cut mode '{other}'"))),
        }
    }
}

/// Target geometry for the resize step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ResizeMode {
    /// Fixed width from [`PRESET_WIDTHS`]
    Preset {
        /// Target width in pixels
        width: u32,
    },
    /// Explicit bounding box
    Custom {
        /// Box width in pixels
        width: u32,
        /// Box height in pixels
        height: u32,
    },
    /// Uniform scale of both axes
    Percentage {
        /// Scale in percent (100 = unchanged)
        percent: u32,
    },
}

/// Resize step configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeSettings {
    /// Requested geometry
    #[serde(flatten)]
    pub mode: ResizeMode,

    /// Preserve the width:height ratio
    #[serde(default = "default_true")]
    pub maintain_aspect: bool,
}

/// Anchor for the watermark text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkPosition {
    /// `top-left`
    TopLeft,
    /// `top-right`
    TopRight,
    /// `bottom-left`
    BottomLeft,
    /// `bottom-right`
    #[default]
    BottomRight,
    /// `center`
    Center,
}

impl FromStr for WatermarkPosition {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "top-left" => Ok(WatermarkPosition::TopLeft),
            "top-right" => Ok(WatermarkPosition::TopRight),
            "bottom-left" => Ok(WatermarkPosition::BottomLeft),
            "bottom-right" => Ok(WatermarkPosition::BottomRight),
            "center" => Ok(WatermarkPosition::Center),
            other => Err(ImageError::config(format!(
                "unknown watermark position '{other}'"
            ))),
        }
    }
}

/// Text watermark configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkSettings {
    /// Text to stamp; must not be empty
    pub text: String,

    /// Where the text is anchored
    #[serde(default)]
    pub position: WatermarkPosition,

    /// Font size in pixels
    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Text alpha, 0 (invisible) to 255 (opaque)
    #[serde(default = "default_opacity")]
    pub opacity: u8,

    /// TrueType/OpenType font file; a system font is used when absent
    #[serde(default)]
    pub font: Option<PathBuf>,
}

impl WatermarkSettings {
    /// Watermark with default styling.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: WatermarkPosition::default(),
            font_size: default_font_size(),
            opacity: default_opacity(),
            font: None,
        }
    }
}

/// Everything a batch run needs to know about how to process each image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Encoder for every output
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Fixed encoder quality (1-100), used when no target size is set
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Output budget in KB; 0 disables the quality search
    #[serde(default)]
    pub target_size_kb: u32,

    /// Split mode
    #[serde(default)]
    pub cut_mode: CutMode,

    /// Resize step, disabled when absent
    #[serde(default)]
    pub resize: Option<ResizeSettings>,

    /// Watermark step, disabled when absent
    #[serde(default)]
    pub watermark: Option<WatermarkSettings>,

    /// Drop embedded metadata from outputs
    #[serde(default = "default_true")]
    pub strip_metadata: bool,

    /// Prepended to every output stem
    #[serde(default)]
    pub filename_prefix: String,

    /// Appended to every output stem
    #[serde(default)]
    pub filename_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            quality: default_quality(),
            target_size_kb: 0,
            cut_mode: CutMode::default(),
            resize: None,
            watermark: None,
            strip_metadata: true,
            filename_prefix: String::new(),
            filename_suffix: String::new(),
        }
    }
}

impl Settings {
    /// Reject any value the transform engine or encoder cannot honor.
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.quality) {
            return Err(ImageError::config(format!(
                "quality must be between 1 and 100, got {}",
                self.quality
            )));
        }

        if self.target_size_kb > MAX_TARGET_SIZE_KB {
            return Err(ImageError::config(format!(
                "target size must be at most {MAX_TARGET_SIZE_KB} KB, got {}",
                self.target_size_kb
            )));
        }

        if let Some(resize) = &self.resize {
            validate_resize(&resize.mode)?;
        }

        if let Some(watermark) = &self.watermark {
            if watermark.text.trim().is_empty() {
                return Err(ImageError::config(
                    "watermark is enabled but its text is empty",
                ));
            }
            if !WATERMARK_FONT_SIZES.contains(&watermark.font_size) {
                return Err(ImageError::config(format!(
                    "watermark font size must be between {} and {}, got {}",
                    WATERMARK_FONT_SIZES.start(),
                    WATERMARK_FONT_SIZES.end(),
                    watermark.font_size
                )));
            }
        }

        for (name, value) in [
            ("prefix", &self.filename_prefix),
            ("suffix", &self.filename_suffix),
        ] {
            if value.contains(['/', '\\']) {
                return Err(ImageError::config(format!(
                    "filename {name} must not contain path separators"
                )));
            }
        }

        Ok(())
    }

    /// Target size in bytes, or `None` when the quality search is off.
    pub fn target_bytes(&self) -> Option<u64> {
        (self.target_size_kb > 0).then(|| u64::from(self.target_size_kb) * 1024)
    }
}

fn validate_resize(mode: &ResizeMode) -> Result<()> {
    match *mode {
        ResizeMode::Preset { width } if !PRESET_WIDTHS.contains(&width) => {
            Err(ImageError::config(format!(
                "preset width must be one of {PRESET_WIDTHS:?}, got {width}"
            )))
        }
        ResizeMode::Custom { width, height }
            if !(1..=MAX_CUSTOM_DIMENSION).contains(&width)
                || !(1..=MAX_CUSTOM_DIMENSION).contains(&height) =>
        {
            Err(ImageError::config(format!(
                "custom size must be within 1..={MAX_CUSTOM_DIMENSION} on both axes, got {width}x{height}"
            )))
        }
        ResizeMode::Percentage { percent } if !(1..=MAX_SCALE_PERCENT).contains(&percent) => {
            Err(ImageError::config(format!(
                "scale must be between 1% and {MAX_SCALE_PERCENT}%, got {percent}%"
            )))
        }
        _ => Ok(()),
    }
}

fn default_quality() -> u8 {
    85
}

fn default_font_size() -> u32 {
    36
}

fn default_opacity() -> u8 {
    128
}

fn default_true() -> bool {
    true
}
