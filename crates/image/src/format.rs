//! Output formats and recognized input extensions.

use crate::{ImageError, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Extensions accepted as batch input (compared case-insensitively).
pub const INPUT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp"];

/// Formats the encoder can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossy WebP
    #[default]
    WebP,
    /// Baseline JPEG
    #[serde(rename = "jpg", alias = "jpeg")]
    Jpeg,
    /// Lossless PNG
    Png,
}

impl OutputFormat {
    /// File extension written for this format. Always `jpg`, never `jpeg`.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::WebP => "webp",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// Whether the encoder exposes a lossy quality knob.
    pub fn supports_quality(&self) -> bool {
        !matches!(self, OutputFormat::Png)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "webp" => Ok(OutputFormat::WebP),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            other => Err(ImageError::config(format!(
                "unsupported output format '{other}' (expected webp, jpg or png)"
            ))),
        }
    }
}

/// Check whether a path carries one of the recognized input extensions.
///
/// # Example
/// ```
/// use pixcut_image::is_supported_input;
///
/// assert!(is_supported_input("holiday/IMG_0001.JPG"));
/// assert!(!is_supported_input("notes.txt"));
/// ```
pub fn is_supported_input(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            INPUT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}
