//! Text watermarking.
//!
//! Text is rasterized into a coverage mask the size of the image. The mask,
//! scaled by the opacity, is the alpha of a solid white ink layer that is
//! composited over the pixels, so antialiased edges and partial opacity blend
//! with what is underneath instead of darkening it.

use crate::settings::{WatermarkPosition, WatermarkSettings};
use crate::{ImageError, Result};
use ab_glyph::{FontVec, PxScale};
use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::fmt;
use std::path::{Path, PathBuf};

/// Distance between the text and the image edges, in pixels.
pub const MARGIN: i64 = 20;

/// Watermark ink color.
pub const INK: [u8; 3] = [255, 255, 255];

/// Fonts tried, in order, when no font file is configured.
pub const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A ready-to-stamp watermark with its font loaded.
pub struct Watermark {
    text: String,
    position: WatermarkPosition,
    scale: PxScale,
    opacity: u8,
    font: FontVec,
}

impl fmt::Debug for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watermark")
            .field("text", &self.text)
            .field("position", &self.position)
            .field("scale", &self.scale.y)
            .field("opacity", &self.opacity)
            .finish_non_exhaustive()
    }
}

impl Watermark {
    /// Build a watermark, loading its font.
    ///
    /// Empty text is a configuration error, never a silent no-op.
    pub fn from_settings(settings: &WatermarkSettings) -> Result<Self> {
        if settings.text.trim().is_empty() {
            return Err(ImageError::config(
                "watermark is enabled but its text is empty",
            ));
        }

        let font = load_font(settings.font.as_deref())?;
        Ok(Self::with_font(settings, font))
    }

    /// Build a watermark around an already-loaded font.
    pub fn with_font(settings: &WatermarkSettings, font: FontVec) -> Self {
        Self {
            text: settings.text.clone(),
            position: settings.position,
            scale: PxScale::from(settings.font_size as f32),
            opacity: settings.opacity,
            font,
        }
    }

    /// Rendered text extent in pixels.
    pub fn text_size(&self) -> (u32, u32) {
        text_size(self.scale, &self.font, &self.text)
    }

    /// Stamp the text onto a copy of `img`.
    pub fn apply(&self, img: &RgbImage) -> RgbImage {
        composite(img, &self.coverage(img.dimensions()), self.opacity)
    }

    /// Antialiased glyph coverage for an image of the given size, 0 to 255.
    pub fn coverage(&self, (width, height): (u32, u32)) -> GrayImage {
        let (x, y) = anchor_origin((width, height), self.text_size(), self.position);

        let mut mask = GrayImage::new(width, height);
        draw_text_mut(
            &mut mask,
            Luma([255]),
            x,
            y,
            self.scale,
            &self.font,
            &self.text,
        );
        mask
    }
}

/// Blend [`INK`] over `img`, with per-pixel alpha `coverage * opacity / 255`.
///
/// `coverage` must have the same dimensions as `img`.
pub fn composite(img: &RgbImage, coverage: &GrayImage, opacity: u8) -> RgbImage {
    let mut out = img.clone();
    for (pixel, Luma([cov])) in out.pixels_mut().zip(coverage.pixels()) {
        let alpha = (u32::from(*cov) * u32::from(opacity) + 127) / 255;
        if alpha == 0 {
            continue;
        }
        for (channel, ink) in pixel.0.iter_mut().zip(INK) {
            *channel = ((u32::from(ink) * alpha + u32::from(*channel) * (255 - alpha) + 127) / 255) as u8;
        }
    }
    out
}

/// Top-left corner of the text box for an anchor position.
///
/// Text larger than the image yields negative coordinates; the overflow is
/// clipped when drawn.
pub fn anchor_origin(
    (width, height): (u32, u32),
    (text_width, text_height): (u32, u32),
    position: WatermarkPosition,
) -> (i32, i32) {
    let (width, height) = (i64::from(width), i64::from(height));
    let (text_width, text_height) = (i64::from(text_width), i64::from(text_height));

    let right = width - text_width - MARGIN;
    let bottom = height - text_height - MARGIN;

    let (x, y) = match position {
        WatermarkPosition::TopLeft => (MARGIN, MARGIN),
        WatermarkPosition::TopRight => (right, MARGIN),
        WatermarkPosition::BottomLeft => (MARGIN, bottom),
        WatermarkPosition::BottomRight => (right, bottom),
        WatermarkPosition::Center => (
            (width - text_width).div_euclid(2),
            (height - text_height).div_euclid(2),
        ),
    };

    (x as i32, y as i32)
}

/// Load a font file, or the first available system font when `path` is `None`.
pub fn load_font(path: Option<&Path>) -> Result<FontVec> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => find_system_font().ok_or_else(|| {
            ImageError::Font(
                "no system font found; set a watermark font path explicitly".to_string(),
            )
        })?,
    };

    let bytes = std::fs::read(&path)
        .map_err(|e| ImageError::Font(format!("cannot read {}: {e}", path.display())))?;
    let font = FontVec::try_from_vec(bytes)
        .map_err(|e| ImageError::Font(format!("{} is not a usable font: {e}", path.display())))?;

    tracing::debug!(font = %path.display(), "loaded watermark font");
    Ok(font)
}

/// First entry of [`SYSTEM_FONT_CANDIDATES`] that exists on this machine.
pub fn find_system_font() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.is_file())
}
