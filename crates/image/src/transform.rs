//! The per-image transform chain.
//!
//! Steps run in a fixed order: metadata strip, resize, color normalization,
//! watermark, cut. Each step produces a new image; the caller's source is
//! never modified.

use crate::cut::{CutPart, cut};
use crate::normalize::normalize_color;
use crate::resize::resize_image;
use crate::settings::{CutMode, ResizeSettings, Settings};
use crate::source::SourceImage;
use crate::watermark::Watermark;
use crate::Result;
use image::RgbImage;
use std::borrow::Cow;

/// One encoder-ready image produced by the transform chain.
#[derive(Debug, Clone)]
pub struct OutputImage {
    /// Which half this is, `None` when the image was not cut
    pub part: Option<CutPart>,
    /// Opaque 8-bit RGB pixels
    pub pixels: RgbImage,
    /// ICC profile to embed, if metadata is kept
    pub icc_profile: Option<Vec<u8>>,
}

/// Applies a validated [`Settings`] record to decoded images.
///
/// Expensive setup (font loading) happens once in [`Transformer::new`], so a
/// missing watermark font is reported before any input is decoded.
#[derive(Debug)]
pub struct Transformer {
    strip_metadata: bool,
    resize: Option<ResizeSettings>,
    watermark: Option<Watermark>,
    cut_mode: CutMode,
}

impl Transformer {
    /// Prepare the chain for `settings`.
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let watermark = settings
            .watermark
            .as_ref()
            .map(Watermark::from_settings)
            .transpose()?;

        Ok(Self {
            strip_metadata: settings.strip_metadata,
            resize: settings.resize,
            watermark,
            cut_mode: settings.cut_mode,
        })
    }

    /// Run the chain, yielding one image, or two when cutting.
    pub fn transform(&self, source: &SourceImage) -> Result<Vec<OutputImage>> {
        let source = if self.strip_metadata {
            Cow::Owned(source.strip_metadata())
        } else {
            Cow::Borrowed(source)
        };

        let resized = match &self.resize {
            Some(resize) => Cow::Owned(resize_image(&source.pixels, resize)),
            None => Cow::Borrowed(&source.pixels),
        };

        let mut rgb = normalize_color(&resized);

        if let Some(watermark) = &self.watermark {
            rgb = watermark.apply(&rgb);
        }

        let icc_profile = source.rgb_icc_profile().map(<[u8]>::to_vec);

        Ok(cut(rgb, self.cut_mode)?
            .into_iter()
            .map(|(part, pixels)| OutputImage {
                part,
                pixels,
                icc_profile: icc_profile.clone(),
            })
            .collect())
    }
}
