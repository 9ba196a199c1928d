//! Decoded input images and the metadata carried alongside them.

use crate::{ImageError, Result};
use image::{ColorType, DynamicImage, ImageDecoder, ImageReader};
use std::path::Path;

/// A decoded input image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// Decoded pixels
    pub pixels: DynamicImage,
    /// Color layout reported by the decoder, before any conversion
    pub color_type: ColorType,
    /// Embedded ICC profile, if the decoder exposed one
    pub icc_profile: Option<Vec<u8>>,
}

impl SourceImage {
    /// Wrap already-decoded pixels that carry no metadata.
    pub fn from_pixels(pixels: DynamicImage) -> Self {
        Self {
            color_type: pixels.color(),
            pixels,
            icc_profile: None,
        }
    }

    /// Decode an image file, sniffing the format from its content.
    pub fn open(path: &Path) -> Result<Self> {
        let decode_err = |source| ImageError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let mut decoder = reader.into_decoder().map_err(decode_err)?;

        // A broken profile is not worth failing the file over.
        let icc_profile = decoder.icc_profile().unwrap_or_else(|err| {
            tracing::debug!(path = %path.display(), %err, "ignoring unreadable ICC profile");
            None
        });
        let color_type = decoder.color_type();
        let pixels = DynamicImage::from_decoder(decoder).map_err(decode_err)?;

        Ok(Self {
            pixels,
            color_type,
            icc_profile,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether any non-pixel data rides along with this image.
    pub fn has_metadata(&self) -> bool {
        self.icc_profile.is_some()
    }

    /// Pixel-identical copy without embedded metadata.
    pub fn strip_metadata(&self) -> Self {
        Self {
            pixels: self.pixels.clone(),
            color_type: self.color_type,
            icc_profile: None,
        }
    }

    /// ICC profile that is still valid once the pixels are normalized to RGB.
    ///
    /// Gray and CMYK profiles describe a different color space than the
    /// normalized output, so only profiles from RGB sources survive.
    pub fn rgb_icc_profile(&self) -> Option<&[u8]> {
        let rgb_source = matches!(
            self.color_type,
            ColorType::Rgb8
                | ColorType::Rgba8
                | ColorType::Rgb16
                | ColorType::Rgba16
                | ColorType::Rgb32F
                | ColorType::Rgba32F
        );
        self.icc_profile.as_deref().filter(|_| rgb_source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    fn with_profile(pixels: DynamicImage) -> SourceImage {
        SourceImage {
            icc_profile: Some(vec![1, 2, 3]),
            ..SourceImage::from_pixels(pixels)
        }
    }

    #[test]
    fn test_strip_keeps_pixels() {
        let mut rgb = RgbImage::new(3, 2);
        rgb.put_pixel(1, 1, image::Rgb([10, 20, 30]));
        let source = with_profile(DynamicImage::ImageRgb8(rgb));

        let stripped = source.strip_metadata();
        assert!(!stripped.has_metadata());
        assert_eq!(stripped.pixels, source.pixels);
        assert!(source.has_metadata());
    }

    #[test]
    fn test_gray_profile_is_not_reused() {
        let source = with_profile(DynamicImage::ImageLuma8(GrayImage::new(1, 1)));
        assert!(source.rgb_icc_profile().is_none());

        let source = with_profile(DynamicImage::ImageRgb8(RgbImage::new(1, 1)));
        assert_eq!(source.rgb_icc_profile(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_open_missing_file() {
        let err = SourceImage::open(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, ImageError::IoError(_)));
    }

    #[test]
    fn test_open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.png");
        RgbImage::from_pixel(4, 3, image::Rgb([1, 2, 3]))
            .save(&path)
            .unwrap();

        let source = SourceImage::open(&path).unwrap();
        assert_eq!((source.width(), source.height()), (4, 3));
        assert_eq!(source.color_type, ColorType::Rgb8);
    }

    #[test]
    fn test_open_garbage_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really a png").unwrap();

        let err = SourceImage::open(&path).unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }));
        assert!(err.to_string().contains("broken.png"));
    }
}
