//! Encoding, including the search for a quality that meets a size budget.

use crate::transform::OutputImage;
use crate::{ImageError, OutputFormat, Result, Settings};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::path::{Path, PathBuf};

/// Lowest quality the search will try.
pub const MIN_QUALITY: u8 = 1;

/// Highest quality the search will try.
pub const MAX_QUALITY: u8 = 100;

/// Quality used when no probe fits the budget.
pub const FALLBACK_QUALITY: u8 = 85;

/// libwebp effort level, 0 (fast) to 6 (smallest output).
const WEBP_METHOD: i32 = 6;

/// Upper bound on in-memory probe encodes per image. Binary search over
/// 1..=100 needs at most 7, so this never cuts a search short.
pub const MAX_PROBES: u32 = 10;

/// Outcome of a quality search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualitySearch {
    /// Quality to encode with
    pub quality: u8,
    /// Number of probe encodes performed
    pub probes: u32,
    /// Whether any probe came in under the budget
    pub fits: bool,
}

/// Find the highest quality whose encoded size is at most `target_bytes`.
///
/// `probe` encodes at the given quality (in memory) and returns the size.
/// Sizes are assumed to grow with quality. When even quality 1 is too big the
/// result falls back to [`FALLBACK_QUALITY`] with `fits == false`; callers
/// still encode with it, so the budget is best-effort.
///
/// # Example
/// ```
/// use pixcut_image::search_quality;
///
/// let search = search_quality(42_000, |q| Ok(u64::from(q) * 1_000)).unwrap();
/// assert_eq!(search.quality, 42);
/// assert!(search.fits);
/// ```
pub fn search_quality<F>(target_bytes: u64, mut probe: F) -> Result<QualitySearch>
where
    F: FnMut(u8) -> Result<u64>,
{
    let (mut low, mut high) = (MIN_QUALITY, MAX_QUALITY);
    let mut best = FALLBACK_QUALITY;
    let mut fits = false;
    let mut probes = 0;

    while low <= high && probes < MAX_PROBES {
        let mid = low + (high - low) / 2;
        let size = probe(mid)?;
        probes += 1;
        tracing::trace!(quality = mid, size, target_bytes, "quality probe");

        if size <= target_bytes {
            best = mid;
            fits = true;
            low = mid + 1;
        } else {
            high = mid - 1;
        }
    }

    Ok(QualitySearch {
        quality: best,
        probes,
        fits,
    })
}

/// Encode RGB pixels to an in-memory buffer.
///
/// `quality` is ignored for PNG, which always uses its strongest lossless
/// compression. The ICC profile is embedded where the encoder supports it.
pub fn encode_to_vec(
    pixels: &RgbImage,
    format: OutputFormat,
    quality: u8,
    icc_profile: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    match format {
        OutputFormat::Jpeg => write_with(
            JpegEncoder::new_with_quality(&mut buffer, quality),
            pixels,
            icc_profile,
        )?,
        OutputFormat::Png => write_with(
            PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive),
            pixels,
            icc_profile,
        )?,
        OutputFormat::WebP => {
            if icc_profile.is_some() {
                tracing::debug!("WebP output cannot carry an ICC profile, dropping it");
            }
            let encoded = webp::Encoder::from_rgb(pixels.as_raw(), pixels.width(), pixels.height())
                .encode_advanced(&webp_config(quality)?)
                .map_err(|e| ImageError::Encode(format!("WebP encoder failed: {e:?}")))?;
            buffer.extend_from_slice(&encoded);
        }
    }

    Ok(buffer)
}

/// Lossy WebP settings at the slowest, best-compressing effort level.
fn webp_config(quality: u8) -> Result<webp::WebPConfig> {
    let mut config = webp::WebPConfig::new()
        .map_err(|()| ImageError::Encode("libwebp rejected its default config".to_string()))?;
    config.lossless = 0;
    config.quality = f32::from(quality);
    config.method = WEBP_METHOD;
    Ok(config)
}

fn write_with<E: ImageEncoder>(
    mut encoder: E,
    pixels: &RgbImage,
    icc_profile: Option<&[u8]>,
) -> Result<()> {
    if let Some(icc) = icc_profile {
        if let Err(e) = encoder.set_icc_profile(icc.to_vec()) {
            tracing::debug!(%e, "encoder rejected ICC profile");
        }
    }

    encoder.write_image(
        pixels.as_raw(),
        pixels.width(),
        pixels.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

/// What a single write produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// File written
    pub path: PathBuf,
    /// Size of the file on disk
    pub bytes_written: u64,
    /// Quality used, `None` for formats without one
    pub quality: Option<u8>,
    /// Quality search details, when a target size was pursued
    pub search: Option<QualitySearch>,
}

/// Encodes transformed images with a fixed quality or a size budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoder {
    format: OutputFormat,
    quality: u8,
    target_bytes: Option<u64>,
}

impl Encoder {
    /// Create an encoder. `target_bytes` enables the quality search.
    pub fn new(format: OutputFormat, quality: u8, target_bytes: Option<u64>) -> Self {
        Self {
            format,
            quality,
            target_bytes,
        }
    }

    /// Encoder matching a batch's settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.output_format,
            settings.quality,
            settings.target_bytes(),
        )
    }

    /// Output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Pick the quality for `image`, running the size search if configured.
    fn resolve_quality(&self, image: &OutputImage) -> Result<(Option<u8>, Option<QualitySearch>)> {
        if !self.format.supports_quality() {
            if self.target_bytes.is_some() {
                tracing::debug!(format = %self.format, "target size ignored for lossless output");
            }
            return Ok((None, None));
        }

        let Some(target_bytes) = self.target_bytes else {
            return Ok((Some(self.quality), None));
        };

        let search = search_quality(target_bytes, |quality| {
            let probe = encode_to_vec(
                &image.pixels,
                self.format,
                quality,
                image.icc_profile.as_deref(),
            )?;
            Ok(probe.len() as u64)
        })?;

        if !search.fits {
            tracing::warn!(
                target_bytes,
                quality = search.quality,
                "target size unreachable even at minimum quality"
            );
        }
        Ok((Some(search.quality), Some(search)))
    }

    /// Encode `image` and write it to `path`.
    ///
    /// Probes during a size search stay in memory; exactly one encode is
    /// written to disk.
    pub fn write(&self, image: &OutputImage, path: &Path) -> Result<WriteReport> {
        let (quality, search) = self.resolve_quality(image)?;
        let bytes = encode_to_vec(
            &image.pixels,
            self.format,
            quality.unwrap_or(MAX_QUALITY),
            image.icc_profile.as_deref(),
        )?;

        std::fs::write(path, &bytes)?;
        tracing::debug!(
            path = %path.display(),
            bytes = bytes.len(),
            ?quality,
            "wrote output"
        );

        Ok(WriteReport {
            path: path.to_path_buf(),
            bytes_written: bytes.len() as u64,
            quality,
            search,
        })
    }
}
