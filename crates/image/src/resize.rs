//! Image resizing with the image crate.

use crate::settings::{ResizeMode, ResizeSettings};
use image::DynamicImage;
use image::imageops::FilterType;

/// Resampling filter for every resize. Lanczos keeps edges crisp on downscale.
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// Calculate output dimensions for a resize request.
///
/// # Arguments
/// * `width`, `height` - Current dimensions
/// * `settings` - Resize mode and aspect flag
///
/// # Returns
/// (new_width, new_height), never smaller than 1x1
///
/// # Example
/// ```
/// use pixcut_image::{target_dimensions, ResizeMode, ResizeSettings};
///
/// let preset = ResizeSettings { mode: ResizeMode::Preset { width: 800 }, maintain_aspect: true };
/// assert_eq!(target_dimensions(4000, 3000, &preset), (800, 600));
///
/// let half = ResizeSettings { mode: ResizeMode::Percentage { percent: 50 }, maintain_aspect: true };
/// assert_eq!(target_dimensions(1001, 333, &half), (500, 166));
/// ```
pub fn target_dimensions(width: u32, height: u32, settings: &ResizeSettings) -> (u32, u32) {
    let (new_width, new_height) = match settings.mode {
        ResizeMode::Preset { width: target } => {
            if settings.maintain_aspect {
                let ratio = f64::from(target) / f64::from(width);
                (target, (f64::from(height) * ratio).round() as u32)
            } else {
                (target, height)
            }
        }
        ResizeMode::Custom {
            width: box_width,
            height: box_height,
        } => {
            if settings.maintain_aspect {
                fit_within(width, height, box_width, box_height)
            } else {
                (box_width, box_height)
            }
        }
        ResizeMode::Percentage { percent } => {
            let scale = |dim: u32| (u64::from(dim) * u64::from(percent) / 100) as u32;
            (scale(width), scale(height))
        }
    };

    (new_width.max(1), new_height.max(1))
}

/// Shrink to fit inside a box, preserving aspect ratio. Never enlarges.
fn fit_within(width: u32, height: u32, box_width: u32, box_height: u32) -> (u32, u32) {
    if width <= box_width && height <= box_height {
        return (width, height);
    }

    let scale = f64::min(
        f64::from(box_width) / f64::from(width),
        f64::from(box_height) / f64::from(height),
    );
    let fit = |dim: u32, limit: u32| ((f64::from(dim) * scale).round() as u32).clamp(1, limit);

    (fit(width, box_width), fit(height, box_height))
}

/// Resize an image according to `settings`.
///
/// Returns a new image; the input is untouched. When the computed size
/// matches the current one the pixels are copied without resampling.
pub fn resize_image(img: &DynamicImage, settings: &ResizeSettings) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let (new_width, new_height) = target_dimensions(width, height, settings);

    if (new_width, new_height) == (width, height) {
        return img.clone();
    }

    tracing::debug!(width, height, new_width, new_height, "resizing");
    img.resize_exact(new_width, new_height, RESIZE_FILTER)
}
