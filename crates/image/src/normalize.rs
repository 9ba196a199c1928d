//! Color-mode normalization to opaque 8-bit RGB.

use image::{DynamicImage, Rgb, RgbImage, Rgba};

/// Background that transparent regions are flattened onto.
pub const BACKGROUND: [u8; 3] = [255, 255, 255];

/// Flatten any image to 3-channel RGB.
///
/// Images with an alpha channel are composited over [`BACKGROUND`], so fully
/// transparent pixels come out pure white. Palette images are expanded by the
/// decoder and take the same path. Everything else is plainly converted.
pub fn normalize_color(img: &DynamicImage) -> RgbImage {
    if has_alpha_channel(img) {
        flatten_alpha(img, BACKGROUND)
    } else {
        img.to_rgb8()
    }
}

/// Composite an image over a solid background color, dropping alpha.
pub fn flatten_alpha(img: &DynamicImage, background: [u8; 3]) -> RgbImage {
    let rgba = img.to_rgba8();

    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = f32::from(a) / 255.0;
        let blend = |channel: u8, bg: u8| {
            (f32::from(channel) * alpha + f32::from(bg) * (1.0 - alpha)).round() as u8
        };
        Rgb([
            blend(r, background[0]),
            blend(g, background[1]),
            blend(b, background[2]),
        ])
    })
}

/// Check if an image has an alpha channel
pub fn has_alpha_channel(img: &DynamicImage) -> bool {
    img.color().has_alpha()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayAlphaImage, GrayImage, LumaA, RgbaImage};

    #[test]
    fn test_flatten_white_background() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255])); // Opaque red
        img.put_pixel(0, 1, Rgba([0, 255, 0, 128])); // Semi-transparent green
        img.put_pixel(1, 0, Rgba([0, 0, 255, 0])); // Fully transparent blue
        img.put_pixel(1, 1, Rgba([255, 255, 0, 255])); // Opaque yellow

        let result = normalize_color(&DynamicImage::ImageRgba8(img));

        assert_eq!(result.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(result.get_pixel(0, 1), &Rgb([127, 255, 127]));
        assert_eq!(result.get_pixel(1, 0), &Rgb([255, 255, 255]));
        assert_eq!(result.get_pixel(1, 1), &Rgb([255, 255, 0]));
    }

    #[test]
    fn test_gray_alpha_flattens() {
        let img = GrayAlphaImage::from_pixel(3, 3, LumaA([0, 0]));
        let result = normalize_color(&DynamicImage::ImageLumaA8(img));
        assert!(result.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_gray_becomes_rgb() {
        let img = GrayImage::from_pixel(2, 1, image::Luma([42]));
        let result = normalize_color(&DynamicImage::ImageLuma8(img));
        assert_eq!(result.get_pixel(1, 0), &Rgb([42, 42, 42]));
    }

    #[test]
    fn test_has_alpha_channel() {
        let rgba_img = DynamicImage::ImageRgba8(RgbaImage::new(1, 1));
        assert!(has_alpha_channel(&rgba_img));

        let rgb_img = DynamicImage::ImageRgb8(RgbImage::new(1, 1));
        assert!(!has_alpha_channel(&rgb_img));
    }

    #[test]
    fn test_custom_background() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 200, 200, 0]));
        let result = flatten_alpha(&DynamicImage::ImageRgba8(img), [0, 0, 0]);
        assert_eq!(result.get_pixel(0, 0), &Rgb([0, 0, 0]));
    }
}
