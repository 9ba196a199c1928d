//! Splitting an image into two halves.

use crate::settings::CutMode;
use crate::{ImageError, Result};
use image::RgbImage;
use image::imageops::crop_imm;

/// Which half of a cut image a piece is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutPart {
    /// Rows `[0, h/2)`
    Top,
    /// Rows `[h/2, h)`
    Bottom,
    /// Columns `[0, w/2)`
    Left,
    /// Columns `[w/2, w)`
    Right,
}

impl CutPart {
    /// Tag inserted before the extension of the output file name.
    pub fn file_tag(&self) -> &'static str {
        match self {
            CutPart::Top => "_top",
            CutPart::Bottom => "_bottom",
            CutPart::Left => "_left",
            CutPart::Right => "_right",
        }
    }
}

/// Split an image per `mode`.
///
/// `None` passes the image through untouched. The halves use floor division,
/// so on odd sizes the second half gets the extra row or column.
pub fn cut(img: RgbImage, mode: CutMode) -> Result<Vec<(Option<CutPart>, RgbImage)>> {
    let (width, height) = img.dimensions();

    match mode {
        CutMode::None => Ok(vec![(None, img)]),
        CutMode::Horizontal => {
            if height < 2 {
                return Err(ImageError::Cut { width, height });
            }
            let half = height / 2;
            Ok(vec![
                (Some(CutPart::Top), crop_imm(&img, 0, 0, width, half).to_image()),
                (
                    Some(CutPart::Bottom),
                    crop_imm(&img, 0, half, width, height - half).to_image(),
                ),
            ])
        }
        CutMode::Vertical => {
            if width < 2 {
                return Err(ImageError::Cut { width, height });
            }
            let half = width / 2;
            Ok(vec![
                (Some(CutPart::Left), crop_imm(&img, 0, 0, half, height).to_image()),
                (
                    Some(CutPart::Right),
                    crop_imm(&img, half, 0, width - half, height).to_image(),
                ),
            ])
        }
    }
}
