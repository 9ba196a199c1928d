//! Command-line arguments and how they override file settings.

use clap::Parser;
use pixcut_image::{
    CutMode, ImageError, OutputFormat, ResizeMode, ResizeSettings, Result, Settings,
    WatermarkPosition, WatermarkSettings,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pixcut")]
#[command(about = "Convert, resize, watermark and cut images in batch")]
#[command(version)]
pub struct Cli {
    /// Image files or directories (searched recursively)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory [default: "processed images" next to the first input]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Settings file [default: ./pixcut.toml or ./.pixcut.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format: webp, jpg or png
    #[arg(long)]
    pub format: Option<OutputFormat>,

    /// Encoder quality for webp and jpg
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,

    /// Target file size in KB; searches for the highest quality that fits
    #[arg(long, value_name = "KB")]
    pub target_size: Option<u32>,

    /// Split each image into two halves: none, horizontal or vertical
    #[arg(long)]
    pub cut: Option<CutMode>,

    /// Resize to a preset width: 1920, 1200, 800 or 400
    #[arg(long, conflicts_with_all = ["width", "scale"])]
    pub preset_width: Option<u32>,

    /// Resize to fit this width (with --height)
    #[arg(long, requires = "height", conflicts_with = "scale")]
    pub width: Option<u32>,

    /// Resize to fit this height (with --width)
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Resize by percentage (1-500)
    #[arg(long, value_name = "PERCENT")]
    pub scale: Option<u32>,

    /// Stretch to the exact size instead of keeping the aspect ratio
    #[arg(long)]
    pub no_aspect: bool,

    /// Watermark text
    #[arg(long)]
    pub watermark: Option<String>,

    /// Watermark anchor: top-left, top-right, bottom-left, bottom-right or center
    #[arg(long)]
    pub watermark_position: Option<WatermarkPosition>,

    /// Watermark font size in pixels (10-200)
    #[arg(long)]
    pub watermark_size: Option<u32>,

    /// Watermark opacity (0-255)
    #[arg(long)]
    pub watermark_opacity: Option<u8>,

    /// Font file for the watermark
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Drop embedded metadata (the default)
    #[arg(long, overrides_with = "keep_metadata")]
    pub strip_metadata: bool,

    /// Keep the embedded color profile where the format allows it
    #[arg(long, overrides_with = "strip_metadata")]
    pub keep_metadata: bool,

    /// Prepended to every output file name
    #[arg(long)]
    pub prefix: Option<String>,

    /// Appended to every output file name, before any cut tag
    #[arg(long)]
    pub suffix: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Debug logging for pixcut (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Layer the flags over `settings`.
    pub fn apply(&self, settings: &mut Settings) -> Result<()> {
        if let Some(format) = self.format {
            settings.output_format = format;
        }
        if let Some(quality) = self.quality {
            settings.quality = quality;
        }
        if let Some(kb) = self.target_size {
            settings.target_size_kb = kb;
        }
        if let Some(cut) = self.cut {
            settings.cut_mode = cut;
        }

        if let Some(mode) = self.resize_mode() {
            settings.resize = Some(ResizeSettings {
                mode,
                maintain_aspect: !self.no_aspect,
            });
        } else if self.no_aspect {
            match settings.resize.as_mut() {
                Some(resize) => resize.maintain_aspect = false,
                None => return Err(ImageError::config("--no-aspect needs a resize option")),
            }
        }

        self.apply_watermark(settings)?;

        if self.keep_metadata {
            settings.strip_metadata = false;
        } else if self.strip_metadata {
            settings.strip_metadata = true;
        }
        if let Some(prefix) = &self.prefix {
            settings.filename_prefix = prefix.clone();
        }
        if let Some(suffix) = &self.suffix {
            settings.filename_suffix = suffix.clone();
        }

        Ok(())
    }

    fn resize_mode(&self) -> Option<ResizeMode> {
        if let Some(width) = self.preset_width {
            Some(ResizeMode::Preset { width })
        } else if let (Some(width), Some(height)) = (self.width, self.height) {
            Some(ResizeMode::Custom { width, height })
        } else {
            self.scale.map(|percent| ResizeMode::Percentage { percent })
        }
    }

    fn apply_watermark(&self, settings: &mut Settings) -> Result<()> {
        if let Some(text) = &self.watermark {
            match settings.watermark.as_mut() {
                Some(watermark) => watermark.text = text.clone(),
                None => settings.watermark = Some(WatermarkSettings::new(text.clone())),
            }
        }

        let styled = self.watermark_position.is_some()
            || self.watermark_size.is_some()
            || self.watermark_opacity.is_some()
            || self.font.is_some();
        let Some(watermark) = settings.watermark.as_mut() else {
            if styled {
                return Err(ImageError::config("watermark options need --watermark TEXT"));
            }
            return Ok(());
        };

        if let Some(position) = self.watermark_position {
            watermark.position = position;
        }
        if let Some(size) = self.watermark_size {
            watermark.font_size = size;
        }
        if let Some(opacity) = self.watermark_opacity {
            watermark.opacity = opacity;
        }
        if let Some(font) = &self.font {
            watermark.font = Some(font.clone());
        }
        Ok(())
    }
}
