//! Image conversion for pixcut.
//!
//! This crate provides:
//! - A fixed transform chain (metadata strip, resize, color normalization,
//!   watermark, cut)
//! - Encoding to WebP, JPEG or PNG, with a bounded quality search for a
//!   target file size
//! - A sequential batch coordinator reporting progress over a channel

#![warn(missing_docs)]

mod batch;
mod cut;
mod encode;
mod error;
mod format;
mod normalize;
mod resize;
mod settings;
mod source;
mod transform;
mod watermark;

pub use batch::{
    BatchEvent, BatchHandle, BatchJob, BatchResult, BatchSink, BatchState, BatchSummary,
    DEFAULT_OUTPUT_DIR_NAME, FileReport, default_output_dir, output_path, progress_percent,
};
pub use cut::{CutPart, cut};
pub use encode::{
    Encoder, FALLBACK_QUALITY, MAX_PROBES, MAX_QUALITY, MIN_QUALITY, QualitySearch, WriteReport,
    encode_to_vec, search_quality,
};
pub use error::{ImageError, Result};
pub use format::{INPUT_EXTENSIONS, OutputFormat, is_supported_input};
pub use normalize::{BACKGROUND, flatten_alpha, has_alpha_channel, normalize_color};
pub use resize::{RESIZE_FILTER, resize_image, target_dimensions};
pub use settings::{
    CutMode, MAX_CUSTOM_DIMENSION, MAX_SCALE_PERCENT, MAX_TARGET_SIZE_KB, PRESET_WIDTHS,
    ResizeMode, ResizeSettings, Settings, WATERMARK_FONT_SIZES, WatermarkPosition,
    WatermarkSettings,
};
pub use source::SourceImage;
pub use transform::{OutputImage, Transformer};
pub use watermark::{
    INK, MARGIN, SYSTEM_FONT_CANDIDATES, Watermark, anchor_origin, composite, find_system_font,
    load_font,
};
