//! Error types for the image crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for image operations.
pub type Result<T> = std::result::Result<T, ImageError>;

/// Errors that can occur while converting a batch of images.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Settings rejected before any input was touched
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// No usable font for the watermark
    #[error("Watermark font unavailable: {0}")]
    Font(String),

    /// Input could not be read or decoded
    #[error("Failed to decode {}: {source}", path.display())]
    Decode {
        /// Offending input file
        path: PathBuf,
        /// Underlying decoder failure
        #[source]
        source: image::ImageError,
    },

    /// Encoder rejected the image
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Image too small to split in two
    #[error("Cannot cut a {width}x{height} image in half")]
    Cut {
        /// Image width in pixels
        width: u32,
        /// Image height in pixels
        height: u32,
    },

    /// A per-file failure, tagged with the input that caused it
    #[error("{}: {source}", path.display())]
    File {
        /// Input file being processed
        path: PathBuf,
        /// What went wrong
        #[source]
        source: Box<ImageError>,
    },

    /// The batch worker thread died or never started
    #[error("Batch worker failed: {0}")]
    Worker(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    ProcessingError(#[from] image::ImageError),
}

impl ImageError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        ImageError::Config(message.into())
    }

    /// True for errors raised before any file is processed.
    pub fn is_config(&self) -> bool {
        matches!(self, ImageError::Config(_) | ImageError::Font(_))
    }

    /// Attach the input path this error occurred on.
    pub fn for_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            ImageError::Decode { .. } | ImageError::File { .. } => self,
            other => ImageError::File {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_flagged() {
        assert!(ImageError::config("bad").is_config());
        assert!(ImageError::Font("none".into()).is_config());
        assert!(!ImageError::Encode("oops".into()).is_config());
    }

    #[test]
    fn test_for_file_includes_path() {
        let err = ImageError::Encode("disk full".into()).for_file("/tmp/a.png");
        let message = err.to_string();
        assert!(message.contains("/tmp/a.png"));
        assert!(message.contains("disk full"));
    }

    #[test]
    fn test_for_file_does_not_double_wrap() {
        let err = ImageError::Encode("x".into())
            .for_file("/tmp/a.png")
            .for_file("/tmp/b.png");
        assert!(!err.to_string().contains("/tmp/b.png"));
    }
}
