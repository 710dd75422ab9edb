//! Error types for heightmap construction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or mapping a height field.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HeightmapError {
    /// Grid must have at least 2 samples per axis.
    #[error("height field must be at least 2x2 samples, got {width}x{height}")]
    TooSmall {
        /// Samples along X.
        width: usize,
        /// Samples along Y.
        height: usize,
    },

    /// Sample buffer length does not match `width * height`.
    #[error("height field expects {expected} samples, got {got}")]
    LengthMismatch {
        /// `width * height`.
        expected: usize,
        /// Actual buffer length.
        got: usize,
    },

    /// A sample is NaN or infinite.
    #[error("height field sample {index} is not finite")]
    NonFinite {
        /// Row-major index of the offending sample.
        index: usize,
    },

    /// Parameter out of range.
    #[error("invalid heightmap parameter: {0}")]
    InvalidParams(String),

    /// Source image could not be read or decoded.
    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        /// Path of the image.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },
}

/// Result type for heightmap operations.
pub type HeightmapResult<T> = std::result::Result<T, HeightmapError>;
