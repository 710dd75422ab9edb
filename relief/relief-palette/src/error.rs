//! Error types for palette extraction and parsing.

use std::path::PathBuf;

use relief_types::TypesError;
use thiserror::Error;

/// Errors that can occur while building or reading a palette.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaletteError {
    /// Requested palette size is unusable.
    #[error("cannot extract {requested} colors from {available} pixels")]
    InvalidCount {
        /// Requested number of colors.
        requested: usize,
        /// Pixels available to sample from.
        available: usize,
    },

    /// A palette entry is not a valid color.
    #[error(transparent)]
    InvalidColor(#[from] TypesError),

    /// Palette file could not be read.
    #[error("failed to read palette {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON palette file is malformed.
    #[error("invalid JSON palette: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for palette operations.
pub type PaletteResult<T> = std::result::Result<T, PaletteError>;
