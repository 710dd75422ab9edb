//! Error types for swap planning.

use std::path::PathBuf;

use relief_heightmap::HeightmapError;
use relief_palette::PaletteError;
use relief_types::TypesError;
use thiserror::Error;

/// Errors that can occur while planning or persisting swaps.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlanError {
    /// Settings or filament validation failed.
    #[error(transparent)]
    Invalid(#[from] TypesError),

    /// Working heightmap could not be built.
    #[error(transparent)]
    Heightmap(#[from] HeightmapError),

    /// Automatic palette extraction failed.
    #[error(transparent)]
    Palette(#[from] PaletteError),

    /// Reading or writing a plan file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// JSON document is malformed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML document is malformed.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filament document has no usable entries.
    #[error("filament list is empty")]
    NoFilaments,
}

/// Result type for planning operations.
pub type PlanResult<T> = std::result::Result<T, PlanError>;

impl PlanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
