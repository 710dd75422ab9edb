//! Error type for relief jobs.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the pipeline and its stages.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReliefError {
    /// Settings or profile validation failed.
    #[error(transparent)]
    Invalid(#[from] relief_types::TypesError),

    /// Heightmap stage failed.
    #[error(transparent)]
    Heightmap(#[from] relief_heightmap::HeightmapError),

    /// Mesh synthesis failed.
    #[error(transparent)]
    Mesh(#[from] relief_mesh::ReliefMeshError),

    /// STL export failed.
    #[error(transparent)]
    Stl(#[from] mesh_io::IoError),

    /// Palette loading or extraction failed.
    #[error(transparent)]
    Palette(#[from] relief_palette::PaletteError),

    /// Planning or plan I/O failed.
    #[error(transparent)]
    Plan(#[from] relief_plan::PlanError),

    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Config path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Config file does not parse.
    #[error("invalid config {path}: {message}")]
    ConfigParse {
        /// Config path.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Output directory or file could not be created.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Pipeline worker thread could not be started.
    #[error("failed to spawn pipeline worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// Image could not be encoded.
    #[error("failed to save image {path}: {source}")]
    ImageSave {
        /// Target path.
        path: PathBuf,
        /// Encoder error.
        #[source]
        source: image::ImageError,
    },
}

/// Result type for relief jobs.
pub type ReliefResult<T> = std::result::Result<T, ReliefError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn spawn_failure_keeps_io_source() {
        let err = ReliefError::Spawn(std::io::Error::new(
            std::io::ErrorKind::OutOfMemory,
            "no threads left",
        ));
        assert_eq!(
            err.to_string(),
            "failed to spawn pipeline worker: no threads left"
        );
        assert!(err.source().is_some());
        assert!(!err.to_string().contains("<worker thread>"));
    }
}
