//! Error types for mesh I/O operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur during mesh I/O operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Destination could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid header in binary STL.
    #[error("invalid STL header: expected {expected} bytes, got {got}")]
    InvalidHeader {
        /// Expected header size.
        expected: usize,
        /// Actual header size.
        got: usize,
    },

    /// Fewer triangle records than the header announced.
    #[error("invalid face count: expected {expected}, got {got}")]
    InvalidFaceCount {
        /// Number of faces in the header.
        expected: u32,
        /// Number of complete records read.
        got: u32,
    },

    /// Mesh has more triangles than a binary STL can index.
    #[error("mesh has {0} triangles, binary STL supports at most u32::MAX")]
    TooManyTriangles(usize),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
