//! Error types for relief mesh synthesis.

use thiserror::Error;

/// Errors that can occur while building a relief mesh.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ReliefMeshError {
    /// A physical dimension is not a positive finite number.
    #[error("{name} must be a positive finite length, got {value}")]
    InvalidDimension {
        /// Which dimension.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Floor thickness is not finite or negative.
    #[error("floor thickness must be finite and >= 0, got {0}")]
    InvalidFloor(f64),
}

/// Result type for relief mesh synthesis.
pub type ReliefMeshResult<T> = std::result::Result<T, ReliefMeshError>;
