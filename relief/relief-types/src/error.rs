//! Error types for value validation.

use thiserror::Error;

/// Errors raised when a value object is constructed from invalid input.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum TypesError {
    /// Color string is not six hex digits with an optional leading `#`.
    #[error("invalid hex color {0:?} (expected #rrggbb)")]
    InvalidHexColor(String),

    /// Transmittance distance must be strictly positive and finite.
    #[error("transmittance distance must be > 0 mm, got {0}")]
    InvalidOpticalDepth(f64),

    /// Selector value is not one of the known names.
    #[error("unknown {kind} {value:?} (expected one of: {expected})")]
    UnknownSelector {
        /// Which selector was being parsed.
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Comma-separated accepted names.
        expected: String,
    },

    /// Layer height must be strictly positive.
    #[error("layer height must be > 0 mm, got {0}")]
    InvalidLayerHeight(f64),

    /// Height range bounds are inverted or not finite.
    #[error("invalid height range: min {min} mm, max {max} mm (need finite min <= max)")]
    InvalidHeightRange {
        /// Lower bound in mm.
        min: f64,
        /// Upper bound in mm.
        max: f64,
    },

    /// A physical dimension must be strictly positive.
    #[error("{name} must be > 0, got {value}")]
    NonPositive {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// Grid resolutions must have at least two samples per axis.
    #[error("{name} must be at least 2 samples, got {value}")]
    InvalidResolution {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: u32,
    },

    /// Palette size must be at least one color.
    #[error("palette size must be at least 1")]
    EmptyPalette,
}

/// Result type for value validation.
pub type TypesResult<T> = std::result::Result<T, TypesError>;
