//! Filament profiles.

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::error::{TypesError, TypesResult};

/// Transmittance distance assigned to filaments synthesized from a palette.
pub const DEFAULT_TD_MM: f64 = 0.8;

/// A filament the printer can be loaded with.
///
/// `td_mm` is the transmittance distance: the thickness at which backlight
/// through this material falls to `1/e`. It must be finite and positive.
/// Deserialization goes through the same validation as [`FilamentProfile::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFilament")]
pub struct FilamentProfile {
    /// Display name, used to label swap steps.
    pub name: String,
    /// Filament color.
    pub color_hex: HexColor,
    /// Transmittance distance in mm.
    pub td_mm: f64,
    /// Free-form notes.
    pub notes: String,
}

impl FilamentProfile {
    /// Create a validated profile.
    ///
    /// # Errors
    ///
    /// Returns an error if `color_hex` is not `#rrggbb` or `td_mm` is not
    /// strictly positive. `name` is free text and is kept as given.
    pub fn new(name: impl Into<String>, color_hex: &str, td_mm: f64) -> TypesResult<Self> {
        Self::with_color(name, color_hex.parse()?, td_mm)
    }

    /// Create a validated profile from an already parsed color.
    ///
    /// # Errors
    ///
    /// Returns an error if `td_mm` is not strictly positive.
    pub fn with_color(name: impl Into<String>, color_hex: HexColor, td_mm: f64) -> TypesResult<Self> {
        let name = name.into();
        if !(td_mm.is_finite() && td_mm > 0.0) {
            return Err(TypesError::InvalidOpticalDepth(td_mm));
        }
        Ok(Self {
            name,
            color_hex,
            td_mm,
            notes: String::new(),
        })
    }

    /// Attach notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

#[derive(Deserialize)]
struct RawFilament {
    name: String,
    color_hex: HexColor,
    td_mm: f64,
    #[serde(default)]
    notes: String,
}

impl TryFrom<RawFilament> for FilamentProfile {
    type Error = TypesError;

    fn try_from(raw: RawFilament) -> Result<Self, Self::Error> {
        Ok(Self::with_color(raw.name, raw.color_hex, raw.td_mm)?.with_notes(raw.notes))
    }
}
