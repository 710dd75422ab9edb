//! Relief and plan settings, plus the closed selector enums they use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

/// Implements `as_str`, `Display` and an exact-match `FromStr` for a selector enum.
///
/// `FromStr` accepts the same names as the serde representation and nothing else.
macro_rules! selector {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire name of this variant.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(TypesError::UnknownSelector {
                        kind: $kind,
                        value: s.to_string(),
                        expected: [$($name),+].join(", "),
                    }),
                }
            }
        }
    };
}

/// How swap heights are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Strategy {
    /// Quantiles of the image's brightness distribution.
    #[default]
    #[serde(rename = "bands")]
    Bands,
    /// Uniformly spaced height ratios.
    #[serde(rename = "quantize")]
    Quantize,
    /// Distinct blend-layer counts from the transmittance model.
    #[serde(rename = "tdblend")]
    TdBlend,
}

selector!(Strategy, "strategy", {
    Bands => "bands",
    Quantize => "quantize",
    TdBlend => "tdblend",
});

/// Color quantization method for automatic palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaletteMethod {
    /// Seeded k-means in RGB space.
    #[default]
    #[serde(rename = "kmeans")]
    KMeans,
    /// Median-cut box splitting.
    #[serde(rename = "median-cut")]
    MedianCut,
}

selector!(PaletteMethod, "palette method", {
    KMeans => "kmeans",
    MedianCut => "median-cut",
});

/// Slicer the plan is written for. Only affects advisory text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slicer {
    /// Bambu Studio.
    Bambu,
    /// OrcaSlicer.
    OrcaSlicer,
    /// PrusaSlicer.
    PrusaSlicer,
    /// Ultimaker Cura.
    Cura,
    /// Any other slicer.
    #[default]
    Generic,
}

selector!(Slicer, "slicer", {
    Bambu => "bambu",
    OrcaSlicer => "orcaslicer",
    PrusaSlicer => "prusaslicer",
    Cura => "cura",
    Generic => "generic",
});

/// Pause directive inserted at each swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseStyle {
    /// Filament change (`M600`).
    M600,
    /// Unconditional stop (`M0`).
    M0,
    /// SD print pause (`M25`).
    M25,
    /// No command; the operator pauses manually.
    #[default]
    None,
}

selector!(PauseStyle, "pause style", {
    M600 => "m600",
    M0 => "m0",
    M25 => "m25",
    None => "none",
});

impl PauseStyle {
    /// G-code token for this style, if any.
    #[must_use]
    pub const fn command(self) -> Option<&'static str> {
        match self {
            Self::M600 => Some("M600"),
            Self::M0 => Some("M0"),
            Self::M25 => Some("M25"),
            Self::None => None,
        }
    }
}

fn check_positive(name: &'static str, value: f64) -> TypesResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TypesError::NonPositive { name, value })
    }
}

fn check_range(min: f64, max: f64) -> TypesResult<()> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
        Ok(())
    } else {
        Err(TypesError::InvalidHeightRange { min, max })
    }
}

fn check_resolution(name: &'static str, value: u32) -> TypesResult<()> {
    if value >= 2 {
        Ok(())
    } else {
        Err(TypesError::InvalidResolution { name, value })
    }
}

/// Physical relief dimensions and heightmap shaping.
///
/// The relief is `width_mm` wide; its depth is `height_mm`, or follows the
/// source image's aspect ratio when unset. Thickness runs from `min_mm`
/// (darkest after shaping) to `max_mm`, and `min_mm` is also the floor of
/// the solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReliefSettings {
    /// Physical width in mm (X axis).
    pub width_mm: f64,
    /// Physical depth in mm (Y axis). Derived from the image aspect if `None`.
    pub height_mm: Option<f64>,
    /// Minimum thickness in mm.
    pub min_mm: f64,
    /// Maximum thickness in mm.
    pub max_mm: f64,
    /// Exponent applied to luminance.
    pub gamma: f64,
    /// Reflect heights so bright areas become thin.
    pub invert: bool,
    /// Gaussian blur radius in source pixels (0 disables).
    pub blur: f64,
    /// Default samples per axis.
    pub mesh_res: u32,
    /// Samples along X, overriding `mesh_res`.
    pub mesh_x: Option<u32>,
    /// Samples along Y, overriding `mesh_res`.
    pub mesh_y: Option<u32>,
}

impl Default for ReliefSettings {
    fn default() -> Self {
        Self {
            width_mm: 120.0,
            height_mm: None,
            min_mm: 0.8,
            max_mm: 3.2,
            gamma: 1.0,
            invert: false,
            blur: 0.0,
            mesh_res: 256,
            mesh_x: None,
            mesh_y: None,
        }
    }
}

impl ReliefSettings {
    /// Set the physical width.
    #[must_use]
    pub const fn with_width(mut self, width_mm: f64) -> Self {
        self.width_mm = width_mm;
        self
    }

    /// Fix the physical depth instead of deriving it from the image.
    #[must_use]
    pub const fn with_height(mut self, height_mm: f64) -> Self {
        self.height_mm = Some(height_mm);
        self
    }

    /// Set the thickness range.
    #[must_use]
    pub const fn with_thickness(mut self, min_mm: f64, max_mm: f64) -> Self {
        self.min_mm = min_mm;
        self.max_mm = max_mm;
        self
    }

    /// Set the luminance gamma.
    #[must_use]
    pub const fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Invert heights.
    #[must_use]
    pub const fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Set the pre-resample blur radius.
    #[must_use]
    pub const fn with_blur(mut self, blur: f64) -> Self {
        self.blur = blur;
        self
    }

    /// Set an explicit sample grid, overriding `mesh_res`.
    #[must_use]
    pub const fn with_mesh_size(mut self, mesh_x: u32, mesh_y: u32) -> Self {
        self.mesh_x = Some(mesh_x);
        self.mesh_y = Some(mesh_y);
        self
    }

    /// Set the default samples per axis.
    #[must_use]
    pub const fn with_mesh_res(mut self, mesh_res: u32) -> Self {
        self.mesh_res = mesh_res;
        self
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> TypesResult<()> {
        check_positive("width_mm", self.width_mm)?;
        if let Some(h) = self.height_mm {
            check_positive("height_mm", h)?;
        }
        check_range(self.min_mm, self.max_mm)?;
        check_positive("gamma", self.gamma)?;
        if !(self.blur.is_finite() && self.blur >= 0.0) {
            return Err(TypesError::NonPositive {
                name: "blur",
                value: self.blur,
            });
        }
        check_resolution("mesh_res", self.mesh_res)?;
        check_resolution("mesh_x", self.mesh_x.unwrap_or(self.mesh_res))?;
        check_resolution("mesh_y", self.mesh_y.unwrap_or(self.mesh_res))?;
        Ok(())
    }

    /// Resolve `(samples_x, samples_y, height_mm)` for a source image.
    ///
    /// ```
    /// use relief_types::ReliefSettings;
    ///
    /// let (x, y, h) = ReliefSettings::default().mesh_dims(400, 200);
    /// assert_eq!((x, y), (256, 256));
    /// assert!((h - 60.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn mesh_dims(&self, image_width: u32, image_height: u32) -> (u32, u32, f64) {
        let mx = self.mesh_x.unwrap_or(self.mesh_res);
        let my = self.mesh_y.unwrap_or(self.mesh_res);
        let height_mm = self.height_mm.unwrap_or_else(|| {
            self.width_mm * f64::from(image_height) / f64::from(image_width.max(1))
        });
        (mx, my, height_mm)
    }
}

/// Swap-plan parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanSettings {
    /// How swap heights are chosen.
    pub strategy: Strategy,
    /// Printer layer height in mm.
    pub layer_height: f64,
    /// Number of swaps to plan.
    pub swap_count: u32,
    /// Thickness at the darkest point in mm.
    pub min_mm: f64,
    /// Thickness at the brightest point in mm.
    pub max_mm: f64,
    /// Palette size for automatic palettes.
    pub colors: usize,
    /// Quantizer for automatic palettes.
    pub palette_method: PaletteMethod,
    /// Target slicer.
    pub slicer: Slicer,
    /// Pause directive per step.
    pub gcode_style: PauseStyle,
    /// Seed for k-means.
    pub seed: u64,
    /// Scale of the preview image relative to the source.
    pub preview_scale: f64,
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Bands,
            layer_height: 0.2,
            swap_count: 6,
            min_mm: 0.8,
            max_mm: 3.2,
            colors: 4,
            palette_method: PaletteMethod::KMeans,
            slicer: Slicer::Generic,
            gcode_style: PauseStyle::None,
            seed: 42,
            preview_scale: 0.5,
        }
    }
}

impl PlanSettings {
    /// Create validated settings with the given core parameters and defaults
    /// for the rest.
    ///
    /// # Errors
    ///
    /// Returns an error if `layer_height <= 0` or the height range is invalid.
    pub fn new(
        strategy: Strategy,
        layer_height: f64,
        swap_count: u32,
        min_mm: f64,
        max_mm: f64,
    ) -> TypesResult<Self> {
        let settings = Self {
            strategy,
            layer_height,
            swap_count,
            min_mm,
            max_mm,
            ..Self::default()
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Set the strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the layer height.
    #[must_use]
    pub const fn with_layer_height(mut self, layer_height: f64) -> Self {
        self.layer_height = layer_height;
        self
    }

    /// Set the number of swaps.
    #[must_use]
    pub const fn with_swap_count(mut self, swap_count: u32) -> Self {
        self.swap_count = swap_count;
        self
    }

    /// Set the thickness range.
    #[must_use]
    pub const fn with_thickness(mut self, min_mm: f64, max_mm: f64) -> Self {
        self.min_mm = min_mm;
        self.max_mm = max_mm;
        self
    }

    /// Set palette size and method.
    #[must_use]
    pub const fn with_palette(mut self, colors: usize, method: PaletteMethod) -> Self {
        self.colors = colors;
        self.palette_method = method;
        self
    }

    /// Set the target slicer.
    #[must_use]
    pub const fn with_slicer(mut self, slicer: Slicer) -> Self {
        self.slicer = slicer;
        self
    }

    /// Set the pause directive.
    #[must_use]
    pub const fn with_gcode_style(mut self, style: PauseStyle) -> Self {
        self.gcode_style = style;
        self
    }

    /// Set the k-means seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the preview scale.
    #[must_use]
    pub const fn with_preview_scale(mut self, scale: f64) -> Self {
        self.preview_scale = scale;
        self
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> TypesResult<()> {
        if !(self.layer_height.is_finite() && self.layer_height > 0.0) {
            return Err(TypesError::InvalidLayerHeight(self.layer_height));
        }
        check_range(self.min_mm, self.max_mm)?;
        if self.colors == 0 {
            return Err(TypesError::EmptyPalette);
        }
        check_positive("preview_scale", self.preview_scale)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn selector_round_trip_names() {
        for s in Strategy::ALL {
            assert_eq!(s.as_str().parse::<Strategy>().unwrap(), *s);
        }
        assert_eq!("median-cut".parse::<PaletteMethod>().unwrap(), PaletteMethod::MedianCut);
        assert_eq!("orcaslicer".parse::<Slicer>().unwrap(), Slicer::OrcaSlicer);
        assert_eq!("m600".parse::<PauseStyle>().unwrap(), PauseStyle::M600);
    }

    #[test]
    fn parse_and_serde_accept_the_same_names() {
        for input in [" BANDS ", "Bands", "bands ", "QUANTIZE"] {
            assert!(input.parse::<Strategy>().is_err(), "{input:?}");
            let quoted = format!("\"{input}\"");
            assert!(serde_json::from_str::<Strategy>(&quoted).is_err(), "{input:?}");
        }
        assert!("OrcaSlicer".parse::<Slicer>().is_err());
        assert!("M600".parse::<PauseStyle>().is_err());
        for s in Strategy::ALL {
            let quoted = format!("\"{}\"", s.as_str());
            assert_eq!(serde_json::from_str::<Strategy>(&quoted).unwrap(), *s);
        }
    }

    #[test]
    fn unknown_selector_rejected() {
        let err = "spiral".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, TypesError::UnknownSelector { kind: "strategy", .. }));
        assert!("octree".parse::<PaletteMethod>().is_err());
        assert!("m601".parse::<PauseStyle>().is_err());
    }

    #[test]
    fn serde_names_match_wire_strings() {
        let json = serde_json::to_string(&PaletteMethod::MedianCut).unwrap();
        assert_eq!(json, "\"median-cut\"");
        let json = serde_json::to_string(&Strategy::TdBlend).unwrap();
        assert_eq!(json, "\"tdblend\"");
        let json = serde_json::to_string(&Slicer::PrusaSlicer).unwrap();
        assert_eq!(json, "\"prusaslicer\"");
        assert!(serde_json::from_str::<Strategy>("\"linear\"").is_err());
    }

    #[test]
    fn pause_commands() {
        assert_eq!(PauseStyle::M600.command(), Some("M600"));
        assert_eq!(PauseStyle::M0.command(), Some("M0"));
        assert_eq!(PauseStyle::M25.command(), Some("M25"));
        assert_eq!(PauseStyle::None.command(), None);
    }

    #[test]
    fn plan_defaults() {
        let s = PlanSettings::default();
        assert_eq!(s.strategy, Strategy::Bands);
        assert_relative_eq!(s.layer_height, 0.2);
        assert_eq!(s.swap_count, 6);
        assert_eq!(s.colors, 4);
        assert_eq!(s.seed, 42);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn plan_validation() {
        assert!(matches!(
            PlanSettings::new(Strategy::Bands, 0.0, 4, 0.8, 3.2),
            Err(TypesError::InvalidLayerHeight(_))
        ));
        assert!(matches!(
            PlanSettings::new(Strategy::Bands, 0.2, 4, 3.2, 0.8),
            Err(TypesError::InvalidHeightRange { .. })
        ));
        assert!(PlanSettings::new(Strategy::Quantize, 0.2, 0, 1.0, 1.0).is_ok());
        assert!(PlanSettings::default().with_palette(0, PaletteMethod::KMeans).validate().is_err());
    }

    #[test]
    fn plan_partial_deserialize_uses_defaults() {
        let s: PlanSettings =
            serde_json::from_str(r#"{"strategy":"quantize","swap_count":3}"#).unwrap();
        assert_eq!(s.strategy, Strategy::Quantize);
        assert_eq!(s.swap_count, 3);
        assert_relative_eq!(s.max_mm, 3.2);
    }

    #[test]
    fn relief_defaults_and_dims() {
        let s = ReliefSettings::default();
        assert!(s.validate().is_ok());
        let (x, y, h) = s.clone().with_mesh_size(40, 30).mesh_dims(100, 50);
        assert_eq!((x, y), (40, 30));
        assert_relative_eq!(h, 60.0);
        let (_, _, h) = s.with_height(25.0).mesh_dims(100, 50);
        assert_relative_eq!(h, 25.0);
    }

    #[test]
    fn relief_validation() {
        assert!(ReliefSettings::default().with_width(0.0).validate().is_err());
        assert!(ReliefSettings::default().with_thickness(2.0, 1.0).validate().is_err());
        assert!(ReliefSettings::default().with_mesh_size(1, 10).validate().is_err());
        assert!(ReliefSettings::default().with_blur(-1.0).validate().is_err());
    }
}
