//! Light transmittance through filament layers.

use relief_heightmap::HeightField;
use relief_types::DEFAULT_TD_MM;

/// Floor applied to transmittance distances before dividing.
pub const MIN_TD_MM: f64 = 1e-6;

/// Fraction of backlight passing through `thickness_mm` of a filament with
/// transmittance distance `td_mm`.
///
/// `exp(-thickness / td)`. Non-positive `td_mm` is clamped to [`MIN_TD_MM`].
///
/// ```
/// use relief_plan::transmittance;
///
/// assert_eq!(transmittance(0.0, 0.8), 1.0);
/// assert!((transmittance(0.8, 0.8) - (-1.0f64).exp()).abs() < 1e-12);
/// ```
#[must_use]
pub fn transmittance(thickness_mm: f64, td_mm: f64) -> f64 {
    (-thickness_mm / td_mm.max(MIN_TD_MM)).exp()
}

/// Blend layers needed for one sample: `round((1 - T) * max_layers)`,
/// clamped to `[0, max_layers]`. Halves round to even.
#[must_use]
pub fn blend_layers(height: f64, td_mm: f64, max_layers: u32) -> u32 {
    let max = f64::from(max_layers);
    let layers = ((1.0 - transmittance(height, td_mm)) * max).round_ties_even();
    layers.clamp(0.0, max) as u32
}

/// Blend-layer count for every sample of `field`, row-major.
///
/// Uses the mean transmittance distance of `td_values`
/// ([`DEFAULT_TD_MM`] when empty). Counts saturate toward `max_layers` as
/// height grows, since each extra layer attenuates what light remains.
#[must_use]
pub fn estimate_blend_layers(field: &HeightField, td_values: &[f64], max_layers: u32) -> Vec<u32> {
    let td_mean = if td_values.is_empty() {
        DEFAULT_TD_MM
    } else {
        td_values.iter().sum::<f64>() / td_values.len() as f64
    };
    field
        .values()
        .iter()
        .map(|&h| blend_layers(h, td_mean, max_layers))
        .collect()
}
