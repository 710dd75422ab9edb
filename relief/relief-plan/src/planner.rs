//! Swap-height selection.

use image::DynamicImage;
use relief_heightmap::{HeightField, HeightmapParams, build_heightmap};
use relief_palette::auto_palette;
use relief_types::{
    APP_NAME, DEFAULT_TD_MM, FilamentProfile, HexColor, PlanSettings, Strategy, SwapPlan, SwapStep,
};
use tracing::{debug, info};

use crate::error::{PlanError, PlanResult};
use crate::transmittance::estimate_blend_layers;

/// Side length of the square height field swap heights are planned on.
///
/// Planning always runs at this resolution, independent of the mesh grid.
pub const PLAN_WORKING_SIZE: u32 = 256;

/// Linearly interpolated quantile of `sorted` at `q` in `[0, 1]`.
///
/// `sorted` must be ascending and non-empty.
///
/// ```
/// use relief_plan::quantile;
///
/// let v = [0.0, 1.0, 2.0, 3.0];
/// assert_eq!(quantile(&v, 0.5), 1.5);
/// assert_eq!(quantile(&v, 1.0), 3.0);
/// ```
#[must_use]
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    let Some(&last) = sorted.last() else {
        return f64::NAN;
    };
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    if lo + 1 >= sorted.len() {
        return last;
    }
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[lo + 1] - sorted[lo]) * frac
}

/// Normalized ratios in `[0, 1]` at which swaps happen.
fn swap_ratios(field: &HeightField, settings: &PlanSettings, td_values: &[f64]) -> Vec<f64> {
    let n = settings.swap_count;
    let divisions = f64::from(n) + 1.0;
    match settings.strategy {
        Strategy::Bands => {
            let mut sorted = field.values().to_vec();
            sorted.sort_by(f64::total_cmp);
            (1..=n)
                .map(|k| quantile(&sorted, f64::from(k) / divisions))
                .collect()
        }
        Strategy::Quantize => (1..=n).map(|k| f64::from(k) / divisions).collect(),
        Strategy::TdBlend => {
            let mut levels: Vec<u32> = estimate_blend_layers(field, td_values, n)
                .into_iter()
                .filter(|&v| v > 0)
                .collect();
            levels.sort_unstable();
            levels.dedup();
            levels.truncate(n as usize);
            levels
                .into_iter()
                .map(|v| f64::from(v) / f64::from(n))
                .collect()
        }
    }
}

/// Compute swap steps for a normalized height field.
///
/// Each ratio `r` maps to `min_mm + r * (max_mm - min_mm)` and layer
/// `round(height / layer_height)`. Step `i` (1-based) uses filament
/// `i - 1`, or the last filament once the list runs out.
///
/// # Errors
///
/// Returns an error if `settings` are invalid or `filaments` is empty.
pub fn plan_steps(
    field: &HeightField,
    settings: &PlanSettings,
    filaments: &[FilamentProfile],
) -> PlanResult<Vec<SwapStep>> {
    settings.validate()?;
    let last = filaments.len().checked_sub(1).ok_or(PlanError::NoFilaments)?;
    let td_values: Vec<f64> = filaments.iter().map(|f| f.td_mm).collect();
    let span = settings.max_mm - settings.min_mm;
    let command = settings.gcode_style.command().map(str::to_string);

    let steps = swap_ratios(field, settings, &td_values)
        .into_iter()
        .enumerate()
        .map(|(i, ratio)| {
            let height_mm = settings.min_mm + ratio * span;
            SwapStep {
                index: i + 1,
                height_mm,
                layer: (height_mm / settings.layer_height).round_ties_even() as i64,
                filament: filaments[i.min(last)].name.clone(),
                command: command.clone(),
            }
        })
        .collect::<Vec<_>>();
    debug!(strategy = %settings.strategy, steps = steps.len(), "Planned swap heights");
    Ok(steps)
}

/// Advisory notes attached to every plan.
#[must_use]
pub fn plan_notes(settings: &PlanSettings) -> Vec<String> {
    vec![
        format!("Slicer target: {}", settings.slicer),
        "Use planned swap heights in slicer layer-change UI.".to_string(),
        "TD blend is approximate and intended for planning only.".to_string(),
    ]
}

/// One filament per palette color, named `Color 1`, `Color 2`, ...
fn filaments_from_palette(palette: &[HexColor]) -> PlanResult<Vec<FilamentProfile>> {
    palette
        .iter()
        .enumerate()
        .map(|(i, &c)| Ok(FilamentProfile::with_color(format!("Color {}", i + 1), c, DEFAULT_TD_MM)?))
        .collect()
}

/// Build a complete swap plan for `image`.
///
/// A missing or empty `palette` is extracted from the image with the
/// configured method and seed. Missing or empty `filaments` are synthesized
/// from the palette with the default transmittance distance.
///
/// # Errors
///
/// Returns an error if the settings are invalid or palette extraction fails.
pub fn build_swap_plan(
    image: &DynamicImage,
    settings: &PlanSettings,
    palette: Option<&[HexColor]>,
    filaments: Option<&[FilamentProfile]>,
) -> PlanResult<SwapPlan> {
    settings.validate()?;

    let palette = match palette {
        Some(p) if !p.is_empty() => p.to_vec(),
        _ => auto_palette(image, settings.colors, settings.palette_method, settings.seed)?,
    };
    let filaments = match filaments {
        Some(f) if !f.is_empty() => f.to_vec(),
        _ => filaments_from_palette(&palette)?,
    };

    let field = build_heightmap(
        image,
        &HeightmapParams::new(PLAN_WORKING_SIZE, PLAN_WORKING_SIZE),
    )?;
    let steps = plan_steps(&field, settings, &filaments)?;
    info!(
        strategy = %settings.strategy,
        steps = steps.len(),
        filaments = filaments.len(),
        "Built swap plan"
    );

    Ok(SwapPlan {
        app: APP_NAME.to_string(),
        strategy: settings.strategy,
        layer_height: settings.layer_height,
        settings: settings.clone(),
        palette,
        filaments,
        steps,
        notes: plan_notes(settings),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::{Rgb, RgbImage};
    use relief_types::PauseStyle;

    fn filaments(n: usize) -> Vec<FilamentProfile> {
        (0..n)
            .map(|i| FilamentProfile::new(format!("F{i}"), "#808080", 0.8).unwrap())
            .collect()
    }

    fn linear_field() -> HeightField {
        HeightField::from_fn(101, 2, |x, _| x as f64 / 100.0).unwrap()
    }

    #[test]
    fn quantile_interpolates() {
        let v = [1.0, 2.0, 4.0];
        assert_relative_eq!(quantile(&v, 0.0), 1.0);
        assert_relative_eq!(quantile(&v, 0.25), 1.5);
        assert_relative_eq!(quantile(&v, 0.75), 3.0);
        assert_relative_eq!(quantile(&v, 1.0), 4.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn quantize_uses_uniform_ratios() {
        let settings = PlanSettings::default()
            .with_strategy(Strategy::Quantize)
            .with_swap_count(3);
        let steps = plan_steps(&linear_field(), &settings, &filaments(4)).unwrap();
        let heights: Vec<f64> = steps.iter().map(|s| s.height_mm).collect();
        assert_eq!(heights.len(), 3);
        assert_relative_eq!(heights[0], 0.8 + 0.25 * 2.4, epsilon = 1e-12);
        assert_relative_eq!(heights[1], 0.8 + 0.5 * 2.4, epsilon = 1e-12);
        assert_relative_eq!(heights[2], 0.8 + 0.75 * 2.4, epsilon = 1e-12);
        assert_eq!(steps[1].layer, 10);
    }

    #[test]
    fn layer_follows_unfused_height_formula() {
        // 0.1 + (5/6) * 2.1 lands just above 1.85, so the layer rounds up.
        let settings = PlanSettings::default()
            .with_strategy(Strategy::Quantize)
            .with_thickness(0.1, 2.2)
            .with_layer_height(0.1)
            .with_swap_count(5);
        let steps = plan_steps(&linear_field(), &settings, &filaments(5)).unwrap();
        let ratio = 5.0 / 6.0;
        let expected: f64 = 0.1 + ratio * (2.2 - 0.1);
        assert_eq!(steps[4].height_mm.to_bits(), expected.to_bits());
        assert_eq!(steps[4].layer, 19);
    }

    #[test]
    fn bands_follow_distribution() {
        // 90% of samples at 0, the rest at 1: low quantiles stay at the floor.
        let field = HeightField::from_fn(10, 10, |_, y| if y == 9 { 1.0 } else { 0.0 }).unwrap();
        let settings = PlanSettings::default().with_swap_count(4);
        let steps = plan_steps(&field, &settings, &filaments(2)).unwrap();
        assert_eq!(steps.len(), 4);
        for s in &steps {
            assert_relative_eq!(s.height_mm, 0.8);
            assert_eq!(s.layer, 4);
        }
    }

    #[test]
    fn steps_ascend_and_are_numbered() {
        let settings = PlanSettings::default().with_swap_count(5);
        let steps = plan_steps(&linear_field(), &settings, &filaments(5)).unwrap();
        assert!(steps.windows(2).all(|w| w[0].height_mm <= w[1].height_mm));
        let indices: Vec<usize> = steps.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn filament_index_clamps_to_last() {
        let settings = PlanSettings::default()
            .with_strategy(Strategy::Quantize)
            .with_swap_count(5);
        let steps = plan_steps(&linear_field(), &settings, &filaments(2)).unwrap();
        let names: Vec<&str> = steps.iter().map(|s| s.filament.as_str()).collect();
        assert_eq!(names, vec!["F0", "F1", "F1", "F1", "F1"]);
    }

    #[test]
    fn tdblend_uses_distinct_levels() {
        let settings = PlanSettings::default()
            .with_strategy(Strategy::TdBlend)
            .with_swap_count(6);
        let steps = plan_steps(&linear_field(), &settings, &filaments(3)).unwrap();
        // Heights up to 1.0 with td 0.8 reach round(0.7135 * 6) = 4 layers.
        assert_eq!(steps.len(), 4);
        assert_relative_eq!(steps[0].height_mm, 0.8 + (1.0 / 6.0) * 2.4);
        assert_relative_eq!(steps[3].height_mm, 0.8 + (4.0 / 6.0) * 2.4);
    }

    #[test]
    fn zero_swaps_yield_empty_plan() {
        for strategy in Strategy::ALL {
            let settings = PlanSettings::default()
                .with_strategy(*strategy)
                .with_swap_count(0);
            assert!(plan_steps(&linear_field(), &settings, &filaments(1)).unwrap().is_empty());
        }
    }

    #[test]
    fn pause_command_attached() {
        let settings = PlanSettings::default()
            .with_swap_count(2)
            .with_gcode_style(PauseStyle::M25);
        let steps = plan_steps(&linear_field(), &settings, &filaments(1)).unwrap();
        assert!(steps.iter().all(|s| s.command.as_deref() == Some("M25")));
    }

    #[test]
    fn empty_filaments_rejected() {
        let err = plan_steps(&linear_field(), &PlanSettings::default(), &[]);
        assert!(matches!(err, Err(PlanError::NoFilaments)));
    }

    #[test]
    fn gray_image_bands() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([128, 128, 128])));
        let settings = PlanSettings::default().with_swap_count(4);
        let plan = build_swap_plan(&img, &settings, None, None).unwrap();
        assert_eq!(plan.steps.len(), 4);
        assert!(plan.steps.iter().all(|s| s.layer >= 1));
        assert_eq!(plan.palette.len(), settings.colors);
        assert_eq!(plan.filaments[0].name, "Color 1");
        assert_relative_eq!(plan.filaments[0].td_mm, DEFAULT_TD_MM);
    }

    #[test]
    fn supplied_palette_and_filaments_are_kept() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(16, 16, |x, _| Rgb([(x * 16) as u8; 3])));
        let palette = [HexColor::WHITE];
        let fils = filaments(2);
        let plan = build_swap_plan(&img, &PlanSettings::default(), Some(&palette), Some(&fils)).unwrap();
        assert_eq!(plan.palette, palette.to_vec());
        assert_eq!(plan.filaments, fils);
        assert_eq!(plan.notes.len(), 3);
        assert_eq!(plan.notes[0], "Slicer target: generic");
    }

    #[test]
    fn invalid_settings_rejected_before_work() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        let settings = PlanSettings::default().with_layer_height(0.0);
        assert!(matches!(
            build_swap_plan(&img, &settings, None, None),
            Err(PlanError::Invalid(_))
        ));
    }
}
