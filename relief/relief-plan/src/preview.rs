//! Preview image with swap band markers.

use image::imageops::FilterType;
use image::{DynamicImage, Rgb, RgbImage};
use relief_types::SwapPlan;

/// Downscale `image` by `scale` and draw a 2-pixel white rule per swap step.
///
/// Rules are evenly spaced: `band = max(1, height / (steps + 1))`, rule `i`
/// starts at row `(i + 1) * band` (clamped to the last row).
#[must_use]
pub fn preview_plan_image(image: &DynamicImage, plan: &SwapPlan, scale: f64) -> RgbImage {
    let scaled = |v: u32| ((f64::from(v) * scale) as u32).max(1);
    let mut img = image
        .resize_exact(scaled(image.width()), scaled(image.height()), FilterType::Lanczos3)
        .to_rgb8();

    let (w, h) = img.dimensions();
    let band = (h / (plan.steps.len() as u32 + 1)).max(1);
    for i in 0..plan.steps.len() as u32 {
        let y0 = ((i + 1) * band).min(h - 1);
        for y in y0..(y0 + 2).min(h) {
            for x in 0..w {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
    }
    img
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use relief_types::{APP_NAME, PlanSettings, Strategy, SwapStep};

    fn plan_with(n: usize) -> SwapPlan {
        SwapPlan {
            app: APP_NAME.into(),
            strategy: Strategy::Bands,
            layer_height: 0.2,
            settings: PlanSettings::default(),
            palette: vec![],
            filaments: vec![],
            steps: (1..=n)
                .map(|index| SwapStep {
                    index,
                    height_mm: 1.0,
                    layer: 5,
                    filament: "F".into(),
                    command: None,
                })
                .collect(),
            notes: vec![],
        }
    }

    fn black(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(w, h))
    }

    #[test]
    fn scales_and_draws_rules() {
        let img = preview_plan_image(&black(100, 60), &plan_with(2), 0.5);
        assert_eq!(img.dimensions(), (50, 30));
        // band = 30 / 3 = 10 -> rules at rows 10-11 and 20-21.
        for y in [10, 11, 20, 21] {
            assert_eq!(img.get_pixel(7, y).0, [255, 255, 255]);
        }
        assert_eq!(img.get_pixel(7, 9).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(7, 12).0, [0, 0, 0]);
    }

    #[test]
    fn tiny_scale_keeps_one_pixel() {
        let img = preview_plan_image(&black(10, 10), &plan_with(3), 0.01);
        assert_eq!(img.dimensions(), (1, 1));
    }

    #[test]
    fn no_steps_no_rules() {
        let img = preview_plan_image(&black(20, 20), &plan_with(0), 1.0);
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }
}
