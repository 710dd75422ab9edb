//! Image to height field conversion and range mapping.

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use tracing::{debug, warn};

use crate::error::{HeightmapError, HeightmapResult};
use crate::field::HeightField;
use crate::params::HeightmapParams;

/// Rec.709 channel weights.
const REC709: [f64; 3] = [0.2126, 0.7152, 0.0722];

/// Load an image from disk as 8-bit RGB.
///
/// # Errors
///
/// Returns [`HeightmapError::ImageLoad`] if the file is missing or cannot be
/// decoded.
pub fn load_image(path: impl AsRef<Path>) -> HeightmapResult<DynamicImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| HeightmapError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), width = img.width(), height = img.height(), "Loaded image");
    Ok(DynamicImage::ImageRgb8(img.to_rgb8()))
}

/// Undo sRGB transfer encoding on a channel in `[0, 1]`.
#[must_use]
pub fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.040_45 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of an 8-bit RGB pixel.
#[must_use]
pub fn luminance(rgb: [u8; 3], linearize: bool) -> f64 {
    rgb.iter().zip(REC709).fold(0.0, |acc, (&c, w)| {
        let v = f64::from(c) / 255.0;
        let v = if linearize { srgb_to_linear(v) } else { v };
        acc + w * v
    })
}

/// Build a normalized height field from an image.
///
/// The output has `params.height` rows and `params.width` columns with every
/// sample in `[0, 1]`. If every sample is equal after shaping, normalization
/// is skipped and the constant field is returned as is.
///
/// # Errors
///
/// Returns an error if the parameters are invalid.
pub fn build_heightmap(image: &DynamicImage, params: &HeightmapParams) -> HeightmapResult<HeightField> {
    params.validate()?;

    let source = if params.blur_radius > 0.0 {
        image.blur(params.blur_radius as f32)
    } else {
        image.clone()
    };
    let resized: RgbImage = source
        .resize_exact(params.width, params.height, FilterType::Lanczos3)
        .to_rgb8();

    let mut values: Vec<f64> = resized
        .pixels()
        .map(|px| {
            let lum = luminance(px.0, params.linearize).clamp(0.0, 1.0).powf(params.gamma);
            if params.invert { 1.0 - lum } else { lum }
        })
        .collect();

    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi > lo {
        let span = hi - lo;
        for v in &mut values {
            *v = (*v - lo) / span;
        }
    } else {
        warn!(value = lo, "Flat heightmap, skipping normalization");
    }

    debug!(
        width = params.width,
        height = params.height,
        gamma = params.gamma,
        invert = params.invert,
        "Built heightmap"
    );
    HeightField::new(params.width as usize, params.height as usize, values)
}

/// Map a normalized field onto `[min_mm, max_mm]`.
///
/// `min_mm + v * (max_mm - min_mm)`, clamped to the target range so rounding
/// never pushes a sample outside it. Order is preserved.
///
/// # Errors
///
/// Returns an error if the range is inverted or not finite.
pub fn map_height_range(field: &HeightField, min_mm: f64, max_mm: f64) -> HeightmapResult<HeightField> {
    if !(min_mm.is_finite() && max_mm.is_finite() && min_mm <= max_mm) {
        return Err(HeightmapError::InvalidParams(format!(
            "height range {min_mm}..{max_mm} is invalid"
        )));
    }
    let span = max_mm - min_mm;
    field.map(|v| (min_mm + v * span).clamp(min_mm, max_mm))
}

/// Render a normalized field as an 8-bit grayscale image.
#[must_use]
pub fn heightmap_to_image(field: &HeightField) -> GrayImage {
    let width = field.width();
    GrayImage::from_fn(field.width() as u32, field.height() as u32, |x, y| {
        let v = field.values()[y as usize * width + x as usize];
        Luma([(v * 255.0).clamp(0.0, 255.0) as u8])
    })
}
