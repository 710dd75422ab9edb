//! Palette extraction.
//!
//! Picks a small set of representative colors from an image, used to name
//! filaments when the user does not supply their own:
//!
//! - [`kmeans_palette`] - seeded k-means in RGB space, bit-reproducible for
//!   a given generator state
//! - [`median_cut_palette`] - recursive median-cut box splitting
//!
//! [`auto_palette`] dispatches on [`PaletteMethod`]. User palettes come in
//! through [`parse_palette_string`] and [`load_palette`].
//!
//! # Example
//!
//! ```
//! use image::{DynamicImage, Rgb, RgbImage};
//! use relief_palette::auto_palette;
//! use relief_types::PaletteMethod;
//!
//! let img = DynamicImage::ImageRgb8(RgbImage::from_fn(16, 16, |x, _| {
//!     if x < 8 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) }
//! }));
//! let a = auto_palette(&img, 2, PaletteMethod::KMeans, 7).unwrap();
//! let b = auto_palette(&img, 2, PaletteMethod::KMeans, 7).unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

mod error;
mod input;
mod kmeans;
mod median_cut;

use image::DynamicImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use relief_types::{HexColor, PaletteMethod};
use tracing::info;

pub use error::{PaletteError, PaletteResult};
pub use input::{load_palette, parse_palette_string};
pub use kmeans::{KMEANS_ITERATIONS, KMEANS_WORKING_SIZE, kmeans_palette};
pub use median_cut::median_cut_palette;

/// Extract `count` representative colors from `image`.
///
/// k-means draws its initial centers from a generator seeded with `seed`,
/// so identical inputs always give identical palettes. Median-cut ignores
/// the seed.
///
/// # Errors
///
/// Returns an error if `count` is zero or the image is empty.
pub fn auto_palette(
    image: &DynamicImage,
    count: usize,
    method: PaletteMethod,
    seed: u64,
) -> PaletteResult<Vec<HexColor>> {
    let palette = match method {
        PaletteMethod::KMeans => {
            let mut rng = StdRng::seed_from_u64(seed);
            kmeans_palette(image, count, &mut rng)?
        }
        PaletteMethod::MedianCut => median_cut_palette(image, count)?,
    };
    info!(method = %method, colors = palette.len(), "Extracted palette");
    Ok(palette)
}
