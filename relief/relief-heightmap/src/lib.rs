//! Image to height field conversion.
//!
//! A relief's thickness follows image brightness. This crate turns a raster
//! image into a [`HeightField`] normalized to `[0, 1]`, then maps it onto a
//! physical thickness range:
//!
//! 1. Optional Gaussian blur
//! 2. Lanczos resample to the sample grid
//! 3. Rec.709 luminance (optionally on linearized sRGB)
//! 4. Gamma, optional inversion
//! 5. Min-max normalization (flat fields pass through)
//!
//! # Example
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use relief_heightmap::{HeightmapParams, build_heightmap, map_height_range};
//!
//! let img = DynamicImage::ImageRgb8(RgbImage::from_fn(32, 16, |x, _| {
//!     image::Rgb([(x * 8) as u8; 3])
//! }));
//! let field = build_heightmap(&img, &HeightmapParams::new(20, 10)).unwrap();
//! assert_eq!(field.shape(), (10, 20));
//!
//! let mm = map_height_range(&field, 0.8, 3.2).unwrap();
//! assert!(mm.min() >= 0.8 && mm.max() <= 3.2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

mod convert;
mod error;
mod field;
mod params;

pub use convert::{
    build_heightmap, heightmap_to_image, load_image, luminance, map_height_range, srgb_to_linear,
};
pub use error::{HeightmapError, HeightmapResult};
pub use field::HeightField;
pub use params::HeightmapParams;
