//! Filament swap planning.
//!
//! A backlit relief printed in one filament shows brightness through
//! thickness alone. Swapping filament at chosen heights adds color bands.
//! This crate decides where those swaps go and renders the result:
//!
//! - [`transmittance`] / [`estimate_blend_layers`] - Beer-Lambert style
//!   light attenuation through a filament stack
//! - [`build_swap_plan`] - image + [`PlanSettings`] to a [`SwapPlan`]
//! - [`plan_to_text`], [`snippet_text`], [`slicer_guide`] - operator-facing
//!   renderings
//! - [`preview_plan_image`] - downscaled image with band markers
//! - [`write_swap_plan`], [`read_swap_plan`], [`load_filaments`] - JSON/YAML
//!   persistence
//!
//! # Strategies
//!
//! | Strategy | Swap heights |
//! |----------|--------------|
//! | `bands` | Quantiles of the image's height distribution |
//! | `quantize` | Uniform ratios `k / (n + 1)` |
//! | `tdblend` | Distinct blend-layer counts from the transmittance model |
//!
//! # Example
//!
//! ```
//! use image::{DynamicImage, Rgb, RgbImage};
//! use relief_plan::{build_swap_plan, plan_to_text};
//! use relief_types::{PlanSettings, Strategy};
//!
//! let img = DynamicImage::ImageRgb8(RgbImage::from_fn(32, 32, |x, y| {
//!     Rgb([((x + y) * 4) as u8; 3])
//! }));
//! let settings = PlanSettings::default()
//!     .with_strategy(Strategy::Quantize)
//!     .with_swap_count(3);
//! let plan = build_swap_plan(&img, &settings, None, None).unwrap();
//!
//! assert_eq!(plan.steps.len(), 3);
//! assert!(plan_to_text(&plan).contains("Strategy: quantize"));
//! ```
//!
//! [`PlanSettings`]: relief_types::PlanSettings
//! [`SwapPlan`]: relief_types::SwapPlan

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

mod error;
mod io;
mod planner;
mod preview;
mod render;
mod transmittance;

pub use error::{PlanError, PlanResult};
pub use io::{load_filaments, read_swap_plan, write_bytes, write_swap_plan, write_text};
pub use planner::{PLAN_WORKING_SIZE, build_swap_plan, plan_notes, plan_steps, quantile};
pub use preview::preview_plan_image;
pub use render::{export_snippet, plan_to_text, slicer_guide, snippet_text};
pub use transmittance::{MIN_TD_MM, blend_layers, estimate_blend_layers, transmittance};
