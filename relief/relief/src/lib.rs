//! Image to printable relief, plus a filament swap plan.
//!
//! This umbrella crate re-exports the relief-* and mesh-* crates and adds
//! the pieces that tie them into a job: configuration files, the two-branch
//! pipeline (relief mesh and swap plan) and calibration assets.
//!
//! # Quick Start
//!
//! ```no_run
//! use relief::prelude::*;
//!
//! let image = relief::heightmap::load_image("photo.jpg").unwrap();
//!
//! // Branch 1: watertight relief mesh as binary STL
//! let settings = ReliefSettings::default().with_width(100.0);
//! relief::write_relief(&image, &settings, "relief.stl", None).unwrap();
//!
//! // Branch 2: swap plan and its renderings
//! let plan_settings = PlanSettings::default().with_strategy(Strategy::Bands);
//! let plan = relief::plan::build_swap_plan(&image, &plan_settings, None, None).unwrap();
//! relief::write_plan_outputs(&image, &plan, "out").unwrap();
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Settings, filament profiles, swap plans
//! - [`heightmap`] - Image to normalized height field
//! - [`mesh`] - Height field to closed relief solid
//! - [`geometry`] - Triangle and mesh primitives
//! - [`stl`] - Binary STL read/write
//! - [`palette`] - k-means and median-cut palettes
//! - [`plan`] - Swap planning, transmittance model, renderers
//!
//! # Pipeline
//!
//! [`run_pipeline`] executes both branches for a [`PipelineConfig`] and
//! reports progress over a channel; [`spawn_pipeline`] does the same on a
//! worker thread.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::cast_possible_truncation)]

mod calibrate;
mod config;
mod error;
mod pipeline;

// =============================================================================
// Re-exports
// =============================================================================

/// Settings, filament profiles and swap plans.
pub use relief_types as types;

/// Image to normalized height field.
pub use relief_heightmap as heightmap;

/// Height field to closed relief solid.
pub use relief_mesh as mesh;

/// Triangle and mesh primitives.
pub use mesh_types as geometry;

/// Binary STL read/write.
pub use mesh_io as stl;

/// k-means and median-cut palettes.
pub use relief_palette as palette;

/// Swap planning, transmittance model and plan renderers.
pub use relief_plan as plan;

pub use calibrate::{
    CALIBRATION_STEPS, CalibrationAssets, FILAMENT_TEMPLATE, write_calibration_assets,
};
pub use config::{PipelineConfig, load_config};
pub use error::{ReliefError, ReliefResult};
pub use pipeline::{
    PipelineEvent, PipelineOutputs, PlanOutputs, ReliefOutput, ensure_dir, run_pipeline,
    spawn_pipeline, write_plan_outputs, write_relief,
};

/// Common imports.
pub mod prelude {
    pub use crate::{PipelineConfig, PipelineEvent, ReliefError, ReliefResult};
    pub use mesh_types::{MeshBounds, Triangle, TriangleMesh};
    pub use relief_heightmap::{HeightField, HeightmapParams};
    pub use relief_types::{
        FilamentProfile, HexColor, PaletteMethod, PauseStyle, PlanSettings, ReliefSettings,
        Slicer, Strategy, SwapPlan, SwapStep,
    };
}
