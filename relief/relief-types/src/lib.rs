//! Value types shared by the relief pipeline.
//!
//! Everything here is plain data with serde support. Values that carry
//! invariants are validated when constructed or deserialized, so downstream
//! crates can rely on them:
//!
//! - [`HexColor`] - 24-bit RGB color parsed from `#rrggbb` / `rrggbb`
//! - [`FilamentProfile`] - Named filament with a positive transmittance distance
//! - [`ReliefSettings`] - Physical relief dimensions and heightmap shaping
//! - [`PlanSettings`] - Swap-plan strategy and layer parameters
//! - [`SwapStep`] / [`SwapPlan`] - The plan handed to renderers and exporters
//!
//! Selectors ([`Strategy`], [`PaletteMethod`], [`Slicer`], [`PauseStyle`])
//! are closed enums. Unknown names are rejected with
//! [`TypesError::UnknownSelector`] rather than mapped to a default.
//!
//! # Example
//!
//! ```
//! use relief_types::{FilamentProfile, PlanSettings, Strategy};
//!
//! let white = FilamentProfile::new("White PLA", "#FFFFFF", 0.8).unwrap();
//! assert_eq!(white.color_hex.to_string(), "#ffffff");
//!
//! let settings = PlanSettings::default()
//!     .with_strategy(Strategy::Quantize)
//!     .with_swap_count(3);
//! assert!(settings.validate().is_ok());
//!
//! assert!(FilamentProfile::new("Bad", "#12345", 0.8).is_err());
//! assert!("sideways".parse::<Strategy>().is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod color;
mod error;
mod filament;
mod plan;
mod settings;

pub use color::HexColor;
pub use error::{TypesError, TypesResult};
pub use filament::{DEFAULT_TD_MM, FilamentProfile};
pub use plan::{APP_NAME, SwapPlan, SwapStep};
pub use settings::{PaletteMethod, PauseStyle, PlanSettings, ReliefSettings, Slicer, Strategy};
