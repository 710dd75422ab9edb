//! Swap plan documents.

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::filament::FilamentProfile;
use crate::settings::{PlanSettings, Strategy};

/// Application tag written into every plan document.
pub const APP_NAME: &str = "2d-to-3d-relief";

/// One filament change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapStep {
    /// 1-based position in the plan.
    pub index: usize,
    /// Print height at which the swap happens, in mm.
    pub height_mm: f64,
    /// Print layer, `round(height_mm / layer_height)`.
    pub layer: i64,
    /// Name of the filament to load.
    pub filament: String,
    /// Pause directive, if the plan uses one.
    pub command: Option<String>,
}

/// A complete swap plan together with the inputs that produced it.
///
/// Steps are ordered by ascending height and numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapPlan {
    /// Producer tag, always [`APP_NAME`].
    #[serde(default = "default_app")]
    pub app: String,
    /// Strategy used.
    pub strategy: Strategy,
    /// Layer height used for layer numbers.
    pub layer_height: f64,
    /// Settings snapshot.
    pub settings: PlanSettings,
    /// Resolved palette.
    pub palette: Vec<HexColor>,
    /// Resolved filaments.
    pub filaments: Vec<FilamentProfile>,
    /// Ordered swap steps.
    pub steps: Vec<SwapStep>,
    /// Advisory notes.
    pub notes: Vec<String>,
}

fn default_app() -> String {
    APP_NAME.to_string()
}

impl SwapPlan {
    /// Number of swap steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True if the plan has no swaps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps that carry a pause command.
    pub fn commanded_steps(&self) -> impl Iterator<Item = (&SwapStep, &str)> {
        self.steps
            .iter()
            .filter_map(|s| s.command.as_deref().filter(|c| !c.is_empty()).map(|c| (s, c)))
    }
}
