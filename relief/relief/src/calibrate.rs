//! Transmittance calibration assets.

use std::path::{Path, PathBuf};

use relief_plan::write_text;
use tracing::info;

use crate::error::ReliefResult;
use crate::pipeline::ensure_dir;

/// Workflow for measuring each filament's transmittance distance.
pub const CALIBRATION_STEPS: &str = "Calibration workflow:\n\
1) Print thickness steps from 0.2 to 2.0mm.\n\
2) Measure first opaque thickness for each filament.\n\
3) Save td_mm per filament in YAML profile.";

/// Filament profile file to copy and fill in.
pub const FILAMENT_TEMPLATE: &str = "filaments:\n  - name: Sample\n    color_hex: '#FFFFFF'\n    td_mm: 0.8\n    notes: measured\n";

/// Paths of the written calibration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalibrationAssets {
    /// `calibration_steps.txt`.
    pub steps: PathBuf,
    /// `filaments_template.yaml`.
    pub template: PathBuf,
}

fn write(path: PathBuf, text: &str) -> ReliefResult<PathBuf> {
    write_text(&path, text)?;
    Ok(path)
}

/// Write the calibration workflow and a filament template into `output_dir`.
///
/// # Errors
///
/// Returns an error if the directory or files cannot be written.
pub fn write_calibration_assets(output_dir: impl AsRef<Path>) -> ReliefResult<CalibrationAssets> {
    let dir = ensure_dir(output_dir)?;
    let assets = CalibrationAssets {
        steps: write(dir.join("calibration_steps.txt"), CALIBRATION_STEPS)?,
        template: write(dir.join("filaments_template.yaml"), FILAMENT_TEMPLATE)?,
    };
    info!(dir = %dir.display(), "Calibration assets written");
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn assets_written_and_template_loads() {
        let dir = tempfile::tempdir().unwrap();
        let assets = write_calibration_assets(dir.path().join("calibration")).unwrap();
        let steps = fs::read_to_string(&assets.steps).unwrap();
        assert!(steps.starts_with("Calibration workflow:\n1) Print thickness steps"));
        assert!(steps.ends_with("YAML profile."));

        let filaments = relief_plan::load_filaments(&assets.template).unwrap();
        assert_eq!(filaments.len(), 1);
        assert_eq!(filaments[0].name, "Sample");
        assert!((filaments[0].td_mm - 0.8).abs() < 1e-12);
    }
}
