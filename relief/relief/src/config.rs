//! Pipeline job configuration.

use std::fs;
use std::path::{Path, PathBuf};

use relief_types::{PlanSettings, ReliefSettings};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReliefError, ReliefResult};

/// Everything needed to run both pipeline branches for one image.
///
/// Loadable from JSON or YAML; omitted sections take their defaults.
///
/// ```
/// use relief::PipelineConfig;
///
/// let cfg: PipelineConfig = serde_json::from_str(
///     r#"{"input": "in.png", "output_dir": "out", "plan": {"swap_count": 3}}"#,
/// ).unwrap();
/// assert_eq!(cfg.plan.swap_count, 3);
/// assert_eq!(cfg.relief.mesh_res, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Source image.
    pub input: PathBuf,
    /// Directory receiving every output file.
    pub output_dir: PathBuf,
    /// Relief mesh settings.
    #[serde(default)]
    pub relief: ReliefSettings,
    /// Swap plan settings.
    #[serde(default)]
    pub plan: PlanSettings,
    /// Palette as a comma list or a palette file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<String>,
    /// Filament profile file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filaments: Option<PathBuf>,
}

impl PipelineConfig {
    /// Job with default settings.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
            relief: ReliefSettings::default(),
            plan: PlanSettings::default(),
            palette: None,
            filaments: None,
        }
    }

    /// Replace the relief settings.
    #[must_use]
    pub fn with_relief(mut self, relief: ReliefSettings) -> Self {
        self.relief = relief;
        self
    }

    /// Replace the plan settings.
    #[must_use]
    pub fn with_plan(mut self, plan: PlanSettings) -> Self {
        self.plan = plan;
        self
    }

    /// Use a user palette (comma list or file path).
    #[must_use]
    pub fn with_palette(mut self, palette: impl Into<String>) -> Self {
        self.palette = Some(palette.into());
        self
    }

    /// Use filament profiles from a file.
    #[must_use]
    pub fn with_filaments(mut self, path: impl Into<PathBuf>) -> Self {
        self.filaments = Some(path.into());
        self
    }

    /// Validate both settings blocks.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field.
    pub fn validate(&self) -> ReliefResult<()> {
        self.relief.validate()?;
        self.plan.validate()?;
        Ok(())
    }
}

/// Load and validate a job from a `.json`, `.yaml` or `.yml` file.
///
/// Files with any other extension are parsed as JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, or holds
/// invalid settings.
pub fn load_config(path: impl AsRef<Path>) -> ReliefResult<PipelineConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ReliefError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let parse_error = |message: String| ReliefError::ConfigParse {
        path: path.to_path_buf(),
        message,
    };
    let config: PipelineConfig = if yaml {
        serde_yaml::from_str(&text).map_err(|e| parse_error(e.to_string()))?
    } else {
        serde_json::from_str(&text).map_err(|e| parse_error(e.to_string()))?
    };
    config.validate()?;
    debug!(path = %path.display(), input = %config.input.display(), "Loaded pipeline config");
    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use relief_types::{PauseStyle, Strategy};

    #[test]
    fn yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.yaml");
        fs::write(
            &path,
            "input: photo.png\noutput_dir: out\nrelief:\n  width_mm: 90\n  invert: true\nplan:\n  strategy: tdblend\n  gcode_style: m600\n",
        )
        .unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.input, PathBuf::from("photo.png"));
        assert!((cfg.relief.width_mm - 90.0).abs() < 1e-12);
        assert!(cfg.relief.invert);
        assert_eq!(cfg.plan.strategy, Strategy::TdBlend);
        assert_eq!(cfg.plan.gcode_style, PauseStyle::M600);
        assert_eq!(cfg.plan.swap_count, 6);
    }

    #[test]
    fn json_config_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        fs::write(&path, r#"{"input":"a.png","output_dir":"b"}"#).unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg, PipelineConfig::new("a.png", "b"));
    }

    #[test]
    fn unknown_strategy_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        fs::write(&path, r#"{"input":"a","output_dir":"b","plan":{"strategy":"zigzag"}}"#).unwrap();
        assert!(matches!(load_config(&path), Err(ReliefError::ConfigParse { .. })));
    }

    #[test]
    fn invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        fs::write(&path, r#"{"input":"a","output_dir":"b","plan":{"layer_height":0}}"#).unwrap();
        assert!(matches!(load_config(&path), Err(ReliefError::Invalid(_))));
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_config(dir.path().join("nope.yaml")),
            Err(ReliefError::ConfigRead { .. })
        ));
    }
}
