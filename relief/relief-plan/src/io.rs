//! Plan and filament persistence.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use relief_types::{FilamentProfile, SwapPlan};
use tracing::debug;

use crate::error::{PlanError, PlanResult};

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(|| OsString::from("output"), OsString::from);
    name.push(".partial");
    path.with_file_name(name)
}

/// Write `bytes` to `path`, replacing any existing file.
///
/// Data goes to a `.partial` sibling that is renamed into place, so `path`
/// always holds either the previous contents or the complete new ones.
///
/// # Errors
///
/// Returns [`PlanError::Io`] if the file cannot be written or moved into
/// place. The staging file is removed on failure.
pub fn write_bytes(path: impl AsRef<Path>, bytes: &[u8]) -> PlanResult<()> {
    let path = path.as_ref();
    let staging = staging_path(path);
    let written = File::create(&staging)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.flush()
        })
        .and_then(|()| fs::rename(&staging, path));
    if let Err(e) = written {
        drop(fs::remove_file(&staging));
        return Err(PlanError::io(path, e));
    }
    Ok(())
}

/// Write `text` to `path` through [`write_bytes`].
///
/// # Errors
///
/// Returns [`PlanError::Io`] if the file cannot be written.
pub fn write_text(path: impl AsRef<Path>, text: &str) -> PlanResult<()> {
    write_bytes(path, text.as_bytes())
}

/// Write a plan as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_swap_plan(path: impl AsRef<Path>, plan: &SwapPlan) -> PlanResult<()> {
    let path = path.as_ref();
    write_text(path, &serde_json::to_string_pretty(plan)?)?;
    debug!(path = %path.display(), steps = plan.steps.len(), "Wrote swap plan");
    Ok(())
}

/// Read a plan written by [`write_swap_plan`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid plan.
pub fn read_swap_plan(path: impl AsRef<Path>) -> PlanResult<SwapPlan> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| PlanError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Load filament profiles from a JSON or YAML file.
///
/// The document is either a list of profiles or a mapping whose `filaments`
/// key holds that list. `.yaml`/`.yml` files are parsed as YAML, anything
/// else as JSON. Every profile is validated.
///
/// # Errors
///
/// Returns an error if the file cannot be read, does not parse, contains an
/// invalid profile, or holds no profiles.
pub fn load_filaments(path: impl AsRef<Path>) -> PlanResult<Vec<FilamentProfile>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| PlanError::io(path, e))?;

    let filaments: Vec<FilamentProfile> = if is_yaml(path) {
        let mut doc: serde_yaml::Value = serde_yaml::from_str(&text)?;
        if let Some(inner) = doc.get_mut("filaments") {
            doc = std::mem::take(inner);
        }
        serde_yaml::from_value(doc)?
    } else {
        let mut doc: serde_json::Value = serde_json::from_str(&text)?;
        if let Some(inner) = doc.get_mut("filaments") {
            doc = std::mem::take(inner);
        }
        serde_json::from_value(doc)?
    };

    if filaments.is_empty() {
        return Err(PlanError::NoFilaments);
    }
    debug!(path = %path.display(), count = filaments.len(), "Loaded filaments");
    Ok(filaments)
}
