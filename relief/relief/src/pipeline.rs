//! Two-branch job runner: relief mesh and swap plan.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use image::{DynamicImage, ImageFormat};
use mesh_io::save_stl;
use relief_heightmap::{
    HeightField, HeightmapParams, build_heightmap, heightmap_to_image, load_image,
    map_height_range,
};
use relief_mesh::build_relief_mesh;
use relief_palette::load_palette;
use relief_plan::{
    build_swap_plan, export_snippet, load_filaments, plan_to_text, preview_plan_image,
    write_bytes, write_swap_plan, write_text,
};
use relief_types::{PauseStyle, ReliefSettings, SwapPlan};
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::error::{ReliefError, ReliefResult};

/// File name of the relief mesh inside a job's output directory.
pub const RELIEF_STL: &str = "relief.stl";
const PLAN_JSON: &str = "swap_plan.json";
const PLAN_TEXT: &str = "swap_plan.txt";
const PREVIEW_PNG: &str = "preview.png";
const SNIPPET_GCODE: &str = "swap_snippets.gcode";

/// Create `path` and its parents if missing.
///
/// # Errors
///
/// Returns [`ReliefError::Write`] if the directory cannot be created.
pub fn ensure_dir(path: impl AsRef<Path>) -> ReliefResult<PathBuf> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|source| ReliefError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}

/// Encode in memory, then write through the staged whole-file writer.
fn save_image(img: impl Into<DynamicImage>, path: &Path) -> ReliefResult<()> {
    let image_error = |source: image::ImageError| ReliefError::ImageSave {
        path: path.to_path_buf(),
        source,
    };
    let format = ImageFormat::from_path(path).map_err(image_error)?;
    let mut encoded = Cursor::new(Vec::new());
    img.into().write_to(&mut encoded, format).map_err(image_error)?;
    write_bytes(path, encoded.get_ref())?;
    Ok(())
}

/// Summary of a written relief mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliefOutput {
    /// STL path.
    pub stl: PathBuf,
    /// Triangles written.
    pub triangles: usize,
    /// Sample grid `(x, y)`.
    pub samples: (u32, u32),
    /// Physical size `(width_mm, height_mm)`.
    pub size_mm: (f64, f64),
}

fn normalized_heightmap(image: &DynamicImage, settings: &ReliefSettings) -> ReliefResult<HeightField> {
    let params = HeightmapParams::from_settings(settings, image.width(), image.height());
    Ok(build_heightmap(image, &params)?)
}

/// Map a normalized heightmap to thickness, tessellate it and save the STL.
fn save_relief_mesh(
    normalized: &HeightField,
    settings: &ReliefSettings,
    height_mm: f64,
    stl_path: &Path,
) -> ReliefResult<ReliefOutput> {
    let thickness = map_height_range(normalized, settings.min_mm, settings.max_mm)?;
    let mesh = build_relief_mesh(&thickness, settings.width_mm, height_mm, settings.min_mm)?;
    save_stl(&mesh, stl_path)?;
    info!(
        path = %stl_path.display(),
        triangles = mesh.len(),
        width_mm = settings.width_mm,
        height_mm,
        "STL written"
    );
    Ok(ReliefOutput {
        stl: stl_path.to_path_buf(),
        triangles: mesh.len(),
        samples: (normalized.width() as u32, normalized.height() as u32),
        size_mm: (settings.width_mm, height_mm),
    })
}

/// Build the relief for `image` and save it as binary STL.
///
/// The floor of the solid is `settings.min_mm`. If `heightmap_png` is given,
/// the normalized heightmap is also saved there as 8-bit grayscale.
///
/// # Errors
///
/// Returns an error if the settings are invalid or a file cannot be written.
pub fn write_relief(
    image: &DynamicImage,
    settings: &ReliefSettings,
    stl_path: impl AsRef<Path>,
    heightmap_png: Option<&Path>,
) -> ReliefResult<ReliefOutput> {
    settings.validate()?;
    let (_, _, height_mm) = settings.mesh_dims(image.width(), image.height());
    let normalized = normalized_heightmap(image, settings)?;
    let output = save_relief_mesh(&normalized, settings, height_mm, stl_path.as_ref())?;
    if let Some(png) = heightmap_png {
        save_image(heightmap_to_image(&normalized), png)?;
    }
    Ok(output)
}

/// Files written for a swap plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOutputs {
    /// `swap_plan.json`.
    pub json: PathBuf,
    /// `swap_plan.txt`.
    pub text: PathBuf,
    /// `preview.png`.
    pub preview: PathBuf,
    /// `swap_snippets.gcode`, when the plan has a pause style.
    pub snippet: Option<PathBuf>,
}

/// Write every rendering of `plan` into `output_dir`.
///
/// The preview uses the plan's own `preview_scale`. The G-code snippet is
/// only written when a pause style is configured.
///
/// # Errors
///
/// Returns an error if the directory or any file cannot be written.
pub fn write_plan_outputs(
    image: &DynamicImage,
    plan: &SwapPlan,
    output_dir: impl AsRef<Path>,
) -> ReliefResult<PlanOutputs> {
    let dir = ensure_dir(output_dir)?;
    let outputs = PlanOutputs {
        json: dir.join(PLAN_JSON),
        text: dir.join(PLAN_TEXT),
        preview: dir.join(PREVIEW_PNG),
        snippet: (plan.settings.gcode_style != PauseStyle::None).then(|| dir.join(SNIPPET_GCODE)),
    };

    write_swap_plan(&outputs.json, plan)?;
    write_text(&outputs.text, &plan_to_text(plan))?;
    save_image(
        preview_plan_image(image, plan, plan.settings.preview_scale),
        &outputs.preview,
    )?;
    if let Some(snippet) = &outputs.snippet {
        export_snippet(snippet, plan)?;
    }

    info!(dir = %dir.display(), steps = plan.steps.len(), "Plan outputs written");
    Ok(outputs)
}

/// Everything a finished pipeline produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutputs {
    /// Relief mesh summary.
    pub relief: ReliefOutput,
    /// Plan files.
    pub files: PlanOutputs,
    /// The plan itself.
    pub plan: SwapPlan,
}

/// Progress reported by [`run_pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A stage started.
    Progress {
        /// Human-readable stage name.
        stage: &'static str,
        /// Overall completion, 0 to 100.
        percent: u8,
    },
    /// The job succeeded.
    Finished(Box<PipelineOutputs>),
    /// The job failed with this message.
    Failed(String),
}

fn run_stages(job: &PipelineConfig, events: &Sender<PipelineEvent>) -> ReliefResult<PipelineOutputs> {
    let progress = |stage, percent| {
        // Receiver may have gone away; the job still runs to completion.
        drop(events.send(PipelineEvent::Progress { stage, percent }));
    };

    job.validate()?;
    let out = ensure_dir(&job.output_dir)?;

    progress("Loading image", 5);
    let image = load_image(&job.input)?;

    progress("Building heightmap", 20);
    let (_, _, height_mm) = job.relief.mesh_dims(image.width(), image.height());
    let normalized = normalized_heightmap(&image, &job.relief)?;

    progress("Building mesh", 40);
    let relief = save_relief_mesh(&normalized, &job.relief, height_mm, &out.join(RELIEF_STL))?;

    progress("Planning swaps", 70);
    let palette = job.palette.as_deref().map(load_palette).transpose()?;
    let filaments = job.filaments.as_deref().map(load_filaments).transpose()?;
    let plan = build_swap_plan(&image, &job.plan, palette.as_deref(), filaments.as_deref())?;
    let files = write_plan_outputs(&image, &plan, &out)?;

    progress("Done", 100);
    Ok(PipelineOutputs {
        relief,
        files,
        plan,
    })
}

/// Run both branches of a job, reporting progress on `events`.
///
/// Stages report 5, 20, 40, 70 and 100 percent, followed by exactly one
/// [`PipelineEvent::Finished`] or [`PipelineEvent::Failed`]. The result is
/// also returned directly.
///
/// # Errors
///
/// Returns the first stage error.
pub fn run_pipeline(
    job: &PipelineConfig,
    events: &Sender<PipelineEvent>,
) -> ReliefResult<PipelineOutputs> {
    let result = run_stages(job, events);
    let event = match &result {
        Ok(outputs) => PipelineEvent::Finished(Box::new(outputs.clone())),
        Err(e) => {
            error!(error = %e, "Pipeline failed");
            PipelineEvent::Failed(e.to_string())
        }
    };
    drop(events.send(event));
    result
}

/// Run a job on a worker thread.
///
/// The returned receiver yields progress followed by one terminal event,
/// then disconnects when the worker exits.
///
/// # Errors
///
/// Returns [`ReliefError::Spawn`] if the worker thread cannot be spawned.
pub fn spawn_pipeline(job: PipelineConfig) -> ReliefResult<Receiver<PipelineEvent>> {
    let (sender, receiver) = mpsc::channel();
    thread::Builder::new()
        .name("relief-pipeline".into())
        .spawn(move || {
            // Outcome is delivered through the channel.
            drop(run_pipeline(&job, &sender));
        })
        .map_err(ReliefError::Spawn)?;
    Ok(receiver)
}
