//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use owo_colors::OwoColorize;
use relief::PipelineConfig;
use relief::PipelineEvent;
use relief::types::{PlanSettings, ReliefSettings};
use relief::{heightmap, palette, plan};
use tracing::info;

use crate::{PlanArgs, ReliefArgs};

impl ReliefArgs {
    fn to_settings(&self) -> ReliefSettings {
        ReliefSettings {
            width_mm: self.width_mm,
            height_mm: self.height_mm,
            min_mm: self.min_mm,
            max_mm: self.max_mm,
            gamma: self.gamma,
            invert: self.invert,
            blur: self.blur,
            mesh_res: self.mesh_res,
            mesh_x: self.mesh_x,
            mesh_y: self.mesh_y,
        }
    }
}

impl PlanArgs {
    fn to_settings(&self) -> PlanSettings {
        PlanSettings {
            strategy: self.strategy,
            layer_height: self.layer_height,
            swap_count: self.swap_count,
            min_mm: self.min_mm,
            max_mm: self.max_mm,
            colors: self.colors,
            palette_method: self.palette_method,
            slicer: self.slicer,
            gcode_style: self.gcode_style,
            seed: self.seed,
            preview_scale: self.preview_scale,
        }
    }
}

/// `relief`: image to STL.
pub fn relief(
    input: &Path,
    output: &Path,
    export_heightmap: Option<&Path>,
    args: &ReliefArgs,
) -> Result<()> {
    let settings = args.to_settings();
    settings.validate().context("Invalid relief settings")?;
    let image = heightmap::load_image(input)?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        relief::ensure_dir(parent)?;
    }
    let out = relief::write_relief(&image, &settings, output, export_heightmap)
        .with_context(|| format!("Failed to generate relief from {}", input.display()))?;

    println!(
        "{} {} ({} triangles, {:.1} x {:.1} mm)",
        "STL written:".green(),
        out.stl.display(),
        out.triangles,
        out.size_mm.0,
        out.size_mm.1
    );
    if let Some(png) = export_heightmap {
        println!("{} {}", "Heightmap written:".green(), png.display());
    }
    Ok(())
}

/// `plan`: swap plan and renderings.
pub fn plan(input: &Path, output_dir: &Path, args: &PlanArgs) -> Result<()> {
    let settings = args.to_settings();
    settings.validate().context("Invalid plan settings")?;
    let image = heightmap::load_image(input)?;

    let mut user_palette = match &args.palette {
        Some(value) => Some(palette::load_palette(value).context("Failed to read palette")?),
        None => None,
    };
    if let Some(count) = args.auto_palette {
        user_palette = Some(palette::auto_palette(
            &image,
            count,
            settings.palette_method,
            settings.seed,
        )?);
    }
    let filaments = match &args.filaments {
        Some(path) => Some(
            plan::load_filaments(path)
                .with_context(|| format!("Failed to load filaments from {}", path.display()))?,
        ),
        None => None,
    };

    let swap = plan::build_swap_plan(&image, &settings, user_palette.as_deref(), filaments.as_deref())?;
    let files = relief::write_plan_outputs(&image, &swap, output_dir)?;

    println!("{}", plan::plan_to_text(&swap));
    println!();
    println!("{}", plan::slicer_guide(settings.slicer, settings.gcode_style).dimmed());
    println!();
    println!("{} {}", "Plan outputs written:".green(), output_dir.display());
    if let Some(snippet) = files.snippet {
        println!("  {} {}", "snippet:".dimmed(), snippet.display());
    }
    Ok(())
}

/// `pipeline`: both branches, with progress from a worker thread.
pub fn pipeline(
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    config: Option<&Path>,
    width_mm: Option<f64>,
) -> Result<()> {
    let loaded = config
        .map(|path| {
            relief::load_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        })
        .transpose()?;

    let input = input
        .or_else(|| loaded.as_ref().map(|c| c.input.clone()))
        .ok_or_else(|| anyhow!("--input is required without --config"))?;
    let output_dir = output_dir
        .or_else(|| loaded.as_ref().map(|c| c.output_dir.clone()))
        .ok_or_else(|| anyhow!("--output-dir is required without --config"))?;

    let mut job = match loaded {
        Some(cfg) => PipelineConfig {
            input,
            output_dir,
            ..cfg
        },
        None => PipelineConfig::new(input, output_dir),
    };
    if let Some(width) = width_mm {
        job.relief.width_mm = width;
    }
    job.validate().context("Invalid pipeline settings")?;

    info!(input = %job.input.display(), output = %job.output_dir.display(), "Starting pipeline");
    let events = relief::spawn_pipeline(job)?;
    for event in events {
        match event {
            PipelineEvent::Progress { stage, percent } => {
                println!("{} {stage}", format!("[{percent:>3}%]").dimmed());
            }
            PipelineEvent::Finished(outputs) => {
                println!("{} {}", "STL written:".green(), outputs.relief.stl.display());
                println!(
                    "{} {} ({} swaps)",
                    "Plan written:".green(),
                    outputs.files.json.display(),
                    outputs.plan.steps.len()
                );
                return Ok(());
            }
            PipelineEvent::Failed(message) => bail!("Pipeline failed: {message}"),
        }
    }
    bail!("Pipeline worker exited without a result")
}

/// `calibrate`: workflow text and filament template.
pub fn calibrate(output_dir: &Path) -> Result<()> {
    let assets = relief::write_calibration_assets(output_dir)?;
    println!("{} {}", "Calibration assets written:".green(), output_dir.display());
    println!("  {}", assets.steps.display());
    println!("  {}", assets.template.display());
    Ok(())
}

/// `inspect`: quick summaries.
pub fn inspect(input: Option<&Path>, filaments: Option<&Path>, palette_value: Option<&str>) -> Result<()> {
    if input.is_none() && filaments.is_none() && palette_value.is_none() {
        bail!("Nothing to inspect: pass --input, --filaments or --palette");
    }
    if let Some(path) = input {
        let image = heightmap::load_image(path)?;
        println!("Image size: {}x{}", image.width(), image.height());
    }
    if let Some(path) = filaments {
        let items = plan::load_filaments(path)?;
        println!("Filaments: {}", items.len());
        for f in &items {
            println!("  {} {} td={:.2}mm", f.name.bold(), f.color_hex, f.td_mm);
        }
    }
    if let Some(value) = palette_value {
        let colors = palette::load_palette(value)?;
        println!("Palette entries: {}", colors.len());
    }
    Ok(())
}
