//! Relief Studio command line.
//!
//! # Commands
//!
//! - `relief-studio relief` - Image to binary STL relief
//! - `relief-studio plan` - Filament swap plan, preview and G-code snippet
//! - `relief-studio pipeline` - Both of the above from one job
//! - `relief-studio calibrate` - Write transmittance calibration assets
//! - `relief-studio inspect` - Summarize an image, filament file or palette
//!
//! Logging goes to stderr and honors `RUST_LOG`; `-v` raises the default
//! level to `debug`.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use relief::types::{PaletteMethod, PauseStyle, Slicer, Strategy};
use tracing_subscriber::EnvFilter;

/// 2D to 3D relief studio
#[derive(Parser)]
#[command(name = "relief-studio")]
#[command(about = "Image to printable relief mesh and filament swap plan", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Relief mesh options.
#[derive(Args, Debug, Clone)]
struct ReliefArgs {
    /// Physical width in mm
    #[arg(long, default_value_t = 120.0)]
    width_mm: f64,

    /// Physical depth in mm (default: follows image aspect)
    #[arg(long)]
    height_mm: Option<f64>,

    /// Thinnest point in mm (also the floor)
    #[arg(long, default_value_t = 0.8)]
    min_mm: f64,

    /// Thickest point in mm
    #[arg(long, default_value_t = 3.2)]
    max_mm: f64,

    /// Luminance gamma
    #[arg(long, default_value_t = 1.0)]
    gamma: f64,

    /// Bright areas become thin
    #[arg(long)]
    invert: bool,

    /// Gaussian blur radius in pixels
    #[arg(long, default_value_t = 0.0)]
    blur: f64,

    /// Samples per axis
    #[arg(long, default_value_t = 256)]
    mesh_res: u32,

    /// Samples along X (overrides --mesh-res)
    #[arg(long)]
    mesh_x: Option<u32>,

    /// Samples along Y (overrides --mesh-res)
    #[arg(long)]
    mesh_y: Option<u32>,
}

/// Swap plan options.
#[derive(Args, Debug, Clone)]
struct PlanArgs {
    /// Palette as comma-separated hex codes or a palette file
    #[arg(long)]
    palette: Option<String>,

    /// Extract this many colors automatically (overrides --palette)
    #[arg(long = "auto-palette")]
    auto_palette: Option<usize>,

    /// Palette size when no palette is given
    #[arg(long, default_value_t = 4)]
    colors: usize,

    /// kmeans or median-cut
    #[arg(long, default_value_t = PaletteMethod::KMeans)]
    palette_method: PaletteMethod,

    /// bands, quantize or tdblend
    #[arg(long, default_value_t = Strategy::Bands)]
    strategy: Strategy,

    /// Layer height in mm
    #[arg(long, default_value_t = 0.2)]
    layer_height: f64,

    /// Number of swaps
    #[arg(long, default_value_t = 6)]
    swap_count: u32,

    /// Thinnest point in mm
    #[arg(long, default_value_t = 0.8)]
    min_mm: f64,

    /// Thickest point in mm
    #[arg(long, default_value_t = 3.2)]
    max_mm: f64,

    /// Filament profiles (JSON or YAML)
    #[arg(long)]
    filaments: Option<PathBuf>,

    /// bambu, orcaslicer, prusaslicer, cura or generic
    #[arg(long, default_value_t = Slicer::Generic)]
    slicer: Slicer,

    /// m600, m0, m25 or none
    #[arg(long, default_value_t = PauseStyle::None)]
    gcode_style: PauseStyle,

    /// k-means seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Preview size relative to the source image
    #[arg(long, default_value_t = 0.5)]
    preview_scale: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a relief STL from an image
    Relief {
        /// Source image
        #[arg(long)]
        input: PathBuf,

        /// STL output path
        #[arg(long)]
        output: PathBuf,

        /// Also save the normalized heightmap as PNG
        #[arg(long)]
        export_heightmap: Option<PathBuf>,

        #[command(flatten)]
        relief: ReliefArgs,
    },

    /// Build a filament swap plan
    Plan {
        /// Source image
        #[arg(long)]
        input: PathBuf,

        /// Directory for plan outputs
        #[arg(long)]
        output_dir: PathBuf,

        #[command(flatten)]
        plan: PlanArgs,
    },

    /// Run relief and plan from one job
    Pipeline {
        /// Source image (overrides the config)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output directory (overrides the config)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Job file (JSON or YAML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Physical width in mm (overrides the config)
        #[arg(long)]
        width_mm: Option<f64>,
    },

    /// Write calibration workflow and filament template
    Calibrate {
        /// Destination directory
        #[arg(long, default_value = "calibration")]
        output_dir: PathBuf,
    },

    /// Summarize inputs without generating anything
    Inspect {
        /// Image to measure
        #[arg(long)]
        input: Option<PathBuf>,

        /// Filament profile file to count
        #[arg(long)]
        filaments: Option<PathBuf>,

        /// Palette to count
        #[arg(long)]
        palette: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Relief {
            input,
            output,
            export_heightmap,
            relief,
        } => commands::relief(&input, &output, export_heightmap.as_deref(), &relief),
        Commands::Plan {
            input,
            output_dir,
            plan,
        } => commands::plan(&input, &output_dir, &plan),
        Commands::Pipeline {
            input,
            output_dir,
            config,
            width_mm,
        } => commands::pipeline(input, output_dir, config.as_deref(), width_mm),
        Commands::Calibrate { output_dir } => commands::calibrate(&output_dir),
        Commands::Inspect {
            input,
            filaments,
            palette,
        } => commands::inspect(input.as_deref(), filaments.as_deref(), palette.as_deref()),
    }
}
