use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use cloudsift_algorithms::{synthetic, PipelineConfig, DEFAULT_RASTER_SIZE};
use cloudsift_cli::{run_generate, run_process, ProcessOptions};
use log::info;

/// Stereo point cloud preprocessing and projected feature extraction
#[derive(Parser, Debug)]
#[command(name = "cloudsift", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a left/right pair of PLY clouds
    Process(ProcessArgs),
    /// Write a synthetic stereo pair of PLY clouds
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct ProcessArgs {
    /// Left camera PLY file
    #[arg(long, default_value = "data/left_camera.ply")]
    left: PathBuf,

    /// Right camera PLY file
    #[arg(long, default_value = "data/right_camera.ply")]
    right: PathBuf,

    /// Directory for feature files and snapshots
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Render PNG snapshots
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    visualize: bool,

    /// Write features_left.json and features_right.json
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    save_features: bool,

    /// Keep at most this many features per camera
    #[arg(long, default_value_t = 1000)]
    max_features: usize,

    /// Side length of the projection raster
    #[arg(long, default_value_t = DEFAULT_RASTER_SIZE)]
    raster_size: u32,

    /// Standard deviation multiplier for outlier removal
    #[arg(long, default_value_t = 2.0)]
    outlier_threshold: f32,

    /// Drop features whose relative descriptor strength is not above this
    #[arg(long)]
    quality_threshold: Option<f32>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Directory to write left_camera.ply and right_camera.ply into
    #[arg(long, default_value = "data")]
    output: PathBuf,

    /// Points per camera
    #[arg(long, default_value_t = synthetic::SAMPLE_POINTS)]
    points: usize,

    /// Seed for the random generator
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn process(args: ProcessArgs) -> Result<()> {
    let mut pipeline = PipelineConfig::default()
        .with_max_features(args.max_features)
        .with_raster_size(args.raster_size)
        .with_outlier_threshold(args.outlier_threshold);
    if let Some(threshold) = args.quality_threshold {
        pipeline = pipeline.with_quality_threshold(threshold);
    }
    pipeline.validate().context("invalid pipeline settings")?;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("cannot create {}", args.output.display()))?;

    let options = ProcessOptions {
        left: args.left,
        right: args.right,
        output: args.output,
        visualize: args.visualize,
        save_features: args.save_features,
        pipeline,
    };

    info!("starting stereo point cloud processing");
    let summary = run_process(&options);
    if summary.write_failures > 0 {
        info!("{} report files could not be written", summary.write_failures);
    }

    if !summary.all_processed() {
        let failed: Vec<String> = [&summary.left, &summary.right]
            .into_iter()
            .filter(|report| report.result.is_err())
            .map(|report| report.source.display().to_string())
            .collect();
        bail!("failed to process {}", failed.join(", "));
    }

    info!("processing complete");
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<()> {
    let (left, right) = run_generate(&args.output, args.points, args.seed)
        .with_context(|| format!("cannot write sample clouds to {}", args.output.display()))?;
    info!("sample data ready: {} and {}", left.display(), right.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Process(args) => process(args),
        Command::Generate(args) => generate(args),
    }
}
