//! Orchestration behind the `cloudsift` binary
//!
//! Runs the per-camera pipeline for a left/right pair and writes the
//! report files. A camera whose cloud cannot be loaded or validated is
//! skipped; the other camera is still processed. Failures while saving or
//! rendering are logged and never stop the run.

use cloudsift_algorithms::{
    project_to_raster, synthetic, FeaturePipeline, SiftDetector, PipelineConfig,
    PipelineOutput,
};
use cloudsift_core::Result;
use cloudsift_io::{read_point_cloud, save_features, write_point_cloud};
use cloudsift_visualization::{
    render_point_cloud, render_stereo_comparison, save_png, save_raster, Camera, RenderOptions,
};
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

pub const LEFT_CLOUD_FILE: &str = "left_camera.ply";
pub const RIGHT_CLOUD_FILE: &str = "right_camera.ply";

/// What `cloudsift process` should do
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub left: PathBuf,
    pub right: PathBuf,
    pub output: PathBuf,
    pub visualize: bool,
    pub save_features: bool,
    pub pipeline: PipelineConfig,
}

/// Outcome of one camera's run
#[derive(Debug)]
pub struct CameraReport {
    pub name: &'static str,
    pub source: PathBuf,
    pub result: Result<PipelineOutput>,
}

impl CameraReport {
    pub fn output(&self) -> Option<&PipelineOutput> {
        self.result.as_ref().ok()
    }
}

/// Outcome of a whole `cloudsift process` run
#[derive(Debug)]
pub struct RunSummary {
    pub left: CameraReport,
    pub right: CameraReport,
    /// Report files that could not be written
    pub write_failures: usize,
}

impl RunSummary {
    /// True when both clouds made it through the pipeline
    pub fn all_processed(&self) -> bool {
        self.left.result.is_ok() && self.right.result.is_ok()
    }
}

/// Load one camera's cloud and run the pipeline on it
pub fn process_cloud(
    path: &Path,
    pipeline: &FeaturePipeline<SiftDetector>,
) -> Result<PipelineOutput> {
    info!("processing point cloud {}", path.display());
    let cloud = read_point_cloud(path)?;
    info!("loaded {} points", cloud.len());

    let output = pipeline.run(&cloud)?;
    info!(
        "{}: {} points after preprocessing, {} features extracted, {} kept",
        path.display(),
        output.cloud.len(),
        output.extracted,
        output.features.len()
    );
    Ok(output)
}

/// Counts report files that could not be written
#[derive(Default)]
struct WriteLog {
    failures: usize,
}

impl WriteLog {
    fn record(&mut self, path: &Path, outcome: Result<()>) {
        match outcome {
            Ok(()) => info!("wrote {}", path.display()),
            Err(e) => {
                warn!("could not write {}: {}", path.display(), e);
                self.failures += 1;
            }
        }
    }
}

fn run_camera(
    name: &'static str,
    source: &Path,
    pipeline: &FeaturePipeline<SiftDetector>,
) -> CameraReport {
    let result = process_cloud(source, pipeline);
    if let Err(e) = &result {
        error!("{} camera failed: {}", name, e);
    }
    CameraReport {
        name,
        source: source.to_path_buf(),
        result,
    }
}

fn write_camera_outputs(report: &CameraReport, options: &ProcessOptions, log: &mut WriteLog) {
    let Some(output) = report.output() else {
        return;
    };

    if options.save_features {
        let path = options.output.join(format!("features_{}.json", report.name));
        log.record(&path, save_features(&path, &output.features));
    }

    if options.visualize {
        let path = options.output.join(format!("{}.png", report.name));
        let outcome = render_point_cloud(
            &output.cloud,
            &output.features.keypoints,
            &Camera::framing(&output.cloud),
            &RenderOptions::default(),
        )
        .and_then(|image| save_png(&image, &path));
        log.record(&path, outcome);

        let path = options.output.join(format!("{}_raster.png", report.name));
        let outcome = project_to_raster(&output.cloud, options.pipeline.raster_size)
            .and_then(|projection| save_raster(&projection.raster, &path));
        log.record(&path, outcome);
    }
}

/// Process the left and right clouds and write every enabled report file
pub fn run_process(options: &ProcessOptions) -> RunSummary {
    let pipeline = FeaturePipeline::new(SiftDetector::new(), options.pipeline.clone());

    let left = run_camera("left", &options.left, &pipeline);
    let right = run_camera("right", &options.right, &pipeline);

    let mut log = WriteLog::default();
    write_camera_outputs(&left, options, &mut log);
    write_camera_outputs(&right, options, &mut log);

    if options.visualize {
        if let (Some(l), Some(r)) = (left.output(), right.output()) {
            let path = options.output.join("comparison.png");
            let outcome = render_stereo_comparison(
                (&l.cloud, l.features.keypoints.as_slice()),
                (&r.cloud, r.features.keypoints.as_slice()),
                &RenderOptions::default(),
            )
            .and_then(|image| save_png(&image, &path));
            log.record(&path, outcome);
        }
    }

    RunSummary {
        left,
        right,
        write_failures: log.failures,
    }
}

/// Write the demo stereo pair into `output` and return the two file paths
pub fn run_generate(output: &Path, points: usize, seed: u64) -> Result<(PathBuf, PathBuf)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (left, right) = synthetic::stereo_cylinders(points, &mut rng);

    let left_path = output.join(LEFT_CLOUD_FILE);
    let right_path = output.join(RIGHT_CLOUD_FILE);
    write_point_cloud(&left_path, &left)?;
    write_point_cloud(&right_path, &right)?;

    info!("left camera: {} ({} points)", left_path.display(), left.len());
    info!("right camera: {} ({} points)", right_path.display(), right.len());
    Ok((left_path, right_path))
}
