//! Per-camera processing pipeline
//!
//! `FeaturePipeline` wires the preprocessing stages, the raster projection,
//! an injected [`FeatureDetector`] and the backprojection step together.
//!
//! ```text
//! raw cloud -> validate -> filter_outliers -> normalize
//!           -> project_to_raster -> detect -> backproject
//!           -> [filter_by_quality] -> limit_count
//! ```
//!
//! The quality filter only runs when a threshold is configured.

use crate::detection::{Detection, FeatureDetector};
use crate::feature_filtering::{filter_by_quality, limit_count};
use crate::pixel_index::PixelIndexKind;
use crate::preprocessing::{ensure_valid, filter_outliers, normalize};
use crate::projection::{project_to_raster, Projection, DEFAULT_RASTER_SIZE};
use cloudsift_core::{Error, FeatureSet, PointCloud, Result};
use log::{debug, info, warn};

/// Largest raster side [`PipelineConfig::validate`] accepts
pub const MAX_RASTER_SIZE: u32 = 16384;

/// Tunables for [`FeaturePipeline`]
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Side length of the projection raster
    pub raster_size: u32,
    /// Standard deviation multiplier for outlier removal
    pub outlier_threshold: f32,
    /// Minimum relative descriptor strength a feature must exceed, if any
    pub quality_threshold: Option<f32>,
    /// Upper bound on features kept per cloud
    pub max_features: usize,
    /// Search structure used for backprojection
    pub index_kind: PixelIndexKind,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raster_size: DEFAULT_RASTER_SIZE,
            outlier_threshold: 2.0,
            quality_threshold: None,
            max_features: 1000,
            index_kind: PixelIndexKind::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_raster_size(mut self, raster_size: u32) -> Self {
        self.raster_size = raster_size;
        self
    }

    pub fn with_outlier_threshold(mut self, threshold: f32) -> Self {
        self.outlier_threshold = threshold;
        self
    }

    pub fn with_quality_threshold(mut self, threshold: f32) -> Self {
        self.quality_threshold = Some(threshold);
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_index_kind(mut self, index_kind: PixelIndexKind) -> Self {
        self.index_kind = index_kind;
        self
    }

    /// Reject settings no stage could run with
    pub fn validate(&self) -> Result<()> {
        if self.raster_size == 0 || self.raster_size > MAX_RASTER_SIZE {
            return Err(Error::InvalidData(format!(
                "raster size must be between 1 and {}, got {}",
                MAX_RASTER_SIZE, self.raster_size
            )));
        }
        if !self.outlier_threshold.is_finite() || self.outlier_threshold < 0.0 {
            return Err(Error::InvalidData(format!(
                "outlier threshold must be finite and non-negative, got {}",
                self.outlier_threshold
            )));
        }
        if let Some(threshold) = self.quality_threshold {
            if !threshold.is_finite() {
                return Err(Error::InvalidData(format!(
                    "quality threshold must be finite, got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }
}

/// Everything one camera's run produces
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The cloud after outlier removal and normalization
    pub cloud: PointCloud,
    /// Features after the optional quality filter and the count limit
    pub features: FeatureSet,
    /// Features found before any filtering
    pub extracted: usize,
}

/// Preprocessing and feature extraction for a single camera
pub struct FeaturePipeline<D: FeatureDetector> {
    detector: D,
    config: PipelineConfig,
}

impl<D: FeatureDetector> FeaturePipeline<D> {
    pub fn new(detector: D, config: PipelineConfig) -> Self {
        Self { detector, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Validate, remove outliers and normalize a raw cloud
    pub fn preprocess(&self, cloud: &PointCloud) -> Result<PointCloud> {
        ensure_valid(cloud)?;
        let filtered = filter_outliers(cloud, self.config.outlier_threshold)?;
        info!(
            "outlier filter kept {} of {} points",
            filtered.len(),
            cloud.len()
        );
        Ok(normalize(&filtered))
    }

    /// Detect features on the projected raster and map them back onto the cloud
    ///
    /// Every returned keypoint is, by value, a position of `cloud`. An empty
    /// cloud gives an empty set without consulting the detector.
    pub fn extract_features(&self, cloud: &PointCloud) -> Result<FeatureSet> {
        if cloud.is_empty() {
            return Ok(FeatureSet::new());
        }

        let projection = project_to_raster(cloud, self.config.raster_size)?;
        let detections = self.detector.detect(&projection.raster)?;
        debug!("detector returned {} detections", detections.len());

        Ok(backproject(&detections, &projection, cloud, self.config.index_kind))
    }

    /// Optional quality filter followed by the count limit
    pub fn refine(&self, features: &FeatureSet) -> FeatureSet {
        let limited = match self.config.quality_threshold {
            Some(threshold) => {
                let filtered = filter_by_quality(features, threshold);
                info!(
                    "{} of {} features passed the quality filter",
                    filtered.len(),
                    features.len()
                );
                limit_count(&filtered, self.config.max_features)
            }
            None => limit_count(features, self.config.max_features),
        };
        info!("kept {} of {} extracted features", limited.len(), features.len());
        limited
    }

    /// Run every stage on one camera's raw cloud
    ///
    /// Invalid input or bad settings abort the run. A detector failure does
    /// not: it is logged and the run continues with no features.
    pub fn run(&self, cloud: &PointCloud) -> Result<PipelineOutput> {
        self.config.validate()?;
        let normalized = self.preprocess(cloud)?;

        let extracted = match self.extract_features(&normalized) {
            Ok(features) => features,
            Err(e) => {
                warn!("feature extraction failed, continuing without features: {}", e);
                FeatureSet::new()
            }
        };

        Ok(PipelineOutput {
            features: self.refine(&extracted),
            extracted: extracted.len(),
            cloud: normalized,
        })
    }
}

/// Map raster detections back to cloud points
///
/// Each detection's location is truncated to a pixel and matched to the cloud
/// point whose mapped pixel is closest, lowest index first on ties. The
/// matched position becomes the keypoint and the detection's descriptor is
/// carried over unchanged.
pub fn backproject(
    detections: &[Detection],
    projection: &Projection,
    cloud: &PointCloud,
    index_kind: PixelIndexKind,
) -> FeatureSet {
    let mut features = FeatureSet::new();
    if detections.is_empty() || projection.pixels.is_empty() {
        return features;
    }

    let index = index_kind.build(&projection.pixels);
    for detection in detections {
        let query = [detection.x.trunc() as i64, detection.y.trunc() as i64];
        if let Some(nearest) = index.nearest(query) {
            features.push(cloud.positions[nearest], detection.descriptor.clone());
        }
    }
    features
}
