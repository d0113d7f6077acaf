//! Local feature detection on projected rasters
//!
//! The pipeline only knows the [`FeatureDetector`] capability. The default
//! [`SiftDetector`] delegates to the `sift_features` crate, which finds
//! scale-space extrema and describes each one with a 128-D SIFT descriptor.

use cloudsift_core::{Error, Result};
use image::GrayImage;
use log::debug;

/// Number of values in a SIFT descriptor
pub const DESCRIPTOR_LEN: usize = 128;

/// Rasters narrower than this on either side are too small for a scale pyramid
pub const MIN_DETECTOR_SIDE: u32 = 32;

/// A single detector hit: raster location plus its descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub descriptor: Vec<f32>,
}

/// Capability to find feature points and describe them in a grayscale raster
pub trait FeatureDetector {
    /// Detect features in `raster`
    ///
    /// Finding nothing is not an error; a raster the detector cannot work
    /// with is reported as [`Error::Detector`].
    fn detect(&self, raster: &GrayImage) -> Result<Vec<Detection>>;
}

/// SIFT keypoints and descriptors from `sift_features`
#[derive(Debug, Clone, Default)]
pub struct SiftDetector {
    max_features: Option<usize>,
}

impl SiftDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_features` detections, in the order SIFT reports them
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }
}

impl FeatureDetector for SiftDetector {
    fn detect(&self, raster: &GrayImage) -> Result<Vec<Detection>> {
        let (width, height) = raster.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::Detector(format!(
                "cannot detect features in a {}x{} raster",
                width, height
            )));
        }
        if width < MIN_DETECTOR_SIDE || height < MIN_DETECTOR_SIDE {
            debug!("{}x{} raster is too small for SIFT, no features", width, height);
            return Ok(Vec::new());
        }

        let sift_features::SiftResult {
            keypoints,
            descriptors,
        } = sift_features::sift(raster, None);

        let values: Vec<f32> = descriptors.iter().map(|&v| f32::from(v)).collect();
        if values.len() != keypoints.len() * DESCRIPTOR_LEN {
            return Err(Error::Detector(format!(
                "SIFT returned {} descriptor values for {} keypoints",
                values.len(),
                keypoints.len()
            )));
        }

        let limit = self.max_features.unwrap_or(keypoints.len());
        let detections: Vec<Detection> = keypoints
            .iter()
            .zip(values.chunks_exact(DESCRIPTOR_LEN))
            .take(limit)
            .map(|(keypoint, descriptor)| Detection {
                x: keypoint.x,
                y: keypoint.y,
                descriptor: descriptor.to_vec(),
            })
            .collect();

        debug!("SIFT found {} keypoints, returning {}", keypoints.len(), detections.len());
        Ok(detections)
    }
}
