//! Backprojected 3D features paired with their descriptors

use crate::error::{Error, Result};
use crate::point::Point3f;

/// Keypoints taken from a source point cloud, each with one descriptor vector
///
/// `keypoints[i]` is described by `descriptors[i]`. Every keypoint is a
/// position copied from the cloud the features were extracted from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSet {
    pub keypoints: Vec<Point3f>,
    pub descriptors: Vec<Vec<f32>>,
}

impl FeatureSet {
    /// Create an empty feature set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a feature set from parallel keypoint and descriptor arrays
    pub fn from_parts(keypoints: Vec<Point3f>, descriptors: Vec<Vec<f32>>) -> Result<Self> {
        if keypoints.len() != descriptors.len() {
            return Err(Error::MalformedInput(format!(
                "{} keypoints but {} descriptors",
                keypoints.len(),
                descriptors.len()
            )));
        }
        Ok(Self { keypoints, descriptors })
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    /// Add a feature
    pub fn push(&mut self, keypoint: Point3f, descriptor: Vec<f32>) {
        self.keypoints.push(keypoint);
        self.descriptors.push(descriptor);
    }

    /// Iterate over `(keypoint, descriptor)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Point3f, &[f32])> {
        self.keypoints
            .iter()
            .zip(self.descriptors.iter().map(Vec::as_slice))
    }

    /// Build a new feature set from the features at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            keypoints: indices.iter().map(|&i| self.keypoints[i]).collect(),
            descriptors: indices.iter().map(|&i| self.descriptors[i].clone()).collect(),
        }
    }

    /// Euclidean norm of every descriptor
    pub fn descriptor_norms(&self) -> Vec<f32> {
        self.descriptors.iter().map(|d| descriptor_norm(d)).collect()
    }

    /// Descriptor length, or `None` for an empty set
    pub fn descriptor_dim(&self) -> Option<usize> {
        self.descriptors.first().map(Vec::len)
    }
}

/// Euclidean norm of a descriptor, accumulated in double precision
pub fn descriptor_norm(descriptor: &[f32]) -> f32 {
    descriptor
        .iter()
        .map(|&v| (v as f64) * (v as f64))
        .sum::<f64>()
        .sqrt() as f32
}
