//! Point cloud preprocessing
//!
//! Every stage takes a cloud by reference and returns a new cloud; colors are
//! always carried through the same selection as their positions.

use cloudsift_core::{is_finite_point, Drawable, Error, Point3f, PointCloud, Result};
use log::debug;
use rand::Rng;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Largest number of points a valid cloud may hold
pub const MAX_POINTS: usize = 1_000_000;

/// Bounding-box extents below this are treated as degenerate
pub const MIN_EXTENT: f32 = 1e-10;

/// Check whether a cloud may enter the pipeline
///
/// A cloud is valid when positions and colors have the same length, it holds
/// between 1 and [`MAX_POINTS`] points, every position is finite and every
/// color component lies in `[0, 1]`.
pub fn validate(cloud: &PointCloud) -> bool {
    validation_issue(cloud).is_none()
}

/// Gate form of [`validate`]: the first violated rule becomes an [`Error::Validation`]
pub fn ensure_valid(cloud: &PointCloud) -> Result<()> {
    match validation_issue(cloud) {
        Some(reason) => Err(Error::Validation(reason)),
        None => Ok(()),
    }
}

fn validation_issue(cloud: &PointCloud) -> Option<String> {
    if cloud.positions.len() != cloud.colors.len() {
        return Some(format!(
            "{} positions but {} colors",
            cloud.positions.len(),
            cloud.colors.len()
        ));
    }
    if cloud.is_empty() {
        return Some("cloud has no points".to_string());
    }
    if cloud.len() > MAX_POINTS {
        return Some(format!("cloud has {} points, limit is {}", cloud.len(), MAX_POINTS));
    }
    if let Some(index) = cloud.positions.iter().position(|p| !is_finite_point(p)) {
        return Some(format!("position {} is not finite", index));
    }
    let color_in_range = |c: &[f32; 3]| c.iter().all(|v| (0.0..=1.0).contains(v));
    if let Some(index) = cloud.colors.iter().position(|c| !color_in_range(c)) {
        return Some(format!("color {} is outside [0, 1]", index));
    }
    None
}

/// Statistical outlier removal by distance to the centroid
///
/// Computes the distance of every point to the centroid of the cloud, then the
/// mean and population standard deviation of those distances, and keeps the
/// points strictly closer than `mean + threshold_std_dev * std_dev`.
///
/// When every point is at the same distance from the centroid (standard
/// deviation of zero, e.g. all points identical) the strict comparison would
/// reject every point; in that case the cloud is returned unchanged.
///
/// # Arguments
/// * `cloud` - Input point cloud
/// * `threshold_std_dev` - Standard deviation multiplier, finite and non-negative (2.0 is typical)
///
/// # Example
/// ```rust
/// use cloudsift_core::{PointCloud, Point3f, NEUTRAL_GRAY};
/// use cloudsift_algorithms::filter_outliers;
///
/// fn main() -> cloudsift_core::Result<()> {
///     let mut points: Vec<Point3f> = (0..20)
///         .map(|i| Point3f::new((i % 5) as f32 * 0.1, (i / 5) as f32 * 0.1, 0.0))
///         .collect();
///     points.push(Point3f::new(50.0, 50.0, 50.0));
///     let cloud = PointCloud::with_uniform_color(points, NEUTRAL_GRAY);
///
///     let filtered = filter_outliers(&cloud, 2.0)?;
///     assert_eq!(filtered.len(), 20);
///     Ok(())
/// }
/// ```
pub fn filter_outliers(cloud: &PointCloud, threshold_std_dev: f32) -> Result<PointCloud> {
    if !threshold_std_dev.is_finite() || threshold_std_dev < 0.0 {
        return Err(Error::InvalidData(
            "threshold_std_dev must be finite and non-negative".to_string()
        ));
    }

    if cloud.is_empty() {
        return Ok(PointCloud::new());
    }

    let n = cloud.len() as f64;
    let sum = cloud.positions.iter().fold([0.0f64; 3], |acc, p| {
        [acc[0] + p.x as f64, acc[1] + p.y as f64, acc[2] + p.z as f64]
    });
    let centroid = [sum[0] / n, sum[1] / n, sum[2] / n];

    let distances: Vec<f64> = cloud.positions
        .par_iter()
        .map(|p| {
            let dx = p.x as f64 - centroid[0];
            let dy = p.y as f64 - centroid[1];
            let dz = p.z as f64 - centroid[2];
            (dx * dx + dy * dy + dz * dz).sqrt()
        })
        .collect();

    let first = distances[0];
    if distances.iter().all(|&d| d == first) {
        debug!("all {} points equidistant from the centroid, keeping every point", cloud.len());
        return Ok(cloud.clone());
    }

    let mean = distances.iter().sum::<f64>() / n;
    let variance = distances
        .iter()
        .map(|&d| (d - mean).powi(2))
        .sum::<f64>() / n;
    let limit = mean + threshold_std_dev as f64 * variance.sqrt();

    let mask: Vec<bool> = distances.iter().map(|&d| d < limit).collect();
    let filtered = cloud.select_mask(&mask);
    debug!("outlier filter kept {} of {} points", filtered.len(), cloud.len());

    Ok(filtered)
}

/// Center the cloud on its bounding box and scale by the largest axis extent
///
/// Output coordinates lie in `[-0.5, 0.5]` along the longest axis; shorter
/// axes keep their aspect ratio. A cloud whose largest extent is below
/// [`MIN_EXTENT`] is only re-centered.
pub fn normalize(cloud: &PointCloud) -> PointCloud {
    if cloud.is_empty() {
        return cloud.clone();
    }

    let (min, max) = cloud.bounding_box();
    let center = cloud.center();
    let extent = (max - min).max();

    let positions: Vec<Point3f> = if extent < MIN_EXTENT {
        cloud.positions.iter().map(|p| Point3f::from(p - center)).collect()
    } else {
        cloud.positions
            .iter()
            .map(|p| Point3f::from((p - center) / extent))
            .collect()
    };

    PointCloud {
        positions,
        colors: cloud.colors.clone(),
    }
}

/// Remove points that coincide after quantization to a multiple of `tolerance`
///
/// Of each group of coinciding points the one with the lowest index is kept,
/// with its original (unquantized) position and color. The result is ordered
/// by quantized position, x first.
pub fn remove_duplicates(cloud: &PointCloud, tolerance: f32) -> Result<PointCloud> {
    if !tolerance.is_finite() || tolerance <= 0.0 {
        return Err(Error::InvalidData(
            "tolerance must be positive".to_string()
        ));
    }

    let tolerance = tolerance as f64;
    let quantize = |v: f32| (v as f64 / tolerance).round() as i64;

    let mut first_seen: BTreeMap<(i64, i64, i64), usize> = BTreeMap::new();
    for (idx, p) in cloud.positions.iter().enumerate() {
        first_seen
            .entry((quantize(p.x), quantize(p.y), quantize(p.z)))
            .or_insert(idx);
    }

    let indices: Vec<usize> = first_seen.into_values().collect();
    debug!("duplicate removal kept {} of {} points", indices.len(), cloud.len());

    Ok(cloud.select(&indices))
}

/// Randomly keep `target_size` points, sampled without replacement
///
/// Clouds with at most `target_size` points are returned unchanged. Kept
/// points stay in their original relative order. Pass a seeded RNG for
/// reproducible results.
pub fn downsample<R: Rng + ?Sized>(cloud: &PointCloud, target_size: usize, rng: &mut R) -> PointCloud {
    if cloud.len() <= target_size {
        return cloud.clone();
    }

    let mut indices = rand::seq::index::sample(rng, cloud.len(), target_size).into_vec();
    indices.sort_unstable();

    cloud.select(&indices)
}
