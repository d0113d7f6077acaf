//! I/O operations for point clouds and feature sets
//!
//! This crate reads and writes colored point clouds in PLY format and
//! persists extracted feature sets as JSON records.

pub mod ply;
pub mod feature_store;

pub use ply::{PlyReader, PlyWriter};
pub use feature_store::{load_features, save_features};

use cloudsift_core::{Error, PointCloud, Result};
use std::path::Path;

/// Trait for reading point clouds from files
pub trait PointCloudReader {
    fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud>;
}

/// Trait for writing point clouds to files
pub trait PointCloudWriter {
    fn write_point_cloud<P: AsRef<Path>>(cloud: &PointCloud, path: P) -> Result<()>;
}

/// Auto-detect format and read point cloud
///
/// A missing file is reported as [`Error::NotFound`] whatever its extension.
pub fn read_point_cloud<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let path = path.as_ref();
    ensure_exists(path)?;
    match extension(path).as_deref() {
        Some("ply") => PlyReader::read_point_cloud(path),
        _ => Err(Error::MalformedInput(format!(
            "Unsupported point cloud format: {}",
            path.display()
        ))),
    }
}

/// Auto-detect format and write point cloud
pub fn write_point_cloud<P: AsRef<Path>>(path: P, cloud: &PointCloud) -> Result<()> {
    let path = path.as_ref();
    match extension(path).as_deref() {
        Some("ply") => PlyWriter::write_point_cloud(cloud, path),
        _ => Err(Error::MalformedInput(format!(
            "Unsupported point cloud format: {}",
            path.display()
        ))),
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::NotFound(path.to_path_buf()))
    }
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
