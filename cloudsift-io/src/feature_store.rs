//! JSON persistence for feature sets
//!
//! A feature file holds a single record:
//!
//! ```json
//! { "keypoints": [[x, y, z], ...], "descriptors": [[d0, d1, ...], ...] }
//! ```

use crate::{ensure_exists, ensure_parent_dir};
use cloudsift_core::{Error, FeatureSet, Point3f, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct FeatureRecordRef<'a> {
    keypoints: Vec<[f32; 3]>,
    descriptors: &'a [Vec<f32>],
}

/// On-disk shape; both fields are required but checked by hand so a missing
/// one is reported as malformed input rather than a generic parse failure
#[derive(Deserialize)]
struct FeatureRecord {
    keypoints: Option<Vec<[f32; 3]>>,
    descriptors: Option<Vec<Vec<f32>>>,
}

/// Write `features` to `path` as JSON, creating parent directories
pub fn save_features<P: AsRef<Path>>(path: P, features: &FeatureSet) -> Result<()> {
    let path = path.as_ref();
    if features.keypoints.len() != features.descriptors.len() {
        return Err(Error::MalformedInput(format!(
            "cannot save {} keypoints with {} descriptors",
            features.keypoints.len(),
            features.descriptors.len()
        )));
    }
    ensure_parent_dir(path)?;

    let record = FeatureRecordRef {
        keypoints: features.keypoints.iter().map(|p| [p.x, p.y, p.z]).collect(),
        descriptors: &features.descriptors,
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &record)
        .map_err(|e| Error::MalformedInput(format!("cannot encode features: {}", e)))?;
    writer.flush()?;

    debug!("saved {} features to {}", features.len(), path.display());
    Ok(())
}

/// Read a feature set written by [`save_features`]
///
/// # Errors
/// * [`Error::NotFound`] if `path` does not exist
/// * [`Error::MalformedInput`] if the record cannot be parsed, lacks a field,
///   has a different number of keypoints and descriptors, or mixes
///   descriptor lengths
pub fn load_features<P: AsRef<Path>>(path: P) -> Result<FeatureSet> {
    let path = path.as_ref();
    ensure_exists(path)?;

    let reader = BufReader::new(File::open(path)?);
    let record: FeatureRecord = serde_json::from_reader(reader)
        .map_err(|e| Error::MalformedInput(format!("{}: {}", path.display(), e)))?;

    let keypoints = record.keypoints.ok_or_else(|| {
        Error::MalformedInput(format!("{}: missing 'keypoints'", path.display()))
    })?;
    let descriptors = record.descriptors.ok_or_else(|| {
        Error::MalformedInput(format!("{}: missing 'descriptors'", path.display()))
    })?;

    if let Some(first) = descriptors.first() {
        if let Some(bad) = descriptors.iter().position(|d| d.len() != first.len()) {
            return Err(Error::MalformedInput(format!(
                "{}: descriptor {} has length {}, expected {}",
                path.display(),
                bad,
                descriptors[bad].len(),
                first.len()
            )));
        }
    }

    let keypoints = keypoints
        .into_iter()
        .map(|[x, y, z]| Point3f::new(x, y, z))
        .collect();
    let features = FeatureSet::from_parts(keypoints, descriptors)?;

    debug!("loaded {} features from {}", features.len(), path.display());
    Ok(features)
}
