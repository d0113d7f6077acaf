//! # cloudsift Algorithms
//!
//! Preprocessing and projected feature extraction for stereo point clouds.
//!
//! This crate provides statistical outlier removal, normalization,
//! deduplication and downsampling, the projection of a cloud onto an
//! intensity raster, feature detection on that raster, backprojection of
//! detections onto cloud points, and descriptor-based feature filtering.

pub mod preprocessing;
pub mod projection;
pub mod detection;
pub mod pixel_index;
pub mod feature_filtering;
pub mod pipeline;
pub mod synthetic;

// Re-export commonly used items
pub use preprocessing::*;
pub use projection::*;
pub use detection::*;
pub use pixel_index::*;
pub use feature_filtering::*;
pub use pipeline::*;
