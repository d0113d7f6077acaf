//! # cloudsift
//!
//! Stereo point cloud preprocessing and projected feature extraction for Rust.
//!
//! This is the umbrella crate that provides convenient access to all cloudsift functionality.
//! You can use this crate to get everything in one place, or use individual crates for
//! more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Point clouds, feature sets and the shared error type
//! - **Algorithms**: Outlier removal, normalization, raster projection, feature detection
//! - **I/O**: PLY point clouds and JSON feature files
//! - **Visualization**: PNG snapshots of clouds, keypoints and rasters
//!
//! ## Quick Start
//!
//! ```rust
//! use cloudsift::prelude::*;
//!
//! fn main() -> cloudsift::Result<()> {
//!     let points = vec![
//!         Point3f::new(0.0, 0.0, 0.0),
//!         Point3f::new(1.0, 0.0, 0.5),
//!         Point3f::new(0.0, 1.0, 1.0),
//!         Point3f::new(1.0, 1.0, 0.2),
//!     ];
//!     let cloud = PointCloud::with_uniform_color(points, NEUTRAL_GRAY);
//!
//!     let pipeline = FeaturePipeline::new(SiftDetector::new(), PipelineConfig::default());
//!     let output = pipeline.run(&cloud)?;
//!     assert!(output.features.len() <= 1000);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables core, algorithms and io
//! - `core`: Core data structures (always enabled)
//! - `algorithms`: Preprocessing and the feature pipeline
//! - `io`: File format support
//! - `visualization`: PNG rendering
//! - `all`: Enables all features

// Re-export core functionality
pub use cloudsift_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use cloudsift_algorithms as algorithms;

#[cfg(feature = "io")]
pub use cloudsift_io as io;

#[cfg(feature = "visualization")]
pub use cloudsift_visualization as visualization;

/// Convenient imports for common use cases
pub mod prelude {
    pub use cloudsift_core::*;

    #[cfg(feature = "algorithms")]
    pub use cloudsift_algorithms::*;

    #[cfg(feature = "io")]
    pub use cloudsift_io::*;

    #[cfg(feature = "visualization")]
    pub use cloudsift_visualization::*;
}
