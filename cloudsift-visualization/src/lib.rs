//! Visualization and rendering for point clouds
//!
//! This crate renders non-interactive snapshots:
//! - Point clouds with highlighted keypoints
//! - Side-by-side stereo comparisons
//! - Projection rasters with detector hits
//!
//! Everything is drawn in software into `image` buffers and saved as PNG.

pub mod camera;
pub mod renderer;

pub use camera::*;
pub use renderer::*;
