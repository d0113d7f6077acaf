//! Core data structures and traits for cloudsift
//! 
//! This crate provides the value types shared by every stage of the
//! stereo point cloud pipeline: colored point clouds, feature sets,
//! the error type, and the capability traits stages are plugged together with.

pub mod point;
pub mod point_cloud;
pub mod feature_set;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_cloud::*;
pub use feature_set::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
