//! Point and color types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// An RGB color with components in `[0, 1]`
pub type Color3f = [f32; 3];

/// Color assigned to points loaded from files without color attributes
pub const NEUTRAL_GRAY: Color3f = [0.5, 0.5, 0.5];

/// Quantize a color to 8 bits per channel.
///
/// Components are clamped to `[0, 1]` first, so out-of-range values never
/// fail; the scaled value is truncated, matching how stored colors are read back.
pub fn color_to_rgb8(color: &Color3f) -> [u8; 3] {
    let quantize = |c: f32| {
        let c = if c.is_nan() { 0.0 } else { c.clamp(0.0, 1.0) };
        (c * 255.0) as u8
    };
    [quantize(color[0]), quantize(color[1]), quantize(color[2])]
}

/// Whether every coordinate of the point is finite
pub fn is_finite_point(point: &Point3f) -> bool {
    point.coords.iter().all(|c| c.is_finite())
}
