//! Seeded synthetic point clouds for demos and tests
//!
//! Every generator samples surfaces only and colours points by position so
//! rendered snapshots are easy to read.

use cloudsift_core::{Color3f, Point3f, PointCloud};
use rand::Rng;
use std::f32::consts::PI;

/// Radius of each cylinder in the stereo sample pair
pub const SAMPLE_RADIUS: f32 = 0.8;
/// Height of each cylinder in the stereo sample pair
pub const SAMPLE_HEIGHT: f32 = 2.0;
/// Points per camera in the stereo sample pair
pub const SAMPLE_POINTS: usize = 10_000;
/// X offset applied to the left (negated) and right cylinders
pub const SAMPLE_BASELINE: f32 = 1.0;

const RED: Color3f = [1.0, 0.0, 0.0];
const BLUE: Color3f = [0.0, 0.0, 1.0];

/// Points uniformly spread in angle over a sphere's surface
///
/// Colour runs from blue at the bottom to red at the top with green fixed at 0.5.
pub fn sphere<R: Rng + ?Sized>(radius: f32, num_points: usize, rng: &mut R) -> PointCloud {
    let mut cloud = PointCloud::with_capacity(num_points);
    for _ in 0..num_points {
        let theta = rng.gen_range(0.0..2.0 * PI);
        let phi = rng.gen_range(0.0..PI);
        let z = radius * phi.cos();
        let position = Point3f::new(
            radius * phi.sin() * theta.cos(),
            radius * phi.sin() * theta.sin(),
            z,
        );
        let red = if radius > 0.0 { (z + radius) / (2.0 * radius) } else { 0.5 };
        cloud.push(position, [red, 0.5, 1.0 - red]);
    }
    cloud
}

/// Points on the six faces of an axis-aligned cube centred at the origin
///
/// Points are split evenly between faces; the remainder goes to randomly
/// chosen faces. Each face has its own solid colour.
pub fn cube<R: Rng + ?Sized>(size: f32, num_points: usize, rng: &mut R) -> PointCloud {
    // (axis, sign, colour)
    const FACES: [(usize, f32, Color3f); 6] = [
        (0, 1.0, [1.0, 0.0, 0.0]),
        (0, -1.0, [0.0, 0.0, 1.0]),
        (1, 1.0, [0.0, 1.0, 0.0]),
        (1, -1.0, [1.0, 1.0, 0.0]),
        (2, 1.0, [1.0, 0.0, 1.0]),
        (2, -1.0, [0.0, 1.0, 1.0]),
    ];

    let half = size / 2.0;
    let per_face = num_points / FACES.len();
    let mut cloud = PointCloud::with_capacity(num_points);

    let sample_face = |face: usize, rng: &mut R, cloud: &mut PointCloud| {
        let (axis, sign, color) = FACES[face];
        let mut coords = [0.0f32; 3];
        for (i, coord) in coords.iter_mut().enumerate() {
            *coord = if i == axis {
                sign * half
            } else if half > 0.0 {
                rng.gen_range(-half..half)
            } else {
                0.0
            };
        }
        cloud.push(Point3f::new(coords[0], coords[1], coords[2]), color);
    };

    for face in 0..FACES.len() {
        for _ in 0..per_face {
            sample_face(face, &mut *rng, &mut cloud);
        }
    }
    while cloud.len() < num_points {
        let face = rng.gen_range(0..FACES.len());
        sample_face(face, &mut *rng, &mut cloud);
    }
    cloud
}

/// Points on a closed cylinder standing on the Z axis, centred at the origin
///
/// 60% of the points cover the side, coloured blue to red with height; the
/// top cap (20%) is red and the bottom cap (the rest) is blue.
pub fn cylinder<R: Rng + ?Sized>(
    radius: f32,
    height: f32,
    num_points: usize,
    rng: &mut R,
) -> PointCloud {
    let side_points = num_points * 6 / 10;
    let top_points = num_points * 2 / 10;
    let bottom_points = num_points - side_points - top_points;
    let half = height / 2.0;

    let mut cloud = PointCloud::with_capacity(num_points);

    for _ in 0..side_points {
        let theta = rng.gen_range(0.0..2.0 * PI);
        let z = if half > 0.0 { rng.gen_range(-half..half) } else { 0.0 };
        let t = if height > 0.0 { (z + half) / height } else { 0.5 };
        cloud.push(
            Point3f::new(radius * theta.cos(), radius * theta.sin(), z),
            [t, 0.5 * (1.0 - (2.0 * t - 1.0).abs()), 1.0 - t],
        );
    }

    for (count, z, color) in [(top_points, half, RED), (bottom_points, -half, BLUE)] {
        for _ in 0..count {
            // sqrt keeps the cap density uniform
            let r = radius * rng.gen::<f32>().sqrt();
            let theta = rng.gen_range(0.0..2.0 * PI);
            cloud.push(Point3f::new(r * theta.cos(), r * theta.sin(), z), color);
        }
    }

    cloud
}

/// Shift every position along X
pub fn translate_x(cloud: &mut PointCloud, offset: f32) {
    for position in cloud.positions.iter_mut() {
        position.x += offset;
    }
}

/// The demo stereo pair: two sample cylinders, left shifted to −X, right to +X
pub fn stereo_cylinders<R: Rng + ?Sized>(num_points: usize, rng: &mut R) -> (PointCloud, PointCloud) {
    let mut left = cylinder(SAMPLE_RADIUS, SAMPLE_HEIGHT, num_points, rng);
    translate_x(&mut left, -SAMPLE_BASELINE);

    let mut right = cylinder(SAMPLE_RADIUS, SAMPLE_HEIGHT, num_points, rng);
    translate_x(&mut right, SAMPLE_BASELINE);

    (left, right)
}
