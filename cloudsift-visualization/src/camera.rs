//! Camera utilities for point cloud snapshots

use cloudsift_core::{Drawable, Point3f};
use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// A look-at camera for orthographic snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Self {
        Self { position, target, up }
    }

    /// Camera orbiting `target` at `distance`, Z up
    ///
    /// `azimuth` turns around Z starting from the +X axis, `elevation` lifts
    /// the camera above the XY plane; both in radians.
    pub fn orbiting(target: Point3f, distance: f32, azimuth: f32, elevation: f32) -> Self {
        let mut camera = Self::new(target + Vector3::x() * distance, target, Vector3::z());
        camera.orbit(azimuth, elevation);
        camera
    }

    /// Oblique three-quarter view framing `object`
    pub fn framing<D: Drawable>(object: &D) -> Self {
        let (min, max) = object.bounding_box();
        let extent = (max - min).norm().max(1.0);
        Self::orbiting(
            object.center(),
            extent * 2.0,
            (-60.0f32).to_radians(),
            30.0f32.to_radians(),
        )
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Project a world point into view space
    ///
    /// Returns the image-plane coordinates (x right, y up) and the depth
    /// along the viewing direction; larger depth is further away.
    pub fn project(&self, point: &Point3f) -> (Point2<f32>, f32) {
        let view = self.view_matrix().transform_point(point);
        (Point2::new(view.x, view.y), -view.z)
    }

    /// Place the camera on the sphere around the target
    ///
    /// Keeps the current distance; angles are absolute, measured in the
    /// frame where `up` is the pole.
    pub fn orbit(&mut self, azimuth: f32, elevation: f32) {
        let radius = (self.position - self.target).norm();
        let up = self.up.normalize();
        // any vector not parallel to up gives a horizontal reference axis
        let seed = if up.x.abs() < 0.9 { Vector3::x() } else { Vector3::y() };
        let east = (seed - up * up.dot(&seed)).normalize();
        let north = up.cross(&east);

        let horizontal = east * azimuth.cos() + north * azimuth.sin();
        let direction = horizontal * elevation.cos() + up * elevation.sin();
        self.position = self.target + direction * radius;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 5.0),
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cloudsift_core::{PointCloud, NEUTRAL_GRAY};

    #[test]
    fn test_default_camera_looks_down_z() {
        let camera = Camera::default();
        let (near, near_depth) = camera.project(&Point3f::new(1.0, 2.0, 0.0));
        let (_, far_depth) = camera.project(&Point3f::new(1.0, 2.0, -3.0));

        assert_relative_eq!(near.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(near.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(near_depth, 5.0, epsilon = 1e-5);
        assert!(far_depth > near_depth);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let camera = Camera::orbiting(Point3f::new(1.0, 1.0, 1.0), 4.0, 0.7, 0.3);
        assert_relative_eq!((camera.position - camera.target).norm(), 4.0, epsilon = 1e-4);
        assert!(camera.position.z > camera.target.z);
    }

    #[test]
    fn test_orbit_zero_angles_is_east() {
        let camera = Camera::orbiting(Point3f::origin(), 2.0, 0.0, 0.0);
        assert_relative_eq!(camera.position, Point3f::new(2.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_framing_targets_center() {
        let cloud = PointCloud::with_uniform_color(
            vec![Point3f::new(-1.0, 0.0, 0.0), Point3f::new(3.0, 2.0, 4.0)],
            NEUTRAL_GRAY,
        );
        let camera = Camera::framing(&cloud);
        assert_relative_eq!(camera.target, Point3f::new(1.0, 1.0, 2.0), epsilon = 1e-5);
        let (center, _) = camera.project(&camera.target);
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-4);
    }
}
