//! Software point cloud renderer producing PNG snapshots

use crate::camera::Camera;
use cloudsift_algorithms::downsample;
use cloudsift_core::{color_to_rgb8, Error, Point3f, PointCloud, Result};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use log::debug;
use nalgebra::Point2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

/// Largest number of cloud points drawn in one snapshot
pub const MAX_RENDERED_POINTS: usize = 5000;

/// Settings for [`render_point_cloud`]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    /// Radius of each cloud point, in pixels
    pub point_radius: i32,
    /// Radius of the ring drawn around each keypoint, in pixels
    pub keypoint_radius: i32,
    pub keypoint_color: [u8; 3],
    pub background: [u8; 3],
    /// Clouds larger than this are randomly subsampled before drawing
    pub max_points: usize,
    /// Seed for the subsampling, so snapshots are reproducible
    pub seed: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            point_radius: 1,
            keypoint_radius: 5,
            keypoint_color: [255, 0, 0],
            background: [255, 255, 255],
            max_points: MAX_RENDERED_POINTS,
            seed: 0,
        }
    }
}

/// Maps view-plane coordinates onto pixels with one scale for both axes
struct Viewport {
    min: Point2<f32>,
    scale: f32,
    offset: (f32, f32),
    height: u32,
}

impl Viewport {
    fn fit(points: &[Point2<f32>], width: u32, height: u32) -> Self {
        let mut min = Point2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Point2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in points {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        if points.is_empty() {
            min = Point2::origin();
            max = Point2::origin();
        }

        // 5% margin on every side
        let usable_w = width as f32 * 0.9;
        let usable_h = height as f32 * 0.9;
        let span_x = (max.x - min.x).max(f32::EPSILON);
        let span_y = (max.y - min.y).max(f32::EPSILON);
        let scale = (usable_w / span_x).min(usable_h / span_y);
        let offset = (
            (width as f32 - span_x * scale) / 2.0,
            (height as f32 - span_y * scale) / 2.0,
        );

        Self { min, scale, offset, height }
    }

    fn to_pixel(&self, p: &Point2<f32>) -> (i32, i32) {
        let x = self.offset.0 + (p.x - self.min.x) * self.scale;
        let y = self.offset.1 + (p.y - self.min.y) * self.scale;
        // image rows grow downwards
        (x.round() as i32, (self.height as f32 - 1.0 - y).round() as i32)
    }
}

/// Render `cloud` as seen by `camera`, with `keypoints` ringed
///
/// Points are drawn far to near in their own colors using an orthographic
/// projection scaled to fit the image. Keypoints are drawn last as hollow
/// circles in `options.keypoint_color`. An empty cloud renders as plain
/// background.
pub fn render_point_cloud(
    cloud: &PointCloud,
    keypoints: &[Point3f],
    camera: &Camera,
    options: &RenderOptions,
) -> Result<RgbImage> {
    if options.width == 0 || options.height == 0 {
        return Err(Error::Visualization(format!(
            "cannot render into a {}x{} image",
            options.width, options.height
        )));
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let sampled = downsample(cloud, options.max_points, &mut rng);

    let projected: Vec<(Point2<f32>, f32)> = sampled.positions.iter().map(|p| camera.project(p)).collect();
    let plane: Vec<Point2<f32>> = projected.iter().map(|(p, _)| *p).collect();
    let viewport = Viewport::fit(&plane, options.width, options.height);

    let mut order: Vec<usize> = (0..projected.len()).collect();
    order.sort_by(|&a, &b| projected[b].1.total_cmp(&projected[a].1));

    let mut image = RgbImage::from_pixel(options.width, options.height, Rgb(options.background));
    for idx in order {
        let center = viewport.to_pixel(&projected[idx].0);
        let color = Rgb(color_to_rgb8(&sampled.colors[idx]));
        draw_filled_circle_mut(&mut image, center, options.point_radius, color);
    }

    for keypoint in keypoints {
        let (plane_point, _) = camera.project(keypoint);
        let center = viewport.to_pixel(&plane_point);
        draw_hollow_circle_mut(&mut image, center, options.keypoint_radius, Rgb(options.keypoint_color));
    }

    debug!(
        "rendered {} of {} points and {} keypoints",
        sampled.len(),
        cloud.len(),
        keypoints.len()
    );
    Ok(image)
}

/// Place two images next to each other, separated by a `gap` pixel strip
pub fn side_by_side(left: &RgbImage, right: &RgbImage, gap: u32, background: [u8; 3]) -> RgbImage {
    let width = left.width() + gap + right.width();
    let height = left.height().max(right.height());
    let mut combined = RgbImage::from_pixel(width, height, Rgb(background));

    for (x, y, pixel) in left.enumerate_pixels() {
        combined.put_pixel(x, y, *pixel);
    }
    let shift = left.width() + gap;
    for (x, y, pixel) in right.enumerate_pixels() {
        combined.put_pixel(x + shift, y, *pixel);
    }
    combined
}

/// Render a left/right camera pair into one comparison image
///
/// Both clouds share the same viewing angle so the two halves are directly
/// comparable.
pub fn render_stereo_comparison(
    left: (&PointCloud, &[Point3f]),
    right: (&PointCloud, &[Point3f]),
    options: &RenderOptions,
) -> Result<RgbImage> {
    let left_image = render_point_cloud(left.0, left.1, &Camera::framing(left.0), options)?;
    let right_image = render_point_cloud(right.0, right.1, &Camera::framing(right.0), options)?;
    Ok(side_by_side(&left_image, &right_image, 16, options.background))
}

fn prepare_output(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGB image as PNG, creating parent directories
pub fn save_png<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    let path = path.as_ref();
    prepare_output(path)?;
    image
        .save(path)
        .map_err(|e| Error::Visualization(format!("{}: {}", path.display(), e)))
}

/// Save a projection raster as a grayscale PNG, creating parent directories
pub fn save_raster<P: AsRef<Path>>(raster: &GrayImage, path: P) -> Result<()> {
    let path = path.as_ref();
    prepare_output(path)?;
    raster
        .save(path)
        .map_err(|e| Error::Visualization(format!("{}: {}", path.display(), e)))
}
