//! Projection of a point cloud onto a synthetic intensity raster
//!
//! X and Y select the pixel, Z becomes the intensity. The mapping is
//! many-to-one: when several points land on the same pixel the last one
//! painted wins.

use crate::preprocessing::MIN_EXTENT;
use cloudsift_core::{Error, PointCloud, Result};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::filter::separable_filter_equal;
use log::debug;

/// Default side length of the square raster, in pixels
pub const DEFAULT_RASTER_SIZE: u32 = 512;

/// Intensity painted for every point when the cloud is flat in Z
pub const FLAT_INTENSITY: u8 = 128;

/// 5-tap binomial approximation of a Gaussian, weights sum to 16
const BLUR_KERNEL: [i32; 5] = [1, 4, 6, 4, 1];

/// A raster built from a cloud, together with where each point landed
#[derive(Debug, Clone)]
pub struct Projection {
    /// Smoothed single-channel raster handed to the feature detector
    pub raster: GrayImage,
    /// Pixel `[x, y]` of every cloud point, in cloud order
    pub pixels: Vec<[i64; 2]>,
    /// Intensity painted for every cloud point, in cloud order
    pub intensities: Vec<u8>,
}

impl Projection {
    /// Side length of the square raster
    pub fn side(&self) -> u32 {
        self.raster.width()
    }
}

/// Project `cloud` onto a `side × side` raster
///
/// Each point's X and Y are mapped affinely from the cloud's extent onto
/// `[0, side - 1]` (truncated, then clamped); an axis with an extent below
/// [`MIN_EXTENT`] uses a range of 1 so its points collapse onto one row or
/// column. Z is mapped onto `[0, 255]`, or [`FLAT_INTENSITY`] when the cloud is
/// flat in Z. After painting, the raster is smoothed with a 5×5 Gaussian.
///
/// An empty cloud produces an all-black raster with no pixel entries.
pub fn project_to_raster(cloud: &PointCloud, side: u32) -> Result<Projection> {
    if side == 0 {
        return Err(Error::InvalidData("raster side must be at least 1".to_string()));
    }

    let xs = map_to_pixels(cloud.positions.iter().map(|p| p.x), side);
    let ys = map_to_pixels(cloud.positions.iter().map(|p| p.y), side);
    let pixels: Vec<[i64; 2]> = xs.into_iter().zip(ys).map(|(x, y)| [x, y]).collect();
    let intensities = map_to_intensity(cloud.positions.iter().map(|p| p.z));

    let mut painted = GrayImage::new(side, side);
    for (pixel, &intensity) in pixels.iter().zip(intensities.iter()) {
        painted.put_pixel(pixel[0] as u32, pixel[1] as u32, Luma([intensity]));
    }

    debug!("projected {} points onto a {}x{} raster", cloud.len(), side, side);

    Ok(Projection {
        raster: gaussian_blur_5x5(&painted),
        pixels,
        intensities,
    })
}

fn extent<I: Iterator<Item = f32>>(values: I) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| {
        let v = v as f64;
        Some(match acc {
            None => (v, v),
            Some((min, max)) => (min.min(v), max.max(v)),
        })
    })
}

fn map_to_pixels<I: Iterator<Item = f32> + Clone>(values: I, side: u32) -> Vec<i64> {
    let Some((min, max)) = extent(values.clone()) else {
        return Vec::new();
    };
    let mut range = max - min;
    if range < MIN_EXTENT as f64 {
        range = 1.0;
    }
    let last = (side - 1) as i64;
    let scale = (side - 1) as f64;

    values
        .map(|v| (((v as f64 - min) / range * scale) as i64).clamp(0, last))
        .collect()
}

fn map_to_intensity<I: Iterator<Item = f32> + Clone>(values: I) -> Vec<u8> {
    let Some((min, max)) = extent(values.clone()) else {
        return Vec::new();
    };
    let range = max - min;
    if range <= MIN_EXTENT as f64 {
        return values.map(|_| FLAT_INTENSITY).collect();
    }

    values
        .map(|v| ((v as f64 - min) / range * 255.0).clamp(0.0, 255.0) as u8)
        .collect()
}

/// Mirror an out-of-range coordinate back into `[0, n)` without repeating the edge
fn reflect_101(i: i64, n: i64) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n - 1);
    let mut i = i.rem_euclid(period);
    if i >= n {
        i = period - i;
    }
    i as usize
}

/// 5×5 Gaussian blur with reflect-101 borders and round-to-nearest output
///
/// The raster is padded by mirroring without repeating the edge pixel (the
/// border rule OpenCV uses for its blurs), then run through imageproc's
/// separable filter with integer weights. Accumulating in 16 bits keeps the
/// full kernel sum, so the result is rounded once instead of per pass.
pub fn gaussian_blur_5x5(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let pad = (BLUR_KERNEL.len() / 2) as u32;
    let (w, h) = (width as i64, height as i64);
    let padded: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_fn(width + 2 * pad, height + 2 * pad, |x, y| {
            let sx = reflect_101(x as i64 - pad as i64, w) as u32;
            let sy = reflect_101(y as i64 - pad as i64, h) as u32;
            Luma([image.get_pixel(sx, sy)[0] as u16])
        });

    // weights sum to 16 per pass, 256 overall; 255 * 256 still fits in u16
    let sums = separable_filter_equal(&padded, &BLUR_KERNEL);
    GrayImage::from_fn(width, height, |x, y| {
        let sum = sums.get_pixel(x + pad, y + pad)[0] as u32;
        Luma([((sum + 128) >> 8) as u8])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudsift_core::{Point3f, NEUTRAL_GRAY};

    fn cloud(points: Vec<Point3f>) -> PointCloud {
        PointCloud::with_uniform_color(points, NEUTRAL_GRAY)
    }

    #[test]
    fn test_corners_map_to_raster_corners() {
        let projection = project_to_raster(
            &cloud(vec![
                Point3f::new(-1.0, -1.0, 0.0),
                Point3f::new(1.0, 1.0, 1.0),
                Point3f::new(0.0, 0.0, 0.5),
            ]),
            512,
        )
        .unwrap();

        assert_eq!(projection.side(), 512);
        assert_eq!(projection.pixels[0], [0, 0]);
        assert_eq!(projection.pixels[1], [511, 511]);
        assert_eq!(projection.pixels[2], [255, 255]);
        assert_eq!(projection.intensities, vec![0, 255, 127]);
    }

    #[test]
    fn test_flat_axis_collapses_to_first_column() {
        let projection = project_to_raster(
            &cloud(vec![
                Point3f::new(0.3, 0.0, 0.0),
                Point3f::new(0.3, 2.0, 1.0),
            ]),
            64,
        )
        .unwrap();

        assert_eq!(projection.pixels[0], [0, 0]);
        assert_eq!(projection.pixels[1], [0, 63]);
    }

    #[test]
    fn test_flat_z_uses_mid_intensity() {
        let projection = project_to_raster(
            &cloud(vec![
                Point3f::new(0.0, 0.0, 2.0),
                Point3f::new(1.0, 1.0, 2.0),
            ]),
            16,
        )
        .unwrap();

        assert_eq!(projection.intensities, vec![FLAT_INTENSITY, FLAT_INTENSITY]);
    }

    #[test]
    fn test_identical_points_paint_one_blurred_dot() {
        let projection = project_to_raster(&cloud(vec![Point3f::new(1.0, 1.0, 1.0); 50]), 32).unwrap();

        assert!(projection.pixels.iter().all(|p| *p == [0, 0]));
        // reflect-101 never folds a tap back onto the edge pixel, so only the centre weight hits it
        let corner = projection.raster.get_pixel(0, 0)[0];
        assert_eq!(corner, ((128u32 * 36 + 128) >> 8) as u8);
        assert_eq!(projection.raster.get_pixel(10, 10)[0], 0);
    }

    #[test]
    fn test_later_points_overwrite_earlier_ones() {
        let points = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 1.0, 1.0),
            Point3f::new(1.0, 1.0, 0.5),
        ];
        let projection = project_to_raster(&cloud(points), 8).unwrap();
        assert_eq!(projection.pixels[1], projection.pixels[2]);
        assert_eq!(projection.intensities[2], 127);
    }

    #[test]
    fn test_empty_cloud_gives_black_raster() {
        let projection = project_to_raster(&PointCloud::new(), 16).unwrap();
        assert!(projection.pixels.is_empty());
        assert!(projection.raster.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_zero_side_is_rejected() {
        assert!(project_to_raster(&cloud(vec![Point3f::origin()]), 0).is_err());
    }

    #[test]
    fn test_blur_preserves_constant_image() {
        let image = GrayImage::from_pixel(9, 7, Luma([200]));
        let blurred = gaussian_blur_5x5(&image);
        assert!(blurred.pixels().all(|p| p[0] == 200));
    }

    #[test]
    fn test_blur_spreads_single_pixel() {
        let mut image = GrayImage::new(9, 9);
        image.put_pixel(4, 4, Luma([255]));
        let blurred = gaussian_blur_5x5(&image);
        // centre weight 36/256
        assert_eq!(blurred.get_pixel(4, 4)[0], ((255u32 * 36 + 128) >> 8) as u8);
        assert_eq!(blurred.get_pixel(2, 4)[0], ((255u32 * 6 + 128) >> 8) as u8);
        assert_eq!(blurred.get_pixel(1, 4)[0], 0);
    }

    #[test]
    fn test_blur_handles_rasters_smaller_than_the_kernel() {
        let single = GrayImage::from_pixel(1, 1, Luma([77]));
        assert_eq!(gaussian_blur_5x5(&single).get_pixel(0, 0)[0], 77);

        let narrow = GrayImage::from_pixel(2, 3, Luma([5]));
        let blurred = gaussian_blur_5x5(&narrow);
        assert_eq!(blurred.dimensions(), (2, 3));
        assert!(blurred.pixels().all(|p| p[0] == 5));
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 1), 0);
        assert_eq!(reflect_101(-1, 2), 1);
    }
}
