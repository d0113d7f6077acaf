//! Colored point cloud container

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// A point cloud with one color per position
///
/// `positions` and `colors` are parallel arrays: entry `i` of each describes
/// the same point. The fields are public so that data read from outside can be
/// inspected before it is trusted; pipeline stages gate on
/// `validate`/`ensure_valid` before relying on the invariants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    pub positions: Vec<Point3f>,
    pub colors: Vec<Color3f>,
}

impl PointCloud {
    /// Create a new empty point cloud
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            colors: Vec::new(),
        }
    }

    /// Create a new point cloud with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    /// Create a point cloud from parallel position and color arrays
    pub fn from_parts(positions: Vec<Point3f>, colors: Vec<Color3f>) -> Result<Self> {
        if positions.len() != colors.len() {
            return Err(Error::MalformedInput(format!(
                "{} positions but {} colors",
                positions.len(),
                colors.len()
            )));
        }
        Ok(Self { positions, colors })
    }

    /// Create a point cloud where every point has the same color
    pub fn with_uniform_color(positions: Vec<Point3f>, color: Color3f) -> Self {
        let colors = vec![color; positions.len()];
        Self { positions, colors }
    }

    /// Get the number of points in the cloud
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if the point cloud is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Add a point to the cloud
    pub fn push(&mut self, position: Point3f, color: Color3f) {
        self.positions.push(position);
        self.colors.push(color);
    }

    /// Get the point at `index` together with its color
    pub fn get(&self, index: usize) -> Option<(&Point3f, &Color3f)> {
        Some((self.positions.get(index)?, self.colors.get(index)?))
    }

    /// Iterate over `(position, color)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Point3f, &Color3f)> {
        self.positions.iter().zip(self.colors.iter())
    }

    /// Build a new cloud from the points at `indices`, in the given order.
    ///
    /// # Panics
    /// Panics if an index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            positions: indices.iter().map(|&i| self.positions[i]).collect(),
            colors: indices.iter().map(|&i| self.colors[i]).collect(),
        }
    }

    /// Build a new cloud keeping the points whose mask entry is `true`.
    ///
    /// Positions and colors are filtered with the same mask, preserving order.
    pub fn select_mask(&self, mask: &[bool]) -> Self {
        self.iter()
            .zip(mask.iter())
            .filter(|(_, &keep)| keep)
            .map(|((p, c), _)| (*p, *c))
            .collect()
    }

    /// Clear all points from the cloud
    pub fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
    }

    /// Reserve capacity for additional points
    pub fn reserve(&mut self, additional: usize) {
        self.positions.reserve(additional);
        self.colors.reserve(additional);
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<(Point3f, Color3f)> for PointCloud {
    fn extend<I: IntoIterator<Item = (Point3f, Color3f)>>(&mut self, iter: I) {
        for (position, color) in iter {
            self.push(position, color);
        }
    }
}

impl FromIterator<(Point3f, Color3f)> for PointCloud {
    fn from_iter<I: IntoIterator<Item = (Point3f, Color3f)>>(iter: I) -> Self {
        let mut cloud = Self::new();
        cloud.extend(iter);
        cloud
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PointCloud {
        PointCloud::from_parts(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_from_parts_rejects_length_mismatch() {
        let result = PointCloud::from_parts(vec![Point3f::origin()], vec![]);
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_select_keeps_colors_paired() {
        let cloud = sample();
        let picked = cloud.select(&[2, 0]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked.positions[0], Point3f::new(0.0, 1.0, 0.0));
        assert_eq!(picked.colors[0], [0.0, 0.0, 1.0]);
        assert_eq!(picked.colors[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_select_mask_preserves_order() {
        let cloud = sample();
        let kept = cloud.select_mask(&[true, false, true]);
        assert_eq!(kept.positions, vec![Point3f::new(0.0, 0.0, 0.0), Point3f::new(0.0, 1.0, 0.0)]);
        assert_eq!(kept.colors, vec![[1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_uniform_color() {
        let cloud = PointCloud::with_uniform_color(vec![Point3f::origin(); 4], NEUTRAL_GRAY);
        assert_eq!(cloud.len(), 4);
        assert!(cloud.colors.iter().all(|c| *c == NEUTRAL_GRAY));
    }

    #[test]
    fn test_collect_from_pairs() {
        let cloud: PointCloud = (0..3)
            .map(|i| (Point3f::new(i as f32, 0.0, 0.0), [0.5, 0.5, 0.5]))
            .collect();
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.get(2).map(|(p, _)| p.x), Some(2.0));
        assert!(cloud.get(3).is_none());
    }
}
