//! Core traits for cloudsift

use crate::{point::*, point_cloud::*};

/// Trait for nearest neighbor search in raster pixel space
///
/// Implementations index a set of integer pixel coordinates (one per cloud
/// point, in cloud order) and answer which entry is closest to a query pixel.
/// The contract every implementation must honour: the result minimises the
/// squared Euclidean pixel distance, and among equally close entries the
/// lowest index wins.
pub trait PixelIndex {
    /// Index of the entry closest to `query`, or `None` if the index is empty
    fn nearest(&self, query: [i64; 2]) -> Option<usize>;

    /// Number of indexed entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Trait for objects with a spatial extent
pub trait Drawable {
    /// Get the axis-aligned bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);
    
    /// Get the center point of the bounding box
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        Point3f::new(
            (min.x + max.x) / 2.0,
            (min.y + max.y) / 2.0,
            (min.z + max.z) / 2.0,
        )
    }
}

impl Drawable for PointCloud {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        if self.is_empty() {
            return (Point3f::origin(), Point3f::origin());
        }
        
        let mut min = self.positions[0];
        let mut max = self.positions[0];
        
        for p in &self.positions {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        
        (min, max)
    }
}
