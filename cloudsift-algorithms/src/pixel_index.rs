//! Nearest-pixel search used to backproject raster detections
//!
//! Both implementations answer the same question: which cloud point landed
//! closest (squared pixel distance) to a detected pixel, preferring the lowest
//! index among equally close points.

use cloudsift_core::PixelIndex;
use rstar::{PointDistance, RTree, RTreeObject, AABB};

fn distance_2(a: [i64; 2], b: [i64; 2]) -> i64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Linear scan over every pixel, O(N) per query
///
/// Fine for clouds in the thousands of points; the backprojection of M
/// detections costs O(M·N), which becomes the hotspot for large clouds.
pub struct BruteForcePixelSearch {
    pixels: Vec<[i64; 2]>,
}

impl BruteForcePixelSearch {
    pub fn new(pixels: &[[i64; 2]]) -> Self {
        Self {
            pixels: pixels.to_vec(),
        }
    }
}

impl PixelIndex for BruteForcePixelSearch {
    fn nearest(&self, query: [i64; 2]) -> Option<usize> {
        let mut best: Option<(usize, i64)> = None;
        for (idx, &pixel) in self.pixels.iter().enumerate() {
            let d = distance_2(pixel, query);
            // strict comparison keeps the first index on ties
            if best.map_or(true, |(_, best_d)| d < best_d) {
                best = Some((idx, d));
            }
        }
        best.map(|(idx, _)| idx)
    }

    fn len(&self) -> usize {
        self.pixels.len()
    }
}

/// A pixel with the index of the cloud point it came from
#[derive(Clone, Copy, Debug, PartialEq)]
struct IndexedPixel {
    pixel: [i64; 2],
    index: usize,
}

impl RTreeObject for IndexedPixel {
    type Envelope = AABB<[i64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.pixel)
    }
}

impl PointDistance for IndexedPixel {
    fn distance_2(&self, point: &[i64; 2]) -> i64 {
        distance_2(self.pixel, *point)
    }

    fn contains_point(&self, point: &[i64; 2]) -> bool {
        self.pixel == *point
    }
}

/// R*-tree over the mapped pixels, O(log N) per query
pub struct RTreePixelIndex {
    tree: RTree<IndexedPixel>,
    len: usize,
}

impl RTreePixelIndex {
    pub fn new(pixels: &[[i64; 2]]) -> Self {
        let indexed: Vec<IndexedPixel> = pixels
            .iter()
            .enumerate()
            .map(|(index, &pixel)| IndexedPixel { pixel, index })
            .collect();

        Self {
            tree: RTree::bulk_load(indexed),
            len: pixels.len(),
        }
    }
}

impl PixelIndex for RTreePixelIndex {
    fn nearest(&self, query: [i64; 2]) -> Option<usize> {
        let mut candidates = self.tree.nearest_neighbor_iter(&query);
        let first = candidates.next()?;
        let best_d = distance_2(first.pixel, query);

        // The iterator yields by non-decreasing distance, so every tie follows
        // the first hit directly.
        let lowest = candidates
            .take_while(|entry| distance_2(entry.pixel, query) == best_d)
            .map(|entry| entry.index)
            .fold(first.index, usize::min);

        Some(lowest)
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Which [`PixelIndex`] implementation the pipeline builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PixelIndexKind {
    BruteForce,
    #[default]
    RTree,
}

impl PixelIndexKind {
    /// Build an index of this kind over `pixels`
    pub fn build(self, pixels: &[[i64; 2]]) -> Box<dyn PixelIndex> {
        match self {
            PixelIndexKind::BruteForce => Box::new(BruteForcePixelSearch::new(pixels)),
            PixelIndexKind::RTree => Box::new(RTreePixelIndex::new(pixels)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_empty_index_has_no_nearest() {
        assert_eq!(BruteForcePixelSearch::new(&[]).nearest([3, 3]), None);
        assert_eq!(RTreePixelIndex::new(&[]).nearest([3, 3]), None);
        assert!(RTreePixelIndex::new(&[]).is_empty());
    }

    #[test]
    fn test_ties_resolve_to_lowest_index() {
        let pixels = [[5, 5], [1, 1], [3, 1], [1, 1], [2, 2]];
        // [1,1] at indices 1 and 3 and [3,1] are all at distance 1 from [2,1];
        // [2,2] at index 4 is also at distance 1.
        for index in [
            Box::new(BruteForcePixelSearch::new(&pixels)) as Box<dyn PixelIndex>,
            Box::new(RTreePixelIndex::new(&pixels)),
        ] {
            assert_eq!(index.nearest([2, 1]), Some(1));
            assert_eq!(index.nearest([5, 5]), Some(0));
            assert_eq!(index.nearest([100, 100]), Some(0));
        }
    }

    #[test]
    fn test_rtree_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(11);
        let pixels: Vec<[i64; 2]> = (0..2000)
            .map(|_| [rng.gen_range(0..64), rng.gen_range(0..64)])
            .collect();

        let brute = BruteForcePixelSearch::new(&pixels);
        let tree = RTreePixelIndex::new(&pixels);
        assert_eq!(tree.len(), brute.len());

        for _ in 0..500 {
            let query = [rng.gen_range(-4..68), rng.gen_range(-4..68)];
            assert_eq!(tree.nearest(query), brute.nearest(query), "query {:?}", query);
        }
    }

    #[test]
    fn test_kind_builds_matching_index() {
        let pixels = [[0, 0], [10, 10]];
        for kind in [PixelIndexKind::BruteForce, PixelIndexKind::RTree] {
            let index = kind.build(&pixels);
            assert_eq!(index.len(), 2);
            assert_eq!(index.nearest([9, 8]), Some(1));
        }
    }
}
