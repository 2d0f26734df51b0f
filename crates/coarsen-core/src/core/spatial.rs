//! Radius queries over atom positions backed by a k-d tree.

use kiddo::{ImmutableKdTree, SquaredEuclidean};
use nalgebra::Point3;

/// Two indexed points closer than a query radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborPair {
    /// Index of the first point; always smaller than `second`.
    pub first: usize,
    pub second: usize,
    /// Euclidean distance between the two points.
    pub distance: f64,
}

/// An immutable spatial index over an ordered sequence of positions.
///
/// Indices reported by queries are positions in the sequence given to
/// [`SpatialIndex::new`].
pub struct SpatialIndex {
    points: Vec<[f64; 3]>,
    tree: ImmutableKdTree<f64, 3>,
}

impl SpatialIndex {
    pub fn new(positions: &[Point3<f64>]) -> Self {
        let points: Vec<[f64; 3]> = positions.iter().map(|p| [p.x, p.y, p.z]).collect();
        // The immutable tree splits buckets by population, so collinear or
        // coincident atoms cannot overflow a leaf.
        let tree = ImmutableKdTree::new_from_slice(&points);
        Self { points, tree }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns every pair of points at most `radius` apart.
    ///
    /// The boundary is inclusive. Pairs are reported once, with
    /// `first < second`, sorted by `(first, second)`. An empty index or a
    /// negative radius yields no pairs.
    pub fn pairs_within(&self, radius: f64) -> Vec<NeighborPair> {
        if self.points.is_empty() || !(radius >= 0.0) {
            return Vec::new();
        }

        // Widen the tree query slightly; the exact cut is applied below.
        let query_radius = radius * (1.0 + 1e-9) + f64::EPSILON;
        let query_sq = query_radius * query_radius;

        let mut pairs = Vec::new();
        for (first, point) in self.points.iter().enumerate() {
            for neighbor in self.tree.within_unsorted::<SquaredEuclidean>(point, query_sq) {
                let second = neighbor.item as usize;
                if second <= first {
                    continue;
                }
                let distance = self.distance(first, second);
                if distance <= radius {
                    pairs.push(NeighborPair {
                        first,
                        second,
                        distance,
                    });
                }
            }
        }
        pairs.sort_unstable_by_key(|pair| (pair.first, pair.second));
        pairs
    }

    fn distance(&self, first: usize, second: usize) -> f64 {
        let a = Point3::from(self.points[first]);
        let b = Point3::from(self.points[second]);
        nalgebra::distance(&a, &b)
    }
}
