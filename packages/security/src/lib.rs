#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Security proximity indexing.
//!
//! Builds a one-time R-tree over security/guardian locations and answers
//! nearest-neighbor distance queries for candidate centroids. The index
//! is read-only after construction; concurrent queries from parallel
//! candidate processing are safe. An empty security layer is not an
//! error: every query then returns the sentinel distance, which is
//! larger than any proximity threshold used by scoring.

use geo::{Distance, Euclidean, Point};
use rstar::RTree;
use rstar::primitives::GeomWithData;
use skysweep_models::{NO_SECURITY_SENTINEL_M, SecurityNode};

type SecurityRtreeItem = GeomWithData<[f64; 2], usize>;

/// Nearest-neighbor index over security locations in the metric CRS.
pub struct SecurityIndex {
    tree: RTree<SecurityRtreeItem>,
}

impl SecurityIndex {
    /// Builds the index from security nodes. O(n log n) bulk load.
    #[must_use]
    pub fn build(nodes: &[SecurityNode]) -> Self {
        if nodes.is_empty() {
            log::info!("No security presence data; using sentinel distances");
        } else {
            log::info!("Indexed {} security locations", nodes.len());
        }

        let items: Vec<SecurityRtreeItem> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| GeomWithData::new([node.position.x(), node.position.y()], i))
            .collect();

        Self {
            tree: RTree::bulk_load(items),
        }
    }

    /// Whether the index holds any security locations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Euclidean distance (m) from a point to the nearest security
    /// location, or [`NO_SECURITY_SENTINEL_M`] when the index is empty.
    /// O(log n) per query.
    #[must_use]
    pub fn nearest_distance(&self, point: Point<f64>) -> f64 {
        self.tree
            .nearest_neighbor(&[point.x(), point.y()])
            .map_or(NO_SECURITY_SENTINEL_M, |item| {
                let position = Point::new(item.geom()[0], item.geom()[1]);
                Euclidean.distance(point, position)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(x: f64, y: f64) -> SecurityNode {
        SecurityNode {
            position: Point::new(x, y),
            category: Some("police".to_string()),
        }
    }

    #[test]
    fn empty_index_returns_sentinel() {
        let index = SecurityIndex::build(&[]);
        assert!(index.is_empty());
        let d = index.nearest_distance(Point::new(12.0, -7.0));
        assert!((d - NO_SECURITY_SENTINEL_M).abs() < f64::EPSILON);
    }

    #[test]
    fn finds_nearest_of_several() {
        let index = SecurityIndex::build(&[node(0.0, 0.0), node(100.0, 0.0), node(0.0, 500.0)]);
        let d = index.nearest_distance(Point::new(90.0, 0.0));
        assert!((d - 10.0).abs() < 1e-9);
    }

    #[test]
    fn distance_is_euclidean() {
        let index = SecurityIndex::build(&[node(3.0, 4.0)]);
        let d = index.nearest_distance(Point::new(0.0, 0.0));
        assert!((d - 5.0).abs() < 1e-9);
    }
}
