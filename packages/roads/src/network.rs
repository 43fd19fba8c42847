//! Road network graph with a nearest-node spatial index.

use std::collections::HashMap;

use geo::Point;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::RoadError;

/// Road classification assigned to a node with no incident edges.
pub const DEFAULT_ROAD_CLASS: &str = "residential";

/// Coordinate quantization (units per meter) used to merge segment
/// endpoints into shared graph nodes. One millimeter resolution.
const NODE_SNAP_PER_M: f64 = 1000.0;

/// A directed road segment in the local metric CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    /// Segment start.
    pub start: Point<f64>,
    /// Segment end.
    pub end: Point<f64>,
    /// Road classification tag (e.g. "residential", "primary").
    pub highway: String,
}

type NodeRtreeItem = GeomWithData<[f64; 2], usize>;

/// A road network: directed graph of nodes and classified edges, plus an
/// R-tree over node coordinates.
///
/// Read-only after construction.
pub struct RoadNetwork {
    graph: DiGraph<Point<f64>, String>,
    index: RTree<NodeRtreeItem>,
}

impl RoadNetwork {
    /// Builds a network from directed segments, merging endpoints that
    /// coincide to millimeter precision into shared nodes.
    #[must_use]
    pub fn from_segments(segments: &[RoadSegment]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_ids: HashMap<(i64, i64), NodeIndex> = HashMap::new();

        let mut node_for = |graph: &mut DiGraph<Point<f64>, String>, p: Point<f64>| {
            #[allow(clippy::cast_possible_truncation)]
            let key = (
                (p.x() * NODE_SNAP_PER_M).round() as i64,
                (p.y() * NODE_SNAP_PER_M).round() as i64,
            );
            *node_ids.entry(key).or_insert_with(|| graph.add_node(p))
        };

        for segment in segments {
            let a = node_for(&mut graph, segment.start);
            let b = node_for(&mut graph, segment.end);
            graph.add_edge(a, b, segment.highway.clone());
        }

        let items: Vec<NodeRtreeItem> = graph
            .node_indices()
            .map(|idx| {
                let p = graph[idx];
                GeomWithData::new([p.x(), p.y()], idx.index())
            })
            .collect();

        log::info!(
            "Built road network: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Self {
            graph,
            index: RTree::bulk_load(items),
        }
    }

    /// Number of nodes in the network.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Whether the network has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Finds the node nearest to a point.
    ///
    /// # Errors
    ///
    /// Returns [`RoadError::EmptyNetwork`] if the network has no nodes.
    pub fn nearest_node(&self, point: Point<f64>) -> Result<NodeIndex, RoadError> {
        self.index
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|item| NodeIndex::new(item.data))
            .ok_or(RoadError::EmptyNetwork)
    }

    /// Coordinates of a node.
    #[must_use]
    pub fn node_position(&self, node: NodeIndex) -> Point<f64> {
        self.graph[node]
    }

    /// Road classification at a node: the first outgoing edge's tag,
    /// falling back to the first incoming edge's tag, then to
    /// [`DEFAULT_ROAD_CLASS`] for an isolated node.
    #[must_use]
    pub fn road_class(&self, node: NodeIndex) -> String {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| e.weight().clone())
            .next()
            .or_else(|| {
                self.graph
                    .edges_directed(node, Direction::Incoming)
                    .map(|e| e.weight().clone())
                    .next()
            })
            .unwrap_or_else(|| DEFAULT_ROAD_CLASS.to_string())
    }
}
