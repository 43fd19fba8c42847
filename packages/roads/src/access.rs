//! Road accessibility and line-of-sight analysis.

use geo::{Distance, Euclidean, Intersects, Line, MultiPolygon, Point};

use crate::{RoadError, RoadNetwork};

/// Road accessibility measurements for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadAccess {
    /// Euclidean distance (m) from the candidate centroid to the nearest
    /// road node.
    pub dist_to_road: f64,
    /// Classification tag of the nearest road.
    pub nearest_road_type: String,
    /// Whether the sight line to the nearest road node crosses the
    /// building-obstacle union (blocked line of sight means the site is
    /// concealed from the road).
    pub is_hidden: bool,
}

/// Assesses one candidate centroid against the road network.
///
/// # Errors
///
/// Returns [`RoadError::EmptyNetwork`] if the network has no nodes.
pub fn assess(
    centroid: Point<f64>,
    network: &RoadNetwork,
    obstacles: &MultiPolygon<f64>,
) -> Result<RoadAccess, RoadError> {
    let node = network.nearest_node(centroid)?;
    let node_position = network.node_position(node);

    let sight_line = Line::new(centroid.0, node_position.0);

    Ok(RoadAccess {
        dist_to_road: Euclidean.distance(centroid, node_position),
        nearest_road_type: network.road_class(node),
        is_hidden: sight_line.intersects(obstacles),
    })
}
