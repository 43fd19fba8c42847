//! Obstacle union and study-area construction.

use geo::{Coord, MultiPolygon, Polygon, Rect, unary_union};

/// Unions all building footprints into one obstacle geometry.
///
/// An empty input yields an empty [`MultiPolygon`]; downstream stages
/// treat that as "no obstacles" rather than an error.
#[must_use]
pub fn obstacle_union(buildings: &[Polygon<f64>]) -> MultiPolygon<f64> {
    if buildings.is_empty() {
        return MultiPolygon::new(Vec::new());
    }
    let union = unary_union(buildings.iter());
    log::debug!(
        "Built obstacle union from {} footprints ({} parts)",
        buildings.len(),
        union.0.len()
    );
    union
}

/// Builds the square study-area polygon, `radius_m` meters in every
/// direction around the local origin (the analysis target).
#[must_use]
pub fn study_area(radius_m: f64) -> Polygon<f64> {
    Rect::new(
        Coord {
            x: -radius_m,
            y: -radius_m,
        },
        Coord {
            x: radius_m,
            y: radius_m,
        },
    )
    .to_polygon()
}
