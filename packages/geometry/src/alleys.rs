//! Morphological alley extraction.
//!
//! Alleys are connected components of open space too narrow to survive a
//! morphological opening: the open space is eroded inward, then dilated
//! back outward by a slightly larger radius so that wide regions are
//! reconstructed fully up to the obstacle edges while narrow corridors
//! are not reconstructed at all. The residue of the opening is the alley
//! candidate set.

use geo::{Area, BooleanOps, Buffer, Intersects, MultiPolygon, Polygon};

/// Inward buffer radius (m) for the erosion step. Open-space features
/// narrower than roughly twice this radius vanish.
pub const EROSION_RADIUS_M: f64 = 2.0;

/// Outward buffer radius (m) for the dilation step. Slightly larger than
/// the erosion radius so reconstructed wide regions reach the obstacle
/// edges again and leave no zero-width residue along walls.
pub const DILATION_RADIUS_M: f64 = 2.1;

/// Lower area bound (m², exclusive) for an admissible alley.
pub const ALLEY_MIN_AREA_M2: f64 = 25.0;

/// Upper area bound (m², exclusive) for an admissible alley.
pub const ALLEY_MAX_AREA_M2: f64 = 2000.0;

/// Buffer radius (m) around the obstacle union used to detect
/// floating-point boundary slivers hugging building edges.
pub const SLIVER_BUFFER_M: f64 = 1.0;

/// Extracts alley polygons from the study area.
///
/// Deterministic for identical inputs: the opening operation and both
/// filters are pure geometry with no randomness. Zero obstacles is not
/// an error; the opening then finds no narrow residue and the result is
/// empty.
#[must_use]
pub fn extract_alleys(
    study_area: &Polygon<f64>,
    obstacles: &MultiPolygon<f64>,
) -> Vec<Polygon<f64>> {
    let residue = opening_residue(study_area, obstacles);
    log::debug!("Opening produced {} raw alley parts", residue.0.len());

    let kept = filter_alleys(residue.0, obstacles);
    log::info!("Extracted {} alleys after filtering", kept.len());
    kept
}

/// Computes the residue of the morphological opening: open space minus
/// its erosion-then-dilation reconstruction.
///
/// The output is polygonal by construction; degenerate line/point
/// residue cannot survive the boolean difference.
#[must_use]
pub fn opening_residue(
    study_area: &Polygon<f64>,
    obstacles: &MultiPolygon<f64>,
) -> MultiPolygon<f64> {
    let study = MultiPolygon::new(vec![study_area.clone()]);
    let open = study.difference(obstacles);

    let eroded = open.buffer(-EROSION_RADIUS_M);
    let reconstructed = eroded.buffer(DILATION_RADIUS_M);

    open.difference(&reconstructed)
}

/// Applies the admission filters to raw alley parts.
///
/// Keeps parts with area strictly inside
/// ([`ALLEY_MIN_AREA_M2`], [`ALLEY_MAX_AREA_M2`]) that do not intersect
/// a [`SLIVER_BUFFER_M`] buffer of the obstacle union.
#[must_use]
pub fn filter_alleys(
    parts: Vec<Polygon<f64>>,
    obstacles: &MultiPolygon<f64>,
) -> Vec<Polygon<f64>> {
    let sliver_guard = obstacles.buffer(SLIVER_BUFFER_M);

    parts
        .into_iter()
        .filter(|part| {
            let area = part.unsigned_area();
            area > ALLEY_MIN_AREA_M2 && area < ALLEY_MAX_AREA_M2
        })
        .filter(|part| !part.intersects(&sliver_guard))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::study::{obstacle_union, study_area};
    use geo::polygon;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x1, y: y0),
            (x: x1, y: y1),
            (x: x0, y: y1),
        ]
    }

    #[test]
    fn zero_buildings_yields_empty_result() {
        let study = study_area(500.0);
        let obstacles = MultiPolygon::new(Vec::new());
        assert!(extract_alleys(&study, &obstacles).is_empty());
    }

    #[test]
    fn narrow_corridor_survives_opening_wide_gap_does_not() {
        let study = study_area(200.0);

        // Two buildings 3.8 m apart: narrower than twice the erosion
        // radius, so the corridor must appear in the opening residue.
        let narrow = obstacle_union(&[rect(-50.0, -50.0, -1.9, 50.0), rect(1.9, -50.0, 50.0, 50.0)]);
        let residue = opening_residue(&study, &narrow);
        assert!(!residue.0.is_empty());

        // 10 m apart: wide enough to be fully reconstructed.
        let wide = obstacle_union(&[rect(-50.0, -50.0, -5.0, 50.0), rect(5.0, -50.0, 50.0, 50.0)]);
        let residue = opening_residue(&study, &wide);
        let total: f64 = residue.0.iter().map(geo::Area::unsigned_area).sum();
        // Numeric noise may leave microscopic shards; nothing of real extent.
        assert!(total < 1.0, "unexpected residue area {total}");
    }

    #[test]
    fn area_filter_bounds_are_exclusive() {
        let no_obstacles = MultiPolygon::new(Vec::new());

        // 24.9 m² — below the lower bound.
        let too_small = rect(0.0, 0.0, 4.98, 5.0);
        // 25.1 m² — inside the admission range.
        let admissible = rect(0.0, 0.0, 5.02, 5.0);
        // 2000.0 m² — exactly the upper bound, excluded.
        let too_large = rect(0.0, 0.0, 40.0, 50.0);

        let kept = filter_alleys(vec![too_small, admissible.clone(), too_large], &no_obstacles);
        assert_eq!(kept, vec![admissible]);
    }

    #[test]
    fn sliver_filter_discards_parts_near_obstacles() {
        let obstacles = obstacle_union(&[rect(0.0, 0.0, 10.0, 10.0)]);

        // Hugs the building edge: inside the 1 m guard.
        let sliver = rect(10.0, 0.0, 10.5, 60.0);
        // Clear of the guard.
        let detached = rect(20.0, 0.0, 26.0, 6.0);

        let kept = filter_alleys(vec![sliver, detached.clone()], &obstacles);
        assert_eq!(kept, vec![detached]);
    }

    #[test]
    fn extraction_is_deterministic() {
        let study = study_area(200.0);
        let obstacles =
            obstacle_union(&[rect(-60.0, -40.0, -1.8, 40.0), rect(1.8, -40.0, 60.0, 40.0)]);
        let first = extract_alleys(&study, &obstacles);
        let second = extract_alleys(&study, &obstacles);
        assert_eq!(first, second);
    }
}
