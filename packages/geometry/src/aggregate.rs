//! Candidate aggregation.
//!
//! Merges the alley, vegetation, and building candidate sets into one
//! homogeneous collection. Attributes not applicable to a type stay
//! explicitly `None`; `area` and `type` set here are never re-derived by
//! later stages.

use geo::{Area, MultiPolygon, Polygon};
use skysweep_models::{BuildingFeature, Candidate, SiteType, VegetationFeature};

/// Lower area bound (m², exclusive) for an admissible building rooftop.
/// Excludes sheds.
pub const BUILDING_MIN_AREA_M2: f64 = 50.0;

/// Upper area bound (m², exclusive) for an admissible building rooftop.
/// Excludes super-block complexes.
pub const BUILDING_MAX_AREA_M2: f64 = 5000.0;

/// Default storey count when the levels tag is absent or non-numeric.
pub const DEFAULT_BUILDING_LEVELS: u32 = 2;

/// Wraps extracted alley polygons as candidates.
#[must_use]
pub fn alley_candidates(alleys: Vec<Polygon<f64>>) -> Vec<Candidate> {
    alleys
        .into_iter()
        .map(|polygon| {
            let area = polygon.unsigned_area();
            Candidate::new(MultiPolygon::new(vec![polygon]), area, SiteType::Alley)
        })
        .collect()
}

/// Builds vegetation candidates from raw open-land features.
///
/// Drops records whose building tag is present and not `"no"` — those
/// are building polygons leaked into the open-land source query.
/// Vegetation areas are unconstrained.
#[must_use]
pub fn vegetation_candidates(features: Vec<VegetationFeature>) -> Vec<Candidate> {
    features
        .into_iter()
        .filter(|f| f.building_tag.as_deref().is_none_or(|tag| tag == "no"))
        .map(|f| {
            let area = f.geometry.unsigned_area();
            let mut candidate = Candidate::new(f.geometry, area, SiteType::Vegetation);
            candidate.natural_tag = f.natural_tag;
            candidate.landuse_tag = f.landuse_tag;
            candidate
        })
        .collect()
}

/// Builds building-rooftop candidates from raw footprints.
///
/// Keeps only footprints with area strictly inside
/// ([`BUILDING_MIN_AREA_M2`], [`BUILDING_MAX_AREA_M2`]).
#[must_use]
pub fn building_candidates(features: Vec<BuildingFeature>) -> Vec<Candidate> {
    features
        .into_iter()
        .filter_map(|f| {
            let area = f.geometry.unsigned_area();
            if area <= BUILDING_MIN_AREA_M2 || area >= BUILDING_MAX_AREA_M2 {
                return None;
            }
            let mut candidate = Candidate::new(
                MultiPolygon::new(vec![f.geometry]),
                area,
                SiteType::Building,
            );
            candidate.levels = Some(parse_levels(f.levels_tag.as_deref()));
            candidate.building_tag = f.building_tag;
            candidate.amenity_tag = f.amenity_tag;
            candidate.office_type = f.office_type;
            Some(candidate)
        })
        .collect()
}

/// Concatenates the three candidate sets, in alley/vegetation/building
/// order. Output count is exactly the sum of the filtered input counts.
#[must_use]
pub fn aggregate(
    alleys: Vec<Candidate>,
    vegetation: Vec<Candidate>,
    buildings: Vec<Candidate>,
) -> Vec<Candidate> {
    log::info!(
        "Aggregated {} candidates ({} alleys, {} vegetation, {} buildings)",
        alleys.len() + vegetation.len() + buildings.len(),
        alleys.len(),
        vegetation.len(),
        buildings.len()
    );

    let mut merged = alleys;
    merged.extend(vegetation);
    merged.extend(buildings);
    merged
}

/// Parses a storey count from a possibly semicolon-delimited numeric tag
/// (e.g. `"3"`, `"2;3"`). The first numeric token wins; absent or
/// non-numeric tags default to [`DEFAULT_BUILDING_LEVELS`]. Always >= 1.
#[must_use]
pub fn parse_levels(tag: Option<&str>) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    tag.and_then(|raw| {
        raw.split(';')
            .filter_map(|token| token.trim().parse::<f64>().ok())
            .map(|v| (v as u32).max(1))
            .next()
    })
    .unwrap_or(DEFAULT_BUILDING_LEVELS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;

    fn square(side: f64) -> Polygon<f64> {
        polygon![
            (x: 0.0, y: 0.0),
            (x: side, y: 0.0),
            (x: side, y: side),
            (x: 0.0, y: side),
        ]
    }

    fn vegetation(building_tag: Option<&str>) -> VegetationFeature {
        VegetationFeature {
            geometry: MultiPolygon::new(vec![square(30.0)]),
            building_tag: building_tag.map(String::from),
            natural_tag: Some("scrub".to_string()),
            landuse_tag: None,
        }
    }

    fn building(side: f64, levels_tag: Option<&str>) -> BuildingFeature {
        BuildingFeature {
            geometry: square(side),
            building_tag: Some("apartments".to_string()),
            amenity_tag: None,
            office_type: None,
            levels_tag: levels_tag.map(String::from),
        }
    }

    #[test]
    fn leaked_building_polygons_are_dropped_from_vegetation() {
        let kept = vegetation_candidates(vec![
            vegetation(None),
            vegetation(Some("no")),
            vegetation(Some("yes")),
            vegetation(Some("apartments")),
        ]);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|c| c.site_type == SiteType::Vegetation));
        assert_eq!(kept[0].natural_tag.as_deref(), Some("scrub"));
    }

    #[test]
    fn building_area_bounds_are_exclusive() {
        // 49 m², 100 m², 5041 m².
        let kept = building_candidates(vec![
            building(7.0, None),
            building(10.0, None),
            building(71.0, None),
        ]);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].area - 100.0).abs() < 1e-9);
        assert_eq!(kept[0].levels, Some(2));
    }

    #[test]
    fn parses_semicolon_delimited_levels() {
        assert_eq!(parse_levels(Some("3")), 3);
        assert_eq!(parse_levels(Some("2;4")), 2);
        assert_eq!(parse_levels(Some(" 5 ; 2 ")), 5);
        assert_eq!(parse_levels(Some("tall")), DEFAULT_BUILDING_LEVELS);
        assert_eq!(parse_levels(None), DEFAULT_BUILDING_LEVELS);
        // Storeys are always at least 1.
        assert_eq!(parse_levels(Some("0")), 1);
    }

    #[test]
    fn aggregate_preserves_count_and_order() {
        let alleys = alley_candidates(vec![square(10.0)]);
        let vegetation = vegetation_candidates(vec![vegetation(None)]);
        let buildings = building_candidates(vec![building(10.0, Some("4"))]);

        let merged = aggregate(alleys, vegetation, buildings);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].site_type, SiteType::Alley);
        assert_eq!(merged[1].site_type, SiteType::Vegetation);
        assert_eq!(merged[2].site_type, SiteType::Building);

        // Non-applicable attributes stay explicitly unset.
        assert!(merged[0].levels.is_none());
        assert!(merged[1].building_tag.is_none());
        assert!(merged[2].natural_tag.is_none());
    }
}
