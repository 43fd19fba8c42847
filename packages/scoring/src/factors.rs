//! Ordinal factor classifiers for the composite model.
//!
//! Each factor maps a candidate attribute to an ordinal class in 1..=5
//! (0 for "not applicable", which zeroes the factor's contribution).
//! Malformed or unrecognized tag values fall back to the stated default
//! class for the factor; classification never fails.

use skysweep_models::SiteType;

/// Elevation difference (m) above which high ground is advantageous.
pub const HIGH_GROUND_THRESHOLD_M: f64 = 10.0;

/// Distance-to-target class: closer is worse.
#[must_use]
pub fn distance_class(dist_to_center: f64) -> u8 {
    if dist_to_center < 500.0 {
        5
    } else if dist_to_center < 1000.0 {
        4
    } else if dist_to_center < 2000.0 {
        3
    } else if dist_to_center < 5000.0 {
        2
    } else {
        1
    }
}

/// Building-classification class. Non-Building sites score 0 here; their
/// land cover is handled by the LULC factor instead.
#[must_use]
pub fn building_class(site_type: SiteType, building_tag: Option<&str>) -> u8 {
    if site_type != SiteType::Building {
        return 0;
    }
    match building_tag {
        Some(
            "residential" | "apartments" | "house" | "detached" | "semidetached_house"
            | "terrace" | "dormitory" | "bungalow",
        ) => 5,
        Some(
            "government" | "public" | "civic" | "industrial" | "warehouse" | "school"
            | "university" | "hospital",
        ) => 3,
        // Commercial-like and anything unclassified.
        _ => 2,
    }
}

/// Road-infrastructure class from the nearest road's classification tag.
#[must_use]
pub fn road_infra_class(nearest_road_type: &str) -> u8 {
    match nearest_road_type {
        "unpaved" | "track" | "path" | "service" => 5,
        "residential" | "tertiary" => 4,
        "trunk" | "motorway_link" => 2,
        "motorway" => 1,
        // "secondary" | "primary" and unknown classifications.
        _ => 3,
    }
}

/// Land-use/land-cover class. Alleys are always class 5.
#[must_use]
pub fn lulc_class(
    site_type: SiteType,
    natural_tag: Option<&str>,
    landuse_tag: Option<&str>,
) -> u8 {
    if site_type == SiteType::Alley {
        return 5;
    }
    match (natural_tag, landuse_tag) {
        (Some("scrub" | "bare_rock" | "sand" | "heath" | "scree"), _)
        | (_, Some("brownfield" | "greenfield" | "construction" | "landfill")) => 5,
        (Some("grassland"), _)
        | (_, Some("meadow" | "grass" | "village_green" | "recreation_ground")) => 3,
        (_, Some("farmland" | "farmyard" | "orchard" | "vineyard")) => 2,
        _ => 3,
    }
}

/// Visual line-of-sight class: concealment from the road is the threat.
#[must_use]
pub const fn vlos_class(is_hidden: bool) -> u8 {
    if is_hidden { 5 } else { 1 }
}

/// Terrain-feature class from the natural-cover tag.
#[must_use]
pub fn terrain_class(natural_tag: Option<&str>) -> u8 {
    match natural_tag {
        Some("peak" | "cliff" | "ridge" | "rock" | "bare_rock") => 5,
        Some("water" | "wetland") => 4,
        _ => 2,
    }
}

/// Elevation-advantage class from the candidate/target elevation delta.
#[must_use]
pub fn elevation_class(elevation_z: f64, target_elevation: f64) -> u8 {
    let delta = elevation_z - target_elevation;
    if delta > HIGH_GROUND_THRESHOLD_M {
        5
    } else if delta < -HIGH_GROUND_THRESHOLD_M {
        2
    } else {
        3
    }
}
