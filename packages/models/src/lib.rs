#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Shared data model for launch-site threat analysis.
//!
//! This crate defines the canonical candidate-site record and its
//! supporting types. Candidates are created once per analysis request
//! during aggregation, enriched stage by stage through the pipeline, and
//! discarded after the response is emitted. No persistence, no
//! cross-request state.

use geo::{MultiPolygon, Point, Polygon};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel distance (meters) meaning "no known security presence".
///
/// Deliberately larger than every security-distance threshold used by the
/// scoring models, so it never triggers a proximity penalty.
pub const NO_SECURITY_SENTINEL_M: f64 = 9999.0;

/// Assumed drone cruise speed (m/s) for flight-time estimates.
pub const DRONE_SPEED_MPS: f64 = 15.0;

/// Kind of concealment/launch candidate site.
///
/// Fixed at creation time and never changes afterwards.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum SiteType {
    /// Narrow corridor of open space between buildings, isolated by
    /// morphological opening.
    Alley,
    /// Vegetation or open-land polygon (parks, scrub, farmland, ...).
    Vegetation,
    /// Building rooftop.
    Building,
}

/// A candidate launch site at creation time.
///
/// Geometry is in whichever CRS the pipeline is currently working in:
/// the local metric CRS during analysis, geographic lon/lat at output.
/// Attributes not applicable to the site type are explicitly `None` so
/// downstream stages can treat the collection as homogeneous.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Site polygon(s).
    pub geometry: MultiPolygon<f64>,
    /// Footprint area in square meters, computed in the metric CRS.
    pub area: f64,
    /// Site kind, fixed at creation.
    pub site_type: SiteType,
    /// Building storeys (Building only, >= 1).
    pub levels: Option<u32>,
    /// Raw building classification tag (Building only).
    pub building_tag: Option<String>,
    /// Raw amenity tag (Building only).
    pub amenity_tag: Option<String>,
    /// Raw office tag (Building only).
    pub office_type: Option<String>,
    /// Raw natural-cover tag (Vegetation only).
    pub natural_tag: Option<String>,
    /// Raw land-use tag (Vegetation only).
    pub landuse_tag: Option<String>,
}

impl Candidate {
    /// Creates a bare candidate with all type-conditional attributes unset.
    #[must_use]
    pub const fn new(geometry: MultiPolygon<f64>, area: f64, site_type: SiteType) -> Self {
        Self {
            geometry,
            area,
            site_type,
            levels: None,
            building_tag: None,
            amenity_tag: None,
            office_type: None,
            natural_tag: None,
            landuse_tag: None,
        }
    }
}

/// Derived per-candidate measurements, populated by the pipeline stages
/// in strict order and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteMetrics {
    /// Euclidean distance (m) from the site centroid to the nearest road
    /// network node.
    pub dist_to_road: f64,
    /// Whether the sight line from the site to the nearest road node is
    /// blocked by the building-obstacle union.
    pub is_hidden: bool,
    /// Distance (m) to the nearest security/guardian location, or
    /// [`NO_SECURITY_SENTINEL_M`] when no security data exists.
    pub nearest_security_dist: f64,
    /// Distance (m) from the site centroid to the target point.
    pub dist_to_center: f64,
    /// Estimated flight time (s) at [`DRONE_SPEED_MPS`].
    pub est_flight_time: f64,
    /// Ground elevation (m) at the site centroid, 0.0 on unrecoverable
    /// lookup failure.
    pub elevation_z: f64,
}

/// Road classification of the node nearest to a candidate.
///
/// Kept as the raw tag string; the scoring tables match on well-known
/// values and default everything else to a neutral class.
pub type RoadClass = String;

/// A fully scored candidate as emitted by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    /// The candidate record created during aggregation.
    pub candidate: Candidate,
    /// Derived measurements from the analysis stages.
    pub metrics: SiteMetrics,
    /// Classification tag of the nearest road.
    pub nearest_road_type: RoadClass,
    /// Composite threat score in [0, 100].
    pub threat_score: f64,
}

/// A security/guardian location reduced to a point.
///
/// Read-only reference data, never mutated by the pipeline. Polygonal
/// source features are reduced to their centroid before construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SecurityNode {
    /// Location in the active CRS.
    pub position: Point<f64>,
    /// Source category tag (e.g. "police", "barracks"), if known.
    pub category: Option<String>,
}

/// Threat banding used by the aggregate statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThreatLevel {
    /// Score above 80.
    Critical,
    /// Score above 50, up to 80.
    High,
    /// Score of 50 or below.
    Medium,
}

impl ThreatLevel {
    /// Bands a threat score into a level.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            Self::Critical
        } else if score > 50.0 {
            Self::High
        } else {
            Self::Medium
        }
    }
}

/// A raw building footprint as handed to the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingFeature {
    /// Footprint polygon in the active CRS.
    pub geometry: Polygon<f64>,
    /// Raw building classification tag.
    pub building_tag: Option<String>,
    /// Raw amenity tag.
    pub amenity_tag: Option<String>,
    /// Raw office tag.
    pub office_type: Option<String>,
    /// Raw storeys tag, possibly semicolon-delimited (e.g. "2;3").
    pub levels_tag: Option<String>,
}

/// A raw vegetation/open-land feature as handed to the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct VegetationFeature {
    /// Feature geometry in the active CRS. Non-polygonal source
    /// geometries are dropped before construction.
    pub geometry: MultiPolygon<f64>,
    /// Building tag leaked from the source query, if any. A present
    /// value other than "no" marks the record as a building polygon
    /// that must be excluded from the vegetation set.
    pub building_tag: Option<String>,
    /// Raw natural-cover tag.
    pub natural_tag: Option<String>,
    /// Raw land-use tag.
    pub landuse_tag: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threat_level_banding() {
        assert_eq!(ThreatLevel::from_score(90.0), ThreatLevel::Critical);
        assert_eq!(ThreatLevel::from_score(80.0), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_score(50.1), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_score(50.0), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_score(0.0), ThreatLevel::Medium);
    }

    #[test]
    fn site_type_round_trips_through_strings() {
        assert_eq!(SiteType::Alley.to_string(), "Alley");
        assert_eq!("Building".parse::<SiteType>().unwrap(), SiteType::Building);
        assert!("Rooftop".parse::<SiteType>().is_err());
    }

    #[test]
    fn sentinel_exceeds_all_security_thresholds() {
        // 150 m and 300 m are the scoring thresholds; the sentinel must
        // stay clear of both.
        assert!(NO_SECURITY_SENTINEL_M > 300.0);
    }
}
