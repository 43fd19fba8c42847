#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the launch-site analysis service.
//!
//! These types are the boundary data contract: they are serialized to
//! JSON for whichever transport carries them and are kept separate from
//! the pipeline's internal records so the contract can evolve
//! independently.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum admissible analysis radius (m).
pub const MIN_RADIUS_M: f64 = 100.0;

/// Maximum admissible analysis radius (m).
pub const MAX_RADIUS_M: f64 = 5000.0;

/// An analysis request: target point and search radius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Target latitude (WGS84 degrees).
    pub lat: f64,
    /// Target longitude (WGS84 degrees).
    pub lon: f64,
    /// Search radius in meters, from [`MIN_RADIUS_M`] to [`MAX_RADIUS_M`]
    /// inclusive.
    pub radius_meters: f64,
}

impl AnalysisRequest {
    /// Validates the request fields.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidRequestError`] if the radius is outside the
    /// admissible range or the coordinates are not finite geographic
    /// values.
    pub fn validate(&self) -> Result<(), InvalidRequestError> {
        if !(MIN_RADIUS_M..=MAX_RADIUS_M).contains(&self.radius_meters) {
            return Err(InvalidRequestError::RadiusOutOfRange {
                radius_meters: self.radius_meters,
            });
        }
        if !self.lat.is_finite() || self.lat.abs() > 90.0 {
            return Err(InvalidRequestError::BadCoordinate {
                field: "lat",
                value: self.lat,
            });
        }
        if !self.lon.is_finite() || self.lon.abs() > 180.0 {
            return Err(InvalidRequestError::BadCoordinate {
                field: "lon",
                value: self.lon,
            });
        }
        Ok(())
    }
}

/// Validation errors for [`AnalysisRequest`].
#[derive(Debug, Error)]
pub enum InvalidRequestError {
    /// Radius outside the admissible range.
    #[error("radius {radius_meters} m outside [{MIN_RADIUS_M}, {MAX_RADIUS_M}]")]
    RadiusOutOfRange {
        /// The rejected radius.
        radius_meters: f64,
    },

    /// Latitude or longitude not a finite geographic value.
    #[error("invalid {field}: {value}")]
    BadCoordinate {
        /// Which coordinate field was rejected.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Aggregate statistics over all scored candidates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Total candidate count.
    pub total_candidates: usize,
    /// Candidates with threat score above 80.
    pub critical_count: usize,
    /// Candidates with threat score above 50, up to 80.
    pub high_count: usize,
    /// Candidates with threat score of 50 or below.
    pub medium_count: usize,
    /// Candidates concealed from the nearest road.
    pub hidden_count: usize,
    /// Candidates visible from the nearest road.
    pub exposed_count: usize,
    /// Alley candidates.
    pub alley_count: usize,
    /// Vegetation candidates.
    pub vegetation_count: usize,
    /// Building-rooftop candidates.
    pub building_count: usize,
    /// Mean threat score, 0.0 when there are no candidates.
    pub mean_threat_score: f64,
    /// Maximum threat score, 0.0 when there are no candidates.
    pub max_threat_score: f64,
    /// Mean estimated flight time (s), 0.0 when there are no candidates.
    pub mean_flight_time: f64,
    /// Minimum estimated flight time (s), 0.0 when there are no candidates.
    pub min_flight_time: f64,
    /// Candidates within 150 m of a security location.
    pub near_security_count: usize,
    /// Candidates within 300 m of a security location.
    pub security_monitored_count: usize,
}

/// An analysis response: status, statistics, and one GeoJSON feature per
/// scored candidate, geometry in geographic (longitude, latitude) order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    /// "success" for a completed analysis.
    pub status: String,
    /// Aggregate statistics.
    pub stats: AnalysisStats,
    /// Scored candidate features with the full attribute set in their
    /// properties.
    pub features: Vec<geojson::Feature>,
}
