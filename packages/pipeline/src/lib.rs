#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis pipeline orchestration.
//!
//! Each analysis request is an independent, stateless pipeline run:
//! project inputs into the local metric CRS, extract and aggregate
//! candidates, assess road accessibility and line of sight, index
//! security proximity, fetch elevations, score, and assemble the
//! response. Stages consume the previous stage's collection and produce
//! a new one with additional fields populated — candidates are never
//! mutated in place, so independent candidates can be processed in
//! parallel within a stage.
//!
//! All lower-level failures surface here as a single structured
//! [`PipelineError`]. The only designed partial degradation is the
//! elevation stage, which substitutes 0.0 per failed batch.

mod output;
mod stages;
mod stats;

use std::time::Instant;

use geo::Polygon;
use skysweep_elevation::{ElevationClient, ElevationError};
use skysweep_geometry::{LocalProjection, aggregate, alleys, study};
use skysweep_models::{BuildingFeature, SecurityNode, VegetationFeature};
use skysweep_roads::{RoadError, RoadNetwork, RoadSegment};
use skysweep_scoring::ScoringModel;
use skysweep_security::SecurityIndex;
use skysweep_server_models::{AnalysisRequest, AnalysisResponse, InvalidRequestError};
use thiserror::Error;

/// Errors that abort an analysis request.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request parameters were rejected.
    #[error("Invalid request: {0}")]
    Request(#[from] InvalidRequestError),

    /// The road layer is unusable. No partial analysis is meaningful
    /// without a road network.
    #[error("Road network error: {0}")]
    Roads(#[from] RoadError),

    /// The elevation client could not be constructed. Per-batch lookup
    /// failures degrade to 0.0 instead of surfacing here.
    #[error("Elevation client error: {0}")]
    Elevation(#[from] ElevationError),
}

/// Input layers for one analysis request, in geographic lon/lat.
///
/// Fetching these layers is the caller's concern; a missing layer is
/// fatal upstream of this crate.
#[derive(Debug, Clone, Default)]
pub struct AnalysisInput {
    /// Building footprints (obstacles and rooftop candidates).
    pub buildings: Vec<BuildingFeature>,
    /// Vegetation/open-land features.
    pub vegetation: Vec<VegetationFeature>,
    /// Security/guardian locations, polygons already reduced to
    /// centroids.
    pub security: Vec<SecurityNode>,
    /// Road segments with classification tags.
    pub road_segments: Vec<RoadSegment>,
}

/// Per-request analysis configuration. Immutable for the lifetime of a
/// run and freely shareable across concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfig {
    /// Scoring strategy.
    pub model: ScoringModel,
    /// Elevation service base URL. `None` skips the lookup and scores
    /// with the 0.0 fallback everywhere (same degradation as a fully
    /// failed fetch).
    pub elevation_base_url: Option<String>,
    /// Optional deadline honored at elevation-batch granularity.
    pub deadline: Option<Instant>,
}

/// Runs one full analysis.
///
/// # Errors
///
/// Returns [`PipelineError`] if the request is invalid, the road
/// network is empty, or the elevation client cannot be constructed.
pub async fn analyze(
    request: &AnalysisRequest,
    input: AnalysisInput,
    config: &AnalysisConfig,
) -> Result<AnalysisResponse, PipelineError> {
    request.validate()?;
    let projection = LocalProjection::new(request.lat, request.lon);

    log::info!(
        "Analyzing ({}, {}) radius {} m: {} buildings, {} vegetation, {} security, {} road segments",
        request.lat,
        request.lon,
        request.radius_meters,
        input.buildings.len(),
        input.vegetation.len(),
        input.security.len(),
        input.road_segments.len()
    );

    // Project every layer into the local metric CRS.
    let building_footprints: Vec<Polygon<f64>> = input
        .buildings
        .iter()
        .map(|b| projection.polygon_to_local(&b.geometry))
        .collect();
    let buildings_metric: Vec<BuildingFeature> = input
        .buildings
        .into_iter()
        .zip(building_footprints.iter().cloned())
        .map(|(mut feature, geometry)| {
            feature.geometry = geometry;
            feature
        })
        .collect();
    let vegetation_metric: Vec<VegetationFeature> = input
        .vegetation
        .into_iter()
        .map(|mut feature| {
            feature.geometry = projection.multi_polygon_to_local(&feature.geometry);
            feature
        })
        .collect();
    let security_metric: Vec<SecurityNode> = input
        .security
        .into_iter()
        .map(|mut node| {
            node.position = projection.point_to_local(node.position);
            node
        })
        .collect();
    let segments_metric: Vec<RoadSegment> = input
        .road_segments
        .into_iter()
        .map(|mut segment| {
            segment.start = projection.point_to_local(segment.start);
            segment.end = projection.point_to_local(segment.end);
            segment
        })
        .collect();

    let network = RoadNetwork::from_segments(&segments_metric);
    if network.is_empty() {
        return Err(RoadError::EmptyNetwork.into());
    }

    // Obstacle union and candidate extraction.
    let obstacles = study::obstacle_union(&building_footprints);
    let study_area = study::study_area(request.radius_meters);
    let alley_polygons = alleys::extract_alleys(&study_area, &obstacles);

    let candidates = aggregate::aggregate(
        aggregate::alley_candidates(alley_polygons),
        aggregate::vegetation_candidates(vegetation_metric),
        aggregate::building_candidates(buildings_metric),
    );

    // Stage order is fixed: road access, security proximity, target
    // distance, elevation, score.
    let sited = stages::locate(candidates);
    let accessed = stages::assess_roads(sited, &network, &obstacles)?;

    let security_index = SecurityIndex::build(&security_metric);
    let guarded = stages::assess_security(accessed, &security_index);
    let positioned = stages::position(guarded);

    let elevations = match &config.elevation_base_url {
        Some(base_url) => {
            let client = ElevationClient::new(base_url.clone())?;
            let coords = stages::elevation_coords(request, &positioned, &projection);
            client.lookup(&coords, config.deadline).await
        }
        None => {
            log::info!("No elevation service configured; using 0.0 for all points");
            vec![0.0; positioned.len() + 1]
        }
    };
    let target_elevation = elevations.first().copied().unwrap_or(0.0);

    let scored = stages::score(positioned, &elevations[1..], target_elevation, config.model);

    let stats = stats::compute(&scored);
    let features = scored
        .iter()
        .enumerate()
        .map(|(id, candidate)| output::to_feature(id, candidate, &projection))
        .collect();

    log::info!(
        "Analysis complete: {} candidates, mean score {:.1}, max {:.1}",
        stats.total_candidates,
        stats.mean_threat_score,
        stats.max_threat_score
    );

    Ok(AnalysisResponse {
        status: "success".to_string(),
        stats,
        features,
    })
}
