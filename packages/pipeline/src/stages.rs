//! Pipeline stage records and per-stage transforms.
//!
//! Each stage takes ownership of the previous stage's collection and
//! produces a new collection carrying the extra fields it derived. The
//! per-candidate work inside a stage is independent, so stages run over
//! rayon's parallel iterators; the spatial indexes they query are
//! read-only.

use geo::{Centroid, Distance, Euclidean, MultiPolygon, Point};
use rayon::prelude::*;
use skysweep_geometry::LocalProjection;
use skysweep_models::{Candidate, DRONE_SPEED_MPS, ScoredCandidate, SiteMetrics};
use skysweep_roads::{RoadAccess, RoadError, RoadNetwork, access};
use skysweep_scoring::ScoringModel;
use skysweep_security::SecurityIndex;
use skysweep_server_models::AnalysisRequest;

/// A candidate with its centroid resolved.
pub(crate) struct Sited {
    pub candidate: Candidate,
    pub centroid: Point<f64>,
}

/// A candidate with road accessibility assessed.
pub(crate) struct Accessed {
    pub candidate: Candidate,
    pub centroid: Point<f64>,
    pub access: RoadAccess,
}

/// A candidate with security proximity assessed.
pub(crate) struct Guarded {
    pub candidate: Candidate,
    pub centroid: Point<f64>,
    pub access: RoadAccess,
    pub nearest_security_dist: f64,
}

/// A candidate with target distance and flight time derived.
pub(crate) struct Positioned {
    pub candidate: Candidate,
    pub centroid: Point<f64>,
    pub access: RoadAccess,
    pub nearest_security_dist: f64,
    pub dist_to_center: f64,
    pub est_flight_time: f64,
}

/// Resolves candidate centroids. Degenerate geometry without a centroid
/// cannot be analyzed and is dropped with a warning.
pub(crate) fn locate(candidates: Vec<Candidate>) -> Vec<Sited> {
    candidates
        .into_iter()
        .filter_map(|candidate| match candidate.geometry.centroid() {
            Some(centroid) => Some(Sited {
                candidate,
                centroid,
            }),
            None => {
                log::warn!(
                    "Dropping degenerate {} candidate without a centroid",
                    candidate.site_type
                );
                None
            }
        })
        .collect()
}

/// Road accessibility and line-of-sight stage.
pub(crate) fn assess_roads(
    sites: Vec<Sited>,
    network: &RoadNetwork,
    obstacles: &MultiPolygon<f64>,
) -> Result<Vec<Accessed>, RoadError> {
    sites
        .into_par_iter()
        .map(|site| {
            let road_access = access::assess(site.centroid, network, obstacles)?;
            Ok(Accessed {
                candidate: site.candidate,
                centroid: site.centroid,
                access: road_access,
            })
        })
        .collect()
}

/// Security proximity stage.
pub(crate) fn assess_security(
    accessed: Vec<Accessed>,
    index: &SecurityIndex,
) -> Vec<Guarded> {
    accessed
        .into_par_iter()
        .map(|a| {
            let nearest_security_dist = index.nearest_distance(a.centroid);
            Guarded {
                candidate: a.candidate,
                centroid: a.centroid,
                access: a.access,
                nearest_security_dist,
            }
        })
        .collect()
}

/// Target-distance stage. The target sits at the local origin.
pub(crate) fn position(guarded: Vec<Guarded>) -> Vec<Positioned> {
    let origin = Point::new(0.0, 0.0);
    guarded
        .into_par_iter()
        .map(|g| {
            let dist_to_center = Euclidean.distance(g.centroid, origin);
            Positioned {
                candidate: g.candidate,
                centroid: g.centroid,
                access: g.access,
                nearest_security_dist: g.nearest_security_dist,
                dist_to_center,
                est_flight_time: dist_to_center / DRONE_SPEED_MPS,
            }
        })
        .collect()
}

/// Builds the elevation lookup list: the target first, then one entry
/// per candidate centroid, reprojected back to geographic (lat, lon).
pub(crate) fn elevation_coords(
    request: &AnalysisRequest,
    positioned: &[Positioned],
    projection: &LocalProjection,
) -> Vec<(f64, f64)> {
    std::iter::once((request.lat, request.lon))
        .chain(positioned.iter().map(|p| {
            let geographic = projection.point_to_geographic(p.centroid);
            (geographic.y(), geographic.x())
        }))
        .collect()
}

/// Scoring stage. `elevations` is aligned 1:1 with `positioned`.
pub(crate) fn score(
    positioned: Vec<Positioned>,
    elevations: &[f64],
    target_elevation: f64,
    model: ScoringModel,
) -> Vec<ScoredCandidate> {
    positioned
        .into_par_iter()
        .zip(elevations.par_iter())
        .map(|(p, &elevation_z)| {
            let metrics = SiteMetrics {
                dist_to_road: p.access.dist_to_road,
                is_hidden: p.access.is_hidden,
                nearest_security_dist: p.nearest_security_dist,
                dist_to_center: p.dist_to_center,
                est_flight_time: p.est_flight_time,
                elevation_z,
            };
            let threat_score = model.score(
                &p.candidate,
                &metrics,
                &p.access.nearest_road_type,
                target_elevation,
            );
            ScoredCandidate {
                candidate: p.candidate,
                metrics,
                nearest_road_type: p.access.nearest_road_type,
                threat_score,
            }
        })
        .collect()
}
