#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Threat scoring strategies.
//!
//! Two models coexist behind [`ScoringModel`]:
//!
//! - **Composite** (canonical): seven weighted ordinal factors, each
//!   rescaled to 0-100 and combined via [`CompositeWeights`], clamped
//!   to [0, 100].
//! - **Access/stealth** (reference variant): the earlier 60/40 heuristic
//!   with a multiplicative security-proximity penalty. Retained as a
//!   selectable regression check, not collapsed into the composite.

pub mod factors;
pub mod weights;

pub use weights::CompositeWeights;

use skysweep_models::{Candidate, SiteMetrics, SiteType};

/// Security distance (m) under which the access/stealth model halves
/// the score.
pub const SECURITY_NEAR_THRESHOLD_M: f64 = 150.0;

/// Security distance (m) under which the access/stealth model applies
/// the lighter 20% reduction.
pub const SECURITY_MONITORED_THRESHOLD_M: f64 = 300.0;

/// Selectable scoring strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringModel {
    /// Seven-factor weighted composite.
    Composite(CompositeWeights),
    /// 60/40 access/stealth heuristic with security penalty.
    AccessStealth,
}

impl ScoringModel {
    /// Scores one candidate. Always in [0, 100].
    #[must_use]
    pub fn score(
        &self,
        candidate: &Candidate,
        metrics: &SiteMetrics,
        nearest_road_type: &str,
        target_elevation: f64,
    ) -> f64 {
        match self {
            Self::Composite(weights) => composite_score(
                candidate,
                metrics,
                nearest_road_type,
                weights,
                target_elevation,
            ),
            Self::AccessStealth => access_stealth_score(
                candidate.site_type,
                metrics.dist_to_road,
                metrics.is_hidden,
                metrics.nearest_security_dist,
            ),
        }
    }
}

impl Default for ScoringModel {
    fn default() -> Self {
        Self::Composite(CompositeWeights::standard())
    }
}

/// Seven-factor composite score.
///
/// Each factor's ordinal class (1..=5, or 0 when not applicable) is
/// rescaled to 0-100 by multiplying by 20, weighted, and summed. The
/// result is clamped to [0, 100].
#[must_use]
pub fn composite_score(
    candidate: &Candidate,
    metrics: &SiteMetrics,
    nearest_road_type: &str,
    weights: &CompositeWeights,
    target_elevation: f64,
) -> f64 {
    let natural = candidate.natural_tag.as_deref();
    let landuse = candidate.landuse_tag.as_deref();

    let components = [
        (factors::distance_class(metrics.dist_to_center), weights.distance),
        (
            factors::building_class(candidate.site_type, candidate.building_tag.as_deref()),
            weights.building,
        ),
        (factors::road_infra_class(nearest_road_type), weights.road_infra),
        (
            factors::elevation_class(metrics.elevation_z, target_elevation),
            weights.elevation,
        ),
        (
            factors::lulc_class(candidate.site_type, natural, landuse),
            weights.lulc,
        ),
        (factors::vlos_class(metrics.is_hidden), weights.vlos),
        (factors::terrain_class(natural), weights.terrain),
    ];

    let score: f64 = components
        .iter()
        .map(|&(class, weight)| f64::from(class) * 20.0 * weight)
        .sum();

    score.clamp(0.0, 100.0)
}

/// The earlier access/stealth heuristic.
///
/// Access decays linearly from 100 at <= 50 m road distance to 0 at
/// >= 500 m. Stealth starts from a per-type base (Alley 80, otherwise
/// 60), adjusted plus/minus 20 by visibility. The 60/40 combination is
/// capped at 100, then reduced multiplicatively near security presence
/// (x0.5 within 150 m, x0.8 within 300 m). Rounded to two decimals.
#[must_use]
pub fn access_stealth_score(
    site_type: SiteType,
    dist_to_road: f64,
    is_hidden: bool,
    nearest_security_dist: f64,
) -> f64 {
    let access = if dist_to_road < 50.0 {
        100.0
    } else if dist_to_road > 500.0 {
        0.0
    } else {
        (500.0 - dist_to_road) / (500.0 - 50.0) * 100.0
    };

    let base = if site_type == SiteType::Alley { 80.0 } else { 60.0 };
    let stealth = if is_hidden { base + 20.0 } else { base - 20.0 };

    let raw = (access * 0.6 + stealth * 0.4).min(100.0);

    let multiplier = if nearest_security_dist < SECURITY_NEAR_THRESHOLD_M {
        0.5
    } else if nearest_security_dist < SECURITY_MONITORED_THRESHOLD_M {
        0.8
    } else {
        1.0
    };

    (raw * multiplier * 100.0).round() / 100.0
}
