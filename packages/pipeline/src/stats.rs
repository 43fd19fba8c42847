//! Aggregate statistics over scored candidates.

use skysweep_models::{ScoredCandidate, SiteType, ThreatLevel};
use skysweep_scoring::{SECURITY_MONITORED_THRESHOLD_M, SECURITY_NEAR_THRESHOLD_M};
use skysweep_server_models::AnalysisStats;

/// Computes the response statistics block in one pass.
pub(crate) fn compute(scored: &[ScoredCandidate]) -> AnalysisStats {
    let mut stats = AnalysisStats {
        total_candidates: scored.len(),
        ..AnalysisStats::default()
    };
    if scored.is_empty() {
        return stats;
    }

    let mut score_sum = 0.0;
    let mut flight_sum = 0.0;
    let mut min_flight = f64::INFINITY;

    for site in scored {
        match ThreatLevel::from_score(site.threat_score) {
            ThreatLevel::Critical => stats.critical_count += 1,
            ThreatLevel::High => stats.high_count += 1,
            ThreatLevel::Medium => stats.medium_count += 1,
        }
        if site.metrics.is_hidden {
            stats.hidden_count += 1;
        } else {
            stats.exposed_count += 1;
        }
        match site.candidate.site_type {
            SiteType::Alley => stats.alley_count += 1,
            SiteType::Vegetation => stats.vegetation_count += 1,
            SiteType::Building => stats.building_count += 1,
        }
        if site.metrics.nearest_security_dist < SECURITY_NEAR_THRESHOLD_M {
            stats.near_security_count += 1;
        }
        if site.metrics.nearest_security_dist < SECURITY_MONITORED_THRESHOLD_M {
            stats.security_monitored_count += 1;
        }

        score_sum += site.threat_score;
        flight_sum += site.metrics.est_flight_time;
        min_flight = min_flight.min(site.metrics.est_flight_time);
        stats.max_threat_score = stats.max_threat_score.max(site.threat_score);
    }

    #[allow(clippy::cast_precision_loss)]
    let count = scored.len() as f64;
    stats.mean_threat_score = score_sum / count;
    stats.mean_flight_time = flight_sum / count;
    stats.min_flight_time = min_flight;

    stats
}
