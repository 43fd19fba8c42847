//! Composite-model factor weights.

use serde::{Deserialize, Serialize};

/// Importance weights for the seven composite factors.
///
/// Passed explicitly into the scoring function — never ambient state —
/// so tests can run alternate weight sets.
///
/// The standard weights sum to roughly 1.0749, not 1.0. This matches
/// the calibration the model was shipped with and is preserved verbatim;
/// the final score clamp keeps results inside [0, 100] regardless.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    /// Distance-to-target factor weight.
    pub distance: f64,
    /// Building-classification factor weight.
    pub building: f64,
    /// Road-infrastructure factor weight.
    pub road_infra: f64,
    /// Elevation-advantage factor weight.
    pub elevation: f64,
    /// Land-use/land-cover factor weight.
    pub lulc: f64,
    /// Visual line-of-sight factor weight.
    pub vlos: f64,
    /// Terrain-feature factor weight.
    pub terrain: f64,
}

impl CompositeWeights {
    /// The standard calibration.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            distance: 0.3629,
            building: 0.2924,
            road_infra: 0.1368,
            elevation: 0.1057,
            lulc: 0.1057,
            vlos: 0.0460,
            terrain: 0.0254,
        }
    }

    /// Sum of all seven weights.
    #[must_use]
    pub const fn sum(&self) -> f64 {
        self.distance
            + self.building
            + self.road_infra
            + self.elevation
            + self.lulc
            + self.vlos
            + self.terrain
    }
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self::standard()
    }
}
