use funnel_types::LatentCoefficients;
use serde::{Deserialize, Serialize};

use crate::variants::VariantProfile;

/// Stable trait-derived scaling factors for one individual in one variant.
///
/// Unlike the cognitive state these never change across stages.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BehavioralModifiers {
    /// Multiplier on felt risk cost.
    pub risk_aversion: f64,
    /// Divides the delay discount rate; higher is more patient.
    pub patience: f64,
    /// Multiplier on reassurance and authority yield.
    pub trust_elasticity: f64,
    /// Divides effort cost; higher complies more readily.
    pub compliance: f64,
}

impl BehavioralModifiers {
    pub fn derive(coefficients: &LatentCoefficients, profile: &VariantProfile) -> Self {
        let c = coefficients;
        Self {
            risk_aversion: (0.6 + 0.8 * (1.0 - c.risk_tolerance)) * profile.risk_scale,
            patience: ((0.5 + (1.0 - c.temporal_discount)) * profile.patience_scale).max(0.1),
            trust_elasticity: (0.5 + c.trust_baseline) * profile.trust_scale,
            compliance: (0.6 + 0.5 * c.effort_tolerance + 0.3 * c.motivation).max(0.1),
        }
    }
}
