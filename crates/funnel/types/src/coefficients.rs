use serde::{Deserialize, Serialize};

use crate::clamp_finite;

/// Closed range a latent coefficient must stay within.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoefficientRange {
    pub min: f64,
    pub max: f64,
}

impl CoefficientRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        clamp_finite(value, self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Bounded behavioral coefficients, compiled once per descriptor.
///
/// Values are only ever produced through [`LatentCoefficients::clamped`], so
/// each one is guaranteed to sit inside its declared range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatentCoefficients {
    pub cognitive_capacity: f64,
    pub fatigue_rate: f64,
    pub risk_tolerance: f64,
    pub loss_aversion: f64,
    pub effort_tolerance: f64,
    pub trust_baseline: f64,
    pub temporal_discount: f64,
    pub control_need: f64,
    pub motivation: f64,
}

impl LatentCoefficients {
    pub const COGNITIVE_CAPACITY: CoefficientRange = CoefficientRange::new(0.2, 0.9);
    pub const FATIGUE_RATE: CoefficientRange = CoefficientRange::new(0.1, 0.8);
    pub const RISK_TOLERANCE: CoefficientRange = CoefficientRange::new(0.1, 0.9);
    pub const LOSS_AVERSION: CoefficientRange = CoefficientRange::new(1.0, 2.5);
    pub const EFFORT_TOLERANCE: CoefficientRange = CoefficientRange::new(0.2, 0.9);
    pub const TRUST_BASELINE: CoefficientRange = CoefficientRange::new(0.2, 0.9);
    pub const TEMPORAL_DISCOUNT: CoefficientRange = CoefficientRange::new(0.05, 0.9);
    pub const CONTROL_NEED: CoefficientRange = CoefficientRange::new(0.2, 0.9);
    pub const MOTIVATION: CoefficientRange = CoefficientRange::new(0.3, 1.0);

    /// Build coefficients from raw values, clamping each into its range.
    #[allow(clippy::too_many_arguments)]
    pub fn clamped(
        cognitive_capacity: f64,
        fatigue_rate: f64,
        risk_tolerance: f64,
        loss_aversion: f64,
        effort_tolerance: f64,
        trust_baseline: f64,
        temporal_discount: f64,
        control_need: f64,
        motivation: f64,
    ) -> Self {
        Self {
            cognitive_capacity: Self::COGNITIVE_CAPACITY.clamp(cognitive_capacity),
            fatigue_rate: Self::FATIGUE_RATE.clamp(fatigue_rate),
            risk_tolerance: Self::RISK_TOLERANCE.clamp(risk_tolerance),
            loss_aversion: Self::LOSS_AVERSION.clamp(loss_aversion),
            effort_tolerance: Self::EFFORT_TOLERANCE.clamp(effort_tolerance),
            trust_baseline: Self::TRUST_BASELINE.clamp(trust_baseline),
            temporal_discount: Self::TEMPORAL_DISCOUNT.clamp(temporal_discount),
            control_need: Self::CONTROL_NEED.clamp(control_need),
            motivation: Self::MOTIVATION.clamp(motivation),
        }
    }

    /// Whether every coefficient lies within its declared range.
    pub fn within_ranges(&self) -> bool {
        Self::COGNITIVE_CAPACITY.contains(self.cognitive_capacity)
            && Self::FATIGUE_RATE.contains(self.fatigue_rate)
            && Self::RISK_TOLERANCE.contains(self.risk_tolerance)
            && Self::LOSS_AVERSION.contains(self.loss_aversion)
            && Self::EFFORT_TOLERANCE.contains(self.effort_tolerance)
            && Self::TRUST_BASELINE.contains(self.trust_baseline)
            && Self::TEMPORAL_DISCOUNT.contains(self.temporal_discount)
            && Self::CONTROL_NEED.contains(self.control_need)
            && Self::MOTIVATION.contains(self.motivation)
    }
}
