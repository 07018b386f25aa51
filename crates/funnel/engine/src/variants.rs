//! Arrival variants and the stage-0 state.

use funnel_types::{
    clamp_finite, unit, ArrivalVariant, CognitiveState, IntentFrame, LatentCoefficients,
};
use serde::{Deserialize, Serialize};

use crate::config::InitialParams;

/// Deterministic offsets and scales for one arrival variant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariantProfile {
    pub energy_offset: f64,
    pub risk_offset: f64,
    pub effort_offset: f64,
    pub value_offset: f64,
    pub control_offset: f64,
    /// Scales tolerance for delay; below 1 means less patient.
    pub patience_scale: f64,
    /// Scales how strongly reassurance lands.
    pub trust_scale: f64,
    /// Scales felt risk.
    pub risk_scale: f64,
}

impl VariantProfile {
    const NEUTRAL: VariantProfile = VariantProfile {
        energy_offset: 0.0,
        risk_offset: 0.0,
        effort_offset: 0.0,
        value_offset: 0.0,
        control_offset: 0.0,
        patience_scale: 1.0,
        trust_scale: 1.0,
        risk_scale: 1.0,
    };

    pub fn for_variant(variant: ArrivalVariant) -> Self {
        let n = Self::NEUTRAL;
        match variant {
            ArrivalVariant::Baseline => n,
            ArrivalVariant::FreshMotivated => Self {
                energy_offset: 0.15,
                effort_offset: -0.05,
                value_offset: 0.1,
                patience_scale: 1.1,
                ..n
            },
            ArrivalVariant::TiredLowEnergy => Self {
                energy_offset: -0.25,
                risk_offset: 0.1,
                effort_offset: 0.1,
                patience_scale: 0.9,
                ..n
            },
            ArrivalVariant::Distrustful => Self {
                risk_offset: 0.2,
                control_offset: -0.15,
                trust_scale: 0.6,
                ..n
            },
            ArrivalVariant::Browsing => Self {
                value_offset: -0.1,
                control_offset: 0.05,
                patience_scale: 0.8,
                ..n
            },
            ArrivalVariant::Urgent => Self {
                energy_offset: 0.05,
                value_offset: 0.15,
                patience_scale: 0.6,
                ..n
            },
            ArrivalVariant::PriceSensitive => Self {
                risk_offset: 0.1,
                value_offset: -0.05,
                risk_scale: 1.2,
                ..n
            },
            ArrivalVariant::DigitallyConfident => Self {
                energy_offset: 0.05,
                effort_offset: -0.1,
                control_offset: 0.1,
                ..n
            },
        }
    }
}

/// Build the stage-0 state for an individual arriving in `variant`.
pub fn initial_state(
    coefficients: &LatentCoefficients,
    variant: ArrivalVariant,
    intent: Option<&IntentFrame>,
    params: &InitialParams,
) -> CognitiveState {
    let c = coefficients;
    let profile = VariantProfile::for_variant(variant);

    let energy = 0.6 + 0.3 * c.cognitive_capacity - 0.2 * c.fatigue_rate;
    let risk = 0.1 + 0.25 * (1.0 - c.risk_tolerance) + 0.05 * (c.loss_aversion - 1.0);
    let effort = 0.1 + 0.2 * (1.0 - c.effort_tolerance);
    let value = 0.2 + 0.3 * c.motivation;
    let control =
        0.2 + 0.5 * c.trust_baseline + 0.1 * c.cognitive_capacity - 0.1 * c.control_need;

    let intent_confidence = intent
        .map(|frame| frame.prior_confidence)
        .unwrap_or(params.neutral_intent_confidence);

    CognitiveState {
        energy: unit(energy + profile.energy_offset),
        perceived_risk: unit(risk + profile.risk_offset),
        perceived_effort: unit(effort + profile.effort_offset),
        perceived_value: unit(value + profile.value_offset),
        perceived_control: unit(control + profile.control_offset),
        belief: clamp_finite(
            params.initial_belief + params.belief_trust_gain * (c.trust_baseline - 0.5),
            -1.0,
            1.0,
        ),
        intent_confidence: unit(intent_confidence),
        value_delivered: 0.0,
    }
}
