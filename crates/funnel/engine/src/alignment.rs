use funnel_types::{clamp_finite, unit, CognitiveState, IntentFrame, StageDefinition};

use crate::config::AlignmentParams;

/// Result of scoring one stage against an intent frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignmentOutcome {
    /// How well the stage serves the inferred goal, `[0, 1]`.
    pub alignment: f64,
    /// Updated intent confidence, `[0, 1]`.
    pub confidence: f64,
    /// Friction attributable to the intent mismatch, non-negative.
    pub mismatch: f64,
}

/// Score `stage` against `frame` and update intent confidence.
///
/// `state` is the post-transition state, so `value_delivered` already
/// includes this stage's explicit value. Without a frame the modifier is a
/// no-op: alignment is reported as 1 and confidence is left untouched.
pub fn align(
    frame: Option<&IntentFrame>,
    stage: &StageDefinition,
    progress: f64,
    state: &CognitiveState,
    params: &AlignmentParams,
) -> AlignmentOutcome {
    let confidence = unit(state.intent_confidence);
    let Some(frame) = frame else {
        return AlignmentOutcome {
            alignment: 1.0,
            confidence,
            mismatch: 0.0,
        };
    };
    let frame = frame.bounded();
    let progress = unit(progress);

    let commitment = 0.6 * unit(stage.irreversibility) + 0.4 * unit(stage.risk_signal);
    let thoroughness = 0.5 * unit(stage.cognitive_demand) + 0.5 * unit(stage.effort_demand);
    let explicit_value = unit(stage.explicit_value);
    let delivered = unit(state.value_delivered);

    let commitment_excess = (commitment - frame.commitment_threshold).max(0.0);
    let penalty = params.commitment_penalty * commitment_excess * (1.0 - delivered)
        * (1.0 + (1.0 - progress))
        + params.effort_penalty * (thoroughness - frame.effort_tolerance).max(0.0)
        + params.risk_penalty * (unit(stage.risk_signal) - frame.risk_tolerance).max(0.0);

    let delivers = explicit_value >= frame.value_style.delivery_threshold();
    let reward = if delivers && commitment_excess == 0.0 {
        params.delivery_reward * explicit_value
    } else {
        0.0
    };

    let alignment = unit(params.base_alignment - penalty + reward);

    let long_delay = stage.steps_to_value >= params.delay_threshold;
    let mut next_confidence = confidence;
    if alignment < params.low_alignment && long_delay {
        next_confidence -= params.confidence_drop * (params.low_alignment - alignment + 0.1);
    } else if alignment > params.high_alignment && delivered > 0.0 {
        next_confidence += params.confidence_gain * (alignment - params.high_alignment + 0.1);
    }

    AlignmentOutcome {
        alignment,
        confidence: unit(next_confidence),
        mismatch: clamp_finite(params.mismatch_weight * penalty, 0.0, f64::MAX),
    }
}
