//! The two decision policies.
//!
//! Both are pure: the probabilistic policy draws only from keyed seed
//! streams, the belief policy draws nothing at all.

use funnel_types::{
    clamp_finite, unit, CognitiveState, CostBreakdown, Decision, DecisionPolicy, StageDefinition,
};

use crate::config::{BeliefParams, ProbabilisticParams};
use crate::seed::{SeedChannel, SeedKey};

/// Logistic input is clamped to this magnitude.
const LOGIT_LIMIT: f64 = 30.0;

/// Everything a policy may look at for one stage.
#[derive(Clone, Copy, Debug)]
pub struct DecisionInput<'a> {
    /// State after the transition and alignment update.
    pub state: &'a CognitiveState,
    /// Belief carried in from the previous stage.
    pub prior_belief: f64,
    pub stage: &'a StageDefinition,
    pub breakdown: &'a CostBreakdown,
    pub progress: f64,
    pub delay_rate: f64,
    pub trust_baseline: f64,
    pub seed: SeedKey<'a>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionOutput {
    pub decision: Decision,
    /// Probability used before sampling; `0.0` for the belief policy.
    pub probability: f64,
    pub sampled: bool,
    /// Post-stage belief, belief policy only.
    pub belief: Option<f64>,
}

/// Parameters for whichever policy the trajectory runs under.
#[derive(Clone, Copy, Debug)]
pub enum PolicyParams<'a> {
    Probabilistic(&'a ProbabilisticParams),
    BeliefCollapse(&'a BeliefParams),
}

impl PolicyParams<'_> {
    pub fn policy(&self) -> DecisionPolicy {
        match self {
            Self::Probabilistic(_) => DecisionPolicy::Probabilistic,
            Self::BeliefCollapse(_) => DecisionPolicy::BeliefCollapse,
        }
    }
}

pub fn decide(input: &DecisionInput<'_>, params: PolicyParams<'_>) -> DecisionOutput {
    match params {
        PolicyParams::Probabilistic(p) => probabilistic(input, p),
        PolicyParams::BeliefCollapse(b) => belief_collapse(input, b),
    }
}

/// Continuation probability before sampling.
pub fn continuation_probability(input: &DecisionInput<'_>, params: &ProbabilisticParams) -> f64 {
    let s = input.state;
    let progress = unit(input.progress);

    let advantage = input.breakdown.value_yield + s.perceived_control
        - (s.perceived_risk + s.perceived_effort);
    let persistence = params.persistence_gain * progress;
    let noise = params.variance * (2.0 * input.seed.unit(SeedChannel::Variance) - 1.0);

    let x = clamp_finite(
        params.steepness * (advantage + persistence + noise),
        -LOGIT_LIMIT,
        LOGIT_LIMIT,
    );
    let p = 1.0 / (1.0 + (-x).exp());

    let max_prob = unit(params.max_prob);
    let floor = clamp_finite(params.min_prob + params.floor_gain * progress, 0.0, max_prob);
    clamp_finite(p, floor, max_prob)
}

fn probabilistic(input: &DecisionInput<'_>, params: &ProbabilisticParams) -> DecisionOutput {
    let probability = continuation_probability(input, params);
    let draw = input.seed.unit(SeedChannel::Sample);
    let decision = if draw < probability {
        Decision::Continue
    } else {
        Decision::Drop
    };
    DecisionOutput {
        decision,
        probability,
        sampled: true,
        belief: None,
    }
}

fn belief_collapse(input: &DecisionInput<'_>, params: &BeliefParams) -> DecisionOutput {
    let s = input.state;
    let stage = input.stage;
    let b = input.breakdown;

    let gain = params.value_weight * b.value_yield
        + params.trust_weight * input.trust_baseline * unit(stage.reassurance)
        + params.authority_weight * unit(stage.authority)
        + params.intent_weight * (s.intent_confidence - 0.5);

    let delay_loss = 1.0 - (-input.delay_rate * stage.delay()).exp();
    let loss = (params.delay_weight * delay_loss
        + params.effort_weight * b.effort_cost
        + params.risk_weight * b.risk_cost
        + params.irreversibility_weight * unit(stage.irreversibility))
        * (1.0 + params.deficit_gain * s.energy_deficit());

    let belief = clamp_finite(input.prior_belief + gain - loss, -1.0, 1.0);
    let decision = if belief < 0.0 {
        Decision::Drop
    } else {
        Decision::Continue
    };
    DecisionOutput {
        decision,
        probability: 0.0,
        sampled: false,
        belief: Some(belief),
    }
}
