//! Per-stage cost/yield computation and state update.

use funnel_types::{
    clamp_finite, unit, CognitiveState, CostBreakdown, LatentCoefficients, StageDefinition,
};

use crate::config::TransitionParams;
use crate::modifiers::BehavioralModifiers;

/// Upper bound applied to any single cost term before it reaches the state.
const COST_CEILING: f64 = 1_000.0;

/// Everything the transition needs besides the current state.
#[derive(Clone, Copy, Debug)]
pub struct StepContext<'a> {
    pub stage: &'a StageDefinition,
    pub previous: Option<&'a StageDefinition>,
    pub index: usize,
    pub total: usize,
    pub coefficients: &'a LatentCoefficients,
    pub modifiers: &'a BehavioralModifiers,
}

impl StepContext<'_> {
    /// Fraction of the flow completed once this stage is passed, `(0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        unit((self.index + 1) as f64 / self.total as f64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepOutcome {
    pub state: CognitiveState,
    pub breakdown: CostBreakdown,
    pub progress: f64,
    /// Per-step temporal discount rate after patience scaling.
    pub delay_rate: f64,
}

/// Apply one stage to `state`.
///
/// Every intermediate is forced finite and every state variable is clamped,
/// so a degenerate input can at worst pin a variable to its bound.
pub fn step(
    state: &CognitiveState,
    ctx: &StepContext<'_>,
    params: &TransitionParams,
) -> StepOutcome {
    let state = state.bounded();
    let c = ctx.coefficients;
    let m = ctx.modifiers;
    let stage = ctx.stage;
    let progress = ctx.progress();

    let demand = unit(stage.cognitive_demand);
    let previous_demand = ctx
        .previous
        .map(|p| unit(p.cognitive_demand))
        .unwrap_or(demand);
    let effort_demand = unit(stage.effort_demand);
    let risk_signal = unit(stage.risk_signal);
    let irreversibility = unit(stage.irreversibility);
    let explicit_value = unit(stage.explicit_value);
    let reassurance = unit(stage.reassurance);
    let authority = unit(stage.authority);

    // Square-root damping keeps cost finite as energy approaches zero.
    let cognitive_cap = clamp_finite(
        params.cognitive_cap_share * params.cost_budget,
        0.0,
        COST_CEILING,
    );
    let cognitive_cost = clamp_finite(
        demand
            * params.cognitive_weight
            * (0.5 + c.fatigue_rate)
            * (1.2 - c.cognitive_capacity)
            * (1.0 + params.fatigue_damping * state.energy_deficit().sqrt())
            + params.context_switch_weight * (demand - previous_demand).max(0.0),
        0.0,
        cognitive_cap,
    );

    let effort_cost = clamp_finite(
        effort_demand * params.effort_weight * (1.5 - c.effort_tolerance) / m.compliance,
        0.0,
        COST_CEILING,
    );

    let risk_cost = clamp_finite(
        risk_signal
            * c.loss_aversion
            * (1.0 + irreversibility)
            * m.risk_aversion
            * params.risk_weight,
        0.0,
        COST_CEILING,
    );

    let delay_rate = clamp_finite(
        c.temporal_discount * params.delay_decay / m.patience,
        0.0,
        COST_CEILING,
    );
    let discounted_value = unit(explicit_value * (-delay_rate * stage.delay()).exp());
    let proximity = clamp_finite(1.0 + params.proximity_gain * progress, 1.0, COST_CEILING);
    let value_yield = clamp_finite(
        discounted_value * proximity * c.motivation,
        0.0,
        COST_CEILING,
    );
    let reassurance_yield = clamp_finite(
        (0.6 * reassurance + 0.4 * authority) * m.trust_elasticity * params.reassurance_weight,
        0.0,
        COST_CEILING,
    );

    let second_wind = value_yield > params.second_wind_value
        || reassurance_yield > params.second_wind_reassurance
        || progress > params.second_wind_progress;
    let energy_recovery = if second_wind { params.second_wind } else { 0.0 };

    let next = CognitiveState {
        energy: state.energy - cognitive_cost - params.effort_energy_share * effort_cost
            + energy_recovery,
        perceived_risk: state.perceived_risk + params.risk_gain * risk_cost
            - params.reassurance_relief * reassurance,
        perceived_effort: state.perceived_effort
            + params.effort_gain * (effort_cost + cognitive_cost)
            - params.value_relief * value_yield,
        perceived_value: state.perceived_value * (1.0 - params.value_decay)
            + params.value_gain * value_yield,
        perceived_control: state.perceived_control + reassurance_yield
            - params.irreversibility_control_loss * irreversibility * c.control_need
            - params.cognitive_control_loss * cognitive_cost,
        value_delivered: state.value_delivered.max(explicit_value),
        ..state
    }
    .bounded();

    StepOutcome {
        state: next,
        breakdown: CostBreakdown {
            cognitive_cost,
            effort_cost,
            risk_cost,
            discounted_value,
            value_yield,
            reassurance_yield,
            proximity,
            energy_recovery,
            intent_mismatch: 0.0,
        },
        progress,
        delay_rate,
    }
}
