use serde::{Deserialize, Serialize};

use crate::{clamp_finite, unit};

/// Internal state of one individual while walking a flow.
///
/// Created at trajectory start, mutated once per stage and discarded when the
/// trajectory ends; only [`StateSnapshot`]s leave the engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CognitiveState {
    pub energy: f64,
    pub perceived_risk: f64,
    pub perceived_effort: f64,
    pub perceived_value: f64,
    pub perceived_control: f64,
    /// Accumulated continuation sentiment in `[-1, 1]` (belief policy).
    pub belief: f64,
    /// Confidence that the flow serves the inferred intent, `[0, 1]`.
    pub intent_confidence: f64,
    /// Highest explicit value shown so far, `[0, 1]`.
    pub value_delivered: f64,
}

impl CognitiveState {
    /// Clamp every variable into its bounds, repairing non-finite values.
    pub fn bounded(self) -> Self {
        Self {
            energy: unit(self.energy),
            perceived_risk: unit(self.perceived_risk),
            perceived_effort: unit(self.perceived_effort),
            perceived_value: unit(self.perceived_value),
            perceived_control: unit(self.perceived_control),
            belief: clamp_finite(self.belief, -1.0, 1.0),
            intent_confidence: unit(self.intent_confidence),
            value_delivered: unit(self.value_delivered),
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.energy,
            self.perceived_risk,
            self.perceived_effort,
            self.perceived_value,
            self.perceived_control,
            self.belief,
            self.intent_confidence,
            self.value_delivered,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Energy missing from a full tank.
    pub fn energy_deficit(&self) -> f64 {
        (1.0 - self.energy).max(0.0)
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            energy: self.energy,
            perceived_risk: self.perceived_risk,
            perceived_effort: self.perceived_effort,
            perceived_value: self.perceived_value,
            perceived_control: self.perceived_control,
        }
    }
}

/// The five bounded state variables as published in a trace.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub energy: f64,
    pub perceived_risk: f64,
    pub perceived_effort: f64,
    pub perceived_value: f64,
    pub perceived_control: f64,
}

impl StateSnapshot {
    pub fn values(&self) -> [f64; 5] {
        [
            self.energy,
            self.perceived_risk,
            self.perceived_effort,
            self.perceived_value,
            self.perceived_control,
        ]
    }
}
