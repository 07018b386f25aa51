use serde::{Deserialize, Serialize};

/// One ordered step of a product flow, as supplied by the flow source.
///
/// All signal attributes are expected in `[0, 1]`. `steps_to_value` is signed
/// so that malformed input survives deserialization and can be clamped (with a
/// warning) during flow validation instead of failing to parse.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StageDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cognitive_demand: f64,
    #[serde(default)]
    pub effort_demand: f64,
    #[serde(default)]
    pub risk_signal: f64,
    #[serde(default)]
    pub irreversibility: f64,
    /// Remaining steps before the individual sees value.
    #[serde(default)]
    pub steps_to_value: i64,
    #[serde(default)]
    pub explicit_value: f64,
    #[serde(default)]
    pub reassurance: f64,
    #[serde(default)]
    pub authority: f64,
}

impl StageDefinition {
    /// A frictionless stage with no signals set.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: String::new(),
            cognitive_demand: 0.0,
            effort_demand: 0.0,
            risk_signal: 0.0,
            irreversibility: 0.0,
            steps_to_value: 0,
            explicit_value: 0.0,
            reassurance: 0.0,
            authority: 0.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cognitive_demand(mut self, v: f64) -> Self {
        self.cognitive_demand = v;
        self
    }

    pub fn with_effort_demand(mut self, v: f64) -> Self {
        self.effort_demand = v;
        self
    }

    pub fn with_risk_signal(mut self, v: f64) -> Self {
        self.risk_signal = v;
        self
    }

    pub fn with_irreversibility(mut self, v: f64) -> Self {
        self.irreversibility = v;
        self
    }

    pub fn with_steps_to_value(mut self, steps: i64) -> Self {
        self.steps_to_value = steps;
        self
    }

    pub fn with_explicit_value(mut self, v: f64) -> Self {
        self.explicit_value = v;
        self
    }

    pub fn with_reassurance(mut self, v: f64) -> Self {
        self.reassurance = v;
        self
    }

    pub fn with_authority(mut self, v: f64) -> Self {
        self.authority = v;
        self
    }

    /// Non-negative delay to value.
    pub fn delay(&self) -> f64 {
        self.steps_to_value.max(0) as f64
    }
}
