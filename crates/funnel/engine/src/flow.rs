use funnel_types::{clamp_finite, StageDefinition};
use std::collections::BTreeSet;
use tracing::warn;

use crate::config::ClampWarning;
use crate::error::EngineError;

/// A validated, ordered stage list.
///
/// Built once from the flow source; every signal attribute is inside `[0, 1]`
/// and `steps_to_value` is non-negative.
#[derive(Clone, Debug, PartialEq)]
pub struct Flow {
    stages: Vec<StageDefinition>,
    warnings: Vec<ClampWarning>,
}

impl Flow {
    pub fn new(stages: Vec<StageDefinition>) -> Result<Self, EngineError> {
        if stages.is_empty() {
            return Err(EngineError::EmptyFlow);
        }

        let mut warnings = Vec::new();
        let mut seen = BTreeSet::new();
        let stages = stages
            .into_iter()
            .map(|stage| {
                if !seen.insert(stage.id.clone()) {
                    warn!(stage_id = stage.id.as_str(), "Duplicate stage id in flow");
                }
                sanitize(stage, &mut warnings)
            })
            .collect();

        Ok(Self { stages, warnings })
    }

    pub fn stages(&self) -> &[StageDefinition] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Values clamped while validating the flow.
    pub fn warnings(&self) -> &[ClampWarning] {
        &self.warnings
    }
}

fn sanitize(mut stage: StageDefinition, warnings: &mut Vec<ClampWarning>) -> StageDefinition {
    let id = stage.id.clone();
    let mut record = |attr: &str, original: f64, clamped: f64| {
        let field = format!("stage.{}.{}", id, attr);
        warn!(field = field.as_str(), original, clamped, "Stage attribute clamped");
        warnings.push(ClampWarning {
            field,
            original,
            clamped,
        });
    };

    for (attr, value) in [
        ("cognitive_demand", &mut stage.cognitive_demand),
        ("effort_demand", &mut stage.effort_demand),
        ("risk_signal", &mut stage.risk_signal),
        ("irreversibility", &mut stage.irreversibility),
        ("explicit_value", &mut stage.explicit_value),
        ("reassurance", &mut stage.reassurance),
        ("authority", &mut stage.authority),
    ] {
        let clamped = clamp_finite(*value, 0.0, 1.0);
        if clamped != *value || !value.is_finite() {
            record(attr, *value, clamped);
            *value = clamped;
        }
    }

    if stage.steps_to_value < 0 {
        record("steps_to_value", stage.steps_to_value as f64, 0.0);
        stage.steps_to_value = 0;
    }

    stage
}
