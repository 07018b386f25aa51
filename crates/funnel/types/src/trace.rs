use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TypesError;
use crate::state::StateSnapshot;
use crate::variant::ArrivalVariant;

/// Outcome of one stage decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Continue,
    Drop,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continue => write!(f, "CONTINUE"),
            Self::Drop => write!(f, "DROP"),
        }
    }
}

/// Decision rule used for a whole trajectory. Never mixed mid-run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPolicy {
    /// Logistic continuation probability, sampled from a keyed seed stream.
    Probabilistic,
    /// Deterministic belief accumulator; drops when belief falls below zero.
    BeliefCollapse,
}

impl std::fmt::Display for DecisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Probabilistic => write!(f, "probabilistic"),
            Self::BeliefCollapse => write!(f, "belief_collapse"),
        }
    }
}

impl FromStr for DecisionPolicy {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "probabilistic" => Ok(Self::Probabilistic),
            "belief_collapse" | "belief" => Ok(Self::BeliefCollapse),
            other => Err(TypesError::UnknownPolicy(other.to_string())),
        }
    }
}

/// Negative contributors considered when attributing a drop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CauseFactor {
    CognitiveLoad,
    Effort,
    /// Stage risk amplified by loss aversion and irreversibility.
    RiskLossAversion,
    IntentMismatch,
}

impl std::fmt::Display for CauseFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CognitiveLoad => write!(f, "cognitive_load"),
            Self::Effort => write!(f, "effort"),
            Self::RiskLossAversion => write!(f, "risk_loss_aversion"),
            Self::IntentMismatch => write!(f, "intent_mismatch"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorRole {
    Primary,
    Secondary,
    MultiFactor,
}

/// One attributed cause of a drop, with its share of the total friction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DominantFactor {
    pub factor: CauseFactor,
    pub role: FactorRole,
    /// Share of total negative contribution, `[0, 1]`.
    pub share: f64,
}

impl DominantFactor {
    /// Label in the form `role:factor`.
    pub fn label(&self) -> String {
        let role = match self.role {
            FactorRole::Primary => "primary",
            FactorRole::Secondary => "secondary",
            FactorRole::MultiFactor => "multi_factor",
        };
        format!("{}:{}", role, self.factor)
    }
}

/// Cost and yield components computed for one stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub cognitive_cost: f64,
    pub effort_cost: f64,
    pub risk_cost: f64,
    /// Explicit value after temporal discounting only.
    pub discounted_value: f64,
    /// Discounted value amplified by goal proximity and motivation.
    pub value_yield: f64,
    pub reassurance_yield: f64,
    pub proximity: f64,
    pub energy_recovery: f64,
    pub intent_mismatch: f64,
}

impl CostBreakdown {
    /// Per-factor negative contribution, in a fixed order.
    pub fn negative_contributions(&self) -> [(CauseFactor, f64); 4] {
        [
            (CauseFactor::CognitiveLoad, self.cognitive_cost),
            (CauseFactor::Effort, self.effort_cost),
            (CauseFactor::RiskLossAversion, self.risk_cost),
            (CauseFactor::IntentMismatch, self.intent_mismatch),
        ]
    }
}

/// Intent view published with every trace.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentSnapshot {
    /// Inferred intent id, or `None` when no frame was supplied.
    pub intent: Option<String>,
    pub alignment: f64,
    pub confidence: f64,
}

/// Immutable record of one stage decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTrace {
    pub individual_id: String,
    pub stage_id: String,
    pub stage_index: usize,
    pub decision: Decision,
    /// Probability used before sampling; `0.0` under the belief policy.
    pub probability: f64,
    /// Whether the outcome was sampled (probabilistic) or deduced (belief).
    pub sampled: bool,
    pub state: StateSnapshot,
    pub intent: IntentSnapshot,
    /// Attributed causes, strongest first. Empty unless the decision is a drop.
    pub dominant_factors: Vec<DominantFactor>,
    pub breakdown: CostBreakdown,
    /// Post-stage belief, present under the belief policy only.
    pub belief: Option<f64>,
}

/// Terminal marker of a trajectory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrajectoryOutcome {
    Completed,
    Dropped { stage_index: usize, stage_id: String },
    Errored { reason: String },
}

impl std::fmt::Display for TrajectoryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::Dropped { stage_index, .. } => write!(f, "dropped-at-stage-{}", stage_index),
            Self::Errored { reason } => write!(f, "errored: {}", reason),
        }
    }
}

/// Ordered decision sequence for one (descriptor, variant) pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub individual_id: String,
    pub variant: ArrivalVariant,
    pub policy: DecisionPolicy,
    pub traces: Vec<DecisionTrace>,
    pub outcome: TrajectoryOutcome,
}

impl Trajectory {
    /// A trajectory that failed before or while simulating.
    pub fn errored(
        individual_id: impl Into<String>,
        variant: ArrivalVariant,
        policy: DecisionPolicy,
        traces: Vec<DecisionTrace>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            individual_id: individual_id.into(),
            variant,
            policy,
            traces,
            outcome: TrajectoryOutcome::Errored {
                reason: reason.into(),
            },
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, TrajectoryOutcome::Completed)
    }

    pub fn is_errored(&self) -> bool {
        matches!(self.outcome, TrajectoryOutcome::Errored { .. })
    }

    pub fn dropped_at(&self) -> Option<usize> {
        match self.outcome {
            TrajectoryOutcome::Dropped { stage_index, .. } => Some(stage_index),
            _ => None,
        }
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.traces.iter().map(|t| t.probability).collect()
    }

    /// Check the structural invariants of a finished trajectory against the
    /// number of stages in its flow.
    pub fn is_well_formed(&self, stage_count: usize) -> bool {
        let continues_before_last = self
            .traces
            .iter()
            .rev()
            .skip(1)
            .all(|t| t.decision == Decision::Continue);
        match &self.outcome {
            TrajectoryOutcome::Completed => {
                self.traces.len() == stage_count
                    && self.traces.iter().all(|t| t.decision == Decision::Continue)
            }
            TrajectoryOutcome::Dropped { stage_index, .. } => {
                self.traces.len() == stage_index + 1
                    && continues_before_last
                    && self.traces.last().map(|t| t.decision) == Some(Decision::Drop)
            }
            TrajectoryOutcome::Errored { .. } => {
                self.traces.len() <= stage_count
                    && self.traces.iter().all(|t| t.decision == Decision::Continue)
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
