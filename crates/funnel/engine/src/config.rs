//! Engine configuration and calibration.
//!
//! All tunables live in one immutable [`EngineConfig`] that is passed into
//! every call. Calibration is a pure function from a base configuration and a
//! set of dotted overrides to an effective configuration; out-of-range values
//! are clamped and reported as [`ClampWarning`]s rather than rejected.

use funnel_types::{clamp_finite, DecisionPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::EngineError;

/// Upper bound on `alignment.delay_threshold`.
pub const MAX_DELAY_THRESHOLD: i64 = u32::MAX as i64;

/// Upper bound on `batch.worker_threads`.
pub const MAX_WORKER_THREADS: i64 = 256;

/// A value that was clamped during validation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClampWarning {
    /// Dotted path of the clamped field, e.g. `probabilistic.max_prob`.
    pub field: String,
    pub original: f64,
    pub clamped: f64,
}

impl std::fmt::Display for ClampWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} clamped from {} to {}",
            self.field, self.original, self.clamped
        )
    }
}

/// Starting-state parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialParams {
    /// Belief of an individual with neutral trust.
    pub initial_belief: f64,
    /// How strongly trust baseline shifts the starting belief.
    pub belief_trust_gain: f64,
    /// Intent confidence when no intent frame is supplied.
    pub neutral_intent_confidence: f64,
}

impl Default for InitialParams {
    fn default() -> Self {
        Self {
            initial_belief: 0.15,
            belief_trust_gain: 0.4,
            neutral_intent_confidence: 0.5,
        }
    }
}

/// Cost, yield and update weights of the step transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionParams {
    pub cost_budget: f64,
    /// Largest share of the cost budget cognitive cost may take.
    pub cognitive_cap_share: f64,
    pub cognitive_weight: f64,
    /// Gain on the square root of the energy deficit.
    pub fatigue_damping: f64,
    /// Extra cognitive cost per unit of demand increase over the previous stage.
    pub context_switch_weight: f64,
    pub effort_weight: f64,
    pub risk_weight: f64,
    pub delay_decay: f64,
    pub proximity_gain: f64,
    pub reassurance_weight: f64,
    pub effort_energy_share: f64,
    pub risk_gain: f64,
    pub reassurance_relief: f64,
    pub effort_gain: f64,
    pub value_relief: f64,
    pub value_decay: f64,
    pub value_gain: f64,
    pub irreversibility_control_loss: f64,
    pub cognitive_control_loss: f64,
    pub second_wind: f64,
    pub second_wind_value: f64,
    pub second_wind_reassurance: f64,
    pub second_wind_progress: f64,
}

impl Default for TransitionParams {
    fn default() -> Self {
        Self {
            cost_budget: 1.0,
            cognitive_cap_share: 0.4,
            cognitive_weight: 0.5,
            fatigue_damping: 0.5,
            context_switch_weight: 0.2,
            effort_weight: 0.5,
            risk_weight: 0.25,
            delay_decay: 0.5,
            proximity_gain: 0.6,
            reassurance_weight: 0.4,
            effort_energy_share: 0.5,
            risk_gain: 0.6,
            reassurance_relief: 0.5,
            effort_gain: 0.5,
            value_relief: 0.1,
            value_decay: 0.1,
            value_gain: 0.5,
            irreversibility_control_loss: 0.3,
            cognitive_control_loss: 0.2,
            second_wind: 0.05,
            second_wind_value: 0.35,
            second_wind_reassurance: 0.2,
            second_wind_progress: 0.75,
        }
    }
}

/// Intent alignment scoring and confidence update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentParams {
    pub base_alignment: f64,
    pub commitment_penalty: f64,
    pub effort_penalty: f64,
    pub risk_penalty: f64,
    pub delivery_reward: f64,
    pub low_alignment: f64,
    pub high_alignment: f64,
    /// Steps-to-value at or above which low alignment erodes confidence.
    /// Signed so that negative inputs can be clamped rather than rejected.
    pub delay_threshold: i64,
    pub confidence_drop: f64,
    pub confidence_gain: f64,
    pub mismatch_weight: f64,
}

impl Default for AlignmentParams {
    fn default() -> Self {
        Self {
            base_alignment: 0.6,
            commitment_penalty: 0.6,
            effort_penalty: 0.3,
            risk_penalty: 0.3,
            delivery_reward: 0.3,
            low_alignment: 0.4,
            high_alignment: 0.7,
            delay_threshold: 2,
            confidence_drop: 0.3,
            confidence_gain: 0.2,
            mismatch_weight: 0.5,
        }
    }
}

/// Logistic continuation probability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbabilisticParams {
    pub steepness: f64,
    pub persistence_gain: f64,
    /// Half-width of the seeded noise added to the advantage.
    pub variance: f64,
    pub min_prob: f64,
    pub max_prob: f64,
    /// Floor increase from first to last stage.
    pub floor_gain: f64,
}

impl Default for ProbabilisticParams {
    fn default() -> Self {
        Self {
            steepness: 6.0,
            persistence_gain: 0.3,
            variance: 0.08,
            min_prob: 0.03,
            max_prob: 0.97,
            floor_gain: 0.12,
        }
    }
}

/// Belief accumulator weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeliefParams {
    pub value_weight: f64,
    pub trust_weight: f64,
    pub authority_weight: f64,
    pub intent_weight: f64,
    pub delay_weight: f64,
    pub effort_weight: f64,
    pub risk_weight: f64,
    pub irreversibility_weight: f64,
    /// Loss amplification per unit of energy deficit.
    pub deficit_gain: f64,
}

impl Default for BeliefParams {
    fn default() -> Self {
        Self {
            value_weight: 0.6,
            trust_weight: 0.3,
            authority_weight: 0.2,
            intent_weight: 0.3,
            delay_weight: 0.3,
            effort_weight: 0.3,
            risk_weight: 0.25,
            irreversibility_weight: 0.15,
            deficit_gain: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionParams {
    /// Share of total friction above which a factor is primary.
    pub primary_share: f64,
}

impl Default for AttributionParams {
    fn default() -> Self {
        Self { primary_share: 0.4 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchParams {
    /// Clamped into `1..=MAX_WORKER_THREADS` by validation.
    pub worker_threads: i64,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self { worker_threads: 1 }
    }
}

/// Complete engine configuration.
///
/// There is deliberately no `Default`: the decision policy is a per-product
/// choice and must be named explicitly, both in code and in config files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub policy: DecisionPolicy,
    /// Run seed mixed into every seed stream.
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub initial: InitialParams,
    #[serde(default)]
    pub transition: TransitionParams,
    #[serde(default)]
    pub alignment: AlignmentParams,
    #[serde(default)]
    pub probabilistic: ProbabilisticParams,
    #[serde(default)]
    pub belief: BeliefParams,
    #[serde(default)]
    pub attribution: AttributionParams,
    #[serde(default)]
    pub batch: BatchParams,
}

impl EngineConfig {
    /// Default parameters for the given policy.
    pub fn new(policy: DecisionPolicy) -> Self {
        Self {
            policy,
            seed: 0,
            initial: InitialParams::default(),
            transition: TransitionParams::default(),
            alignment: AlignmentParams::default(),
            probabilistic: ProbabilisticParams::default(),
            belief: BeliefParams::default(),
            attribution: AttributionParams::default(),
            batch: BatchParams::default(),
        }
    }

    pub fn probabilistic() -> Self {
        Self::new(DecisionPolicy::Probabilistic)
    }

    pub fn belief_collapse() -> Self {
        Self::new(DecisionPolicy::BeliefCollapse)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.batch.worker_threads = i64::try_from(worker_threads).unwrap_or(i64::MAX);
        self
    }

    /// Parse a TOML document. Missing sections take their defaults; the
    /// `policy` key is required.
    pub fn from_toml_str(input: &str) -> Result<Self, EngineError> {
        toml::from_str(input).map_err(|e| EngineError::InvalidConfig(e.to_string()))
    }

    /// Apply dotted `section.key` overrides to `base`, then validate.
    ///
    /// Unknown keys and non-integral values for integer fields are rejected;
    /// out-of-range values are clamped and reported.
    pub fn calibrate(
        base: &EngineConfig,
        overrides: &BTreeMap<String, f64>,
    ) -> Result<(EngineConfig, Vec<ClampWarning>), EngineError> {
        let mut tree =
            serde_json::to_value(base).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;

        let mut warnings = Vec::new();
        for (key, value) in overrides {
            let slot = key
                .split('.')
                .try_fold(&mut tree, |node, part| node.get_mut(part))
                .filter(|slot| slot.is_number())
                .ok_or_else(|| EngineError::UnknownParameter(key.clone()))?;
            *slot = override_number(key, slot, *value, &mut warnings)?;
        }

        let effective: EngineConfig = serde_json::from_value(tree)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        let (effective, clamped) = effective.validated();
        warnings.extend(clamped);
        Ok((effective, warnings))
    }

    /// Clamp every parameter into its admissible range.
    pub fn validated(mut self) -> (EngineConfig, Vec<ClampWarning>) {
        let mut warnings = Vec::new();
        let mut check = |field: &str, value: &mut f64, lo: f64, hi: f64| {
            let clamped = clamp_finite(*value, lo, hi);
            if clamped != *value || !value.is_finite() {
                warn!(field, original = *value, clamped, "Configuration value clamped");
                warnings.push(ClampWarning {
                    field: field.to_string(),
                    original: *value,
                    clamped,
                });
                *value = clamped;
            }
        };

        let i = &mut self.initial;
        check("initial.initial_belief", &mut i.initial_belief, -1.0, 1.0);
        check("initial.belief_trust_gain", &mut i.belief_trust_gain, 0.0, 2.0);
        check(
            "initial.neutral_intent_confidence",
            &mut i.neutral_intent_confidence,
            0.0,
            1.0,
        );

        let t = &mut self.transition;
        check("transition.cost_budget", &mut t.cost_budget, 0.1, 10.0);
        check("transition.cognitive_cap_share", &mut t.cognitive_cap_share, 0.0, 1.0);
        for (name, weight) in [
            ("transition.cognitive_weight", &mut t.cognitive_weight),
            ("transition.fatigue_damping", &mut t.fatigue_damping),
            ("transition.context_switch_weight", &mut t.context_switch_weight),
            ("transition.effort_weight", &mut t.effort_weight),
            ("transition.risk_weight", &mut t.risk_weight),
            ("transition.delay_decay", &mut t.delay_decay),
            ("transition.proximity_gain", &mut t.proximity_gain),
            ("transition.reassurance_weight", &mut t.reassurance_weight),
            ("transition.risk_gain", &mut t.risk_gain),
            ("transition.reassurance_relief", &mut t.reassurance_relief),
            ("transition.effort_gain", &mut t.effort_gain),
            ("transition.value_relief", &mut t.value_relief),
            ("transition.value_gain", &mut t.value_gain),
            (
                "transition.irreversibility_control_loss",
                &mut t.irreversibility_control_loss,
            ),
            ("transition.cognitive_control_loss", &mut t.cognitive_control_loss),
        ] {
            check(name, weight, 0.0, 10.0);
        }
        for (name, share) in [
            ("transition.effort_energy_share", &mut t.effort_energy_share),
            ("transition.value_decay", &mut t.value_decay),
            ("transition.second_wind", &mut t.second_wind),
            ("transition.second_wind_value", &mut t.second_wind_value),
            ("transition.second_wind_reassurance", &mut t.second_wind_reassurance),
            ("transition.second_wind_progress", &mut t.second_wind_progress),
        ] {
            check(name, share, 0.0, 1.0);
        }

        let a = &mut self.alignment;
        for (name, share) in [
            ("alignment.base_alignment", &mut a.base_alignment),
            ("alignment.low_alignment", &mut a.low_alignment),
            ("alignment.confidence_drop", &mut a.confidence_drop),
            ("alignment.confidence_gain", &mut a.confidence_gain),
        ] {
            check(name, share, 0.0, 1.0);
        }
        let low = a.low_alignment;
        check("alignment.high_alignment", &mut a.high_alignment, low, 1.0);
        for (name, weight) in [
            ("alignment.commitment_penalty", &mut a.commitment_penalty),
            ("alignment.effort_penalty", &mut a.effort_penalty),
            ("alignment.risk_penalty", &mut a.risk_penalty),
            ("alignment.delivery_reward", &mut a.delivery_reward),
            ("alignment.mismatch_weight", &mut a.mismatch_weight),
        ] {
            check(name, weight, 0.0, 10.0);
        }

        let p = &mut self.probabilistic;
        check("probabilistic.steepness", &mut p.steepness, 0.1, 50.0);
        check("probabilistic.persistence_gain", &mut p.persistence_gain, 0.0, 2.0);
        check("probabilistic.variance", &mut p.variance, 0.0, 1.0);
        check("probabilistic.min_prob", &mut p.min_prob, 0.001, 0.5);
        check("probabilistic.max_prob", &mut p.max_prob, 0.5, 0.999);
        let headroom = p.max_prob - p.min_prob;
        check("probabilistic.floor_gain", &mut p.floor_gain, 0.0, headroom);

        let b = &mut self.belief;
        for (name, weight) in [
            ("belief.value_weight", &mut b.value_weight),
            ("belief.trust_weight", &mut b.trust_weight),
            ("belief.authority_weight", &mut b.authority_weight),
            ("belief.intent_weight", &mut b.intent_weight),
            ("belief.delay_weight", &mut b.delay_weight),
            ("belief.effort_weight", &mut b.effort_weight),
            ("belief.risk_weight", &mut b.risk_weight),
            ("belief.irreversibility_weight", &mut b.irreversibility_weight),
            ("belief.deficit_gain", &mut b.deficit_gain),
        ] {
            check(name, weight, 0.0, 10.0);
        }

        check(
            "attribution.primary_share",
            &mut self.attribution.primary_share,
            0.05,
            1.0,
        );

        let mut check_count = |field: &str, value: &mut i64, lo: i64, hi: i64| {
            let clamped = (*value).clamp(lo, hi);
            if clamped != *value {
                warn!(field, original = *value, clamped, "Configuration value clamped");
                warnings.push(ClampWarning {
                    field: field.to_string(),
                    original: *value as f64,
                    clamped: clamped as f64,
                });
                *value = clamped;
            }
        };
        check_count(
            "alignment.delay_threshold",
            &mut self.alignment.delay_threshold,
            0,
            MAX_DELAY_THRESHOLD,
        );
        check_count(
            "batch.worker_threads",
            &mut self.batch.worker_threads,
            1,
            MAX_WORKER_THREADS,
        );

        (self, warnings)
    }
}

/// Integer overrides are saturated into the field's representable range here;
/// the admissible range is enforced later by [`EngineConfig::validated`].
fn override_number(
    key: &str,
    current: &serde_json::Value,
    value: f64,
    warnings: &mut Vec<ClampWarning>,
) -> Result<serde_json::Value, EngineError> {
    let invalid = |reason: &str| EngineError::InvalidOverride {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    if current.is_u64() || current.is_i64() {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(invalid("expected an integer"));
        }
        // `seed` is the only unsigned integer field.
        if key == "seed" {
            let seed = saturate(key, value, 0.0, u64::MAX as f64, warnings);
            return Ok(serde_json::Value::from(seed as u64));
        }
        let count = saturate(key, value, i64::MIN as f64, i64::MAX as f64, warnings);
        return Ok(serde_json::Value::from(count as i64));
    }
    serde_json::Number::from_f64(value)
        .map(serde_json::Value::Number)
        .ok_or_else(|| invalid("not a finite number"))
}

fn saturate(
    key: &str,
    value: f64,
    lo: f64,
    hi: f64,
    warnings: &mut Vec<ClampWarning>,
) -> f64 {
    let clamped = value.clamp(lo, hi);
    if clamped != value {
        warn!(field = key, original = value, clamped, "Configuration value clamped");
        warnings.push(ClampWarning {
            field: key.to_string(),
            original: value,
            clamped,
        });
    }
    clamped
}
