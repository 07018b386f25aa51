use funnel_types::{
    ArrivalVariant, Decision, DecisionPolicy, DecisionTrace, Descriptor, IntentFrame,
    IntentSnapshot, Trajectory, TrajectoryOutcome,
};
use tracing::{debug, warn};

use crate::alignment::align;
use crate::attribution::attribute;
use crate::compiler::compile;
use crate::config::{ClampWarning, EngineConfig};
use crate::decision::{decide, DecisionInput, PolicyParams};
use crate::error::EngineError;
use crate::flow::Flow;
use crate::modifiers::BehavioralModifiers;
use crate::seed::SeedKey;
use crate::transition::{step, StepContext};
use crate::variants::{initial_state, VariantProfile};

/// Drives one individual through a flow.
///
/// Holds only the immutable configuration, so one runner can be shared
/// across threads.
#[derive(Clone, Debug)]
pub struct TrajectoryRunner {
    config: EngineConfig,
    warnings: Vec<ClampWarning>,
}

impl TrajectoryRunner {
    /// Create a runner. The configuration is validated (and clamped) once.
    pub fn new(config: EngineConfig) -> Self {
        let (config, warnings) = config.validated();
        Self { config, warnings }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Values clamped while validating the configuration.
    pub fn warnings(&self) -> &[ClampWarning] {
        &self.warnings
    }

    fn policy_params(&self) -> PolicyParams<'_> {
        match self.config.policy {
            DecisionPolicy::Probabilistic => {
                PolicyParams::Probabilistic(&self.config.probabilistic)
            }
            DecisionPolicy::BeliefCollapse => PolicyParams::BeliefCollapse(&self.config.belief),
        }
    }

    /// Simulate one (descriptor, variant) pair.
    ///
    /// Never fails: an internal error yields an errored trajectory carrying
    /// the traces emitted before the error.
    pub fn run(
        &self,
        descriptor: &Descriptor,
        variant: ArrivalVariant,
        flow: &Flow,
        intent: Option<&IntentFrame>,
    ) -> Trajectory {
        let mut traces = Vec::with_capacity(flow.len());
        match self.simulate(descriptor, variant, flow, intent, &mut traces) {
            Ok(outcome) => Trajectory {
                individual_id: descriptor.id.clone(),
                variant,
                policy: self.config.policy,
                traces,
                outcome,
            },
            Err(e) => {
                warn!(
                    individual_id = descriptor.id.as_str(),
                    variant = variant.id(),
                    error = %e,
                    "Trajectory errored"
                );
                Trajectory::errored(
                    descriptor.id.clone(),
                    variant,
                    self.config.policy,
                    traces,
                    e.to_string(),
                )
            }
        }
    }

    fn simulate(
        &self,
        descriptor: &Descriptor,
        variant: ArrivalVariant,
        flow: &Flow,
        intent: Option<&IntentFrame>,
        traces: &mut Vec<DecisionTrace>,
    ) -> Result<TrajectoryOutcome, EngineError> {
        if descriptor.id.trim().is_empty() {
            return Err(EngineError::MissingIndividualId);
        }

        let coefficients = compile(descriptor);
        let modifiers =
            BehavioralModifiers::derive(&coefficients, &VariantProfile::for_variant(variant));
        let mut state = initial_state(&coefficients, variant, intent, &self.config.initial);
        let policy = self.policy_params();

        let stages = flow.stages();
        for (index, stage) in stages.iter().enumerate() {
            let ctx = StepContext {
                stage,
                previous: index.checked_sub(1).map(|i| &stages[i]),
                index,
                total: stages.len(),
                coefficients: &coefficients,
                modifiers: &modifiers,
            };
            let stepped = step(&state, &ctx, &self.config.transition);

            let alignment = align(
                intent,
                stage,
                stepped.progress,
                &stepped.state,
                &self.config.alignment,
            );
            let mut next = stepped.state;
            next.intent_confidence = alignment.confidence;
            let mut breakdown = stepped.breakdown;
            breakdown.intent_mismatch = alignment.mismatch;

            let output = decide(
                &DecisionInput {
                    state: &next,
                    prior_belief: state.belief,
                    stage,
                    breakdown: &breakdown,
                    progress: stepped.progress,
                    delay_rate: stepped.delay_rate,
                    trust_baseline: coefficients.trust_baseline,
                    seed: SeedKey::new(self.config.seed, &descriptor.id, variant, index),
                },
                policy,
            );
            if let Some(belief) = output.belief {
                next.belief = belief;
            }
            if !next.is_finite() || !output.probability.is_finite() {
                return Err(EngineError::NonFiniteState { stage_index: index });
            }

            let dominant_factors = match output.decision {
                Decision::Drop => attribute(&breakdown, &next, &self.config.attribution),
                Decision::Continue => Vec::new(),
            };

            debug!(
                individual_id = descriptor.id.as_str(),
                variant = variant.id(),
                stage_id = stage.id.as_str(),
                stage_index = index,
                decision = %output.decision,
                probability = output.probability,
                "Stage decided"
            );

            traces.push(DecisionTrace {
                individual_id: descriptor.id.clone(),
                stage_id: stage.id.clone(),
                stage_index: index,
                decision: output.decision,
                probability: output.probability,
                sampled: output.sampled,
                state: next.snapshot(),
                intent: IntentSnapshot {
                    intent: intent.map(|frame| frame.intent.clone()),
                    alignment: alignment.alignment,
                    confidence: alignment.confidence,
                },
                dominant_factors,
                breakdown,
                belief: output.belief,
            });

            if output.decision == Decision::Drop {
                return Ok(TrajectoryOutcome::Dropped {
                    stage_index: index,
                    stage_id: stage.id.clone(),
                });
            }
            state = next;
        }

        Ok(TrajectoryOutcome::Completed)
    }
}
