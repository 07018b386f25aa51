//! End-to-end test: reference scenarios.
//!
//! Verifies that:
//! - A neutral individual completes a low-friction flow with non-decreasing
//!   continuation probability
//! - A cautious individual drops at a risky irreversible stage with risk
//!   tagged as the primary cause
//! - A low-trust individual's belief collapses within three paperwork stages

use funnel_engine::{compile, EngineConfig, Flow, TrajectoryRunner};
use funnel_tests::{
    cautious_descriptor, low_friction_flow, low_trust_descriptor, neutral_descriptor,
    paperwork_flow, risky_commitment_flow,
};
use funnel_types::{ArrivalVariant, CauseFactor, Decision, FactorRole, TrajectoryOutcome};

// ---------------------------------------------------------------------------
// Low-friction flow
// ---------------------------------------------------------------------------

#[test]
fn neutral_completes_low_friction_flow_under_belief_policy() {
    let flow = Flow::new(low_friction_flow()).unwrap();
    let runner = TrajectoryRunner::new(EngineConfig::belief_collapse());
    let t = runner.run(&neutral_descriptor("a"), ArrivalVariant::Baseline, &flow, None);

    assert_eq!(t.outcome, TrajectoryOutcome::Completed);
    assert_eq!(t.traces.len(), 3);
    let beliefs: Vec<f64> = t.traces.iter().filter_map(|tr| tr.belief).collect();
    assert!(beliefs.windows(2).all(|w| w[1] >= w[0]), "{:?}", beliefs);
}

#[test]
fn neutral_low_friction_probabilities_never_decrease() {
    let flow = Flow::new(low_friction_flow()).unwrap();
    let mut completed = 0;
    for seed in 0..40 {
        let runner = TrajectoryRunner::new(EngineConfig::probabilistic().with_seed(seed));
        let t = runner.run(&neutral_descriptor("a"), ArrivalVariant::Baseline, &flow, None);
        let p = t.probabilities();
        assert!(p.windows(2).all(|w| w[1] >= w[0]), "seed {}: {:?}", seed, p);
        assert!(p.iter().all(|v| *v >= 0.9), "seed {}: {:?}", seed, p);
        if t.is_completed() {
            completed += 1;
        }
    }
    assert!(completed >= 30, "only {} of 40 completed", completed);
}

// ---------------------------------------------------------------------------
// Risky commitment
// ---------------------------------------------------------------------------

#[test]
fn cautious_drops_at_risky_stage_under_belief_policy() {
    let flow = Flow::new(risky_commitment_flow()).unwrap();
    let runner = TrajectoryRunner::new(EngineConfig::belief_collapse());
    let t = runner.run(&cautious_descriptor("b"), ArrivalVariant::Baseline, &flow, None);

    assert_eq!(t.dropped_at(), Some(0));
    let last = t.traces.last().unwrap();
    assert_eq!(last.decision, Decision::Drop);
    assert_eq!(last.dominant_factors[0].factor, CauseFactor::RiskLossAversion);
    assert_eq!(last.dominant_factors[0].role, FactorRole::Primary);
    assert!(last.dominant_factors[0].share > 0.4);
}

#[test]
fn cautious_risky_stage_sits_at_probability_floor() {
    let flow = Flow::new(risky_commitment_flow()).unwrap();
    let mut drops = 0;
    for seed in 0..30 {
        let runner = TrajectoryRunner::new(EngineConfig::probabilistic().with_seed(seed));
        let t = runner.run(&cautious_descriptor("b"), ArrivalVariant::Baseline, &flow, None);
        let trace = &t.traces[0];
        assert!(trace.probability <= 0.15 + 1e-9, "p = {}", trace.probability);
        if trace.decision == Decision::Drop {
            drops += 1;
            assert_eq!(
                trace.dominant_factors[0].factor,
                CauseFactor::RiskLossAversion
            );
            assert_eq!(trace.dominant_factors[0].role, FactorRole::Primary);
        }
    }
    assert!(drops > 0);
}

// ---------------------------------------------------------------------------
// Paperwork under low trust
// ---------------------------------------------------------------------------

#[test]
fn low_trust_belief_collapses_within_three_stages() {
    let descriptor = low_trust_descriptor("c");
    assert_eq!(compile(&descriptor).trust_baseline, 0.2);

    let flow = Flow::new(paperwork_flow()).unwrap();
    let runner = TrajectoryRunner::new(EngineConfig::belief_collapse());
    let t = runner.run(&descriptor, ArrivalVariant::Baseline, &flow, None);

    let dropped_at = t.dropped_at().expect("trajectory should drop");
    assert!(dropped_at <= 2);
    assert!(t.traces.last().unwrap().belief.unwrap() < 0.0);
    assert!(t.traces.iter().all(|tr| !tr.sampled));
}

#[test]
fn every_variant_yields_well_formed_trajectory() {
    let flow = Flow::new(funnel_tests::onboarding_flow()).unwrap();
    for config in [EngineConfig::probabilistic(), EngineConfig::belief_collapse()] {
        let runner = TrajectoryRunner::new(config.with_seed(3));
        for variant in ArrivalVariant::ALL {
            let t = runner.run(&neutral_descriptor("v"), variant, &flow, None);
            assert!(t.is_well_formed(flow.len()), "{} {}", variant, t.outcome);
            assert!(!t.is_errored());
        }
    }
}
