//! End-to-end test: reproducibility.
//!
//! Verifies that:
//! - Identical inputs produce identical trace sequences and JSON
//! - Batch output does not depend on the worker count
//! - The run seed is the only source of variation between runs

use funnel_engine::{BatchRunner, EngineConfig, Flow, TrajectoryJob, TrajectoryRunner};
use funnel_tests::{onboarding_flow, population};
use funnel_types::ArrivalVariant;

fn jobs() -> Vec<TrajectoryJob> {
    TrajectoryJob::cross(&population(12), &ArrivalVariant::ALL)
}

#[test]
fn repeated_runs_are_identical() {
    let flow = Flow::new(onboarding_flow()).unwrap();
    let runner = TrajectoryRunner::new(EngineConfig::probabilistic().with_seed(17));
    for descriptor in population(8) {
        let a = runner.run(&descriptor, ArrivalVariant::TiredLowEnergy, &flow, None);
        let b = runner.run(&descriptor, ArrivalVariant::TiredLowEnergy, &flow, None);
        assert_eq!(a, b);
        assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
    }
}

#[test]
fn batch_is_identical_across_worker_counts() {
    let flow = Flow::new(onboarding_flow()).unwrap();
    let jobs = jobs();
    let config = EngineConfig::probabilistic().with_seed(2024);

    let baseline = BatchRunner::new(config.clone()).unwrap().run(&flow, &jobs);
    for workers in [2, 4, 8] {
        let report = BatchRunner::new(config.clone().with_worker_threads(workers))
            .unwrap()
            .run(&flow, &jobs);
        assert_eq!(report, baseline, "diverged with {} workers", workers);
    }
}

#[test]
fn batch_preserves_job_order() {
    let flow = Flow::new(onboarding_flow()).unwrap();
    let jobs = jobs();
    let report = BatchRunner::new(EngineConfig::belief_collapse().with_worker_threads(4))
        .unwrap()
        .run(&flow, &jobs);
    for (job, trajectory) in jobs.iter().zip(&report.trajectories) {
        assert_eq!(job.descriptor.id, trajectory.individual_id);
        assert_eq!(job.variant, trajectory.variant);
    }
}

#[test]
fn belief_policy_ignores_run_seed() {
    let flow = Flow::new(onboarding_flow()).unwrap();
    let jobs = jobs();
    let a = BatchRunner::new(EngineConfig::belief_collapse().with_seed(1))
        .unwrap()
        .run(&flow, &jobs);
    let b = BatchRunner::new(EngineConfig::belief_collapse().with_seed(999))
        .unwrap()
        .run(&flow, &jobs);
    assert_eq!(a.trajectories, b.trajectories);
}

#[test]
fn trajectory_json_round_trips() {
    let flow = Flow::new(onboarding_flow()).unwrap();
    let runner = TrajectoryRunner::new(EngineConfig::probabilistic());
    let t = runner.run(&population(1)[0], ArrivalVariant::Browsing, &flow, None);
    let json = t.to_json().unwrap();
    let restored: funnel_types::Trajectory = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, t);
}
