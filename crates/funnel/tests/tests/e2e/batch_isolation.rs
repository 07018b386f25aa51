//! End-to-end test: batch isolation and error handling.
//!
//! Verifies that:
//! - An empty flow is rejected before anything runs
//! - A malformed individual yields an errored trajectory without aborting the batch
//! - Malformed descriptor fields fall back to neutral values
//! - Out-of-range stage attributes are clamped with warnings

use funnel_engine::{BatchRunner, EngineConfig, EngineError, Flow, TrajectoryJob};
use funnel_tests::{neutral_descriptor, onboarding_flow, population};
use funnel_types::{ArrivalVariant, Descriptor, StageDefinition, TrajectoryOutcome};

#[test]
fn empty_flow_is_fatal() {
    assert!(matches!(Flow::new(Vec::new()), Err(EngineError::EmptyFlow)));
}

#[test]
fn missing_id_is_errored_and_isolated() {
    let flow = Flow::new(onboarding_flow()).unwrap();
    let mut jobs = TrajectoryJob::cross(&population(5), &[ArrivalVariant::Baseline]);
    jobs.push(TrajectoryJob::new(Descriptor::new(""), ArrivalVariant::Urgent));

    let report = BatchRunner::new(EngineConfig::probabilistic().with_worker_threads(3))
        .unwrap()
        .run(&flow, &jobs);

    assert_eq!(report.trajectories.len(), 6);
    let errored = &report.trajectories[5];
    assert!(matches!(
        &errored.outcome,
        TrajectoryOutcome::Errored { reason } if reason.contains("individual id")
    ));
    assert!(errored.traces.is_empty());
    assert_eq!(report.summary.errored, 1);
    assert!(report.trajectories[..5].iter().all(|t| !t.is_errored()));
}

#[test]
fn malformed_fields_behave_as_neutral() {
    let flow = Flow::new(onboarding_flow()).unwrap();
    let mut broken = Descriptor::new("x");
    broken.fields.insert("aspiration".into(), f64::NAN);
    broken.fields.insert("digital_fluency".into(), f64::INFINITY);
    broken.fields.insert("shoe_size".into(), 44.0);

    let reference = neutral_descriptor("x");

    let runner = BatchRunner::new(EngineConfig::belief_collapse()).unwrap();
    let jobs = [
        TrajectoryJob::new(broken, ArrivalVariant::Baseline),
        TrajectoryJob::new(reference, ArrivalVariant::Baseline),
    ];
    let report = runner.run(&flow, &jobs);
    assert_eq!(report.trajectories[0], report.trajectories[1]);
}

#[test]
fn out_of_range_stage_values_are_clamped_with_warnings() {
    let flow = Flow::new(vec![
        StageDefinition::new("a").with_effort_demand(3.0),
        StageDefinition::new("b").with_steps_to_value(-1),
    ])
    .unwrap();
    assert_eq!(flow.warnings().len(), 2);
    assert_eq!(flow.stages()[0].effort_demand, 1.0);
    assert_eq!(flow.stages()[1].steps_to_value, 0);

    let job = TrajectoryJob::new(neutral_descriptor("n"), ArrivalVariant::Baseline);
    let report = BatchRunner::new(EngineConfig::probabilistic())
        .unwrap()
        .run(&flow, &[job]);
    assert!(report.trajectories[0].is_well_formed(2));
}

#[test]
fn summary_accounts_for_every_trajectory() {
    let flow = Flow::new(onboarding_flow()).unwrap();
    let jobs = TrajectoryJob::cross(&population(10), &ArrivalVariant::ALL);
    let report = BatchRunner::new(EngineConfig::belief_collapse())
        .unwrap()
        .run(&flow, &jobs);
    let s = &report.summary;
    assert_eq!(s.total, 80);
    assert_eq!(s.completed + s.dropped + s.errored, s.total);
    assert_eq!(s.drops_by_stage.values().sum::<usize>(), s.dropped);
    assert!(report
        .trajectories
        .iter()
        .all(|t| t.is_well_formed(flow.len())));
}
