//! End-to-end test: configuration loading and calibration.
//!
//! Verifies that:
//! - A TOML file must name its decision policy
//! - Calibration is pure and rejects unknown parameters
//! - Calibrated parameters actually change simulated behavior
//! - Out-of-range integer counts are clamped with a warning

use funnel_engine::{
    BatchRunner, EngineConfig, EngineError, Flow, TrajectoryJob, TrajectoryRunner,
    MAX_WORKER_THREADS,
};
use funnel_tests::{onboarding_flow, population};
use funnel_types::{ArrivalVariant, DecisionPolicy};
use std::collections::BTreeMap;

const PRODUCT_CONFIG: &str = r#"
policy = "probabilistic"
seed = 7

[probabilistic]
steepness = 5.0
max_prob = 0.95

[batch]
worker_threads = 2
"#;

#[test]
fn toml_config_drives_a_batch() {
    let config = EngineConfig::from_toml_str(PRODUCT_CONFIG).unwrap();
    assert_eq!(config.policy, DecisionPolicy::Probabilistic);
    assert_eq!(config.batch.worker_threads, 2);

    let flow = Flow::new(onboarding_flow()).unwrap();
    let jobs = TrajectoryJob::cross(&population(6), &[ArrivalVariant::Baseline]);
    let report = BatchRunner::new(config).unwrap().run(&flow, &jobs);
    assert!(report
        .trajectories
        .iter()
        .flat_map(|t| t.probabilities())
        .all(|p| p <= 0.95));
}

#[test]
fn toml_without_policy_is_rejected() {
    let err = EngineConfig::from_toml_str("seed = 7\n").unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfig(_)));
}

#[test]
fn calibration_is_pure() {
    let base = EngineConfig::belief_collapse();
    let overrides = BTreeMap::from([
        ("belief.risk_weight".to_string(), 0.6),
        ("alignment.low_alignment".to_string(), 0.3),
    ]);
    let first = EngineConfig::calibrate(&base, &overrides).unwrap();
    let second = EngineConfig::calibrate(&base, &overrides).unwrap();
    assert_eq!(first, second);
    assert_eq!(base, EngineConfig::belief_collapse());
}

#[test]
fn unknown_parameter_is_rejected() {
    let overrides = BTreeMap::from([("belief.optimism".to_string(), 1.0)]);
    let err = EngineConfig::calibrate(&EngineConfig::belief_collapse(), &overrides).unwrap_err();
    assert!(matches!(err, EngineError::UnknownParameter(_)));
}

#[test]
fn heavier_risk_weight_never_helps_completion() {
    let flow = Flow::new(onboarding_flow()).unwrap();
    let jobs = TrajectoryJob::cross(&population(10), &ArrivalVariant::ALL);
    let base = EngineConfig::belief_collapse();

    let overrides = BTreeMap::from([("belief.risk_weight".to_string(), 1.0)]);
    let (harsh, warnings) = EngineConfig::calibrate(&base, &overrides).unwrap();
    assert!(warnings.is_empty());

    let lenient = BatchRunner::new(base).unwrap().run(&flow, &jobs).summary;
    let harsh = BatchRunner::new(harsh).unwrap().run(&flow, &jobs).summary;
    assert!(harsh.completed <= lenient.completed);
}

#[test]
fn clamped_override_is_reported() {
    let overrides = BTreeMap::from([("probabilistic.min_prob".to_string(), 0.0)]);
    let (effective, warnings) =
        EngineConfig::calibrate(&EngineConfig::probabilistic(), &overrides).unwrap();
    assert_eq!(effective.probabilistic.min_prob, 0.001);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].field, "probabilistic.min_prob");
}

#[test]
fn negative_and_oversized_counts_are_clamped_not_rejected() {
    let overrides = BTreeMap::from([
        ("alignment.delay_threshold".to_string(), -1.0),
        ("batch.worker_threads".to_string(), 1e10),
    ]);
    let (effective, warnings) =
        EngineConfig::calibrate(&EngineConfig::belief_collapse(), &overrides).unwrap();
    assert_eq!(effective.alignment.delay_threshold, 0);
    assert_eq!(effective.batch.worker_threads, MAX_WORKER_THREADS);
    let fields: Vec<_> = warnings.iter().map(|w| w.field.as_str()).collect();
    assert_eq!(fields, ["alignment.delay_threshold", "batch.worker_threads"]);

    let flow = Flow::new(onboarding_flow()).unwrap();
    let jobs = TrajectoryJob::cross(&population(4), &[ArrivalVariant::Baseline]);
    let report = BatchRunner::new(effective).unwrap().run(&flow, &jobs);
    assert_eq!(report.summary.errored, 0);
}

#[test]
fn toml_negative_delay_threshold_loads() {
    let config = EngineConfig::from_toml_str(
        "policy = \"belief_collapse\"\n\n[alignment]\ndelay_threshold = -1\n",
    )
    .unwrap();
    let runner = TrajectoryRunner::new(config);
    assert_eq!(runner.config().alignment.delay_threshold, 0);
    assert_eq!(runner.warnings().len(), 1);
    assert_eq!(runner.warnings()[0].field, "alignment.delay_threshold");
}
