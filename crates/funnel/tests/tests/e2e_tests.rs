#[path = "e2e/scenarios.rs"]
mod scenarios;

#[path = "e2e/determinism.rs"]
mod determinism;

#[path = "e2e/batch_isolation.rs"]
mod batch_isolation;

#[path = "e2e/calibration.rs"]
mod calibration;

#[path = "e2e/intent_alignment.rs"]
mod intent_alignment;
