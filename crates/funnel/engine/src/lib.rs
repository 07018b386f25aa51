#![deny(unsafe_code)]
//! # funnel-engine
//!
//! Per-individual decision simulation for multi-step product flows.
//!
//! A descriptor is compiled into bounded latent coefficients, combined with
//! an arrival variant into a starting cognitive state, and walked through
//! the flow one stage at a time. Each stage produces a cost/yield breakdown,
//! an intent-alignment update and a CONTINUE/DROP decision under exactly one
//! [`DecisionPolicy`](funnel_types::DecisionPolicy). The only artifacts that
//! leave the engine are [`Trajectory`](funnel_types::Trajectory) values.
//!
//! The engine is a pure function of (descriptor, variant, flow, config): it
//! performs no I/O and all randomness comes from keyed seed streams, so a
//! [`BatchRunner`] gives bit-identical output for any worker count.

pub mod alignment;
pub mod attribution;
pub mod batch;
pub mod catalog;
pub mod compiler;
pub mod config;
pub mod decision;
pub mod error;
pub mod flow;
pub mod modifiers;
pub mod runner;
pub mod seed;
pub mod transition;
pub mod variants;

pub use alignment::{align, AlignmentOutcome};
pub use attribution::attribute;
pub use batch::{BatchReport, BatchRunner, BatchSummary, TrajectoryJob};
pub use catalog::{IntentCatalog, IntentEntry};
pub use compiler::compile;
pub use config::{
    AlignmentParams, AttributionParams, BatchParams, BeliefParams, ClampWarning, EngineConfig,
    InitialParams, ProbabilisticParams, TransitionParams, MAX_DELAY_THRESHOLD,
    MAX_WORKER_THREADS,
};
pub use decision::{continuation_probability, decide, DecisionInput, DecisionOutput, PolicyParams};
pub use error::EngineError;
pub use flow::Flow;
pub use modifiers::BehavioralModifiers;
pub use runner::TrajectoryRunner;
pub use seed::{SeedChannel, SeedKey};
pub use transition::{step, StepContext, StepOutcome};
pub use variants::{initial_state, VariantProfile};
