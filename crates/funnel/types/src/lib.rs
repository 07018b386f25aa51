//! Shared data model for the funnel decision engine.
//!
//! Everything the engine reads (descriptors, stage definitions, intent frames)
//! and everything it emits (decision traces, trajectories) lives here so that
//! population, flow and intent sources can depend on the types without pulling
//! in the engine itself.
//!
//! # Key Types
//!
//! - [`Descriptor`]: normalized trait record for one simulated individual
//! - [`LatentCoefficients`]: bounded behavioral coefficients compiled from a descriptor
//! - [`ArrivalVariant`]: deterministic arrival-mood archetype
//! - [`CognitiveState`]: the per-stage internal state of an individual
//! - [`StageDefinition`]: one flow step with its behavioral signals
//! - [`IntentFrame`]: inferred goal plus tolerance thresholds
//! - [`DecisionTrace`] / [`Trajectory`]: the only externally visible artifacts of a run

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]
#![warn(rust_2018_idioms)]

pub mod coefficients;
pub mod descriptor;
pub mod error;
pub mod intent;
pub mod stage;
pub mod state;
pub mod trace;
pub mod variant;

pub use coefficients::{CoefficientRange, LatentCoefficients};
pub use descriptor::{Descriptor, DescriptorField};
pub use error::TypesError;
pub use intent::{IntentFrame, ValueDeliveryStyle};
pub use stage::StageDefinition;
pub use state::{CognitiveState, StateSnapshot};
pub use trace::{
    CauseFactor, CostBreakdown, Decision, DecisionPolicy, DecisionTrace, DominantFactor,
    FactorRole, IntentSnapshot, Trajectory, TrajectoryOutcome,
};
pub use variant::ArrivalVariant;

/// Clamp a value into `[lo, hi]`, mapping non-finite input to the nearest
/// valid bound (`NaN` and `-inf` go to `lo`, `+inf` to `hi`).
pub fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() {
        lo
    } else {
        value.clamp(lo, hi)
    }
}

/// Clamp into the unit interval, see [`clamp_finite`].
pub fn unit(value: f64) -> f64 {
    clamp_finite(value, 0.0, 1.0)
}
