use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TypesError;
use crate::unit;

/// How the individual expects value to be delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueDeliveryStyle {
    /// Wants to see value on the first screens.
    Immediate,
    /// Accepts value that accrues over the flow.
    Progressive,
    /// Willing to wait until the end.
    Deferred,
}

impl ValueDeliveryStyle {
    /// Minimum explicit value a stage must show to count as "delivering".
    pub fn delivery_threshold(&self) -> f64 {
        match self {
            Self::Immediate => 0.6,
            Self::Progressive => 0.4,
            Self::Deferred => 0.25,
        }
    }
}

impl FromStr for ValueDeliveryStyle {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "progressive" => Ok(Self::Progressive),
            "deferred" => Ok(Self::Deferred),
            other => Err(TypesError::UnknownDeliveryStyle(other.to_string())),
        }
    }
}

/// Inferred goal of an individual plus the thresholds it tolerates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentFrame {
    /// Canonical intent id from the intent catalog.
    pub intent: String,
    pub effort_tolerance: f64,
    pub risk_tolerance: f64,
    /// Commitment a stage may demand before the intent feels violated.
    pub commitment_threshold: f64,
    pub value_style: ValueDeliveryStyle,
    /// Starting intent confidence.
    #[serde(default = "default_prior_confidence")]
    pub prior_confidence: f64,
}

fn default_prior_confidence() -> f64 {
    0.5
}

impl IntentFrame {
    pub fn new(intent: impl Into<String>, value_style: ValueDeliveryStyle) -> Self {
        Self {
            intent: intent.into(),
            effort_tolerance: 0.5,
            risk_tolerance: 0.5,
            commitment_threshold: 0.5,
            value_style,
            prior_confidence: default_prior_confidence(),
        }
    }

    pub fn with_tolerances(mut self, effort: f64, risk: f64, commitment: f64) -> Self {
        self.effort_tolerance = effort;
        self.risk_tolerance = risk;
        self.commitment_threshold = commitment;
        self
    }

    pub fn with_prior_confidence(mut self, confidence: f64) -> Self {
        self.prior_confidence = confidence;
        self
    }

    /// Copy with every threshold clamped into `[0, 1]`.
    pub fn bounded(&self) -> Self {
        Self {
            intent: self.intent.clone(),
            effort_tolerance: unit(self.effort_tolerance),
            risk_tolerance: unit(self.risk_tolerance),
            commitment_threshold: unit(self.commitment_threshold),
            value_style: self.value_style,
            prior_confidence: unit(self.prior_confidence),
        }
    }
}
