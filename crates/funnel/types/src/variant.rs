use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TypesError;

/// Named arrival-mood archetype.
///
/// A variant is a deterministic offset applied to an individual's baseline
/// state, so the same person can be simulated under each mood without any
/// random sampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalVariant {
    Baseline,
    FreshMotivated,
    TiredLowEnergy,
    Distrustful,
    Browsing,
    Urgent,
    PriceSensitive,
    DigitallyConfident,
}

impl ArrivalVariant {
    pub const ALL: [ArrivalVariant; 8] = [
        Self::Baseline,
        Self::FreshMotivated,
        Self::TiredLowEnergy,
        Self::Distrustful,
        Self::Browsing,
        Self::Urgent,
        Self::PriceSensitive,
        Self::DigitallyConfident,
    ];

    /// Stable identifier, also used to key seed streams.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::FreshMotivated => "fresh_motivated",
            Self::TiredLowEnergy => "tired_low_energy",
            Self::Distrustful => "distrustful",
            Self::Browsing => "browsing",
            Self::Urgent => "urgent",
            Self::PriceSensitive => "price_sensitive",
            Self::DigitallyConfident => "digitally_confident",
        }
    }
}

impl std::fmt::Display for ArrivalVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for ArrivalVariant {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' ', '/'], "_");
        Self::ALL
            .into_iter()
            .find(|variant| variant.id() == normalized)
            .ok_or_else(|| TypesError::UnknownVariant(s.trim().to_string()))
    }
}
