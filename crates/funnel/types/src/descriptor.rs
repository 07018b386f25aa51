use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value substituted for any missing or malformed descriptor field.
pub const NEUTRAL_FIELD_VALUE: f64 = 0.5;

/// Canonical descriptor fields read by the compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorField {
    SocioeconomicTier,
    DigitalFluency,
    FamilyInfluence,
    Aspiration,
    PriceSensitivity,
    RiskAttitude,
    AgeBucket,
    IntentStrength,
}

impl DescriptorField {
    pub const ALL: [DescriptorField; 8] = [
        Self::SocioeconomicTier,
        Self::DigitalFluency,
        Self::FamilyInfluence,
        Self::Aspiration,
        Self::PriceSensitivity,
        Self::RiskAttitude,
        Self::AgeBucket,
        Self::IntentStrength,
    ];

    /// Key used in the descriptor's field map.
    pub fn key(&self) -> &'static str {
        match self {
            Self::SocioeconomicTier => "socioeconomic_tier",
            Self::DigitalFluency => "digital_fluency",
            Self::FamilyInfluence => "family_influence",
            Self::Aspiration => "aspiration",
            Self::PriceSensitivity => "price_sensitivity",
            Self::RiskAttitude => "risk_attitude",
            Self::AgeBucket => "age_bucket",
            Self::IntentStrength => "intent_strength",
        }
    }
}

impl std::fmt::Display for DescriptorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Normalized behavioral-trait record for one simulated individual.
///
/// Fields are read through [`Descriptor::field`], which never fails: missing,
/// non-finite or out-of-range values come back as a value in `[0, 1]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Individual id, used to key traces and seed streams.
    pub id: String,
    /// Raw field values as supplied by the population source.
    #[serde(default)]
    pub fields: BTreeMap<String, f64>,
}

impl Descriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Descriptor with every canonical field at the neutral value.
    pub fn neutral(id: impl Into<String>) -> Self {
        let mut descriptor = Self::new(id);
        for field in DescriptorField::ALL {
            descriptor = descriptor.with(field, NEUTRAL_FIELD_VALUE);
        }
        descriptor
    }

    pub fn with(mut self, field: DescriptorField, value: f64) -> Self {
        self.fields.insert(field.key().to_string(), value);
        self
    }

    /// Read a canonical field, normalized into `[0, 1]`.
    pub fn field(&self, field: DescriptorField) -> f64 {
        match self.fields.get(field.key()) {
            Some(value) if value.is_finite() => value.clamp(0.0, 1.0),
            _ => NEUTRAL_FIELD_VALUE,
        }
    }

    /// Canonical fields that are absent or not finite.
    pub fn defaulted_fields(&self) -> Vec<DescriptorField> {
        DescriptorField::ALL
            .into_iter()
            .filter(|field| {
                !matches!(self.fields.get(field.key()), Some(value) if value.is_finite())
            })
            .collect()
    }
}
