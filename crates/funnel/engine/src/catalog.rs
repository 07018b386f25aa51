//! Canonical intent catalog and descriptor-based intent inference.
//!
//! Hosts with their own intent source hand frames straight to the runner;
//! this catalog covers the common case where only descriptors are available.

use funnel_types::{unit, Descriptor, DescriptorField, IntentFrame, ValueDeliveryStyle};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;

/// One catalog intent: the frame it produces plus how strongly each
/// descriptor field points towards it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentEntry {
    pub frame: IntentFrame,
    /// Signed weights applied to `field - 0.5`.
    #[serde(default)]
    pub affinity: Vec<(DescriptorField, f64)>,
}

impl IntentEntry {
    pub fn new(frame: IntentFrame) -> Self {
        Self {
            frame,
            affinity: Vec::new(),
        }
    }

    pub fn with_affinity(mut self, field: DescriptorField, weight: f64) -> Self {
        self.affinity.push((field, weight));
        self
    }

    pub fn id(&self) -> &str {
        &self.frame.intent
    }

    fn score(&self, descriptor: &Descriptor) -> f64 {
        self.affinity
            .iter()
            .map(|(field, weight)| weight * (descriptor.field(*field) - 0.5))
            .sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntentCatalog {
    entries: Vec<IntentEntry>,
}

impl Default for IntentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl IntentCatalog {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The five built-in intents.
    pub fn builtin() -> Self {
        use DescriptorField::*;
        use ValueDeliveryStyle::*;

        let entries = vec![
            IntentEntry::new(
                IntentFrame::new("quick_signup", Immediate).with_tolerances(0.3, 0.4, 0.5),
            )
            .with_affinity(IntentStrength, 0.6)
            .with_affinity(DigitalFluency, 0.4)
            .with_affinity(AgeBucket, -0.2),
            IntentEntry::new(
                IntentFrame::new("compare_options", Progressive).with_tolerances(0.6, 0.3, 0.3),
            )
            .with_affinity(PriceSensitivity, 0.7)
            .with_affinity(IntentStrength, -0.2),
            IntentEntry::new(
                IntentFrame::new("explore", Deferred).with_tolerances(0.4, 0.3, 0.2),
            )
            .with_affinity(IntentStrength, -0.7)
            .with_affinity(Aspiration, 0.2),
            IntentEntry::new(
                IntentFrame::new("secure_commitment", Progressive).with_tolerances(0.7, 0.6, 0.8),
            )
            .with_affinity(IntentStrength, 0.4)
            .with_affinity(RiskAttitude, 0.3)
            .with_affinity(SocioeconomicTier, 0.3),
            IntentEntry::new(
                IntentFrame::new("seek_reassurance", Deferred).with_tolerances(0.5, 0.2, 0.3),
            )
            .with_affinity(RiskAttitude, -0.5)
            .with_affinity(FamilyInfluence, 0.4)
            .with_affinity(AgeBucket, 0.2),
        ];
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(IntentEntry::id)
    }

    pub fn get(&self, id: &str) -> Option<&IntentFrame> {
        self.entries
            .iter()
            .find(|e| e.id() == id)
            .map(|e| &e.frame)
    }

    pub fn resolve(&self, id: &str) -> Result<IntentFrame, EngineError> {
        self.get(id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownIntent(id.to_string()))
    }

    /// Add an entry, replacing any entry with the same intent id.
    pub fn insert(&mut self, entry: IntentEntry) {
        match self.entries.iter_mut().find(|e| e.id() == entry.id()) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Pick the highest-scoring intent for `descriptor`.
    ///
    /// Ties go to the earlier catalog entry. Prior confidence grows with the
    /// descriptor's intent strength. Returns `None` for an empty catalog.
    pub fn infer(&self, descriptor: &Descriptor) -> Option<IntentFrame> {
        let mut best: Option<(&IntentEntry, f64)> = None;
        for entry in &self.entries {
            let score = entry.score(descriptor);
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((entry, score));
            }
        }

        let (entry, score) = best?;
        let strength = descriptor.field(DescriptorField::IntentStrength);
        debug!(
            individual_id = descriptor.id.as_str(),
            intent = entry.id(),
            score,
            "Intent inferred"
        );
        Some(
            entry
                .frame
                .clone()
                .with_prior_confidence(unit(0.3 + 0.5 * strength)),
        )
    }
}
