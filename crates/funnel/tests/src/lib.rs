//! Shared fixtures for the funnel integration and property tests.

use funnel_types::{Descriptor, DescriptorField, StageDefinition};

/// Every canonical field at its neutral value.
pub fn neutral_descriptor(id: &str) -> Descriptor {
    Descriptor::neutral(id)
}

/// Maximally price sensitive and risk averse.
pub fn cautious_descriptor(id: &str) -> Descriptor {
    Descriptor::neutral(id)
        .with(DescriptorField::PriceSensitivity, 1.0)
        .with(DescriptorField::RiskAttitude, 0.0)
}

/// Compiles to the minimum trust baseline.
pub fn low_trust_descriptor(id: &str) -> Descriptor {
    Descriptor::neutral(id)
        .with(DescriptorField::FamilyInfluence, 0.0)
        .with(DescriptorField::SocioeconomicTier, 0.0)
        .with(DescriptorField::RiskAttitude, 0.0)
        .with(DescriptorField::PriceSensitivity, 1.0)
}

/// Three low-friction stages, value rising to 0.9 at the end.
pub fn low_friction_flow() -> Vec<StageDefinition> {
    [("welcome", 2, 0.5), ("profile", 1, 0.6), ("dashboard", 0, 0.9)]
        .into_iter()
        .map(|(id, steps, value)| {
            StageDefinition::new(id)
                .with_cognitive_demand(0.1)
                .with_effort_demand(0.1)
                .with_risk_signal(0.1)
                .with_steps_to_value(steps)
                .with_explicit_value(value)
                .with_reassurance(0.5)
                .with_authority(0.5)
        })
        .collect()
}

/// A single irreversible, risky commitment with nothing shown in return.
pub fn risky_commitment_flow() -> Vec<StageDefinition> {
    vec![StageDefinition::new("mandate")
        .with_description("Authorize recurring debit")
        .with_risk_signal(0.9)
        .with_irreversibility(0.8)
        .with_cognitive_demand(0.3)
        .with_effort_demand(0.3)
        .with_steps_to_value(3)]
}

/// Effortful paperwork with value far away.
pub fn paperwork_flow() -> Vec<StageDefinition> {
    ["documents", "address", "employment"]
        .into_iter()
        .map(|id| {
            StageDefinition::new(id)
                .with_effort_demand(0.8)
                .with_cognitive_demand(0.3)
                .with_risk_signal(0.2)
                .with_steps_to_value(5)
        })
        .collect()
}

/// A typical six-step fintech onboarding.
pub fn onboarding_flow() -> Vec<StageDefinition> {
    vec![
        StageDefinition::new("landing")
            .with_explicit_value(0.4)
            .with_steps_to_value(4)
            .with_authority(0.6),
        StageDefinition::new("phone_otp")
            .with_effort_demand(0.3)
            .with_cognitive_demand(0.2)
            .with_steps_to_value(3),
        StageDefinition::new("pan_kyc")
            .with_effort_demand(0.5)
            .with_cognitive_demand(0.4)
            .with_risk_signal(0.5)
            .with_irreversibility(0.3)
            .with_steps_to_value(2)
            .with_reassurance(0.4),
        StageDefinition::new("bank_link")
            .with_risk_signal(0.7)
            .with_irreversibility(0.5)
            .with_effort_demand(0.3)
            .with_steps_to_value(1)
            .with_reassurance(0.5)
            .with_authority(0.5),
        StageDefinition::new("plan_preview")
            .with_explicit_value(0.8)
            .with_cognitive_demand(0.3),
        StageDefinition::new("first_payment")
            .with_risk_signal(0.6)
            .with_irreversibility(0.9)
            .with_explicit_value(0.9)
            .with_reassurance(0.3),
    ]
}

/// A small deterministic population spanning price sensitivity and risk attitude.
pub fn population(size: usize) -> Vec<Descriptor> {
    let denominator = size.saturating_sub(1).max(1) as f64;
    (0..size)
        .map(|i| {
            let t = i as f64 / denominator;
            Descriptor::neutral(format!("individual-{:03}", i))
                .with(DescriptorField::PriceSensitivity, t)
                .with(DescriptorField::RiskAttitude, 1.0 - t)
                .with(DescriptorField::DigitalFluency, 0.3 + 0.4 * t)
                .with(DescriptorField::AgeBucket, (i % 4) as f64 / 3.0)
        })
        .collect()
}
