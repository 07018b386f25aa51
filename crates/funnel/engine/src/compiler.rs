use funnel_types::{Descriptor, DescriptorField, LatentCoefficients};
use tracing::debug;

/// Compile a descriptor into its latent coefficients.
///
/// Each coefficient is a fixed affine combination of descriptor fields,
/// clamped into its declared range. Total and idempotent: any descriptor,
/// including an empty one, compiles.
pub fn compile(descriptor: &Descriptor) -> LatentCoefficients {
    let defaulted = descriptor.defaulted_fields();
    if !defaulted.is_empty() {
        debug!(
            individual_id = descriptor.id.as_str(),
            defaulted = defaulted.len(),
            "Descriptor fields substituted with neutral value"
        );
    }

    let tier = descriptor.field(DescriptorField::SocioeconomicTier);
    let fluency = descriptor.field(DescriptorField::DigitalFluency);
    let family = descriptor.field(DescriptorField::FamilyInfluence);
    let aspiration = descriptor.field(DescriptorField::Aspiration);
    let price = descriptor.field(DescriptorField::PriceSensitivity);
    let risk = descriptor.field(DescriptorField::RiskAttitude);
    let age = descriptor.field(DescriptorField::AgeBucket);
    let intent = descriptor.field(DescriptorField::IntentStrength);

    LatentCoefficients::clamped(
        0.2 + 0.45 * fluency + 0.15 * tier + 0.1 * aspiration - 0.1 * age,
        0.35 + 0.3 * age - 0.25 * fluency + 0.1 * price,
        0.2 + 0.5 * risk + 0.2 * tier - 0.2 * price,
        1.0 + 1.0 * price + 0.6 * (1.0 - risk) - 0.3 * tier,
        0.25 + 0.3 * fluency + 0.3 * aspiration - 0.1 * age,
        0.3 + 0.3 * family + 0.2 * tier + 0.2 * risk - 0.2 * price,
        0.1 + 0.3 * price + 0.2 * (1.0 - aspiration) + 0.1 * (1.0 - intent),
        0.2 + 0.3 * (1.0 - risk) + 0.2 * age + 0.2 * price,
        0.3 + 0.35 * aspiration + 0.35 * intent,
    )
}
