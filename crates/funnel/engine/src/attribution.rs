use funnel_types::{CauseFactor, CognitiveState, CostBreakdown, DominantFactor, FactorRole};

use crate::config::AttributionParams;

/// Rank the negative contributors of a dropping stage.
///
/// A factor whose share of total friction exceeds `primary_share` is primary
/// and the runner-up (if it contributed at all) secondary. Otherwise every
/// contributing factor is tagged multi-factor. Strongest first; ties keep the
/// fixed factor order.
///
/// A stage with no friction of its own is attributed to the load carried in
/// `state`: energy deficit, perceived effort and perceived risk. If that is
/// zero as well the drop is split evenly across those factors, so a DROP
/// always names at least one cause.
pub fn attribute(
    breakdown: &CostBreakdown,
    state: &CognitiveState,
    params: &AttributionParams,
) -> Vec<DominantFactor> {
    let stage_shares = shares(&breakdown.negative_contributions());
    if !stage_shares.is_empty() {
        return classify(&stage_shares, params);
    }

    let carried = [
        (CauseFactor::CognitiveLoad, state.energy_deficit()),
        (CauseFactor::Effort, state.perceived_effort),
        (CauseFactor::RiskLossAversion, state.perceived_risk),
    ];
    let carried_shares = shares(&carried);
    if !carried_shares.is_empty() {
        return classify(&carried_shares, params);
    }

    let even = 1.0 / carried.len() as f64;
    carried
        .iter()
        .map(|&(factor, _)| DominantFactor {
            factor,
            role: FactorRole::MultiFactor,
            share: even,
        })
        .collect()
}

/// Positive contributions as shares of their total, strongest first.
fn shares(contributions: &[(CauseFactor, f64)]) -> Vec<(CauseFactor, f64)> {
    let mut positive: Vec<_> = contributions
        .iter()
        .copied()
        .filter(|(_, value)| value.is_finite() && *value > 0.0)
        .collect();
    let total: f64 = positive.iter().map(|(_, value)| value).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    positive.sort_by(|a, b| b.1.total_cmp(&a.1));
    positive
        .into_iter()
        .map(|(factor, value)| (factor, value / total))
        .collect()
}

fn classify(shares: &[(CauseFactor, f64)], params: &AttributionParams) -> Vec<DominantFactor> {
    match shares {
        [(top, top_share), rest @ ..] if *top_share > params.primary_share => {
            let mut factors = vec![DominantFactor {
                factor: *top,
                role: FactorRole::Primary,
                share: *top_share,
            }];
            if let Some((runner_up, share)) = rest.first() {
                factors.push(DominantFactor {
                    factor: *runner_up,
                    role: FactorRole::Secondary,
                    share: *share,
                });
            }
            factors
        }
        _ => shares
            .iter()
            .map(|&(factor, share)| DominantFactor {
                factor,
                role: FactorRole::MultiFactor,
                share,
            })
            .collect(),
    }
}
