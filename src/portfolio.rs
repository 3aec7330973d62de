use crate::model::decision::PortfolioDecision;
use crate::model::plan::{Plan, TradingSignal};

const CONCENTRATED_BUY_STRENGTH: f64 = 0.7;
const REBALANCE_STRENGTH: f64 = 0.55;

/// Rank the complete per-cycle plan set and select one portfolio action.
///
/// The caller guarantees the set is complete for the cycle; an empty set
/// degrades to a HOLD decision with an explicit reason. When a buy or
/// rebalance has no fundable counterpart the decision likewise degrades to
/// a no-op rather than failing.
pub fn decide(plans: &[Plan]) -> PortfolioDecision {
    let mut ranked: Vec<&Plan> = plans.iter().collect();
    ranked.sort_by(|a, b| {
        b.risk_adjusted_score
            .partial_cmp(&a.risk_adjusted_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let Some(top) = ranked.first() else {
        return PortfolioDecision::Hold {
            reasoning: "No plans received this cycle. Holding positions.".to_string(),
        };
    };

    for (rank, plan) in ranked.iter().enumerate() {
        tracing::info!(
            rank = rank + 1,
            asset = %plan.asset,
            score = plan.risk_adjusted_score,
            signal = plan.trading_signal.as_str(),
            "Risk-adjusted ranking"
        );
    }

    let wants_buy = top.trading_signal == TradingSignal::Buy
        && top.signal_strength > CONCENTRATED_BUY_STRENGTH;
    let wants_rebalance = !wants_buy && top.signal_strength > REBALANCE_STRENGTH;

    if !wants_buy && !wants_rebalance {
        return PortfolioDecision::Hold {
            reasoning: "No signals strong enough to justify a trade. Holding positions."
                .to_string(),
        };
    }

    let Some(funding) = funding_asset(plans, &top.asset) else {
        return PortfolioDecision::Hold {
            reasoning: format!(
                "Cannot identify a suitable asset to fund a position in {}. No trade executed.",
                top.asset
            ),
        };
    };

    if wants_buy {
        PortfolioDecision::ConcentratedBuy {
            primary_asset: top.asset.clone(),
            funding_asset: funding,
            reasoning: format!(
                "Strong BUY signal for {} with score {:.2}",
                top.asset, top.risk_adjusted_score
            ),
        }
    } else {
        PortfolioDecision::Rebalance {
            primary_asset: top.asset.clone(),
            funding_asset: funding,
            reasoning: format!("Good opportunity to rebalance towards {}", top.asset),
        }
    }
}

/// Lowest-scored plan excluding the primary asset.
fn funding_asset(plans: &[Plan], primary: &str) -> Option<String> {
    plans
        .iter()
        .filter(|p| p.asset != primary)
        .min_by(|a, b| {
            a.risk_adjusted_score
                .partial_cmp(&b.risk_adjusted_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|p| p.asset.clone())
}
