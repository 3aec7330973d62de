use crate::markov::find_holding_horizon;
use crate::model::forecast::AssetForecast;
use crate::model::plan::{Goal, Plan, TradeAction, TradingSignal};

const MOMENTUM_BUY_THRESHOLD: f64 = 0.3;
const MOMENTUM_SELL_THRESHOLD: f64 = -0.3;
const RETURN_30D_BUY_THRESHOLD: f64 = 0.02;
const NEUTRAL_VOLATILITY_SCORE: f64 = 0.5;
const MAX_BUY_HOLD_DAYS: u32 = 60;
const NON_BUY_HOLD_DAYS: u32 = 14;

/// Combine momentum, projected return, and confidence into a risk-adjusted
/// score and a discrete trading signal for one asset.
pub fn score_forecast(forecast: &AssetForecast, goal: &Goal) -> Plan {
    let momentum = forecast.trend_momentum;
    let r30 = forecast.expected_return_30d;

    let momentum_score = ((momentum + 1.0) / 2.0).clamp(0.0, 1.0);
    let return_score = (r30 * 5.0).clamp(0.0, 1.0);
    let risk_adjusted_score = (0.4 * momentum_score
        + 0.4 * return_score
        + 0.2 * NEUTRAL_VOLATILITY_SCORE)
        * forecast.confidence;

    let (trading_signal, signal_strength, reasoning) =
        if momentum > MOMENTUM_BUY_THRESHOLD && r30 > RETURN_30D_BUY_THRESHOLD {
            (
                TradingSignal::Buy,
                (0.7 * momentum + 15.0 * r30).clamp(0.0, 1.0),
                format!(
                    "Strong upward momentum ({:.2}) with good expected return ({:.2}%)",
                    momentum,
                    r30 * 100.0
                ),
            )
        } else if momentum < MOMENTUM_SELL_THRESHOLD {
            (
                TradingSignal::Sell,
                (0.7 * momentum.abs()).clamp(0.0, 1.0),
                format!("Downward momentum detected ({:.2})", momentum),
            )
        } else {
            (
                TradingSignal::Hold,
                0.5,
                "No strong signals detected".to_string(),
            )
        };

    let hold_duration_days = match trading_signal {
        TradingSignal::Buy => goal.time_horizon_days.min(MAX_BUY_HOLD_DAYS),
        _ => NON_BUY_HOLD_DAYS,
    };
    let projected_return = 1.0 + r30 * (hold_duration_days as f64 / 30.0);

    // When some horizon within the goal reaches the target, the state
    // probabilities there are the better confidence estimate; otherwise the
    // data-quality confidence stands.
    let confidence = match find_holding_horizon(
        &forecast.matrix,
        &forecast.stats,
        forecast.last_state,
        goal.target_return,
        goal.time_horizon_days,
    ) {
        Some(outcome) => outcome.confidence.clamp(0.0, 1.0),
        None => forecast.confidence,
    };

    Plan {
        asset: forecast.asset.clone(),
        action: trading_signal.action(),
        hold_duration_days,
        projected_return,
        confidence,
        risk_adjusted_score,
        momentum_factor: momentum,
        volatility_opportunity: NEUTRAL_VOLATILITY_SCORE,
        trading_signal,
        signal_strength,
        reasoning,
    }
}

/// Fixed fallback plan for an asset whose data could not support analysis.
/// Never an error: the cycle still fans in a plan for every asset.
pub fn default_plan(asset: &str, cause: &str) -> Plan {
    Plan {
        asset: asset.to_string(),
        action: TradeAction::Hold,
        hold_duration_days: 30,
        projected_return: 1.02,
        confidence: 0.5,
        risk_adjusted_score: 0.5,
        momentum_factor: 0.0,
        volatility_opportunity: 0.5,
        trading_signal: TradingSignal::Hold,
        signal_strength: 0.5,
        reasoning: format!("Default analysis due to: {cause}"),
    }
}
