use serde::{Deserialize, Serialize};

/// Position action recommended for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Invest,
    Sell,
    Hold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradingSignal {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "HOLD")]
    Hold,
}

impl TradingSignal {
    pub fn as_str(self) -> &'static str {
        match self {
            TradingSignal::Buy => "BUY",
            TradingSignal::Sell => "SELL",
            TradingSignal::Hold => "HOLD",
        }
    }

    pub fn action(self) -> TradeAction {
        match self {
            TradingSignal::Buy => TradeAction::Invest,
            TradingSignal::Sell => TradeAction::Sell,
            TradingSignal::Hold => TradeAction::Hold,
        }
    }
}

/// Scored trading plan for one asset, produced by the scorer from an
/// [`AssetForecast`](crate::model::forecast::AssetForecast) plus the user
/// goal. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub asset: String,
    pub action: TradeAction,
    pub hold_duration_days: u32,
    pub projected_return: f64,
    pub confidence: f64,
    pub risk_adjusted_score: f64,
    pub momentum_factor: f64,
    pub volatility_opportunity: f64,
    pub trading_signal: TradingSignal,
    pub signal_strength: f64,
    pub reasoning: String,
}

/// User goal driving projection and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Target cumulative return as a multiplier, e.g. 1.1 for +10%.
    pub target_return: f64,
    pub time_horizon_days: u32,
}

impl Default for Goal {
    fn default() -> Self {
        Self {
            target_return: 1.1,
            time_horizon_days: 60,
        }
    }
}
