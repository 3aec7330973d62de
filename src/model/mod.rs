pub mod decision;
pub mod forecast;
pub mod plan;
pub mod price;
pub mod regime;

pub use decision::PortfolioDecision;
pub use forecast::AssetForecast;
pub use plan::{Goal, Plan, TradeAction, TradingSignal};
pub use price::{PricePoint, PriceSeries};
pub use regime::{
    ConfidenceInterval, StateLabel, StateStatistics, TransitionMatrix, STATE_COUNT,
};
