pub mod classifier;
pub mod forecast;
pub mod projection;

pub use classifier::{classify, ClassifierConfig, RegimeModel, MIN_OBSERVATIONS};
pub use forecast::build_forecast;
pub use projection::{
    expected_return_30d, expected_return_over, find_holding_horizon, ProjectionOutcome,
};
