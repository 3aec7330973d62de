use serde::{Deserialize, Serialize};

use crate::model::regime::{ConfidenceInterval, StateLabel, StateStatistics, TransitionMatrix, STATE_COUNT};

/// Complete per-asset forecast produced by one classification run.
/// Immutable after creation; passed by message to the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetForecast {
    pub asset: String,
    pub matrix: TransitionMatrix,
    pub stats: StateStatistics,
    pub last_state: StateLabel,
    /// SMA-20 vs SMA-50 trend momentum in [-1, 1].
    pub trend_momentum: f64,
    /// Data-quality confidence in [0, 1].
    pub confidence: f64,
    /// Unconditional 30-day expected return (day-by-day propagation).
    pub expected_return_30d: f64,
    /// Recent-volatility risk score in [0, 1].
    pub risk_score: f64,
    /// Recent mean return relative to the overall mean.
    pub relative_strength: f64,
    /// Wilson intervals per transition pair, where defined.
    pub intervals: Option<[[Option<ConfidenceInterval>; STATE_COUNT]; STATE_COUNT]>,
}
