use crate::model::regime::{StateLabel, StateStatistics, TransitionMatrix};

/// Horizon for the unconditional expected-return projection.
pub const UNCONDITIONAL_HORIZON_DAYS: u32 = 30;

/// Earliest holding horizon whose projected cumulative return meets the
/// target, plus the state-probability confidence at that horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionOutcome {
    pub hold_duration_days: u32,
    pub projected_return: f64,
    /// P(Bull) + P(Neutral) at the chosen horizon.
    pub confidence: f64,
}

impl ProjectionOutcome {
    /// The fallback when no horizon within the limit meets the target.
    pub fn hold() -> Self {
        Self {
            hold_duration_days: 0,
            projected_return: 1.0,
            confidence: 0.0,
        }
    }
}

/// Walk n = 1..=horizon, computing P^n by incremental multiplication and
/// compounding the probability-weighted daily return to (1+r)^n. Returns
/// the first n whose cumulative return reaches `target_return`, or None
/// when no horizon qualifies.
pub fn find_holding_horizon(
    matrix: &TransitionMatrix,
    stats: &StateStatistics,
    last_state: StateLabel,
    target_return: f64,
    time_horizon_days: u32,
) -> Option<ProjectionOutcome> {
    let initial = TransitionMatrix::one_hot(last_state);
    let mut power = *matrix;

    for n in 1..=time_horizon_days {
        let dist = power.propagate(initial);
        let expected_daily = stats.expected_return(&dist);
        let cumulative = (1.0 + expected_daily).powi(n as i32);

        if cumulative >= target_return {
            let confidence = dist[StateLabel::Bull.index()] + dist[StateLabel::Neutral.index()];
            return Some(ProjectionOutcome {
                hold_duration_days: n,
                projected_return: cumulative,
                confidence,
            });
        }
        power = power.multiply(matrix);
    }
    None
}

/// Unconditional fixed-horizon expected return: propagate the state
/// distribution day by day and accumulate each day's probability-weighted
/// mean return. Always available, independent of any qualifying plan.
pub fn expected_return_over(
    matrix: &TransitionMatrix,
    stats: &StateStatistics,
    last_state: StateLabel,
    days: u32,
) -> f64 {
    let mut dist = TransitionMatrix::one_hot(last_state);
    let mut total = 0.0;
    for _ in 0..days {
        dist = matrix.propagate(dist);
        total += stats.expected_return(&dist);
    }
    total
}

pub fn expected_return_30d(
    matrix: &TransitionMatrix,
    stats: &StateStatistics,
    last_state: StateLabel,
) -> f64 {
    expected_return_over(matrix, stats, last_state, UNCONDITIONAL_HORIZON_DAYS)
}
