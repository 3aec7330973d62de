use crate::error::AppError;
use crate::model::price::PriceSeries;
use crate::model::regime::{
    ConfidenceInterval, StateLabel, StateStatistics, TransitionMatrix, STATE_COUNT,
};

/// Minimum valid daily returns required before a matrix is estimated.
pub const MIN_OBSERVATIONS: usize = 30;

/// Additive smoothing applied to raw transition counts.
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.1;

/// Window over which recent volatility scales the state thresholds.
const RECENT_VOLATILITY_WINDOW: usize = 20;

/// z for a 95% Wilson-score interval.
const WILSON_Z: f64 = 1.959964;

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub smoothing_alpha: f64,
    pub min_observations: usize,
    /// Scale the one-sigma thresholds by the recent/overall volatility ratio
    /// (clamped to [0.5, 2.0]). Off means plain mean +/- stddev bands.
    pub volatility_scaling: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: DEFAULT_SMOOTHING_ALPHA,
            min_observations: MIN_OBSERVATIONS,
            volatility_scaling: true,
        }
    }
}

/// Output of one classification run over a price series.
#[derive(Debug, Clone)]
pub struct RegimeModel {
    pub matrix: TransitionMatrix,
    pub stats: StateStatistics,
    pub last_state: StateLabel,
    pub labels: Vec<StateLabel>,
    pub intervals: [[Option<ConfidenceInterval>; STATE_COUNT]; STATE_COUNT],
    pub mean_return: f64,
    pub return_stddev: f64,
    pub recent_volatility: f64,
    pub observations: usize,
}

/// Label a return series and estimate the smoothed transition matrix plus
/// per-state statistics. Deterministic: the same series and alpha always
/// produce a bit-identical matrix.
pub fn classify(
    asset: &str,
    series: &PriceSeries,
    cfg: &ClassifierConfig,
) -> Result<RegimeModel, AppError> {
    let returns = series.daily_returns();
    if returns.len() < cfg.min_observations {
        return Err(AppError::DataInsufficient {
            asset: asset.to_string(),
            observed: returns.len(),
            minimum: cfg.min_observations,
        });
    }

    let mean = mean(&returns);
    let stddev = stddev(&returns, mean);
    let recent = &returns[returns.len().saturating_sub(RECENT_VOLATILITY_WINDOW)..];
    let recent_volatility = stddev_of(recent);

    // Thresholds widen in volatile regimes and tighten in calm ones.
    let multiplier = if cfg.volatility_scaling && stddev > 0.0 {
        (recent_volatility / stddev).clamp(0.5, 2.0)
    } else {
        1.0
    };
    let bull_threshold = mean + stddev * multiplier;
    let bear_threshold = mean - stddev * multiplier;

    let labels: Vec<StateLabel> = returns
        .iter()
        .map(|&r| {
            if r > bull_threshold {
                StateLabel::Bull
            } else if r < bear_threshold {
                StateLabel::Bear
            } else {
                StateLabel::Neutral
            }
        })
        .collect();

    let mut counts = [[0.0f64; STATE_COUNT]; STATE_COUNT];
    for pair in labels.windows(2) {
        counts[pair[0].index()][pair[1].index()] += 1.0;
    }

    let matrix = TransitionMatrix::from_counts(counts, cfg.smoothing_alpha);
    let stats = state_statistics(&returns, &labels, stddev);
    let intervals = wilson_intervals(&counts);
    let last_state = labels.last().copied().unwrap_or(StateLabel::Neutral);

    Ok(RegimeModel {
        matrix,
        stats,
        last_state,
        labels,
        intervals,
        mean_return: mean,
        return_stddev: stddev,
        recent_volatility,
        observations: returns.len(),
    })
}

fn state_statistics(returns: &[f64], labels: &[StateLabel], overall_stddev: f64) -> StateStatistics {
    let mut mean_return = [0.0; STATE_COUNT];
    let mut volatility = [overall_stddev; STATE_COUNT];

    for state in StateLabel::ALL {
        let members: Vec<f64> = returns
            .iter()
            .zip(labels)
            .filter_map(|(&r, &l)| (l == state).then_some(r))
            .collect();
        if members.is_empty() {
            // Unseen state keeps the defaults: mean 0, overall stddev.
            continue;
        }
        let m = mean(&members);
        mean_return[state.index()] = m;
        volatility[state.index()] = stddev(&members, m);
    }

    StateStatistics {
        mean_return,
        volatility,
    }
}

/// 95% Wilson-score interval for each transition cell. A cell is defined
/// only when its source state has at least one observed transition.
fn wilson_intervals(
    counts: &[[f64; STATE_COUNT]; STATE_COUNT],
) -> [[Option<ConfidenceInterval>; STATE_COUNT]; STATE_COUNT] {
    let mut out = [[None; STATE_COUNT]; STATE_COUNT];
    for i in 0..STATE_COUNT {
        let n: f64 = counts[i].iter().sum();
        if n < 1.0 {
            continue;
        }
        for j in 0..STATE_COUNT {
            let p = counts[i][j] / n;
            let z2 = WILSON_Z * WILSON_Z;
            let denom = 1.0 + z2 / n;
            let centre = (p + z2 / (2.0 * n)) / denom;
            let delta = WILSON_Z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt() / denom;
            out[i][j] = Some(ConfidenceInterval {
                lower: (centre - delta).max(0.0),
                upper: (centre + delta).min(1.0),
            });
        }
    }
    out
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn stddev_of(values: &[f64]) -> f64 {
    stddev(values, mean(values))
}

fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
