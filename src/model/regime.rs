use serde::{Deserialize, Serialize};

pub const STATE_COUNT: usize = 3;

/// Discretized daily return category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateLabel {
    Bull,
    Neutral,
    Bear,
}

impl StateLabel {
    pub const ALL: [StateLabel; STATE_COUNT] =
        [StateLabel::Bull, StateLabel::Neutral, StateLabel::Bear];

    pub fn index(self) -> usize {
        match self {
            StateLabel::Bull => 0,
            StateLabel::Neutral => 1,
            StateLabel::Bear => 2,
        }
    }

    pub fn from_index(idx: usize) -> Option<StateLabel> {
        Self::ALL.get(idx).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StateLabel::Bull => "Bull",
            StateLabel::Neutral => "Neutral",
            StateLabel::Bear => "Bear",
        }
    }
}

/// Row-stochastic one-step state-change probability matrix.
///
/// Built with additive smoothing, so every entry is strictly positive for
/// alpha > 0 and each row sums to 1 within floating tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    rows: [[f64; STATE_COUNT]; STATE_COUNT],
}

impl TransitionMatrix {
    pub fn from_rows(rows: [[f64; STATE_COUNT]; STATE_COUNT]) -> Self {
        Self { rows }
    }

    /// Smoothed estimate from raw transition counts:
    /// p[i][j] = (count[i][j] + alpha) / (row_sum[i] + 3 * alpha).
    pub fn from_counts(counts: [[f64; STATE_COUNT]; STATE_COUNT], alpha: f64) -> Self {
        let mut rows = [[0.0; STATE_COUNT]; STATE_COUNT];
        for i in 0..STATE_COUNT {
            let row_sum: f64 = counts[i].iter().sum();
            let denom = row_sum + alpha * STATE_COUNT as f64;
            for j in 0..STATE_COUNT {
                rows[i][j] = if denom > 0.0 {
                    (counts[i][j] + alpha) / denom
                } else {
                    1.0 / STATE_COUNT as f64
                };
            }
        }
        Self { rows }
    }

    pub fn get(&self, from: StateLabel, to: StateLabel) -> f64 {
        self.rows[from.index()][to.index()]
    }

    pub fn rows(&self) -> &[[f64; STATE_COUNT]; STATE_COUNT] {
        &self.rows
    }

    pub fn row_sum(&self, from: StateLabel) -> f64 {
        self.rows[from.index()].iter().sum()
    }

    /// Propagate a probability distribution one step: v' = v * P.
    pub fn propagate(&self, dist: [f64; STATE_COUNT]) -> [f64; STATE_COUNT] {
        let mut out = [0.0; STATE_COUNT];
        for (j, slot) in out.iter_mut().enumerate() {
            *slot = (0..STATE_COUNT).map(|i| dist[i] * self.rows[i][j]).sum();
        }
        out
    }

    /// Matrix product self * other.
    pub fn multiply(&self, other: &TransitionMatrix) -> TransitionMatrix {
        let mut rows = [[0.0; STATE_COUNT]; STATE_COUNT];
        for i in 0..STATE_COUNT {
            for j in 0..STATE_COUNT {
                rows[i][j] = (0..STATE_COUNT)
                    .map(|k| self.rows[i][k] * other.rows[k][j])
                    .sum();
            }
        }
        TransitionMatrix { rows }
    }

    /// One-hot distribution concentrated on `state`.
    pub fn one_hot(state: StateLabel) -> [f64; STATE_COUNT] {
        let mut dist = [0.0; STATE_COUNT];
        dist[state.index()] = 1.0;
        dist
    }
}

/// Per-state return statistics. Unseen states fall back to mean 0 and the
/// overall return stddev.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateStatistics {
    pub mean_return: [f64; STATE_COUNT],
    pub volatility: [f64; STATE_COUNT],
}

impl StateStatistics {
    pub fn mean_for(&self, state: StateLabel) -> f64 {
        self.mean_return[state.index()]
    }

    pub fn volatility_for(&self, state: StateLabel) -> f64 {
        self.volatility[state.index()]
    }

    /// Probability-weighted expected daily return under `dist`.
    pub fn expected_return(&self, dist: &[f64; STATE_COUNT]) -> f64 {
        (0..STATE_COUNT).map(|i| dist[i] * self.mean_return[i]).sum()
    }
}

/// 95% Wilson-score interval for one transition probability. Only present
/// when the source state has at least one observed transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}
