use crate::markov::classifier::RegimeModel;
use crate::markov::projection;
use crate::model::forecast::AssetForecast;
use crate::model::price::PriceSeries;

const SMA_FAST: usize = 20;
const SMA_SLOW: usize = 50;

/// Returns needed for full data-quality confidence.
const FULL_CONFIDENCE_OBSERVATIONS: f64 = 300.0;

/// Assemble the immutable per-asset forecast from a classification run.
pub fn build_forecast(asset: &str, series: &PriceSeries, model: &RegimeModel) -> AssetForecast {
    let closes = series.closes();
    let trend_momentum = trend_momentum(&closes);
    let expected_return_30d =
        projection::expected_return_30d(&model.matrix, &model.stats, model.last_state);

    let confidence = (model.observations as f64 / FULL_CONFIDENCE_OBSERVATIONS).min(1.0);
    let risk_score = if model.return_stddev > 0.0 {
        (model.recent_volatility / (model.return_stddev * 2.0)).min(1.0)
    } else {
        0.0
    };

    AssetForecast {
        asset: asset.to_string(),
        matrix: model.matrix,
        stats: model.stats,
        last_state: model.last_state,
        trend_momentum,
        confidence,
        expected_return_30d,
        risk_score,
        relative_strength: relative_strength(series, model.mean_return),
        intervals: Some(model.intervals),
    }
}

/// SMA-20 vs SMA-50 trend momentum in [-1, 1]. Zero when either window is
/// not yet filled.
fn trend_momentum(closes: &[f64]) -> f64 {
    let (Some(fast), Some(slow)) = (sma(closes, SMA_FAST), sma(closes, SMA_SLOW)) else {
        return 0.0;
    };
    if slow <= 0.0 {
        return 0.0;
    }
    let ratio = fast / slow;
    if ratio > 1.02 {
        ((ratio - 1.0) * 10.0).min(1.0)
    } else if ratio < 0.98 {
        ((ratio - 1.0) * 10.0).max(-1.0)
    } else {
        (ratio - 1.0) * 5.0
    }
}

/// Mean of the last 30 returns relative to the overall mean magnitude.
fn relative_strength(series: &PriceSeries, overall_mean: f64) -> f64 {
    if overall_mean == 0.0 {
        return 0.0;
    }
    let returns = series.daily_returns();
    let tail = &returns[returns.len().saturating_sub(30)..];
    if tail.is_empty() {
        return 0.0;
    }
    let recent_mean = tail.iter().sum::<f64>() / tail.len() as f64;
    recent_mean / overall_mean.abs()
}

fn sma(values: &[f64], window: usize) -> Option<f64> {
    if values.len() < window || window == 0 {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}
