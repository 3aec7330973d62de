use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily close observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// An ordered daily close-price series for one asset. Immutable once built:
/// points are sorted by date at construction and never touched afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Day-over-day fractional returns. One element shorter than the series;
    /// consecutive pairs with a non-positive base price are skipped.
    pub fn daily_returns(&self) -> Vec<f64> {
        self.points
            .windows(2)
            .filter_map(|w| {
                let base = w[0].close;
                (base > 0.0).then(|| (w[1].close - base) / base)
            })
            .collect()
    }
}
