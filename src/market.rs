use anyhow::Result;
use chrono::NaiveDate;

use crate::model::price::{PricePoint, PriceSeries};

/// Capability interface over the market observation adapter. One interface
/// for live and test alike; substitute the implementation, never branch on
/// a mode flag inside business logic.
pub trait MarketData: Send + Sync {
    /// Daily closes for `ticker` over [start, end]. An empty series is a
    /// valid answer and surfaces downstream as insufficient data.
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

/// Test/demo double serving a fixed series per ticker, trimmed to the
/// requested window.
#[derive(Debug, Clone, Default)]
pub struct FixedSeries {
    series: std::collections::HashMap<String, PriceSeries>,
}

impl FixedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, ticker: &str, series: PriceSeries) -> Self {
        self.series.insert(ticker.to_string(), series);
        self
    }

    /// Deterministic synthetic walk: `len` daily closes ending at `end`,
    /// drifting by `drift` per day around `base`.
    pub fn with_synthetic(self, ticker: &str, end: NaiveDate, len: usize, base: f64, drift: f64) -> Self {
        let mut points = Vec::with_capacity(len);
        let mut close = base;
        for offset in (0..len).rev() {
            let date = end - chrono::Days::new(offset as u64);
            points.push(PricePoint { date, close });
            // Small deterministic wobble so returns are not constant.
            let wobble = if offset % 2 == 0 { 0.004 } else { -0.003 };
            close *= 1.0 + drift + wobble;
        }
        self.with_series(ticker, PriceSeries::new(points))
    }
}

impl MarketData for FixedSeries {
    fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let Some(series) = self.series.get(ticker) else {
            return Ok(PriceSeries::default());
        };
        let points = series
            .points()
            .iter()
            .copied()
            .filter(|p| p.date >= start && p.date <= end)
            .collect();
        Ok(PriceSeries::new(points))
    }
}
