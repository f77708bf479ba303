//! Percent change and rolling volatility of close.
//!
//! pct_change[t] = 100 × (close[t] / close[t−1] − 1), lookback 1.
//! volatility[t] = sample stddev of pct_change over `period` bars,
//! lookback `period`.

use super::indicator::{closes, Indicator};
use super::window::{rolling_std, Ddof};
use crate::domain::Bar;

#[derive(Debug, Clone, Default)]
pub struct PctChange;

impl Indicator for PctChange {
    fn name(&self) -> &str {
        "pct_change"
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        pct_change(&closes(bars))
    }
}

fn pct_change(close: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; close.len()];
    for i in 1..close.len() {
        result[i] = 100.0 * (close[i] / close[i - 1] - 1.0);
    }
    result
}

#[derive(Debug, Clone)]
pub struct Volatility {
    period: usize,
    name: String,
}

impl Volatility {
    pub fn new(period: usize) -> Self {
        assert!(period >= 2, "volatility period must be >= 2");
        Self {
            period,
            name: format!("volatility_{period}"),
        }
    }
}

impl Indicator for Volatility {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        rolling_std(&pct_change(&closes(bars)), self.period, Ddof::Sample)
    }
}
