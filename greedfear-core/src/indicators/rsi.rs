//! Relative Strength Index (RSI), Wilder smoothing.
//!
//! Seed: simple average of the first `period` gains and losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss). Lookback: period.
//! No movement at all reads as 50; only gains reads 100; only losses 0.

use super::indicator::{closes, Indicator};
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let close = closes(bars);
        let n = close.len();
        let mut result = vec![f64::NAN; n];
        if n <= self.period {
            return result;
        }

        let deltas: Vec<f64> = (1..n).map(|i| close[i] - close[i - 1]).collect();
        let seed = &deltas[..self.period];
        if seed.iter().any(|d| d.is_nan()) {
            return result;
        }

        let p = self.period as f64;
        let mut avg_gain = seed.iter().map(|d| d.max(0.0)).sum::<f64>() / p;
        let mut avg_loss = seed.iter().map(|d| (-d).max(0.0)).sum::<f64>() / p;
        result[self.period] = rsi_value(avg_gain, avg_loss);

        for (offset, &delta) in deltas.iter().enumerate().skip(self.period) {
            if delta.is_nan() {
                break;
            }
            avg_gain = (avg_gain * (p - 1.0) + delta.max(0.0)) / p;
            avg_loss = (avg_loss * (p - 1.0) + (-delta).max(0.0)) / p;
            result[offset + 1] = rsi_value(avg_gain, avg_loss);
        }

        result
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    match (avg_gain == 0.0, avg_loss == 0.0) {
        (true, true) => 50.0,
        (_, true) => 100.0,
        (true, _) => 0.0,
        _ => 100.0 - 100.0 / (1.0 + avg_gain / avg_loss),
    }
}
