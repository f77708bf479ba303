//! Smoothing applied to the raw greed/fear series.

use crate::indicators::window::rolling_mean;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Smoothing {
    /// Exponential average, alpha = 2 / (span + 1), seeded with the first
    /// value. Adds no warmup.
    Ema { span: usize },
    /// Trailing simple average. The first `window − 1` days are undefined.
    Sma { window: usize },
    /// Raw values pass through.
    None,
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::Ema { span: 3 }
    }
}

impl Smoothing {
    /// Days lost at the start of the series.
    pub fn extra_warmup(&self) -> usize {
        match *self {
            Smoothing::Sma { window } => window.saturating_sub(1),
            Smoothing::Ema { .. } | Smoothing::None => 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            Smoothing::Ema { span } => span >= 1,
            Smoothing::Sma { window } => window >= 1,
            Smoothing::None => true,
        }
    }

    /// Smooth `values`. Output has the same length; undefined days are NaN.
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        match *self {
            Smoothing::Ema { span } => ema_seeded(values, span),
            Smoothing::Sma { window } => rolling_mean(values, window.max(1)),
            Smoothing::None => values.to_vec(),
        }
    }
}

fn ema_seeded(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span.max(1) as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &v in values {
        let next = match prev {
            Some(p) => alpha * v + (1.0 - alpha) * p,
            None => v,
        };
        prev = Some(next);
        out.push(next);
    }
    out
}
