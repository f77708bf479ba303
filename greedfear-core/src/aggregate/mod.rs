//! Aggregator: weighted greed/fear combination, smoothing and clipping.

pub mod smoothing;

pub use smoothing::Smoothing;

use crate::scoring::ScoreVector;
use serde::{Deserialize, Serialize};

/// Tolerance on the weight table summing to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Sub-score weights. Both indices use the same table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub stochastic: f64,
    pub bollinger: f64,
    pub volume: f64,
    pub ma_cross: f64,
    pub rsi: f64,
    pub macd: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            stochastic: 0.25,
            bollinger: 0.20,
            volume: 0.20,
            ma_cross: 0.15,
            rsi: 0.10,
            macd: 0.10,
        }
    }
}

impl Weights {
    fn as_array(&self) -> [f64; 6] {
        [
            self.stochastic,
            self.bollinger,
            self.volume,
            self.ma_cross,
            self.rsi,
            self.macd,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Every weight finite and non-negative, total within tolerance of 1.
    pub fn is_normalized(&self) -> bool {
        self.as_array().iter().all(|w| w.is_finite() && *w >= 0.0)
            && (self.sum() - 1.0).abs() <= WEIGHT_SUM_TOLERANCE
    }

    /// Greed before smoothing, on the 0..100 scale.
    pub fn greed_raw(&self, s: &ScoreVector) -> f64 {
        100.0
            * (self.stochastic * s.stochastic
                + self.bollinger * s.bollinger
                + self.volume * s.volume
                + self.ma_cross * s.ma_cross
                + self.rsi * s.rsi
                + self.macd * s.macd)
    }

    /// Fear before smoothing, on the 0..100 scale.
    ///
    /// Stochastic, Bollinger, volume and MA-cross are inverted. RSI and MACD
    /// enter in the same direction as for greed, so fear is not
    /// `100 − greed`.
    pub fn fear_raw(&self, s: &ScoreVector) -> f64 {
        100.0
            * (self.stochastic * (1.0 - s.stochastic)
                + self.bollinger * (1.0 - s.bollinger)
                + self.volume * (1.0 - s.volume)
                + self.ma_cross * (1.0 - s.ma_cross)
                + self.rsi * s.rsi
                + self.macd * s.macd)
    }
}

/// One day of index output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedFear {
    pub greed: f64,
    pub fear: f64,
}

pub fn clip_index(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    weights: Weights,
    smoothing: Smoothing,
}

impl Aggregator {
    pub fn new(weights: Weights, smoothing: Smoothing) -> Self {
        Self { weights, smoothing }
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn smoothing(&self) -> &Smoothing {
        &self.smoothing
    }

    /// Aggregate a contiguous run of score vectors.
    ///
    /// Output is aligned with the input; the first
    /// `smoothing.extra_warmup()` entries are `None`.
    pub fn aggregate(&self, scores: &[ScoreVector]) -> Vec<Option<GreedFear>> {
        let greed: Vec<f64> = scores.iter().map(|s| self.weights.greed_raw(s)).collect();
        let fear: Vec<f64> = scores.iter().map(|s| self.weights.fear_raw(s)).collect();
        let greed = self.smoothing.apply(&greed);
        let fear = self.smoothing.apply(&fear);

        greed
            .into_iter()
            .zip(fear)
            .map(|(g, f)| {
                (g.is_finite() && f.is_finite()).then(|| GreedFear {
                    greed: clip_index(g),
                    fear: clip_index(f),
                })
            })
            .collect()
    }
}
