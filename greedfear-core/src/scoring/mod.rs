//! Scorer: maps indicator values to sub-scores in [0, 1], 0.5 = neutral.
//!
//! Rules are fixed and documented in `rules`; their thresholds come from
//! `ScoreParams`. A day with any undefined input has no `ScoreVector`.

pub mod rules;

use crate::indicators::IndicatorFrame;
use serde::{Deserialize, Serialize};

/// Thresholds and sensitivities for the scoring rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreParams {
    /// %J at or below this reads fully oversold (score 0).
    pub stoch_oversold: f64,
    /// %J at or above this reads fully overbought (score 1).
    pub stoch_overbought: f64,
    pub rsi_low: f64,
    pub rsi_high: f64,
    /// Slope of the tanh applied to `volume_ratio − 1`.
    pub volume_sensitivity: f64,
}

impl Default for ScoreParams {
    fn default() -> Self {
        Self {
            stoch_oversold: 20.0,
            stoch_overbought: 80.0,
            rsi_low: 30.0,
            rsi_high: 70.0,
            volume_sensitivity: 1.0,
        }
    }
}

/// Sub-scores for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub stochastic: f64,
    pub bollinger: f64,
    pub volume: f64,
    pub ma_cross: f64,
    pub rsi: f64,
    pub macd: f64,
}

impl ScoreVector {
    /// Every sub-score at the neutral midpoint.
    pub const NEUTRAL: ScoreVector = ScoreVector {
        stochastic: 0.5,
        bollinger: 0.5,
        volume: 0.5,
        ma_cross: 0.5,
        rsi: 0.5,
        macd: 0.5,
    };

    pub fn is_valid(&self) -> bool {
        [
            self.stochastic,
            self.bollinger,
            self.volume,
            self.ma_cross,
            self.rsi,
            self.macd,
        ]
        .iter()
        .all(|s| s.is_finite() && (0.0..=1.0).contains(s))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    params: ScoreParams,
}

impl Scorer {
    pub fn new(params: ScoreParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScoreParams {
        &self.params
    }

    /// Score day `i` of the frame, or `None` if any input is undefined.
    pub fn score_day(&self, frame: &IndicatorFrame, i: usize) -> Option<ScoreVector> {
        let p = &self.params;
        let close = *frame.close.get(i)?;
        let scores = ScoreVector {
            stochastic: rules::stochastic_score(
                *frame.stoch_j.get(i)?,
                p.stoch_oversold,
                p.stoch_overbought,
            ),
            bollinger: rules::bollinger_score(
                close,
                *frame.bb_upper.get(i)?,
                *frame.bb_lower.get(i)?,
            ),
            volume: rules::volume_score(*frame.volume_ratio.get(i)?, p.volume_sensitivity),
            ma_cross: rules::ma_cross_score(close, *frame.ma_fast.get(i)?, *frame.ma_slow.get(i)?),
            rsi: rules::rsi_score(*frame.rsi.get(i)?, p.rsi_low, p.rsi_high),
            macd: rules::macd_score(
                *frame.macd_hist.get(i)?,
                *frame.macd_hist_scale.get(i)?,
                close,
            ),
        };
        scores.is_valid().then_some(scores)
    }

    /// Score every day of the frame.
    pub fn score_all(&self, frame: &IndicatorFrame) -> Vec<Option<ScoreVector>> {
        (0..frame.len()).map(|i| self.score_day(frame, i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, IndicatorParams};

    #[test]
    fn warmup_days_have_no_scores() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let frame = IndicatorFrame::compute(&make_bars(&closes), &IndicatorParams::default());
        let scores = Scorer::default().score_all(&frame);
        assert_eq!(scores.len(), 60);
        assert!(scores[..frame.warmup()].iter().all(Option::is_none));
        assert!(scores[frame.warmup()..].iter().all(Option::is_some));
    }

    #[test]
    fn out_of_range_index_is_none() {
        let frame = IndicatorFrame::default();
        assert!(Scorer::default().score_day(&frame, 0).is_none());
    }

    #[test]
    fn neutral_vector_is_valid() {
        assert!(ScoreVector::NEUTRAL.is_valid());
        let mut bad = ScoreVector::NEUTRAL;
        bad.rsi = f64::NAN;
        assert!(!bad.is_valid());
    }
}
