//! Indicator frame: every series the scorer needs, computed in one pass.

use super::bollinger::{Bollinger, BollingerBand};
use super::indicator::{closes, Indicator};
use super::macd::{Macd, MacdOutput};
use super::rsi::Rsi;
use super::sma::Sma;
use super::stochastic::{Stochastic, StochasticLine};
use super::volatility::{PctChange, Volatility};
use super::volume::VolumeRatio;
use crate::domain::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Indicator periods. Defaults are the canonical settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub stoch_period: usize,
    pub stoch_k_smooth: usize,
    pub stoch_d_smooth: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub volume_period: usize,
    pub ma_fast: usize,
    pub ma_slow: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    /// Bars averaged into the |histogram| scale used by the MACD score.
    pub macd_scale_window: usize,
    pub volatility_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            stoch_period: 9,
            stoch_k_smooth: 3,
            stoch_d_smooth: 3,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            volume_period: 10,
            ma_fast: 5,
            ma_slow: 10,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            macd_scale_window: 10,
            volatility_period: 10,
        }
    }
}

impl IndicatorParams {
    fn stochastic(&self, line: StochasticLine) -> Stochastic {
        Stochastic::new(
            line,
            self.stoch_period,
            self.stoch_k_smooth,
            self.stoch_d_smooth,
        )
    }

    fn macd(&self, output: MacdOutput) -> Macd {
        Macd::new(
            output,
            self.macd_fast,
            self.macd_slow,
            self.macd_signal,
            self.macd_scale_window,
        )
    }

    /// Largest lookback across every indicator in the frame.
    pub fn warmup(&self) -> usize {
        [
            self.stochastic(StochasticLine::J).lookback(),
            Bollinger::upper(self.bollinger_period, self.bollinger_multiplier).lookback(),
            VolumeRatio::new(self.volume_period).lookback(),
            Sma::new(self.ma_fast).lookback(),
            Sma::new(self.ma_slow).lookback(),
            Rsi::new(self.rsi_period).lookback(),
            self.macd(MacdOutput::HistScale).lookback(),
            Volatility::new(self.volatility_period).lookback(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Minimum number of bars before the first fully defined day.
    pub fn required_bars(&self) -> usize {
        self.warmup() + 1
    }
}

/// Per-day indicator values, aligned with the input bars.
///
/// Empty when the history is shorter than `IndicatorParams::required_bars`.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    pub dates: Vec<NaiveDate>,
    pub close: Vec<f64>,
    pub stoch_k: Vec<f64>,
    pub stoch_d: Vec<f64>,
    pub stoch_j: Vec<f64>,
    pub bb_upper: Vec<f64>,
    pub bb_middle: Vec<f64>,
    pub bb_lower: Vec<f64>,
    pub volume_ratio: Vec<f64>,
    pub ma_fast: Vec<f64>,
    pub ma_slow: Vec<f64>,
    pub rsi: Vec<f64>,
    pub macd_line: Vec<f64>,
    pub macd_signal: Vec<f64>,
    pub macd_hist: Vec<f64>,
    pub macd_hist_scale: Vec<f64>,
    pub pct_change: Vec<f64>,
    pub volatility: Vec<f64>,
    warmup: usize,
}

impl IndicatorFrame {
    pub fn compute(bars: &[Bar], params: &IndicatorParams) -> Self {
        let warmup = params.warmup();
        if bars.len() <= warmup {
            return Self {
                warmup,
                ..Self::default()
            };
        }

        let bb = |band: BollingerBand| {
            Bollinger::new(band, params.bollinger_period, params.bollinger_multiplier)
                .compute(bars)
        };
        Self {
            dates: bars.iter().map(|b| b.date).collect(),
            close: closes(bars),
            stoch_k: params.stochastic(StochasticLine::K).compute(bars),
            stoch_d: params.stochastic(StochasticLine::D).compute(bars),
            stoch_j: params.stochastic(StochasticLine::J).compute(bars),
            bb_upper: bb(BollingerBand::Upper),
            bb_middle: bb(BollingerBand::Middle),
            bb_lower: bb(BollingerBand::Lower),
            volume_ratio: VolumeRatio::new(params.volume_period).compute(bars),
            ma_fast: Sma::new(params.ma_fast).compute(bars),
            ma_slow: Sma::new(params.ma_slow).compute(bars),
            rsi: Rsi::new(params.rsi_period).compute(bars),
            macd_line: params.macd(MacdOutput::Line).compute(bars),
            macd_signal: params.macd(MacdOutput::Signal).compute(bars),
            macd_hist: params.macd(MacdOutput::Histogram).compute(bars),
            macd_hist_scale: params.macd(MacdOutput::HistScale).compute(bars),
            pct_change: PctChange.compute(bars),
            volatility: Volatility::new(params.volatility_period).compute(bars),
            warmup,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Index of the first day on which every indicator is defined.
    pub fn warmup(&self) -> usize {
        self.warmup
    }
}
