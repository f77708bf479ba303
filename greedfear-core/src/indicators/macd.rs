//! MACD on close.
//!
//! line = EMA(fast) − EMA(slow), signal = EMA(line, signal_period),
//! histogram = line − signal. `HistScale` is the trailing mean of
//! |histogram| over `scale_window` bars; the scorer normalises the
//! histogram by it.

use super::ema::ema_of_series;
use super::indicator::{closes, Indicator};
use super::window::rolling_mean;
use crate::domain::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdOutput {
    Line,
    Signal,
    Histogram,
    HistScale,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    scale_window: usize,
    output: MacdOutput,
    name: String,
}

impl Macd {
    pub fn new(
        output: MacdOutput,
        fast: usize,
        slow: usize,
        signal: usize,
        scale_window: usize,
    ) -> Self {
        assert!(fast >= 1 && fast < slow, "MACD requires 1 <= fast < slow");
        assert!(signal >= 1, "MACD signal period must be >= 1");
        assert!(scale_window >= 1, "MACD scale window must be >= 1");
        let tag = match output {
            MacdOutput::Line => "line",
            MacdOutput::Signal => "signal",
            MacdOutput::Histogram => "hist",
            MacdOutput::HistScale => "hist_scale",
        };
        Self {
            fast,
            slow,
            signal,
            scale_window,
            output,
            name: format!("macd_{tag}_{fast}_{slow}_{signal}"),
        }
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let line = self.slow - 1;
        match self.output {
            MacdOutput::Line => line,
            MacdOutput::Signal | MacdOutput::Histogram => line + self.signal - 1,
            MacdOutput::HistScale => line + self.signal - 1 + self.scale_window - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let close = closes(bars);
        let fast = ema_of_series(&close, self.fast);
        let slow = ema_of_series(&close, self.slow);
        let line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        if self.output == MacdOutput::Line {
            return line;
        }

        let signal = ema_of_series(&line, self.signal);
        if self.output == MacdOutput::Signal {
            return signal;
        }

        let hist: Vec<f64> = line.iter().zip(&signal).map(|(l, s)| l - s).collect();
        match self.output {
            MacdOutput::Histogram => hist,
            _ => {
                let abs: Vec<f64> = hist.iter().map(|h| h.abs()).collect();
                rolling_mean(&abs, self.scale_window)
            }
        }
    }
}
