//! Bar: one trading day of OHLCV data for a single instrument.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar.
///
/// Volume is kept as `f64` because index feeds report turnover-style
/// volumes that do not fit an integer share count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLCV field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.volume.is_nan()
    }

    /// Basic OHLCV sanity check: `low <= open, close <= high`, positive
    /// prices, non-negative finite volume.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        let finite = self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite();
        finite
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.low > 0.0
            && self.volume >= 0.0
    }

    /// Short description of why the bar is not sane, for log lines.
    pub fn defect(&self) -> Option<&'static str> {
        if self.is_void() {
            Some("missing OHLCV value")
        } else if !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite())
        {
            Some("non-finite OHLCV value")
        } else if self.high < self.low {
            Some("high below low")
        } else if self.open > self.high || self.close > self.high {
            Some("open/close above high")
        } else if self.open < self.low || self.close < self.low {
            Some("open/close below low")
        } else if self.low <= 0.0 {
            Some("non-positive price")
        } else if self.volume < 0.0 {
            Some("negative volume")
        } else {
            None
        }
    }
}
