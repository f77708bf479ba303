//! Bollinger Bands on close.
//!
//! - Middle: SMA(close, period)
//! - Upper/Lower: middle ± multiplier × population stddev(close, period)
//!
//! Lookback: period - 1.

use super::indicator::{closes, Indicator};
use super::window::{rolling_mean, rolling_std, Ddof};
use crate::domain::Bar;

/// Which band to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    pub fn new(band: BollingerBand, period: usize, multiplier: f64) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let tag = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{tag}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::new(BollingerBand::Upper, period, multiplier)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::new(BollingerBand::Middle, period, multiplier)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::new(BollingerBand::Lower, period, multiplier)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let close = closes(bars);
        let mid = rolling_mean(&close, self.period);
        let sign = match self.band {
            BollingerBand::Middle => return mid,
            BollingerBand::Upper => 1.0,
            BollingerBand::Lower => -1.0,
        };
        let std = rolling_std(&close, self.period, Ddof::Population);
        mid.iter()
            .zip(&std)
            .map(|(m, s)| m + sign * self.multiplier * s)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn bollinger_middle_is_sma() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Bollinger::middle(3, 2.0).compute(&bars);
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let middle = Bollinger::middle(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        for i in 2..5 {
            assert_approx(upper[i] - middle[i], middle[i] - lower[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_known_width() {
        // window (10, 11, 12): population std = sqrt(2/3)
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        assert_approx(upper[2], 11.0 + 2.0 * (2.0_f64 / 3.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        assert_approx(upper[3], 100.0, DEFAULT_EPSILON);
        assert_approx(lower[3], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_lookback() {
        assert_eq!(Bollinger::upper(20, 2.0).lookback(), 19);
        assert_eq!(Bollinger::upper(20, 2.0).name(), "bollinger_upper_20_2");
    }
}
