//! Stochastic oscillator (KDJ).
//!
//! RSV = 100 × (close − lowest low) / (highest high − lowest low) over
//! `period` bars; a zero-width range reads as 50.
//! %K = SMA(RSV, k_smooth), %D = SMA(%K, d_smooth), %J = 3·%K − 2·%D.
//!
//! Lookback: (period − 1) + (k_smooth − 1) for %K, plus (d_smooth − 1)
//! for %D and %J.

use super::indicator::Indicator;
use super::window::{rolling_max, rolling_mean, rolling_min};
use crate::domain::Bar;

/// Which stochastic line to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StochasticLine {
    K,
    D,
    J,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    period: usize,
    k_smooth: usize,
    d_smooth: usize,
    line: StochasticLine,
    name: String,
}

impl Stochastic {
    pub fn new(line: StochasticLine, period: usize, k_smooth: usize, d_smooth: usize) -> Self {
        assert!(period >= 1, "stochastic period must be >= 1");
        assert!(
            k_smooth >= 1 && d_smooth >= 1,
            "stochastic smoothing must be >= 1"
        );
        let tag = match line {
            StochasticLine::K => "k",
            StochasticLine::D => "d",
            StochasticLine::J => "j",
        };
        Self {
            period,
            k_smooth,
            d_smooth,
            line,
            name: format!("stoch_{tag}_{period}_{k_smooth}_{d_smooth}"),
        }
    }

    fn raw_stochastic(&self, bars: &[Bar]) -> Vec<f64> {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let hh = rolling_max(&highs, self.period);
        let ll = rolling_min(&lows, self.period);

        bars.iter()
            .zip(hh.iter().zip(&ll))
            .map(|(bar, (&hi, &lo))| {
                if hi.is_nan() || lo.is_nan() || bar.close.is_nan() {
                    f64::NAN
                } else if hi - lo <= f64::EPSILON * hi.abs().max(1.0) {
                    50.0
                } else {
                    100.0 * (bar.close - lo) / (hi - lo)
                }
            })
            .collect()
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        let k = (self.period - 1) + (self.k_smooth - 1);
        match self.line {
            StochasticLine::K => k,
            StochasticLine::D | StochasticLine::J => k + (self.d_smooth - 1),
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let k = rolling_mean(&self.raw_stochastic(bars), self.k_smooth);
        if self.line == StochasticLine::K {
            return k;
        }
        let d = rolling_mean(&k, self.d_smooth);
        match self.line {
            StochasticLine::D => d,
            _ => k.iter().zip(&d).map(|(k, d)| 3.0 * k - 2.0 * d).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn close_at_top_of_range_reads_high() {
        // make_bars pads high/low by 1.0, so a rising close sits 1.0 under the top
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let k = Stochastic::new(StochasticLine::K, 3, 1, 1).compute(&bars);
        // window 3..=5: hh = 16, ll = 11 → (15 − 11) / 5
        assert_approx(k[5], 80.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_range_reads_neutral() {
        let mut bars = make_bars(&[100.0; 6]);
        for bar in &mut bars {
            bar.high = 100.0;
            bar.low = 100.0;
        }
        let j = Stochastic::new(StochasticLine::J, 3, 2, 2).compute(&bars);
        assert_approx(j[5], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn j_amplifies_k_minus_d() {
        let bars = make_bars(&[10.0, 12.0, 11.0, 15.0, 14.0, 18.0, 17.0, 20.0]);
        let k = Stochastic::new(StochasticLine::K, 3, 2, 2).compute(&bars);
        let d = Stochastic::new(StochasticLine::D, 3, 2, 2).compute(&bars);
        let j = Stochastic::new(StochasticLine::J, 3, 2, 2).compute(&bars);
        for i in 4..8 {
            assert_approx(j[i], 3.0 * k[i] - 2.0 * d[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn warmup_matches_lookback() {
        let bars = make_bars(&(0..20).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        for line in [StochasticLine::K, StochasticLine::D, StochasticLine::J] {
            let ind = Stochastic::new(line, 9, 3, 3);
            let out = ind.compute(&bars);
            let first = out.iter().position(|v| !v.is_nan()).unwrap();
            assert_eq!(first, ind.lookback(), "{}", ind.name());
        }
        assert_eq!(Stochastic::new(StochasticLine::J, 9, 3, 3).lookback(), 12);
    }
}
