//! Volume ratio: today's volume over the trailing mean volume.
//!
//! The mean window includes the current bar. A window whose mean is at or
//! below `VOLUME_EPSILON` (index feeds often report zero volume) reads as
//! ratio 1.0, the neutral value.
//! Lookback: period − 1.

use super::indicator::Indicator;
use super::window::rolling_mean;
use crate::domain::Bar;

pub const VOLUME_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct VolumeRatio {
    period: usize,
    name: String,
}

impl VolumeRatio {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume ratio period must be >= 1");
        Self {
            period,
            name: format!("volume_ratio_{period}"),
        }
    }
}

impl Indicator for VolumeRatio {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        rolling_mean(&volumes, self.period)
            .iter()
            .zip(&volumes)
            .map(|(&mean, &vol)| {
                if mean.is_nan() {
                    f64::NAN
                } else if mean <= VOLUME_EPSILON {
                    1.0
                } else {
                    vol / mean
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn stable_volume_is_one() {
        let bars = make_bars(&[100.0; 12]);
        let out = VolumeRatio::new(10).compute(&bars);
        assert!(out[8].is_nan());
        assert_approx(out[9], 1.0, DEFAULT_EPSILON);
        assert_approx(out[11], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn spike_against_window_mean() {
        let mut bars = make_bars(&[100.0; 10]);
        bars[9].volume = 5000.0;
        let out = VolumeRatio::new(10).compute(&bars);
        // mean = (9 × 1000 + 5000) / 10 = 1400
        assert_approx(out[9], 5000.0 / 1400.0, DEFAULT_EPSILON);
    }

    #[test]
    fn zero_volume_window_is_neutral() {
        let mut bars = make_bars(&[100.0; 4]);
        for bar in &mut bars {
            bar.volume = 0.0;
        }
        let out = VolumeRatio::new(3).compute(&bars);
        assert!(out[1].is_nan());
        assert_approx(out[2], 1.0, DEFAULT_EPSILON);
        assert_approx(out[3], 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn volume_after_zero_window_is_measured() {
        let mut bars = make_bars(&[100.0; 4]);
        for bar in &mut bars[..3] {
            bar.volume = 0.0;
        }
        bars[3].volume = 300.0;
        let out = VolumeRatio::new(3).compute(&bars);
        // mean = 300 / 3 = 100
        assert_approx(out[3], 3.0, DEFAULT_EPSILON);
    }
}
