//! Trailing-window helpers shared by the indicators.
//!
//! Every helper returns a series of the input's length. A window that is
//! incomplete or contains NaN yields NaN at that position.

/// Population (`ddof = 0`) or sample (`ddof = 1`) standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ddof {
    Population,
    Sample,
}

fn rolling<F>(values: &[f64], period: usize, reduce: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }
    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = reduce(window);
    }
    result
}

pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().sum::<f64>() / w.len() as f64)
}

pub fn rolling_std(values: &[f64], period: usize, ddof: Ddof) -> Vec<f64> {
    rolling(values, period, |w| {
        let n = w.len() as f64;
        let divisor = match ddof {
            Ddof::Population => n,
            Ddof::Sample => n - 1.0,
        };
        if divisor <= 0.0 {
            return f64::NAN;
        }
        let mean = w.iter().sum::<f64>() / n;
        let ss: f64 = w.iter().map(|v| (v - mean) * (v - mean)).sum();
        (ss / divisor).sqrt()
    })
}

pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().copied().fold(f64::MIN, f64::max))
}

pub fn rolling_min(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |w| w.iter().copied().fold(f64::MAX, f64::min))
}
