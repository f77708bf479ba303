//! Indicator Engine.
//!
//! Each indicator implements `Indicator` and maps the bar history to one
//! series of the same length, NaN during warmup. `IndicatorFrame` runs the
//! full set the scorer consumes.

pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod indicator;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod volatility;
pub mod volume;
pub mod window;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::{ema_of_series, Ema};
pub use frame::{IndicatorFrame, IndicatorParams};
pub use indicator::Indicator;
pub use macd::{Macd, MacdOutput};
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticLine};
pub use volatility::{PctChange, Volatility};
pub use volume::VolumeRatio;

/// Create synthetic bars from close prices for testing.
///
/// open = prev close (or close for the first bar), high/low = body ± 1.0,
/// volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
