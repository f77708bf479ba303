//! Indicator trait.
//!
//! Indicators are pure functions: bar history in, numeric series out.
//! They run once over the whole history before scoring starts.

use crate::domain::Bar;

/// A single-series technical indicator.
///
/// `compute` returns a `Vec<f64>` of the same length as `bars`. Values
/// before `lookback()` are `f64::NAN` (warmup).
///
/// # Look-ahead guard
/// The value at bar t never depends on bars t+1 or later: computing on a
/// truncated history must reproduce the prefix of the full computation.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_5", "stoch_j_9").
    fn name(&self) -> &str;

    /// Index of the first bar that can hold a defined value.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Close prices of a bar slice.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
