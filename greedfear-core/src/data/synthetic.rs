//! Deterministic synthetic bars for demos and tests.
//!
//! A seeded random walk starting at 2000.0; the seed is the BLAKE3 hash of
//! the symbol, so the same symbol always yields the same history. Results
//! are tagged `DataSource::Synthetic`.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::Bar;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Default)]
pub struct SyntheticProvider;

/// Weekday bars from `start` through `end`.
pub fn generate_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 2000.0_f64;
    let mut volume = 1.5e9_f64;

    for date in start.iter_days().take_while(|d| *d <= end) {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.025..0.025);
        let open = price;
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        // volume follows |return| loosely, mean-reverting to 1.5e9
        volume = 0.7 * volume + 0.3 * 1.5e9 * (1.0 + 20.0 * daily_return.abs());
        let volume = volume * rng.gen_range(0.8..1.2);

        bars.push(Bar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
        price = close;
    }

    bars
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let bars = generate_bars(symbol, start, end);
        if bars.is_empty() {
            return Err(DataError::Empty {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }
        Ok(FetchResult {
            symbol: symbol.to_string(),
            bars,
            source: DataSource::Synthetic,
            unparsed: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
    }

    #[test]
    fn same_symbol_same_bars() {
        let (s, e) = range();
        assert_eq!(generate_bars("399006.SZ", s, e), generate_bars("399006.SZ", s, e));
        assert_ne!(generate_bars("399006.SZ", s, e), generate_bars("000300.SS", s, e));
    }

    #[test]
    fn bars_are_sane_weekdays_in_order() {
        let (s, e) = range();
        let bars = generate_bars("399006.SZ", s, e);
        assert!(!bars.is_empty());
        assert!(bars.iter().all(Bar::is_sane));
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
        assert!(bars
            .iter()
            .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn weekend_only_range_is_empty_error() {
        let sat = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let sun = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let result = SyntheticProvider.fetch("X", sat, sun);
        assert!(matches!(result, Err(DataError::Empty { .. })));
    }
}
