//! Bar validation before indicator computation.

use super::provider::{DataError, FetchResult};
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

/// Share of rejected bars above which ingest fails.
pub const DEFAULT_MAX_REJECTED_FRACTION: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub max_rejected_fraction: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_rejected_fraction: DEFAULT_MAX_REJECTED_FRACTION,
        }
    }
}

/// Clean bars plus what was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub bars: Vec<Bar>,
    pub duplicates: usize,
    pub rejected: usize,
}

/// Sort, de-duplicate and validate raw bars.
///
/// The first sane bar seen for a date wins; a malformed bar only survives
/// de-duplication when its date has no sane one. Malformed bars are dropped
/// with a warning each; the call fails only when the dropped share exceeds
/// `max_rejected_fraction` of the de-duplicated input.
pub fn ingest(bars: Vec<Bar>, max_rejected_fraction: f64) -> Result<IngestReport, DataError> {
    validate(bars, 0, max_rejected_fraction)
}

/// [`ingest`] for a provider result. Rows the source could not parse count
/// as rejected bars.
pub fn ingest_fetched(
    fetched: FetchResult,
    max_rejected_fraction: f64,
) -> Result<IngestReport, DataError> {
    validate(fetched.bars, fetched.unparsed, max_rejected_fraction)
}

fn validate(
    mut bars: Vec<Bar>,
    unparsed: usize,
    max_rejected_fraction: f64,
) -> Result<IngestReport, DataError> {
    // stable sort: sane bars first within a date, upstream order otherwise
    bars.sort_by_key(|b| (b.date, b.defect().is_some()));
    let before = bars.len();
    bars.dedup_by_key(|b| b.date);
    let duplicates = before - bars.len();
    if duplicates > 0 {
        log::warn!("dropped {duplicates} duplicate bar(s)");
    }

    let total = bars.len() + unparsed;
    let mut rejected = unparsed;
    bars.retain(|bar| match bar.defect() {
        None => true,
        Some(reason) => {
            log::warn!("rejecting bar {}: {reason}", bar.date);
            rejected += 1;
            false
        }
    });

    if total > 0 && rejected as f64 / total as f64 > max_rejected_fraction {
        return Err(DataError::Validation {
            rejected,
            total,
            max_fraction: max_rejected_fraction,
        });
    }

    Ok(IngestReport {
        bars,
        duplicates,
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    #[test]
    fn sorts_and_dedups_first_wins() {
        let raw = vec![bar(3, 30.0), bar(1, 10.0), bar(3, 99.0), bar(2, 20.0)];
        let report = ingest(raw, 0.05).unwrap();
        let closes: Vec<f64> = report.bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![10.0, 20.0, 30.0]);
        assert_eq!(report.duplicates, 1);
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn dedup_prefers_sane_duplicate() {
        let mut broken = bar(2, 20.0);
        broken.low = broken.high + 1.0;
        let raw = vec![bar(1, 10.0), broken, bar(2, 21.0), bar(2, 22.0), bar(3, 30.0)];
        let report = ingest(raw, 0.05).unwrap();
        let closes: Vec<f64> = report.bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![10.0, 21.0, 30.0]);
        assert_eq!(report.duplicates, 2);
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn rejects_malformed_under_threshold() {
        let mut raw: Vec<Bar> = (1..=30).map(|d| bar(d, 100.0 + d as f64)).collect();
        raw[10].high = raw[10].low - 5.0;
        let report = ingest(raw, 0.05).unwrap();
        assert_eq!(report.bars.len(), 29);
        assert_eq!(report.rejected, 1);
        assert!(report.bars.iter().all(Bar::is_sane));
    }

    #[test]
    fn fails_over_threshold() {
        let mut raw: Vec<Bar> = (1..=10).map(|d| bar(d, 100.0)).collect();
        raw[0].volume = -1.0;
        raw[1].close = f64::NAN;
        let err = ingest(raw, 0.05).unwrap_err();
        assert!(matches!(
            err,
            DataError::Validation {
                rejected: 2,
                total: 10,
                ..
            }
        ));
    }

    fn fetched(bars: Vec<Bar>, unparsed: usize) -> FetchResult {
        FetchResult {
            symbol: "399006.SZ".to_string(),
            bars,
            source: crate::data::DataSource::CsvImport,
            unparsed,
        }
    }

    #[test]
    fn unparsed_rows_count_as_rejected() {
        let raw: Vec<Bar> = (1..=29).map(|d| bar(d, 100.0)).collect();
        let report = ingest_fetched(fetched(raw, 1), 0.05).unwrap();
        assert_eq!(report.bars.len(), 29);
        assert_eq!(report.rejected, 1);

        let raw: Vec<Bar> = (1..=8).map(|d| bar(d, 100.0)).collect();
        let err = ingest_fetched(fetched(raw, 2), 0.05).unwrap_err();
        assert!(matches!(
            err,
            DataError::Validation {
                rejected: 2,
                total: 10,
                ..
            }
        ));
    }

    #[test]
    fn empty_input_is_ok() {
        let report = ingest(Vec::new(), 0.05).unwrap();
        assert!(report.bars.is_empty());
    }
}
