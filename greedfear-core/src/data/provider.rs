//! Bar source trait and structured error types.
//!
//! `DataProvider` abstracts over where daily bars come from (Yahoo Finance,
//! a CSV export, a synthetic walk) so the refresh path can be driven by a
//! fake in tests.

use crate::domain::Bar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("no bars for '{symbol}' between {start} and {end}")]
    Empty {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error(
        "too many malformed bars: {rejected} of {total} rejected (limit {:.1}%)",
        .max_fraction * 100.0
    )]
    Validation {
        rejected: usize,
        total: usize,
        max_fraction: f64,
    },

    #[error("data error: {0}")]
    Other(String),
}

/// Bars returned by one provider call.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub bars: Vec<Bar>,
    pub source: DataSource,
    /// Rows the source could not turn into a bar at all (no usable date).
    pub unparsed: usize,
}

/// Where the bars came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataSource::YahooFinance => "yahoo_finance",
            DataSource::CsvImport => "csv_import",
            DataSource::Synthetic => "synthetic",
        };
        f.write_str(s)
    }
}

/// A source of daily OHLCV bars for one instrument.
///
/// Implementations return whatever the upstream gives them; ordering,
/// de-duplication and validation happen in `ingest`.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for `symbol` with `start <= date <= end`.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<FetchResult, DataError>;
}
