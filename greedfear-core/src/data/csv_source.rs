//! CSV bar import for offline runs.
//!
//! Expects a header row with at least `date,open,high,low,close,volume`.
//! Extra columns are ignored. Empty or unparseable price cells load as NaN
//! and are rejected later by `ingest`; rows without a usable date are
//! counted and skipped.

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::Bar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(deserialize_with = "csv::invalid_option")]
    date: Option<NaiveDate>,
    #[serde(deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

impl CsvRow {
    fn into_bar(self) -> Option<Bar> {
        Some(Bar {
            date: self.date?,
            open: self.open.unwrap_or(f64::NAN),
            high: self.high.unwrap_or(f64::NAN),
            low: self.low.unwrap_or(f64::NAN),
            close: self.close.unwrap_or(f64::NAN),
            volume: self.volume.unwrap_or(f64::NAN),
        })
    }
}

/// Bars read from a CSV file plus the rows that had no usable date.
#[derive(Debug, Clone, Default)]
pub struct CsvBars {
    pub bars: Vec<Bar>,
    pub unparsed: usize,
}

/// Parse bars from any CSV reader.
///
/// Only structural problems (I/O, missing columns, ragged rows) fail the
/// read. A bad cell affects its own row only.
pub fn read_bars<R: Read>(reader: R) -> Result<CsvBars, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut out = CsvBars::default();
    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        match row?.into_bar() {
            Some(bar) => out.bars.push(bar),
            None => {
                // header is line 1
                log::warn!("skipping CSV line {}: missing or invalid date", i + 2);
                out.unparsed += 1;
            }
        }
    }
    Ok(out)
}

/// Serves bars from a single CSV file regardless of the requested symbol.
pub struct CsvProvider {
    path: PathBuf,
}

impl CsvProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let read_err = |reason: String| DataError::Read {
            path: self.path.display().to_string(),
            reason,
        };
        let file = std::fs::File::open(&self.path).map_err(|e| read_err(e.to_string()))?;
        let read = read_bars(file).map_err(|e| read_err(e.to_string()))?;
        let bars: Vec<Bar> = read
            .bars
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();

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
            source: DataSource::CsvImport,
            unparsed: read.unparsed,
        })
    }
}
