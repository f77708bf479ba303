//! Refresh: fetch the latest bars, recompute and merge into the store.
//!
//! fetch -> ingest -> compute -> merge -> atomic save. Anything failing
//! before the save leaves the stored series as it was.

use crate::config::{ConfigError, SentimentConfig};
use crate::data::{ingest_fetched, DataError, DataProvider};
use crate::pipeline::compute_sentiment;
use crate::store::{SeriesStore, StoreError};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("insufficient history: {bars} bars < {required} required")]
    InsufficientHistory { bars: usize, required: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Refresh runs only once the local hour is past this (market close).
    pub cutoff_hour: u32,
    /// Series file; `.csv` or `.parquet`.
    pub store_path: PathBuf,
    /// First date requested from the provider.
    pub history_start: NaiveDate,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            cutoff_hour: 15,
            store_path: PathBuf::from("cyb_sentiment.csv"),
            // ChiNext index base date
            history_start: NaiveDate::from_ymd_opt(2010, 6, 1).unwrap_or_default(),
        }
    }
}

/// Time-of-day gate in front of a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshGate {
    pub cutoff_hour: u32,
}

impl RefreshGate {
    pub fn new(cutoff_hour: u32) -> Self {
        Self { cutoff_hour }
    }

    /// True when the hour of `now` is strictly after the cutoff.
    pub fn allows(&self, now: NaiveDateTime) -> bool {
        now.hour() > self.cutoff_hour
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Gate closed; nothing fetched.
    Skipped { hour: u32, cutoff_hour: u32 },
    Updated {
        /// Dates not present in the store before.
        added: usize,
        total: usize,
    },
}

/// Run one refresh against `store`.
///
/// `now` is local time; it drives the gate and the end of the fetch range.
/// `force` bypasses the gate.
pub fn refresh(
    provider: &dyn DataProvider,
    store: &SeriesStore,
    config: &SentimentConfig,
    now: NaiveDateTime,
    force: bool,
) -> Result<RefreshOutcome, RefreshError> {
    let gate = RefreshGate::new(config.refresh.cutoff_hour);
    if !force && !gate.allows(now) {
        log::info!(
            "refresh skipped: hour {} is not after cutoff {}",
            now.hour(),
            gate.cutoff_hour
        );
        return Ok(RefreshOutcome::Skipped {
            hour: now.hour(),
            cutoff_hour: gate.cutoff_hour,
        });
    }

    run(provider, store, config, now.date()).map_err(|e| {
        log::error!("refresh failed, stored series left untouched: {e}");
        e
    })
}

fn run(
    provider: &dyn DataProvider,
    store: &SeriesStore,
    config: &SentimentConfig,
    end: NaiveDate,
) -> Result<RefreshOutcome, RefreshError> {
    config.validate()?;

    let fetched = provider.fetch(&config.symbol, config.refresh.history_start, end)?;
    log::info!(
        "fetched {} bars for {} from {} ({})",
        fetched.bars.len(),
        fetched.symbol,
        provider.name(),
        fetched.source
    );

    let report = ingest_fetched(fetched, config.ingest.max_rejected_fraction)?;
    let sentiment = compute_sentiment(&report.bars, config);
    if sentiment.records.is_empty() {
        return Err(RefreshError::InsufficientHistory {
            bars: report.bars.len(),
            required: sentiment.required_bars,
        });
    }

    let mut series = store.load_or_empty()?;
    let added = series.merge(sentiment.records);
    store.save(&series)?;

    log::info!(
        "refresh stored {} rows ({added} new) in {}",
        series.len(),
        store.path().display()
    );
    Ok(RefreshOutcome::Updated {
        added,
        total: series.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(hour, 5, 0)
            .unwrap()
    }

    #[test]
    fn gate_is_strictly_after_cutoff() {
        let gate = RefreshGate::new(15);
        assert!(!gate.allows(at(9)));
        assert!(!gate.allows(at(15)));
        assert!(gate.allows(at(16)));
    }

    #[test]
    fn default_config() {
        let c = RefreshConfig::default();
        assert_eq!(c.cutoff_hour, 15);
        assert_eq!(c.history_start, NaiveDate::from_ymd_opt(2010, 6, 1).unwrap());
    }
}
