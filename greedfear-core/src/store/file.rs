//! File-backed series store.
//!
//! Format follows the extension: `.csv` or `.parquet`. Writes go to a
//! `.tmp` sibling and are renamed into place, so a failed write never
//! replaces the previous file. A `<file>.meta.json` sidecar records row
//! count, date range and fingerprint.

use super::series::Series;
use crate::domain::SentimentRecord;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const COLUMNS: [&str; 6] = ["date", "close", "greed", "fear", "pct_change", "volatility"];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("series file not found: {0}")]
    NotFound(String),

    #[error("unsupported series format '{0}' (expected .csv or .parquet)")]
    UnsupportedFormat(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("parquet error: {0}")]
    Parquet(String),

    #[error("metadata error: {0}")]
    Meta(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesFormat {
    Csv,
    Parquet,
}

impl SeriesFormat {
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" => Ok(Self::Parquet),
            _ => Err(StoreError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Sidecar written next to every saved series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub format: SeriesFormat,
    pub rows: usize,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub fingerprint: String,
    pub written_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct SeriesStore {
    path: PathBuf,
    format: SeriesFormat,
}

impl SeriesStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let format = SeriesFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> SeriesFormat {
        self.format
    }

    pub fn meta_path(&self) -> PathBuf {
        sibling(&self.path, ".meta.json")
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Series, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound(self.path.display().to_string()));
        }
        let records = match self.format {
            SeriesFormat::Csv => read_csv(&self.path)?,
            SeriesFormat::Parquet => read_parquet(&self.path)?,
        };
        Ok(Series::from_records(records))
    }

    /// Load the stored series, or an empty one if nothing has been saved.
    pub fn load_or_empty(&self) -> Result<Series, StoreError> {
        match self.load() {
            Err(StoreError::NotFound(_)) => Ok(Series::default()),
            other => other,
        }
    }

    /// Atomically replace the stored series and its sidecar.
    pub fn save(&self, series: &Series) -> Result<SeriesMeta, StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| io_err(parent, source))?;
        }

        let tmp = sibling(&self.path, ".tmp");
        let written = match self.format {
            SeriesFormat::Csv => write_csv(&tmp, series.records()),
            SeriesFormat::Parquet => write_parquet(&tmp, series.records()),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        rename_into_place(&tmp, &self.path)?;

        let meta = SeriesMeta {
            format: self.format,
            rows: series.len(),
            start_date: series.first().map(|r| r.date),
            end_date: series.latest().map(|r| r.date),
            fingerprint: series.fingerprint(),
            written_at: chrono::Local::now().naive_local(),
        };
        let json = serde_json::to_string_pretty(&meta)
            .map_err(|e| StoreError::Meta(format!("serialize: {e}")))?;
        let meta_path = self.meta_path();
        let meta_tmp = sibling(&meta_path, ".tmp");
        fs::write(&meta_tmp, json).map_err(|source| io_err(&meta_tmp, source))?;
        rename_into_place(&meta_tmp, &meta_path)?;

        log::debug!("saved {} rows to {}", meta.rows, self.path.display());
        Ok(meta)
    }

    /// Sidecar of the last save, if readable.
    pub fn meta(&self) -> Option<SeriesMeta> {
        let content = fs::read_to_string(self.meta_path()).ok()?;
        serde_json::from_str(&content).ok()
    }
}

/// `path` with `suffix` appended to the file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("series"));
    name.push(suffix);
    path.with_file_name(name)
}

fn io_err(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn rename_into_place(tmp: &Path, path: &Path) -> Result<(), StoreError> {
    fs::rename(tmp, path).map_err(|source| {
        let _ = fs::remove_file(tmp);
        io_err(path, source)
    })
}

// ── CSV ─────────────────────────────────────────────────────────────

fn write_csv(path: &Path, records: &[SentimentRecord]) -> Result<(), StoreError> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| StoreError::Csv(e.to_string()))?;
    if records.is_empty() {
        wtr.write_record(COLUMNS)
            .map_err(|e| StoreError::Csv(e.to_string()))?;
    }
    for r in records {
        wtr.serialize(r).map_err(|e| StoreError::Csv(e.to_string()))?;
    }
    wtr.flush().map_err(|source| io_err(path, source))
}

fn read_csv(path: &Path) -> Result<Vec<SentimentRecord>, StoreError> {
    let mut rdr = csv::Reader::from_path(path).map_err(|e| StoreError::Csv(e.to_string()))?;
    rdr.deserialize()
        .collect::<Result<Vec<SentimentRecord>, _>>()
        .map_err(|e| StoreError::Csv(format!("{}: {e}", path.display())))
}

// ── Parquet ─────────────────────────────────────────────────────────

/// Day zero of the parquet `Date` type (1970-01-01).
fn epoch() -> NaiveDate {
    NaiveDate::default()
}

fn records_to_dataframe(records: &[SentimentRecord]) -> Result<DataFrame, StoreError> {
    let dates: Vec<i32> = records
        .iter()
        .map(|r| (r.date - epoch()).num_days() as i32)
        .collect();
    let close: Vec<f64> = records.iter().map(|r| r.close).collect();
    let greed: Vec<f64> = records.iter().map(|r| r.greed).collect();
    let fear: Vec<f64> = records.iter().map(|r| r.fear).collect();
    let pct_change: Vec<Option<f64>> = records.iter().map(|r| r.pct_change).collect();
    let volatility: Vec<Option<f64>> = records.iter().map(|r| r.volatility).collect();

    DataFrame::new(vec![
        Column::new("date".into(), dates)
            .cast(&DataType::Date)
            .map_err(|e| StoreError::Parquet(format!("date cast: {e}")))?,
        Column::new("close".into(), close),
        Column::new("greed".into(), greed),
        Column::new("fear".into(), fear),
        Column::new("pct_change".into(), pct_change),
        Column::new("volatility".into(), volatility),
    ])
    .map_err(|e| StoreError::Parquet(format!("dataframe creation: {e}")))
}

fn write_parquet(path: &Path, records: &[SentimentRecord]) -> Result<(), StoreError> {
    let mut df = records_to_dataframe(records)?;
    let file = fs::File::create(path).map_err(|source| io_err(path, source))?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| StoreError::Parquet(format!("write: {e}")))?;
    Ok(())
}

fn read_parquet(path: &Path) -> Result<Vec<SentimentRecord>, StoreError> {
    let file = fs::File::open(path).map_err(|source| io_err(path, source))?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| StoreError::Parquet(format!("read: {e}")))?;

    for name in COLUMNS {
        if df.column(name).is_err() {
            return Err(StoreError::Parquet(format!("missing column '{name}'")));
        }
    }

    let col_err = |name: &str, e: PolarsError| StoreError::Parquet(format!("{name} column: {e}"));
    let f64_col = |name: &str| -> Result<Float64Chunked, StoreError> {
        df.column(name)
            .and_then(|c| c.f64().cloned())
            .map_err(|e| col_err(name, e))
    };

    let dates = df
        .column("date")
        .and_then(|c| c.date().cloned())
        .map_err(|e| col_err("date", e))?;
    let close = f64_col("close")?;
    let greed = f64_col("greed")?;
    let fear = f64_col("fear")?;
    let pct_change = f64_col("pct_change")?;
    let volatility = f64_col("volatility")?;

    let missing = |name: &str, i: usize| StoreError::Parquet(format!("null {name} at row {i}"));
    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let days = dates.get(i).ok_or_else(|| missing("date", i))?;
        records.push(SentimentRecord {
            date: epoch() + chrono::Duration::days(days as i64),
            close: close.get(i).ok_or_else(|| missing("close", i))?,
            greed: greed.get(i).ok_or_else(|| missing("greed", i))?,
            fear: fear.get(i).ok_or_else(|| missing("fear", i))?,
            pct_change: pct_change.get(i),
            volatility: volatility.get(i),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Series {
        Series::from_records(
            (2..=6)
                .map(|d| SentimentRecord {
                    date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                    close: 2000.0 + d as f64,
                    greed: 40.0 + d as f64,
                    fear: 60.0 - d as f64,
                    pct_change: (d > 2).then_some(0.05),
                    volatility: Some(1.25),
                })
                .collect(),
        )
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            SeriesFormat::from_path(Path::new("a/b.csv")).unwrap(),
            SeriesFormat::Csv
        );
        assert_eq!(
            SeriesFormat::from_path(Path::new("b.PARQUET")).unwrap(),
            SeriesFormat::Parquet
        );
        assert!(SeriesStore::new("series.xlsx").is_err());
        assert!(SeriesStore::new("series").is_err());
    }

    #[test]
    fn csv_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SeriesStore::new(dir.path().join("greedfear.csv")).unwrap();
        let series = sample();

        let meta = store.save(&series).unwrap();
        assert_eq!(meta.rows, 5);
        assert_eq!(store.load().unwrap(), series);
        assert_eq!(store.meta().unwrap().fingerprint, series.fingerprint());
        assert!(!sibling(store.path(), ".tmp").exists());

        let header = fs::read_to_string(store.path()).unwrap();
        assert!(header.starts_with("date,close,greed,fear,pct_change,volatility"));
    }

    #[test]
    fn parquet_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SeriesStore::new(dir.path().join("nested/greedfear.parquet")).unwrap();
        let series = sample();

        store.save(&series).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, series);
        assert_eq!(loaded.records()[0].pct_change, None);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SeriesStore::new(dir.path().join("none.csv")).unwrap();
        assert!(matches!(store.load(), Err(StoreError::NotFound(_))));
        assert!(store.load_or_empty().unwrap().is_empty());
        assert!(store.meta().is_none());
    }

    #[test]
    fn empty_series_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SeriesStore::new(dir.path().join("empty.csv")).unwrap();
        store.save(&Series::default()).unwrap();
        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.meta().unwrap().start_date, None);
    }
}
