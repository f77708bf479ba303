//! Bar sources and ingest validation.

pub mod csv_source;
pub mod ingest;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use csv_source::CsvProvider;
pub use ingest::{ingest, ingest_fetched, IngestConfig, IngestReport, DEFAULT_MAX_REJECTED_FRACTION};
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use synthetic::SyntheticProvider;
pub use yahoo::{YahooProvider, DEFAULT_SYMBOL};
