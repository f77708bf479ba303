//! Series Store: the persisted greed/fear history.

pub mod file;
pub mod series;

pub use file::{SeriesFormat, SeriesMeta, SeriesStore, StoreError};
pub use series::Series;
