//! Greed/Fear core: sentiment indices from daily OHLCV bars.
//!
//! - Domain types (bars, sentiment records, display levels)
//! - Indicator Engine (stochastic, Bollinger, MAs, RSI, MACD, volume, volatility)
//! - Scorer mapping each indicator to a [0, 1] sub-score
//! - Aggregator: weighted greed/fear, smoothing, clipping to [0, 100]
//! - Bar sources, ingest validation, the file-backed Series Store and refresh

pub mod aggregate;
pub mod config;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod pipeline;
pub mod refresh;
pub mod scoring;
pub mod store;

pub use config::{ConfigError, SentimentConfig};
pub use pipeline::{compute_sentiment, SentimentRun};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types handed across threads by callers are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::SentimentRecord>();
        require_sync::<domain::SentimentRecord>();
        require_send::<indicators::IndicatorFrame>();
        require_sync::<indicators::IndicatorFrame>();
        require_send::<scoring::ScoreVector>();
        require_sync::<scoring::ScoreVector>();
        require_send::<SentimentConfig>();
        require_sync::<SentimentConfig>();
        require_send::<store::Series>();
        require_sync::<store::Series>();
        require_send::<store::SeriesStore>();
        require_sync::<store::SeriesStore>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<Box<dyn data::DataProvider>>();
        require_sync::<Box<dyn data::DataProvider>>();
    }

    #[test]
    fn send_sync_check_compiles() {
        assert_send_sync();
    }
}
