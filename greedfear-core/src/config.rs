//! Sentiment configuration, loadable from TOML.
//!
//! Every section is optional in the file; missing keys take the canonical
//! defaults.
//!
//! ```toml
//! symbol = "399006.SZ"
//!
//! [weights]
//! stochastic = 0.25
//! bollinger = 0.20
//! volume = 0.20
//! ma_cross = 0.15
//! rsi = 0.10
//! macd = 0.10
//!
//! [smoothing]
//! type = "EMA"
//! span = 3
//! ```

use crate::aggregate::{Smoothing, Weights, WEIGHT_SUM_TOLERANCE};
use crate::data::{IngestConfig, DEFAULT_SYMBOL};
use crate::indicators::IndicatorParams;
use crate::refresh::RefreshConfig;
use crate::scoring::ScoreParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    pub symbol: String,
    pub indicators: IndicatorParams,
    pub scoring: ScoreParams,
    pub weights: Weights,
    pub smoothing: Smoothing,
    pub ingest: IngestConfig,
    pub refresh: RefreshConfig,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL.to_string(),
            indicators: IndicatorParams::default(),
            scoring: ScoreParams::default(),
            weights: Weights::default(),
            smoothing: Smoothing::default(),
            ingest: IngestConfig::default(),
            refresh: RefreshConfig::default(),
        }
    }
}

impl SentimentConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Bars needed before the first output row.
    pub fn required_bars(&self) -> usize {
        self.indicators.required_bars() + self.smoothing.extra_warmup()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        let ind = &self.indicators;

        if self.symbol.trim().is_empty() {
            return invalid("symbol must not be empty".into());
        }

        let periods = [
            ("stoch_period", ind.stoch_period),
            ("stoch_k_smooth", ind.stoch_k_smooth),
            ("stoch_d_smooth", ind.stoch_d_smooth),
            ("bollinger_period", ind.bollinger_period),
            ("volume_period", ind.volume_period),
            ("ma_fast", ind.ma_fast),
            ("ma_slow", ind.ma_slow),
            ("rsi_period", ind.rsi_period),
            ("macd_signal", ind.macd_signal),
            ("macd_scale_window", ind.macd_scale_window),
        ];
        for (name, period) in periods {
            if period == 0 {
                return invalid(format!("indicators.{name} must be >= 1"));
            }
        }
        if ind.macd_fast == 0 || ind.macd_fast >= ind.macd_slow {
            return invalid(format!(
                "indicators.macd_fast ({}) must be >= 1 and below macd_slow ({})",
                ind.macd_fast, ind.macd_slow
            ));
        }
        if ind.volatility_period < 2 {
            return invalid("indicators.volatility_period must be >= 2".into());
        }
        if !(ind.bollinger_multiplier.is_finite() && ind.bollinger_multiplier > 0.0) {
            return invalid("indicators.bollinger_multiplier must be positive".into());
        }

        let sc = &self.scoring;
        if !ascending(sc.stoch_oversold, sc.stoch_overbought) {
            return invalid("scoring.stoch_oversold must be below stoch_overbought".into());
        }
        if !ascending(sc.rsi_low, sc.rsi_high) {
            return invalid("scoring.rsi_low must be below rsi_high".into());
        }
        if !(sc.volume_sensitivity.is_finite() && sc.volume_sensitivity > 0.0) {
            return invalid("scoring.volume_sensitivity must be positive".into());
        }

        if !self.weights.is_normalized() {
            return invalid(format!(
                "weights must be non-negative and sum to 1 (±{WEIGHT_SUM_TOLERANCE}), got {:.6}",
                self.weights.sum()
            ));
        }
        if !self.smoothing.is_valid() {
            return invalid(format!("smoothing {:?} needs a period >= 1", self.smoothing));
        }

        let frac = self.ingest.max_rejected_fraction;
        if !(0.0..=1.0).contains(&frac) {
            return invalid(format!(
                "ingest.max_rejected_fraction must be within [0, 1], got {frac}"
            ));
        }
        if self.refresh.cutoff_hour > 23 {
            return invalid(format!(
                "refresh.cutoff_hour must be within 0..=23, got {}",
                self.refresh.cutoff_hour
            ));
        }
        Ok(())
    }
}

/// `low < high`, false when either is NaN.
fn ascending(low: f64, high: f64) -> bool {
    low < high
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = SentimentConfig::default();
        config.validate().unwrap();
        assert_eq!(config.symbol, "399006.SZ");
        assert_eq!(config.required_bars(), 43);
    }

    #[test]
    fn toml_roundtrip() {
        let config = SentimentConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = SentimentConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config = SentimentConfig::from_toml(
            r#"
            symbol = "000300.SS"

            [smoothing]
            type = "SMA"
            window = 5

            [indicators]
            rsi_period = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.symbol, "000300.SS");
        assert_eq!(config.smoothing, Smoothing::Sma { window: 5 });
        assert_eq!(config.indicators.rsi_period, 10);
        assert_eq!(config.indicators.stoch_period, 9);
        assert_eq!(config.weights, Weights::default());
        assert_eq!(config.required_bars(), 43 + 4);
    }

    #[test]
    fn rejects_unnormalized_weights() {
        let err = SentimentConfig::from_toml("[weights]\nstochastic = 0.9\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_periods() {
        let mut config = SentimentConfig::default();
        config.indicators.macd_fast = 30;
        assert!(config.validate().is_err());

        let mut config = SentimentConfig::default();
        config.indicators.ma_slow = 0;
        assert!(config.validate().is_err());

        let mut config = SentimentConfig::default();
        config.refresh.cutoff_hour = 24;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let err = SentimentConfig::from_toml("symbol = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SentimentConfig::from_file(Path::new("/nonexistent/greedfear.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
