//! Sentiment records and the display labels derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One day of the greed/fear series. This is the only persisted artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub greed: f64,
    pub fear: f64,
    /// Close-to-close change in percent.
    #[serde(default)]
    pub pct_change: Option<f64>,
    /// Rolling standard deviation of `pct_change`.
    #[serde(default)]
    pub volatility: Option<f64>,
}

impl SentimentRecord {
    pub fn greed_level(&self) -> GreedLevel {
        GreedLevel::from_value(self.greed)
    }

    pub fn fear_level(&self) -> FearLevel {
        FearLevel::from_value(self.fear)
    }
}

/// Display bucket for the greed index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreedLevel {
    ExtremeGreed,
    Greed,
    Neutral,
    Cautious,
}

impl GreedLevel {
    pub fn from_value(greed: f64) -> Self {
        if greed > 85.0 {
            Self::ExtremeGreed
        } else if greed > 70.0 {
            Self::Greed
        } else if greed > 55.0 {
            Self::Neutral
        } else {
            Self::Cautious
        }
    }
}

impl fmt::Display for GreedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ExtremeGreed => "extreme greed",
            Self::Greed => "greed",
            Self::Neutral => "neutral",
            Self::Cautious => "cautious",
        };
        f.write_str(label)
    }
}

/// Display bucket for the fear index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FearLevel {
    ExtremeFear,
    Fear,
    Neutral,
    Calm,
}

impl FearLevel {
    pub fn from_value(fear: f64) -> Self {
        if fear > 85.0 {
            Self::ExtremeFear
        } else if fear > 70.0 {
            Self::Fear
        } else if fear > 55.0 {
            Self::Neutral
        } else {
            Self::Calm
        }
    }
}

impl fmt::Display for FearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ExtremeFear => "extreme fear",
            Self::Fear => "fear",
            Self::Neutral => "neutral",
            Self::Calm => "calm",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greed_level_thresholds_are_exclusive() {
        assert_eq!(GreedLevel::from_value(85.0), GreedLevel::Greed);
        assert_eq!(GreedLevel::from_value(85.1), GreedLevel::ExtremeGreed);
        assert_eq!(GreedLevel::from_value(70.0), GreedLevel::Neutral);
        assert_eq!(GreedLevel::from_value(55.0), GreedLevel::Cautious);
        assert_eq!(GreedLevel::from_value(0.0), GreedLevel::Cautious);
    }

    #[test]
    fn fear_level_thresholds_are_exclusive() {
        assert_eq!(FearLevel::from_value(100.0), FearLevel::ExtremeFear);
        assert_eq!(FearLevel::from_value(71.0), FearLevel::Fear);
        assert_eq!(FearLevel::from_value(60.0), FearLevel::Neutral);
        assert_eq!(FearLevel::from_value(50.0), FearLevel::Calm);
    }

    #[test]
    fn labels_display() {
        assert_eq!(GreedLevel::ExtremeGreed.to_string(), "extreme greed");
        assert_eq!(FearLevel::Calm.to_string(), "calm");
    }

    #[test]
    fn record_levels() {
        let rec = SentimentRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            close: 1850.0,
            greed: 72.0,
            fear: 40.0,
            pct_change: Some(0.4),
            volatility: Some(1.1),
        };
        assert_eq!(rec.greed_level(), GreedLevel::Greed);
        assert_eq!(rec.fear_level(), FearLevel::Calm);
    }
}
