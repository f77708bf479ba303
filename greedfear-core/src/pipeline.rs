//! Bars in, greed/fear series out.
//!
//! indicators -> scorer -> aggregator. Pure and deterministic: the same
//! bars and config always give the same records.

use crate::aggregate::Aggregator;
use crate::config::SentimentConfig;
use crate::domain::{Bar, SentimentRecord};
use crate::indicators::IndicatorFrame;
use crate::scoring::{ScoreVector, Scorer};

/// Output of one pipeline pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentRun {
    pub records: Vec<SentimentRecord>,
    /// Bars needed for the first record.
    pub required_bars: usize,
    /// Index of the first bar with every indicator defined.
    pub warmup: usize,
}

/// Compute the greed/fear series for `bars`.
///
/// `bars` must be ascending by date and already validated (see
/// `data::ingest`). For `L >= required_bars` the run holds exactly
/// `L - required_bars + 1` records; shorter histories give none.
///
/// Panics if `config` fails `SentimentConfig::validate`.
pub fn compute_sentiment(bars: &[Bar], config: &SentimentConfig) -> SentimentRun {
    let required_bars = config.required_bars();
    let frame = IndicatorFrame::compute(bars, &config.indicators);
    let warmup = frame.warmup();

    let scorer = Scorer::new(config.scoring.clone());
    let scored: Vec<(usize, ScoreVector)> = (warmup..frame.len())
        .filter_map(|i| scorer.score_day(&frame, i).map(|s| (i, s)))
        .collect();
    if scored.len() < frame.len().saturating_sub(warmup) {
        log::warn!(
            "{} day(s) past warmup had undefined scores and were dropped",
            frame.len() - warmup - scored.len()
        );
    }

    let aggregator = Aggregator::new(config.weights.clone(), config.smoothing);
    let vectors: Vec<ScoreVector> = scored.iter().map(|(_, s)| *s).collect();
    let index = aggregator.aggregate(&vectors);

    let finite = |v: f64| v.is_finite().then_some(v);
    let records: Vec<SentimentRecord> = scored
        .iter()
        .zip(index)
        .filter_map(|(&(i, _), gf)| {
            let gf = gf?;
            Some(SentimentRecord {
                date: frame.dates[i],
                close: frame.close[i],
                greed: gf.greed,
                fear: gf.fear,
                pct_change: finite(frame.pct_change[i]),
                volatility: finite(frame.volatility[i]),
            })
        })
        .collect();

    log::debug!(
        "sentiment: {} bars -> {} records (warmup {warmup}, required {required_bars})",
        bars.len(),
        records.len()
    );

    SentimentRun {
        records,
        required_bars,
        warmup,
    }
}
