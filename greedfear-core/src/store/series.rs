//! In-memory greed/fear series: sorted, one row per date.

use crate::domain::SentimentRecord;
use chrono::{Months, NaiveDate};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    records: Vec<SentimentRecord>,
}

impl Series {
    /// Build from rows in any order. A later row replaces an earlier one
    /// with the same date.
    pub fn from_records(records: Vec<SentimentRecord>) -> Self {
        let mut series = Self::default();
        series.merge(records);
        series
    }

    pub fn records(&self) -> &[SentimentRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<SentimentRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&SentimentRecord> {
        self.records.first()
    }

    pub fn latest(&self) -> Option<&SentimentRecord> {
        self.records.last()
    }

    /// Merge `incoming` by date; incoming rows replace stored ones.
    ///
    /// Returns the number of dates that were not present before.
    pub fn merge(&mut self, incoming: Vec<SentimentRecord>) -> usize {
        let before = self.records.len();
        // incoming first so a stable sort + dedup keeps it over stored rows;
        // reversed so the last duplicate within `incoming` wins
        let mut all: Vec<SentimentRecord> = incoming.into_iter().rev().collect();
        all.append(&mut self.records);
        all.sort_by_key(|r| r.date);
        all.dedup_by_key(|r| r.date);
        self.records = all;
        self.records.len() - before
    }

    /// Rows with `start <= date <= end`. Open bounds are unbounded.
    pub fn range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> &[SentimentRecord] {
        let lo = start.map_or(0, |s| self.records.partition_point(|r| r.date < s));
        let hi = end.map_or(self.records.len(), |e| {
            self.records.partition_point(|r| r.date <= e)
        });
        if lo >= hi {
            &[]
        } else {
            &self.records[lo..hi]
        }
    }

    /// Last row inside `start..=end`, the reading a range view reports as
    /// its latest state. `None` when the range holds no rows.
    pub fn latest_in(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<&SentimentRecord> {
        self.range(start, end).last()
    }

    /// The last `months` months ending at the latest row, clamped to the
    /// first row. `None` for an empty series.
    pub fn default_window(&self, months: u32) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.first()?.date;
        let end = self.latest()?.date;
        let start = end
            .checked_sub_months(Months::new(months))
            .map_or(first, |s| s.max(first));
        Some((start, end))
    }

    /// BLAKE3 over every row, hex encoded.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for r in &self.records {
            hasher.update(r.date.to_string().as_bytes());
            hasher.update(&r.close.to_le_bytes());
            hasher.update(&r.greed.to_le_bytes());
            hasher.update(&r.fear.to_le_bytes());
            for opt in [r.pct_change, r.volatility] {
                match opt {
                    Some(v) => hasher.update(&v.to_le_bytes()),
                    None => hasher.update(b"-"),
                };
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}
