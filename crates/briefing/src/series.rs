//! Daily OHLCV series types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily price bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl DailyBar {
    /// A bar gains when it closes at or above its open
    pub fn is_gain(&self) -> bool {
        self.close >= self.open
    }
}

/// An ordered sequence of daily bars: ascending by date, one bar per
/// trading day. The `low <= open,close <= high` invariant is assumed
/// from upstream data and not enforced here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcvSeries {
    bars: Vec<DailyBar>,
}

impl OhlcvSeries {
    /// Build a series from raw bars, sorting ascending by date and
    /// dropping duplicate dates (the last bar for a date wins).
    pub fn new(mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        bars.dedup_by(|next, prev| {
            if next.date == prev.date {
                *prev = *next;
                true
            } else {
                false
            }
        });
        Self { bars }
    }

    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Price axis domain: `[min(low), max(high)]`, or `None` for an
    /// empty series
    pub fn price_range(&self) -> Option<(f64, f64)> {
        if self.bars.is_empty() {
            return None;
        }
        let min_low = self.bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let max_high = self
            .bars
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min_low, max_high))
    }

    /// Largest volume across the series, or `None` when empty
    pub fn max_volume(&self) -> Option<u64> {
        self.bars.iter().map(|b| b.volume).max()
    }
}
