//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV bar for a single ticker.
///
/// Bars are immutable once ingested, ordered by date per ticker, and a
/// (ticker, date) pair appears at most once in a series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub ticker: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Basic OHLC sanity check: high is the top of the range, low the bottom,
    /// and prices are positive.
    pub fn is_sane(&self) -> bool {
        !self.open.is_nan()
            && !self.high.is_nan()
            && !self.low.is_nan()
            && !self.close.is_nan()
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}
