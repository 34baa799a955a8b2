//! Run diagnostics — why the engine skipped what it skipped.
//!
//! Skips are diagnostics, not errors: a warmup ticker, a Bear-regime date,
//! or an unaffordable entry is normal operation. The orchestrator records
//! each one so a run can be audited after the fact.

use crate::sizing::SizeSkip;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why a (ticker, date) took no action it otherwise might have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Ticker holds an open position but has no bar on this date; the
    /// position is carried at its last known close.
    DataGap,
    /// Ticker has a bar but its indicator stack has not warmed up.
    InsufficientHistory,
    /// A BUY signal could not be sized: no free slot, or one slot's
    /// capital (clamped to remaining cash) buys less than one share.
    AllocationExhausted,
    /// Entries are gated: the index closed at or below its SMA.
    RegimeBear,
    /// Entries are gated: the index has no regime value for this date.
    RegimeUnavailable,
}

impl From<SizeSkip> for SkipReason {
    fn from(_: SizeSkip) -> Self {
        SkipReason::AllocationExhausted
    }
}

/// One recorded skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipEvent {
    pub date: NaiveDate,
    pub ticker: String,
    pub reason: SkipReason,
}

/// All skips for one run, in date-then-ticker order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub events: Vec<SkipEvent>,
}

impl Diagnostics {
    pub fn record(&mut self, date: NaiveDate, ticker: &str, reason: SkipReason) {
        self.events.push(SkipEvent {
            date,
            ticker: ticker.to_string(),
            reason,
        });
    }

    /// Count of events per reason.
    pub fn counts(&self) -> BTreeMap<SkipReason, usize> {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.reason).or_insert(0) += 1;
        }
        counts
    }

    pub fn count_of(&self, reason: SkipReason) -> usize {
        self.events.iter().filter(|e| e.reason == reason).count()
    }
}
