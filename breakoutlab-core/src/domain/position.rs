//! PositionState — per-ticker open-position record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// State of a long position in one ticker.
///
/// Owned exclusively by the orchestrator; strategies receive a read-only
/// view and return proposed transitions. Destroyed (`is_open = false`) on a
/// SELL fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionState {
    pub ticker: String,
    pub entry_date: NaiveDate,
    /// Realized entry price (after slippage), not the signal reference price.
    pub entry_price: f64,
    pub shares: u64,
    /// Trailing stop, if the strategy maintains one. Ratchets up only.
    pub stop_price: Option<f64>,
    pub is_open: bool,
}

impl PositionState {
    pub fn open(
        ticker: String,
        entry_date: NaiveDate,
        entry_price: f64,
        shares: u64,
        stop_price: Option<f64>,
    ) -> Self {
        Self {
            ticker,
            entry_date,
            entry_price,
            shares,
            stop_price,
            is_open: true,
        }
    }

    /// Market value at a given price.
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    /// Raise the trailing stop to `proposed` if it is higher than the
    /// current stop. The stop never moves down (ratchet invariant).
    pub fn ratchet_stop(&mut self, proposed: f64) -> f64 {
        let next = match self.stop_price {
            Some(current) => current.max(proposed),
            None => proposed,
        };
        self.stop_price = Some(next);
        next
    }
}
