//! Trade — realized execution record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Immutable record of one fill, with the cost model's realized economics.
///
/// `filled_shares` always equals `requested_shares`: liquidity is assumed
/// sufficient and partial fills are not modeled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub ticker: String,
    pub date: NaiveDate,
    pub side: TradeSide,
    pub requested_shares: u64,
    pub filled_shares: u64,
    pub requested_price: f64,
    pub filled_price: f64,
    pub commission: f64,
    pub slippage_cost: f64,
}

impl Trade {
    /// Notional value at the filled price.
    pub fn filled_notional(&self) -> f64 {
        self.filled_shares as f64 * self.filled_price
    }

    /// Cash impact of the trade: negative for buys (cash out, including
    /// commission), positive for sells (cash in, net of commission).
    pub fn cash_delta(&self) -> f64 {
        match self.side {
            TradeSide::Buy => -(self.filled_notional() + self.commission),
            TradeSide::Sell => self.filled_notional() - self.commission,
        }
    }
}
