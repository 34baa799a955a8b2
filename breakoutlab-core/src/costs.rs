//! Cost model — slippage and commission on intended trades.
//!
//! Slippage is directional: buyers pay more, sellers receive less.
//! Commission is a percentage of the filled notional, optionally floored
//! by a minimum ticket. Requested shares always fill in full — liquidity
//! is assumed sufficient, a stated simplification of this simulator.

use crate::domain::{Trade, TradeSide};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Execution friction parameters, in percent units (0.25 = 0.25%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostModel {
    pub slippage_pct: f64,
    pub commission_pct: f64,
    /// Minimum commission per ticket, when the broker charges one.
    #[serde(default)]
    pub min_commission: Option<f64>,
}

impl CostModel {
    pub fn new(slippage_pct: f64, commission_pct: f64, min_commission: Option<f64>) -> Self {
        Self {
            slippage_pct,
            commission_pct,
            min_commission,
        }
    }

    pub fn frictionless() -> Self {
        Self::new(0.0, 0.0, None)
    }

    /// Adverse fill price for a side: BUY pays `ref * (1 + slip)`,
    /// SELL receives `ref * (1 - slip)`.
    fn slipped_price(&self, reference_price: f64, side: TradeSide) -> f64 {
        let slip = self.slippage_pct / 100.0;
        match side {
            TradeSide::Buy => reference_price * (1.0 + slip),
            TradeSide::Sell => reference_price * (1.0 - slip),
        }
    }

    /// Commission on a filled notional, floored at the minimum ticket.
    fn commission(&self, notional: f64) -> f64 {
        let pct = notional * self.commission_pct / 100.0;
        match self.min_commission {
            Some(min) => pct.max(min),
            None => pct,
        }
    }

    /// Convert an intended trade into the realized `Trade` record.
    pub fn fill(
        &self,
        ticker: &str,
        date: NaiveDate,
        side: TradeSide,
        shares: u64,
        reference_price: f64,
    ) -> Trade {
        let filled_price = self.slipped_price(reference_price, side);
        let qty = shares as f64;
        let slippage_cost = (filled_price - reference_price).abs() * qty;
        let commission = self.commission(filled_price * qty);

        Trade {
            ticker: ticker.to_string(),
            date,
            side,
            requested_shares: shares,
            filled_shares: shares,
            requested_price: reference_price,
            filled_price,
            commission,
            slippage_cost,
        }
    }

    /// Total cash needed to buy `shares` at `reference_price`.
    pub fn buy_cost(&self, shares: u64, reference_price: f64) -> f64 {
        let filled = self.slipped_price(reference_price, TradeSide::Buy);
        let notional = filled * shares as f64;
        notional + self.commission(notional)
    }
}
