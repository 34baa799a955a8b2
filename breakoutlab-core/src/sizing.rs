//! Equal-slot position sizing.
//!
//! Capital is divided into a fixed number of slots; each new position gets
//! one slot's worth, rounded down to whole shares. A BUY that cannot get a
//! slot or cannot afford a single share is skipped — recorded by the
//! orchestrator, never silently dropped and never queued. SELLs always
//! close the full position; partial exits are out of scope.

use serde::{Deserialize, Serialize};

/// Why a BUY signal was not converted into an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeSkip {
    /// All slots hold open positions.
    NoFreeSlot,
    /// One slot's capital buys less than one share at this price.
    BelowOneShare,
}

/// Equal-slot sizer.
#[derive(Debug, Clone, Copy)]
pub struct SlotSizer {
    slots: usize,
}

impl SlotSizer {
    pub fn new(slots: usize) -> Self {
        assert!(slots >= 1, "slot count must be >= 1");
        Self { slots }
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Capital assigned to one slot at the current equity level.
    pub fn per_slot(&self, equity: f64) -> f64 {
        equity / self.slots as f64
    }

    /// Size one new entry.
    ///
    /// The allocation is one slot's capital, clamped to the cash still
    /// uncommitted on this date so a day's entries can never outspend the
    /// cash on hand.
    pub fn size_entry(
        &self,
        reference_price: f64,
        equity: f64,
        cash_remaining: f64,
        open_positions: usize,
    ) -> Result<u64, SizeSkip> {
        if open_positions >= self.slots {
            return Err(SizeSkip::NoFreeSlot);
        }
        if reference_price <= 0.0 || !reference_price.is_finite() {
            return Err(SizeSkip::BelowOneShare);
        }

        let allocation = self.per_slot(equity).min(cash_remaining);
        let shares = (allocation / reference_price).floor() as u64;
        if shares == 0 {
            return Err(SizeSkip::BelowOneShare);
        }
        Ok(shares)
    }
}
