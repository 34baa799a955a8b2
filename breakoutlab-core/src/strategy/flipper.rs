//! Trailing-stop flipper — new-high entry, percent trailing stop exit.
//!
//! FLAT → LONG when close exceeds the prior entry-window high (the same
//! new-high trigger as the Donchian entry). While LONG, the stop is
//! re-proposed every date as `close * (1 - trail)`; the orchestrator's
//! ratchet keeps the stored stop monotone non-decreasing, so the stop only
//! ever rises with the trade. LONG → FLAT when close drops below the stop.

use super::{Evaluation, Strategy, TickerDay};
use crate::domain::{PositionState, SignalAction, StrategyId};

#[derive(Debug, Clone, Copy)]
pub struct TrailingFlipper {
    /// Trail distance as a fraction (e.g., 0.20 for a 20% stop).
    trail: f64,
}

impl TrailingFlipper {
    pub fn new(trail: f64) -> Self {
        assert!(trail > 0.0 && trail < 1.0, "trail must be in (0, 1)");
        Self { trail }
    }

    fn proposed_stop(&self, close: f64) -> f64 {
        close * (1.0 - self.trail)
    }
}

impl Strategy for TrailingFlipper {
    fn id(&self) -> StrategyId {
        StrategyId::TrailingFlipper
    }

    fn evaluate(&self, day: &TickerDay<'_>, position: Option<&PositionState>) -> Evaluation {
        let close = day.bar().close;

        match position {
            None => {
                // Entry needs the channel; the exit below reads only the
                // stored stop.
                let Some(channel) = day.donchian() else {
                    return Evaluation::hold(day, self.id());
                };
                if close > channel.high {
                    let mut eval = Evaluation::action(day, self.id(), SignalAction::Buy);
                    eval.proposed_stop = Some(self.proposed_stop(close));
                    eval
                } else {
                    Evaluation::hold(day, self.id())
                }
            }
            Some(pos) => {
                let proposal = self.proposed_stop(close);
                // The stored stop already reflects every prior peak; today's
                // proposal can only matter if it is higher.
                let stop = pos.stop_price.unwrap_or(proposal);
                if close < stop {
                    Evaluation::action(day, self.id(), SignalAction::Sell)
                } else {
                    let mut eval = Evaluation::hold(day, self.id());
                    eval.proposed_stop = Some(proposal);
                    eval
                }
            }
        }
    }
}
