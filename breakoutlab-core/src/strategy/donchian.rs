//! Donchian breakout — the 100-day-high entry with a shorter-channel exit.
//!
//! FLAT → LONG when close exceeds the prior entry-window high.
//! LONG → FLAT when close falls below the prior exit-window low.
//!
//! The exit window (default 50) is deliberately shorter than the entry
//! window (default 100): winners run on the long channel while losers are
//! cut against the faster one.

use super::{Evaluation, Strategy, TickerDay};
use crate::domain::{PositionState, SignalAction, StrategyId};

#[derive(Debug, Clone, Copy)]
pub struct DonchianBreakout;

impl Strategy for DonchianBreakout {
    fn id(&self) -> StrategyId {
        StrategyId::DonchianBreakout
    }

    fn evaluate(&self, day: &TickerDay<'_>, position: Option<&PositionState>) -> Evaluation {
        let Some(channel) = day.donchian() else {
            return Evaluation::hold(day, self.id());
        };
        let close = day.bar().close;

        match position {
            None => {
                if close > channel.high {
                    Evaluation::action(day, self.id(), SignalAction::Buy)
                } else {
                    Evaluation::hold(day, self.id())
                }
            }
            Some(_) => {
                if close < channel.low {
                    Evaluation::action(day, self.id(), SignalAction::Sell)
                } else {
                    Evaluation::hold(day, self.id())
                }
            }
        }
    }
}
