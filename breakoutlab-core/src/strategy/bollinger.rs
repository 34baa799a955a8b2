//! Bollinger breakout — volatility-band entry with a mean-reversion exit.
//!
//! FLAT → LONG when close crosses above the upper band (previous close at
//! or below the previous upper band, current close above the current one).
//! LONG → FLAT when close falls back below the middle band — not the
//! opposite band; the position exits on reversion to the mean.

use super::{Evaluation, Strategy, TickerDay};
use crate::domain::{PositionState, SignalAction, StrategyId};

#[derive(Debug, Clone, Copy)]
pub struct BollingerBreakout;

impl Strategy for BollingerBreakout {
    fn id(&self) -> StrategyId {
        StrategyId::BollingerBreakout
    }

    fn evaluate(&self, day: &TickerDay<'_>, position: Option<&PositionState>) -> Evaluation {
        let Some(bands) = day.bollinger() else {
            return Evaluation::hold(day, self.id());
        };
        let close = day.bar().close;

        match position {
            None => {
                // A true cross: yesterday at or below the band, today above.
                // A ticker hovering above the band does not re-trigger.
                let crossed = match (day.prev_bar(), day.prev_bollinger()) {
                    (Some(prev_bar), Some(prev_bands)) => {
                        prev_bar.close <= prev_bands.upper && close > bands.upper
                    }
                    _ => false,
                };
                if crossed {
                    Evaluation::action(day, self.id(), SignalAction::Buy)
                } else {
                    Evaluation::hold(day, self.id())
                }
            }
            Some(_) => {
                if close < bands.mid {
                    Evaluation::action(day, self.id(), SignalAction::Sell)
                } else {
                    Evaluation::hold(day, self.id())
                }
            }
        }
    }
}
