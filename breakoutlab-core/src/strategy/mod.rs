//! Strategy engines — three interchangeable per-ticker state machines.
//!
//! Each strategy implements one capability: given a read-only view of a
//! ticker's day (bars + indicator frames) and the current position state,
//! emit exactly one signal, optionally with a proposed trailing stop. The
//! orchestrator owns all position state; strategies never mutate it. Stop
//! proposals pass through the engine's ratchet, so a strategy cannot lower
//! a stop even if it asks to.
//!
//! Selection is a configuration value (`StrategyKind`), not inheritance.

pub mod bollinger;
pub mod donchian;
pub mod flipper;

pub use bollinger::BollingerBreakout;
pub use donchian::DonchianBreakout;
pub use flipper::TrailingFlipper;

use crate::domain::{Bar, PositionState, Signal, SignalAction, StrategyId};
use crate::indicators::{BollingerValues, DonchianChannel, IndicatorParams, IndicatorSet};
use serde::{Deserialize, Serialize};

/// Read-only view of one ticker on one date.
pub struct TickerDay<'a> {
    pub ticker: &'a str,
    pub bars: &'a [Bar],
    pub index: usize,
    pub indicators: &'a IndicatorSet,
}

impl<'a> TickerDay<'a> {
    pub fn bar(&self) -> &Bar {
        &self.bars[self.index]
    }

    /// Donchian channel for today, once both Donchian windows are warm.
    pub fn donchian(&self) -> Option<DonchianChannel> {
        self.indicators.donchian_at(self.index)
    }

    /// Bollinger bands for today, once the band window is warm.
    pub fn bollinger(&self) -> Option<BollingerValues> {
        self.indicators.bollinger_at(self.index)
    }

    pub fn prev_bar(&self) -> Option<&Bar> {
        self.index.checked_sub(1).map(|i| &self.bars[i])
    }

    pub fn prev_bollinger(&self) -> Option<BollingerValues> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.indicators.bollinger_at(i))
    }
}

/// One strategy decision: the signal plus an optional stop proposal.
///
/// The stop proposal is advisory; the orchestrator ratchets it into
/// `PositionState::stop_price` (up only).
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub signal: Signal,
    pub proposed_stop: Option<f64>,
}

impl Evaluation {
    pub fn hold(day: &TickerDay<'_>, strategy_id: StrategyId) -> Self {
        Self {
            signal: Signal::hold(day.ticker, day.bar().date, day.bar().close, strategy_id),
            proposed_stop: None,
        }
    }

    pub fn action(day: &TickerDay<'_>, strategy_id: StrategyId, action: SignalAction) -> Self {
        Self {
            signal: Signal {
                ticker: day.ticker.to_string(),
                date: day.bar().date,
                action,
                reference_price: day.bar().close,
                strategy_id,
            },
            proposed_stop: None,
        }
    }
}

/// The shared strategy capability.
///
/// Contract: exactly one `Evaluation` per call; the orchestrator only calls
/// this once the ticker has `StrategyKind::warmup_bars` of history, so the
/// series this strategy reads are warm (insufficient history never reaches
/// a strategy).
pub trait Strategy: Send + Sync {
    fn id(&self) -> StrategyId;

    fn evaluate(&self, day: &TickerDay<'_>, position: Option<&PositionState>) -> Evaluation;
}

/// Serializable strategy selector. Window lengths live in
/// `IndicatorParams`; only non-window parameters appear here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyKind {
    /// Breakout above the prior N-day high; exit below the prior M-day low.
    DonchianBreakout,
    /// Entry on an upward cross of the upper Bollinger band; exit below mid.
    BollingerBreakout,
    /// New-high entry with a percent trailing stop that only ratchets up.
    TrailingFlipper {
        /// Trail distance in percent (0, 100).
        stop_pct: f64,
    },
}

impl StrategyKind {
    pub fn id(&self) -> StrategyId {
        match self {
            StrategyKind::DonchianBreakout => StrategyId::DonchianBreakout,
            StrategyKind::BollingerBreakout => StrategyId::BollingerBreakout,
            StrategyKind::TrailingFlipper { .. } => StrategyId::TrailingFlipper,
        }
    }

    /// Bar index of this strategy's first possible evaluation.
    ///
    /// Only the windows the strategy actually reads count: a Donchian run
    /// with default 100/50 channels fires at bar 100 even though the
    /// 200-bar slow SMA is still warming up.
    pub fn warmup_bars(&self, params: &IndicatorParams) -> usize {
        match self {
            StrategyKind::DonchianBreakout => params.donchian_entry.max(params.donchian_exit),
            StrategyKind::BollingerBreakout => params.boll_period - 1,
            // Entry is the Donchian new-high trigger; the exit reads only
            // the stored stop.
            StrategyKind::TrailingFlipper { .. } => params.donchian_entry,
        }
    }
}

/// Build a strategy engine from its configuration value.
pub fn build(kind: StrategyKind) -> Box<dyn Strategy> {
    match kind {
        StrategyKind::DonchianBreakout => Box::new(DonchianBreakout),
        StrategyKind::BollingerBreakout => Box::new(BollingerBreakout),
        StrategyKind::TrailingFlipper { stop_pct } => {
            Box::new(TrailingFlipper::new(stop_pct / 100.0))
        }
    }
}
