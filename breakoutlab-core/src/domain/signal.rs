//! Signal — the per-(ticker, date) strategy output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// What the strategy wants to do with a ticker today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

/// Identifier of the strategy that produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    DonchianBreakout,
    BollingerBreakout,
    TrailingFlipper,
}

impl StrategyId {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyId::DonchianBreakout => "donchian_breakout",
            StrategyId::BollingerBreakout => "bollinger_breakout",
            StrategyId::TrailingFlipper => "trailing_flipper",
        }
    }
}

/// One strategy decision for one ticker on one date.
///
/// Produced fresh each date; strategy-internal state (stops, entry prices)
/// lives in `PositionState`, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub ticker: String,
    pub date: NaiveDate,
    pub action: SignalAction,
    /// Close price the action references; fills apply slippage on top.
    pub reference_price: f64,
    pub strategy_id: StrategyId,
}

impl Signal {
    pub fn hold(ticker: &str, date: NaiveDate, close: f64, strategy_id: StrategyId) -> Self {
        Self {
            ticker: ticker.to_string(),
            date,
            action: SignalAction::Hold,
            reference_price: close,
            strategy_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_serializes_screaming() {
        let json = serde_json::to_string(&SignalAction::Buy).unwrap();
        assert_eq!(json, "\"BUY\"");
    }

    #[test]
    fn strategy_id_names() {
        assert_eq!(StrategyId::DonchianBreakout.as_str(), "donchian_breakout");
        assert_eq!(StrategyId::TrailingFlipper.as_str(), "trailing_flipper");
    }
}
