//! Simulation configuration with fail-fast validation.
//!
//! A `SimConfig` is validated in full before the first bar is touched; a
//! bad parameter is a hard error, never a silently-clamped value.

use crate::costs::CostModel;
use crate::indicators::IndicatorParams;
use crate::strategy::StrategyKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration problems found before a run starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("initial capital must be positive, got {0}")]
    NonPositiveCapital(f64),

    #[error("slot count must be at least 1")]
    ZeroSlots,

    #[error("{field} must be non-negative, got {value}")]
    NegativeCost { field: &'static str, value: f64 },

    #[error("trailing stop must be in (0, 100) percent, got {0}")]
    StopOutOfRange(f64),

    #[error("{field} window must be at least 1")]
    WindowTooShort { field: &'static str },

    #[error("bollinger multiplier must be positive, got {0}")]
    NonPositiveMultiplier(f64),
}

/// Everything a simulation run needs, in one serializable value.
///
/// Serializes canonically (field order is declaration order), so the same
/// configuration always hashes to the same run id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimConfig {
    pub initial_capital: f64,
    /// Number of equal capital slots; also the max concurrent positions.
    pub slots: usize,
    /// Index SMA window for the bull/bear regime filter.
    pub regime_period: usize,
    pub strategy: StrategyKind,
    pub indicators: IndicatorParams,
    pub costs: CostModel,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_capital: 100_000.0,
            slots: 20,
            strategy: StrategyKind::DonchianBreakout,
            indicators: IndicatorParams::default(),
            regime_period: 200,
            costs: CostModel::frictionless(),
        }
    }
}

impl SimConfig {
    /// Validate every parameter. Called by the orchestrator before any
    /// data work; callers constructing configs by hand may also call it
    /// directly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_capital > 0.0) {
            return Err(ConfigError::NonPositiveCapital(self.initial_capital));
        }
        if self.slots < 1 {
            return Err(ConfigError::ZeroSlots);
        }

        for (field, value) in [
            ("slippage_pct", self.costs.slippage_pct),
            ("commission_pct", self.costs.commission_pct),
            (
                "min_commission",
                self.costs.min_commission.unwrap_or(0.0),
            ),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeCost { field, value });
            }
        }

        if let StrategyKind::TrailingFlipper { stop_pct } = self.strategy {
            if !(stop_pct > 0.0 && stop_pct < 100.0) {
                return Err(ConfigError::StopOutOfRange(stop_pct));
            }
        }

        for (field, window) in [
            ("sma_fast", self.indicators.sma_fast),
            ("sma_slow", self.indicators.sma_slow),
            ("boll_period", self.indicators.boll_period),
            ("donchian_entry", self.indicators.donchian_entry),
            ("donchian_exit", self.indicators.donchian_exit),
            ("regime_period", self.regime_period),
        ] {
            if window < 1 {
                return Err(ConfigError::WindowTooShort { field });
            }
        }

        if !(self.indicators.boll_multiplier > 0.0) {
            return Err(ConfigError::NonPositiveMultiplier(
                self.indicators.boll_multiplier,
            ));
        }

        Ok(())
    }
}
