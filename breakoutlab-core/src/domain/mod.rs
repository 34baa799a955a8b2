//! Domain types shared across the pipeline.

pub mod bar;
pub mod equity;
pub mod position;
pub mod signal;
pub mod trade;

pub use bar::Bar;
pub use equity::EquityPoint;
pub use position::PositionState;
pub use signal::{Signal, SignalAction, StrategyId};
pub use trade::{Trade, TradeSide};
