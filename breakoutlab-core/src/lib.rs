//! BreakoutLab Core — daily breakout-strategy simulation engine.
//!
//! This crate contains the whole simulation pipeline:
//! - Domain types (bars, signals, positions, trades, equity points)
//! - Indicator engine (SMA, Bollinger Bands, Donchian channels) with
//!   NaN-warmup series and per-date frames
//! - Market-regime filter (index close vs. index SMA)
//! - Three strategy state machines behind one trait
//! - Equal-slot position sizing
//! - Slippage/commission cost model
//! - Performance evaluation (CAGR, max drawdown, MAR, underwater curve)
//! - The day-by-day orchestration loop that chains all of the above
//!
//! Data retrieval and artifact persistence live behind narrow boundaries
//! (`data::BarProvider`, and the runner crate's export module).

pub mod costs;
pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod perf;
pub mod regime;
pub mod sizing;
pub mod strategy;
