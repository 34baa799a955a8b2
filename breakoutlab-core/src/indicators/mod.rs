//! Indicator engine — NaN-warmup series plus per-date frames.
//!
//! Indicators are pure functions: bar history in, numeric series out. They
//! are precomputed once per ticker before the daily loop and queried by bar
//! index inside it. The first `lookback()` values of every series are
//! `f64::NAN`; no indicator value at bar t may depend on data from bar t+1
//! or later.

pub mod bollinger;
pub mod donchian;
pub mod frame;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBand};
pub use donchian::{Donchian, DonchianBand};
pub use frame::{BollingerValues, DonchianChannel, IndicatorFrame, IndicatorParams, IndicatorSet};
pub use sma::Sma;

use crate::domain::Bar;

/// Trait for indicators.
///
/// `compute` returns a `Vec<f64>` of the same length as `bars`, with the
/// first `lookback()` values `f64::NAN` (warmup — earlier dates get no
/// value, never a zero-filled one).
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_50", "donchian_high_100").
    fn name(&self) -> &str;

    /// Number of leading bars without valid output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                ticker: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
