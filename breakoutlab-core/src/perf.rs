//! Performance evaluation — pure functions over the equity series.
//!
//! Every metric is equity points in, scalar out; no dependency on the
//! engine or data layers. CAGR annualizes over calendar days (365.25 per
//! year), matching how the equity series is dated.

use crate::domain::EquityPoint;
use serde::{Deserialize, Serialize};

/// Aggregate performance metrics for one simulation run.
///
/// `mar_ratio` is `None` when the run had no drawdown — the ratio is
/// undefined there and is reported as an explicit sentinel, never as a
/// division result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub cagr: f64,
    pub max_drawdown: f64,
    pub mar_ratio: Option<f64>,
    pub total_return: f64,
    pub n_days: usize,
}

impl PerformanceSummary {
    /// Compute all metrics from an equity series and the starting capital.
    pub fn compute(equity: &[EquityPoint], initial_capital: f64) -> Self {
        let max_dd = max_drawdown(equity);
        let growth = cagr(equity, initial_capital);
        Self {
            cagr: growth,
            max_drawdown: max_dd,
            mar_ratio: mar_ratio(growth, max_dd),
            total_return: total_return(equity, initial_capital),
            n_days: equity.len(),
        }
    }
}

/// Total return as a fraction of initial capital.
pub fn total_return(equity: &[EquityPoint], initial_capital: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    match equity.last() {
        Some(last) => (last.total_equity - initial_capital) / initial_capital,
        None => 0.0,
    }
}

/// Compound annual growth rate over the calendar span of the series.
///
/// `(final / initial) ^ (365.25 / calendar_days) - 1`. Returns 0.0 for
/// series spanning less than one calendar day or with non-positive ends.
pub fn cagr(equity: &[EquityPoint], initial_capital: f64) -> f64 {
    let (Some(first), Some(last)) = (equity.first(), equity.last()) else {
        return 0.0;
    };
    let calendar_days = (last.date - first.date).num_days();
    if calendar_days <= 0 || initial_capital <= 0.0 || last.total_equity <= 0.0 {
        return 0.0;
    }
    (last.total_equity / initial_capital).powf(365.25 / calendar_days as f64) - 1.0
}

/// Maximum drawdown as a positive fraction in [0, 1].
///
/// Reads the per-point `drawdown_pct` column — the same running-peak logic
/// that built the equity series — so the maximum is exactly the worst point
/// of the underwater curve.
pub fn max_drawdown(equity: &[EquityPoint]) -> f64 {
    equity.iter().map(|p| p.drawdown_pct).fold(0.0, f64::max)
}

/// MAR ratio: CAGR / max drawdown, or `None` when drawdown is zero.
pub fn mar_ratio(cagr: f64, max_drawdown: f64) -> Option<f64> {
    if max_drawdown > 0.0 {
        Some(cagr / max_drawdown)
    } else {
        None
    }
}

/// The underwater curve: (date, drawdown_pct) for every point.
pub fn underwater_curve(equity: &[EquityPoint]) -> Vec<(chrono::NaiveDate, f64)> {
    equity.iter().map(|p| (p.date, p.drawdown_pct)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> Vec<EquityPoint> {
        let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let mut peak = f64::MIN;
        values
            .iter()
            .enumerate()
            .map(|(i, &total)| {
                peak = peak.max(total);
                EquityPoint {
                    date: base + chrono::Duration::days(i as i64),
                    cash: total,
                    positions_value: 0.0,
                    total_equity: total,
                    peak_equity: peak,
                    drawdown_pct: (peak - total) / peak,
                }
            })
            .collect()
    }

    #[test]
    fn flat_series_has_zero_drawdown_and_mar_sentinel() {
        let eq = series(&[100_000.0; 30]);
        let summary = PerformanceSummary::compute(&eq, 100_000.0);
        assert_eq!(summary.max_drawdown, 0.0);
        assert_eq!(summary.mar_ratio, None);
        assert_eq!(summary.total_return, 0.0);
        assert_eq!(summary.n_days, 30);
    }

    #[test]
    fn max_drawdown_picks_the_trough() {
        let eq = series(&[100.0, 120.0, 90.0, 110.0]);
        // Peak 120, trough 90 → 25%
        assert!((max_drawdown(&eq) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn drawdown_bounded_by_one() {
        let eq = series(&[100.0, 1.0]);
        let dd = max_drawdown(&eq);
        assert!(dd > 0.0 && dd <= 1.0);
    }

    #[test]
    fn cagr_doubling_in_one_year() {
        let base = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let mut eq = series(&[100_000.0, 200_000.0]);
        eq[1].date = base + chrono::Duration::days(365);
        let growth = cagr(&eq, 100_000.0);
        // Slightly above 100% because 365 < 365.25
        assert!((growth - 1.0).abs() < 0.01, "cagr = {growth}");
    }

    #[test]
    fn mar_ratio_defined_with_drawdown() {
        assert_eq!(mar_ratio(0.30, 0.15), Some(2.0));
        assert_eq!(mar_ratio(0.30, 0.0), None);
    }

    #[test]
    fn empty_series_is_all_zeros() {
        let summary = PerformanceSummary::compute(&[], 100_000.0);
        assert_eq!(summary.cagr, 0.0);
        assert_eq!(summary.max_drawdown, 0.0);
        assert_eq!(summary.mar_ratio, None);
        assert_eq!(summary.n_days, 0);
    }

    #[test]
    fn underwater_curve_full_length() {
        let eq = series(&[100.0, 120.0, 90.0, 110.0]);
        let curve = underwater_curve(&eq);
        assert_eq!(curve.len(), 4);
        assert_eq!(curve[0].1, 0.0);
        assert!((curve[2].1 - 0.25).abs() < 1e-12);
    }
}
