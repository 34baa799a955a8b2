//! EquityPoint — one portfolio snapshot per simulated date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// End-of-date portfolio snapshot.
///
/// `peak_equity` is monotonically non-decreasing across the series and
/// `drawdown_pct = (peak_equity - total_equity) / peak_equity` lies in
/// [0, 1]. The full `drawdown_pct` column is the underwater curve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub cash: f64,
    pub positions_value: f64,
    pub total_equity: f64,
    pub peak_equity: f64,
    pub drawdown_pct: f64,
}

impl EquityPoint {
    /// Build a point from cash + positions value and the running peak.
    /// Returns the point and the updated peak.
    pub fn mark(date: NaiveDate, cash: f64, positions_value: f64, prior_peak: f64) -> (Self, f64) {
        let total_equity = cash + positions_value;
        let peak_equity = prior_peak.max(total_equity);
        let drawdown_pct = if peak_equity > 0.0 {
            (peak_equity - total_equity) / peak_equity
        } else {
            0.0
        };
        (
            Self {
                date,
                cash,
                positions_value,
                total_equity,
                peak_equity,
                drawdown_pct,
            },
            peak_equity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn peak_carries_forward() {
        let (p1, peak) = EquityPoint::mark(d(2), 50_000.0, 60_000.0, 100_000.0);
        assert_eq!(p1.total_equity, 110_000.0);
        assert_eq!(peak, 110_000.0);

        let (p2, peak) = EquityPoint::mark(d(3), 50_000.0, 55_000.0, peak);
        assert_eq!(p2.peak_equity, 110_000.0);
        assert_eq!(peak, 110_000.0);
        assert!((p2.drawdown_pct - 5_000.0 / 110_000.0).abs() < 1e-12);
    }

    #[test]
    fn at_peak_drawdown_is_zero() {
        let (p, _) = EquityPoint::mark(d(2), 100_000.0, 0.0, 100_000.0);
        assert_eq!(p.drawdown_pct, 0.0);
    }
}
