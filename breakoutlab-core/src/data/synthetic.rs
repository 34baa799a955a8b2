//! Deterministic synthetic bar generator.
//!
//! A seeded geometric random walk over weekdays, used for demos and
//! fixtures when no real data directory is on hand. The same (seed,
//! ticker) pair always yields the same series.

use super::provider::{finalize_series, BarProvider, DataError};
use crate::domain::Bar;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Random-walk bar source.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    seed: u64,
    start_price: f64,
    daily_drift: f64,
    daily_vol: f64,
}

impl SyntheticProvider {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            start_price: 100.0,
            daily_drift: 0.0003,
            daily_vol: 0.02,
        }
    }

    /// Override the walk parameters (price, drift, volatility per day).
    pub fn with_profile(mut self, start_price: f64, daily_drift: f64, daily_vol: f64) -> Self {
        self.start_price = start_price;
        self.daily_drift = daily_drift;
        self.daily_vol = daily_vol;
        self
    }

    fn rng_for(&self, ticker: &str) -> StdRng {
        let mut hasher = DefaultHasher::new();
        ticker.hash(&mut hasher);
        StdRng::seed_from_u64(self.seed ^ hasher.finish())
    }
}

/// Approximate standard normal from twelve uniforms (Irwin-Hall).
fn gauss(rng: &mut StdRng) -> f64 {
    (0..12).map(|_| rng.gen::<f64>()).sum::<f64>() - 6.0
}

impl BarProvider for SyntheticProvider {
    fn get_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let mut rng = self.rng_for(ticker);
        let mut bars = Vec::new();
        let mut prev_close = self.start_price;

        let mut date = start;
        while date <= end {
            if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
                let ret = self.daily_drift + self.daily_vol * gauss(&mut rng);
                let open = prev_close;
                let close = (open * (1.0 + ret)).max(1.0);
                let spread: f64 = rng.gen::<f64>() * 0.005;
                bars.push(Bar {
                    ticker: ticker.to_string(),
                    date,
                    open,
                    high: open.max(close) * (1.0 + spread),
                    low: open.min(close) * (1.0 - spread),
                    close,
                    volume: rng.gen_range(100_000..1_000_000),
                });
                prev_close = close;
            }
            date += Duration::days(1);
        }

        finalize_series(ticker, bars, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 29).unwrap(),
        )
    }

    #[test]
    fn deterministic_per_seed_and_ticker() {
        let (start, end) = range();
        let a = SyntheticProvider::new(42).get_bars("AAA", start, end).unwrap();
        let b = SyntheticProvider::new(42).get_bars("AAA", start, end).unwrap();
        assert_eq!(a.len(), b.len());
        assert!(a.iter().zip(&b).all(|(x, y)| x.close == y.close));
    }

    #[test]
    fn tickers_get_distinct_walks() {
        let (start, end) = range();
        let provider = SyntheticProvider::new(42);
        let a = provider.get_bars("AAA", start, end).unwrap();
        let b = provider.get_bars("BBB", start, end).unwrap();
        assert!(a.iter().zip(&b).any(|(x, y)| x.close != y.close));
    }

    #[test]
    fn bars_are_sane_and_weekdays_only() {
        let (start, end) = range();
        let bars = SyntheticProvider::new(7).get_bars("AAA", start, end).unwrap();
        assert!(!bars.is_empty());
        assert!(bars.iter().all(|b| b.is_sane()));
        assert!(bars
            .iter()
            .all(|b| !matches!(b.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn weekend_only_range_is_unavailable() {
        // 2024-01-06/07 is a Saturday/Sunday pair.
        let start = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let err = SyntheticProvider::new(7).get_bars("AAA", start, end).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }
}
