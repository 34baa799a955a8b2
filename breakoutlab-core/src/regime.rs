//! Market-regime filter — index close vs. index SMA.
//!
//! Classifies each index date as Bull or Bear. A tie (close == sma) is
//! Bear: an ambiguous regime halts new risk-taking. The output is a dense
//! per-date series over the index history; dates still inside the SMA
//! warmup carry no regime value, and the orchestrator treats a missing
//! value as "no new entries today", never as an error.

use crate::domain::Bar;
use crate::indicators::{Indicator, Sma};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Broad-market regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Regime {
    Bull,
    Bear,
}

/// One regime classification for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeState {
    pub date: NaiveDate,
    pub regime: Regime,
    pub index_close: f64,
    pub index_sma: f64,
}

/// Classify every date of an index series with enough SMA history.
pub fn classify(index_bars: &[Bar], period: usize) -> Vec<RegimeState> {
    let sma = Sma::new(period).compute(index_bars);
    index_bars
        .iter()
        .zip(sma.iter())
        .filter(|(_, s)| !s.is_nan())
        .map(|(bar, &index_sma)| RegimeState {
            date: bar.date,
            regime: if bar.close > index_sma {
                Regime::Bull
            } else {
                Regime::Bear
            },
            index_close: bar.close,
            index_sma,
        })
        .collect()
}

/// Index the regime series by date for orchestrator lookups.
pub fn by_date(states: &[RegimeState]) -> BTreeMap<NaiveDate, Regime> {
    states.iter().map(|s| (s.date, s.regime)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn bull_when_close_above_sma() {
        // Rising closes: the last close sits above any trailing mean.
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let states = classify(&bars, 3);
        assert_eq!(states.len(), 3);
        assert!(states.iter().all(|s| s.regime == Regime::Bull));
    }

    #[test]
    fn bear_when_close_below_sma() {
        let bars = make_bars(&[104.0, 103.0, 102.0, 101.0, 100.0]);
        let states = classify(&bars, 3);
        assert!(states.iter().all(|s| s.regime == Regime::Bear));
    }

    #[test]
    fn tie_resolves_to_bear() {
        // Constant price: close == sma exactly.
        let bars = make_bars(&[100.0; 6]);
        let states = classify(&bars, 3);
        assert!(!states.is_empty());
        assert!(states.iter().all(|s| s.regime == Regime::Bear));
    }

    #[test]
    fn warmup_dates_carry_no_value() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0]);
        let states = classify(&bars, 3);
        // First valid SMA at index 2, so two dates classified.
        assert_eq!(states.len(), 2);
        assert_eq!(states[0].date, bars[2].date);
    }

    #[test]
    fn by_date_lookup() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let states = classify(&bars, 3);
        let map = by_date(&states);
        assert_eq!(map.get(&bars[4].date), Some(&Regime::Bull));
        assert_eq!(map.get(&bars[0].date), None);
    }
}
