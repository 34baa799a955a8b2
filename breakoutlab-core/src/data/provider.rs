//! The `BarProvider` trait and its error type.

use crate::domain::Bar;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Problems retrieving or decoding bar data for one ticker.
#[derive(Debug, Error)]
pub enum DataError {
    /// The provider has nothing for this ticker in the requested range.
    #[error("no data available for {ticker}")]
    DataUnavailable { ticker: String },

    /// Rows exist but cannot be decoded or fail OHLC sanity checks.
    #[error("malformed bar data for {ticker}: {message}")]
    Malformed { ticker: String, message: String },

    /// Underlying storage failure.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of daily bars for a ticker over a date range.
///
/// Contract: the returned series is date-sorted, each date appears once,
/// and every bar passes `Bar::is_sane()`. An empty result is
/// `DataUnavailable`, not `Ok(vec![])`.
pub trait BarProvider {
    fn get_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError>;
}

/// Shared post-processing for providers: range-filter, sort, and validate.
pub(crate) fn finalize_series(
    ticker: &str,
    mut bars: Vec<Bar>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Bar>, DataError> {
    bars.retain(|b| b.date >= start && b.date <= end);
    bars.sort_by_key(|b| b.date);

    if bars.is_empty() {
        return Err(DataError::DataUnavailable {
            ticker: ticker.to_string(),
        });
    }
    if let Some(bad) = bars.iter().find(|b| !b.is_sane()) {
        return Err(DataError::Malformed {
            ticker: ticker.to_string(),
            message: format!("insane OHLC on {}", bad.date),
        });
    }
    if bars.windows(2).any(|w| w[0].date == w[1].date) {
        return Err(DataError::Malformed {
            ticker: ticker.to_string(),
            message: "duplicate date in series".to_string(),
        });
    }
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn empty_range_is_unavailable() {
        let (start, _) = range();
        let bars = make_bars(&[100.0, 101.0]);
        let err = finalize_series("TEST", bars, start, start).unwrap_err();
        assert!(matches!(err, DataError::DataUnavailable { .. }));
    }

    #[test]
    fn duplicate_dates_are_malformed() {
        let (start, end) = range();
        let mut bars = make_bars(&[100.0, 101.0, 102.0]);
        bars[1].date = bars[0].date;
        let err = finalize_series("TEST", bars, start, end).unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }

    #[test]
    fn unsorted_input_is_sorted() {
        let (start, end) = range();
        let mut bars = make_bars(&[100.0, 101.0, 102.0]);
        bars.reverse();
        let out = finalize_series("TEST", bars, start, end).unwrap();
        assert!(out.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn insane_bar_is_malformed() {
        let (start, end) = range();
        let mut bars = make_bars(&[100.0, 101.0]);
        bars[1].high = bars[1].low - 1.0;
        let err = finalize_series("TEST", bars, start, end).unwrap_err();
        assert!(matches!(err, DataError::Malformed { .. }));
    }
}
