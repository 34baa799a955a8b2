//! CSV-backed bar provider: one `{TICKER}.csv` file per ticker.
//!
//! Expected columns: `date,open,high,low,close,volume` with ISO dates.
//! The same layout the runner's export module writes, so a run's inputs
//! and outputs share a format.

use super::provider::{finalize_series, BarProvider, DataError};
use crate::domain::Bar;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Reads bars from a directory of per-ticker CSV files.
#[derive(Debug, Clone)]
pub struct CsvBarProvider {
    root: PathBuf,
}

impl CsvBarProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.root.join(format!("{ticker}.csv"))
    }
}

impl BarProvider for CsvBarProvider {
    fn get_bars(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(DataError::DataUnavailable {
                ticker: ticker.to_string(),
            });
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| csv_error(ticker, &path, e))?;
        let mut bars = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| csv_error(ticker, &path, e))?;
            bars.push(Bar {
                ticker: ticker.to_string(),
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        finalize_series(ticker, bars, start, end)
    }
}

fn csv_error(ticker: &str, path: &Path, err: csv::Error) -> DataError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => DataError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => DataError::Malformed {
            ticker: ticker.to_string(),
            message: format!("{other:?}"),
        },
    }
}
