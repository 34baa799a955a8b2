//! The run driver — provider in, simulation through, report out.
//!
//! A run retrieves the index series and every universe ticker through a
//! `BarProvider`, skipping tickers whose data is unavailable or malformed
//! (recorded in the report, never fatal), then hands the surviving
//! universe to the core engine. Only a failed index fetch aborts a run:
//! without a regime series every entry would be gated, which is never
//! what a configured run intends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use breakoutlab_core::data::{BarProvider, CsvBarProvider, DataError, SyntheticProvider};
use breakoutlab_core::engine::{run_simulation, ConfigError, SimResult, SkipReason};
use breakoutlab_core::perf::PerformanceSummary;

use crate::config::{DataSource, RunConfig, RunConfigError, RunId};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] RunConfigError),

    #[error("index data error: {0}")]
    IndexData(#[source] DataError),

    #[error("no usable tickers in universe ({0} skipped)")]
    EmptyRun(usize),

    #[error("simulation error: {0}")]
    Sim(#[from] ConfigError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// A universe ticker dropped before simulation, and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

/// Serializable run manifest: everything needed to audit a run without
/// re-running it. The bulky per-date artifacts (signals, trades, equity)
/// live in the CSV files next to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub generated_at: String,
    pub config: RunConfig,
    pub summary: PerformanceSummary,
    pub skipped_tickers: Vec<SkippedTicker>,
    pub skip_counts: BTreeMap<SkipReason, usize>,
    pub n_signals: usize,
    pub n_trades: usize,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// A completed run: the manifest plus the full in-memory result.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: RunReport,
    pub result: SimResult,
}

/// Build the provider a config asks for.
pub fn make_provider(source: &DataSource) -> Box<dyn BarProvider> {
    match source {
        DataSource::Csv { dir } => Box::new(CsvBarProvider::new(dir.clone())),
        DataSource::Synthetic { seed } => Box::new(SyntheticProvider::new(*seed)),
    }
}

/// Execute a run end to end with the config's own data source.
pub fn run(config: &RunConfig) -> Result<RunOutcome, RunError> {
    execute(config, make_provider(&config.data).as_ref())
}

/// Execute a run against an explicit provider (tests inject fixtures here).
pub fn execute(config: &RunConfig, provider: &dyn BarProvider) -> Result<RunOutcome, RunError> {
    config.validate()?;

    let index_bars = provider
        .get_bars(&config.index_ticker, config.start_date, config.end_date)
        .map_err(RunError::IndexData)?;

    let mut bars_by_ticker = BTreeMap::new();
    let mut skipped_tickers = Vec::new();
    for ticker in &config.universe {
        match provider.get_bars(ticker, config.start_date, config.end_date) {
            Ok(bars) => {
                bars_by_ticker.insert(ticker.clone(), bars);
            }
            Err(err) => skipped_tickers.push(SkippedTicker {
                ticker: ticker.clone(),
                reason: err.to_string(),
            }),
        }
    }
    if bars_by_ticker.is_empty() {
        return Err(RunError::EmptyRun(skipped_tickers.len()));
    }

    let result = run_simulation(&bars_by_ticker, &index_bars, &config.sim)?;

    let report = RunReport {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        generated_at: chrono::Local::now().to_rfc3339(),
        config: config.clone(),
        summary: result.summary.clone(),
        skipped_tickers,
        skip_counts: result.diagnostics.counts(),
        n_signals: result.signals.len(),
        n_trades: result.trades.len(),
    };

    Ok(RunOutcome { report, result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn synthetic_config() -> RunConfig {
        RunConfig {
            start_date: NaiveDate::from_ymd_opt(2020, 1, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2021, 12, 31).unwrap(),
            universe: vec!["AAA".to_string(), "BBB".to_string()],
            index_ticker: "SPY".to_string(),
            data: DataSource::Synthetic { seed: 42 },
            sim: breakoutlab_core::engine::SimConfig::default(),
        }
    }

    #[test]
    fn synthetic_run_completes() {
        let outcome = run(&synthetic_config()).unwrap();
        assert_eq!(outcome.report.schema_version, SCHEMA_VERSION);
        assert!(outcome.report.skipped_tickers.is_empty());
        assert!(!outcome.result.equity.is_empty());
        assert_eq!(
            outcome.report.n_signals,
            outcome.result.signals.len()
        );
    }

    #[test]
    fn runs_are_reproducible() {
        let config = synthetic_config();
        let a = run(&config).unwrap();
        let b = run(&config).unwrap();
        assert_eq!(a.report.run_id, b.report.run_id);
        assert_eq!(a.result.trades.len(), b.result.trades.len());
        assert_eq!(
            a.result.equity.last().map(|p| p.total_equity),
            b.result.equity.last().map(|p| p.total_equity)
        );
    }

    #[test]
    fn missing_index_data_aborts() {
        // CSV provider over an empty directory: the index fetch fails
        // before any universe ticker is touched.
        let dir = tempfile::tempdir().unwrap();
        let mut config = synthetic_config();
        config.data = DataSource::Csv {
            dir: dir.path().to_path_buf(),
        };

        let err = run(&config).unwrap_err();
        assert!(matches!(err, RunError::IndexData(_)));
    }

    #[test]
    fn invalid_config_fails_before_data() {
        let mut config = synthetic_config();
        config.universe.clear();
        let err = run(&config).unwrap_err();
        assert!(matches!(
            err,
            RunError::Config(RunConfigError::EmptyUniverse)
        ));
    }
}
