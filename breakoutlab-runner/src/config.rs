//! Serializable run configuration.

use anyhow::Context;
use breakoutlab_core::engine::{ConfigError, SimConfig};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Problems with a run configuration, found before any data work.
#[derive(Debug, Error, PartialEq)]
pub enum RunConfigError {
    #[error("date range is inverted: {start} > {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("universe is empty")]
    EmptyUniverse,

    #[error("index ticker is empty")]
    EmptyIndexTicker,

    #[error(transparent)]
    Sim(#[from] ConfigError),
}

/// Where bars come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    /// Directory of per-ticker `{TICKER}.csv` files.
    Csv { dir: PathBuf },
    /// Seeded random walk, for demos and fixtures.
    Synthetic { seed: u64 },
}

/// Everything needed to reproduce a run.
///
/// Two runs with identical configs hash to the same `RunId`, so artifacts
/// are comparable across machines and reruns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    /// Simulation start date (inclusive).
    pub start_date: NaiveDate,

    /// Simulation end date (inclusive).
    pub end_date: NaiveDate,

    /// Tickers to simulate.
    pub universe: Vec<String>,

    /// Index ticker driving the regime filter.
    pub index_ticker: String,

    /// Bar source.
    pub data: DataSource,

    /// Engine parameters (capital, slots, strategy, windows, costs).
    #[serde(default)]
    pub sim: SimConfig,
}

impl RunConfig {
    /// Deterministic hash ID for this configuration.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }

    /// Validate the run-level fields and the embedded engine config.
    pub fn validate(&self) -> Result<(), RunConfigError> {
        if self.start_date > self.end_date {
            return Err(RunConfigError::InvertedDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.universe.is_empty() {
            return Err(RunConfigError::EmptyUniverse);
        }
        if self.index_ticker.trim().is_empty() {
            return Err(RunConfigError::EmptyIndexTicker);
        }
        self.sim.validate()?;
        Ok(())
    }

    /// Parse and validate a config from TOML text.
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let config: RunConfig = toml::from_str(text).context("failed to parse run config TOML")?;
        config.validate().context("invalid run config")?;
        Ok(config)
    }

    /// Load, parse, and validate a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
    }
}
