//! BreakoutLab Runner — configuration, the run driver, and artifact export.
//!
//! Sits between the core engine and the CLI: loads a TOML `RunConfig`,
//! retrieves bars through a `BarProvider`, runs the simulation, and writes
//! the artifact bundle (manifest + CSVs) for a run.

pub mod config;
pub mod export;
pub mod runner;

pub use config::{DataSource, RunConfig, RunConfigError, RunId};
pub use runner::{execute, make_provider, run, RunError, RunOutcome, RunReport, SCHEMA_VERSION};
