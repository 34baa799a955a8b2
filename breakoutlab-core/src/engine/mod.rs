//! Simulation engine — configuration, diagnostics, and the daily loop.

pub mod config;
pub mod diagnostics;
pub mod orchestrator;

pub use config::{ConfigError, SimConfig};
pub use diagnostics::{Diagnostics, SkipEvent, SkipReason};
pub use orchestrator::{run_simulation, SimResult};
