//! Data boundary — bar retrieval behind a narrow trait.
//!
//! Providers return date-sorted, validated bars or a `DataError`. A failed
//! ticker is a boundary problem the caller decides about (the runner skips
//! it with a warning); it never aborts a whole run from inside the engine.

pub mod csv_provider;
pub mod provider;
pub mod synthetic;

pub use csv_provider::CsvBarProvider;
pub use provider::{BarProvider, DataError};
pub use synthetic::SyntheticProvider;
