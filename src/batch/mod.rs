//! batch — per-country estimation runs over CSV datasets.
//!
//! Purpose
//! -------
//! Drive the state-space estimator across every country of a growth-rate
//! dataset and persist the smoothed reproduction numbers together with the
//! fit diagnostics.
//!
//! Key behaviors
//! -------------
//! - [`params`]: closed `Method`/`Variation` enums and the parameter table
//!   (infectious period, reporting delay).
//! - [`config`]: run-wide thresholds ([`BatchConfig`]) and file naming
//!   ([`RunRequest`]).
//! - [`dataset`]: CSV loading, date parsing and delay shifting.
//! - [`intervals`]: normal-quantile confidence bounds.
//! - [`output`]: typed estimate/diagnostics rows and their CSV encoding.
//! - [`driver`]: [`estimate_dataset`] and [`parametrized_estimation`].
//!
//! Conventions
//! -----------
//! - Structural failures (I/O, schema, unknown keys, invalid arguments) are
//!   [`BatchError`]s. Numerical failures of a single country are not.
//! - Progress is reported through `tracing` events only.

pub mod config;
pub mod dataset;
pub mod driver;
pub mod errors;
pub mod intervals;
pub mod output;
pub mod params;

pub use self::config::{BatchConfig, RunRequest};
pub use self::dataset::{Dataset, Observation};
pub use self::driver::{BatchOutput, estimate_dataset, parametrized_estimation};
pub use self::errors::{BatchError, BatchResult};
pub use self::intervals::{CriticalValues, Interval};
pub use self::output::{DiagnosticsRow, EstimateRow, read_table, write_diagnostics, write_estimates};
pub use self::params::{Method, MethodParams, ParameterTable, Variation};

pub mod prelude {
    pub use super::config::{BatchConfig, RunRequest};
    pub use super::driver::{BatchOutput, estimate_dataset, parametrized_estimation};
    pub use super::errors::{BatchError, BatchResult};
    pub use super::params::{Method, ParameterTable, Variation};
}
