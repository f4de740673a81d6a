//! state_space — local-level model estimation of the reproduction number.
//!
//! Purpose
//! -------
//! Fit a local-level state-space model to one growth-rate series by maximum
//! likelihood, smooth the latent level, and convert it to an effective
//! reproduction number with standard errors and fit diagnostics.
//!
//! Key behaviors
//! -------------
//! - `core`: validated series ([`core::data`]), variances
//!   ([`core::params`]), the scalar Kalman filter and RTS smoother
//!   ([`core::kalman`]), start-value heuristics ([`core::start_params`]) and
//!   estimator options ([`core::options`]).
//! - `models`: [`models::LocalLevelModel`] implements the optimizer's
//!   `LogLikelihood` trait.
//! - `estimator`: [`estimator::estimate_r`] orchestrates validation, the
//!   optional grid search, the final fit and the conversion to R.
//!
//! Invariants & assumptions
//! ------------------------
//! - Model parameters and smoothed states are created per call and never
//!   shared across series.
//! - `NaN` inputs are missing observations; `±inf` is rejected.
//!
//! Conventions
//! -----------
//! - Errors surface as [`errors::StateSpaceError`]; callers use
//!   `is_precondition` to decide whether an error is fatal.
//! - Logging goes through `tracing`; no subscriber is installed here.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each component; end-to-end behavior (synthetic
//!   recovery, grid vs single start, warning emission) is covered by the
//!   integration tests in `tests/`.

pub mod core;
pub mod errors;
pub mod estimator;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::kalman::SmoothedState;
pub use self::core::options::EstimatorOptions;
pub use self::core::params::LocalLevelParams;
pub use self::errors::{StateSpaceError, StateSpaceResult};
pub use self::estimator::{EstimationResult, GridCandidate, estimate_r, reproduction_from_smoothed};

pub mod prelude {
    pub use super::core::options::EstimatorOptions;
    pub use super::errors::{StateSpaceError, StateSpaceResult};
    pub use super::estimator::{EstimationResult, estimate_r};
}
