//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Provide a small, Argmin-backed layer for **maximizing log-likelihoods**
//! `ℓ(θ)`. Models implement [`LogLikelihood`] and call [`maximize`] to run
//! L-BFGS with a configurable line search, tolerances, and a
//! finite-difference gradient fallback.
//!
//! Key behaviors
//! -------------
//! - Convert log-likelihoods `ℓ(θ)` into Argmin cost functions
//!   `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`].
//! - [`maximize`] validates the initial guess with [`LogLikelihood::check`],
//!   selects a solver via [`builders`], runs it via [`run::run_lbfgs`] and
//!   returns an [`OptimOutcome`].
//! - Map Argmin termination reasons into the 0 / 1 / 2 warning flag
//!   ([`warn_flag`]) used as the per-fit optimization flag downstream.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`LogLikelihood::value`] and [`LogLikelihood::grad`] report invalid
//!   inputs as [`OptError`](crate::optimization::errors::OptError) values,
//!   never panics.
//! - [`Tolerances`] and [`MLEOptions`] are validated on construction.
//!
//! Conventions
//! -----------
//! - Parameters live in unconstrained space as [`Theta`] (`Array1<f64>`);
//!   mapping to model space happens in the model layer.
//! - [`OptimOutcome::value`] is the log-likelihood, not the cost.
//!
//! Testing notes
//! -------------
//! - Unit tests cover sign conventions and FD fallback in [`adapter`],
//!   solver construction in [`builders`], validation helpers in
//!   [`validation`], and option/outcome invariants in [`traits`].
//! - The local-level model tests exercise [`maximize`] end to end.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances, warn_flag};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use kalman_rt::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
