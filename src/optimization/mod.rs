//! optimization — MLE stack, variance transforms, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used to fit the local-level model: an
//! Argmin-backed log-likelihood maximizer, the `θ ↦ σ²` parameter
//! transforms, and a single error/result surface.
//!
//! Key behaviors
//! -------------
//! - **Maximize log-likelihoods** `ℓ(θ)` (`loglik_optimizer`) with validated
//!   tolerances, a choice of line search, and a finite-difference gradient
//!   fallback.
//! - Map between unconstrained optimizer coordinates and non-negative
//!   variances (`numerical_stability`).
//! - Normalize configuration issues, numerical failures, backend errors and
//!   model errors raised inside a likelihood into `errors::OptError` with the
//!   `OptResult<T>` alias.
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate in an unconstrained space `θ`; invalid states are
//!   reported as `OptError`, not panics.
//! - Log-likelihood implementations treat domain violations (e.g. a
//!   non-positive prediction-error variance) as recoverable errors.
//!
//! Conventions
//! -----------
//! - Solvers maximize `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`; outcomes are
//!   expressed in terms of `ℓ`.
//! - Library code logs only through `tracing`; subscribers are installed by
//!   front-ends.
//!
//! Downstream usage
//! ----------------
//! - `state_space::models::LocalLevelModel` implements `LogLikelihood` and
//!   calls `maximize` once per start value.
//! - Front-ends import the curated surface via `optimization::prelude::*`.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use kalman_rt::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
