//! Validation helpers for log-likelihood optimization.
//!
//! This module centralizes common consistency checks used across the
//! optimizer interface:
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks log-likelihood outputs
//!   for finiteness.
//!
//! Every helper reports through a dedicated [`OptError`] variant so the
//! state-space layer can tell configuration mistakes from numerical ones.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta},
};

/// Validate the optional gradient‐norm tolerance.
///
/// - Accepts `None` (no stopping rule on gradient).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance (for convergence).
///
/// - Accepts `None` (no stopping rule on cost change).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// Checks:
/// - `grad.len() == dim`
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// Accepts only a present vector with all **finite** entries.
///
/// # Returns
/// The owned `Theta` if valid.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar log-likelihood value is finite.
///
/// Negative values are fine as long as they are finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}
