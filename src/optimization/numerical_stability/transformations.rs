//! Variance transforms for unconstrained optimization.
//!
//! The local-level model has two variances that must stay non-negative.
//! Optimizing over `θ` with `σ² = θ²` keeps the problem unconstrained while
//! allowing a variance to reach exactly zero.
//!
//! # Provided items
//! - [`VARIANCE_FLOOR`]: smallest start variance handed to the optimizer.
//! - [`variance_from_theta`]: `θ ↦ θ²`.
//! - [`theta_from_variance`]: `σ² ↦ √σ²`.
//! - [`floor_variance`]: clamp a start variance to [`VARIANCE_FLOOR`].

/// Lower bound for start variances.
///
/// A start value of exactly zero sits on a stationary point of `θ ↦ θ²`
/// (zero derivative), so start values are lifted to this floor.
pub const VARIANCE_FLOOR: f64 = 1e-10;

/// Map an unconstrained coordinate to a variance: `σ² = θ²`.
#[inline]
pub fn variance_from_theta(theta: f64) -> f64 {
    theta * theta
}

/// Map a variance to its non-negative unconstrained coordinate: `θ = √σ²`.
///
/// Negative inputs are treated as zero.
#[inline]
pub fn theta_from_variance(variance: f64) -> f64 {
    variance.max(0.0).sqrt()
}

/// Lift a start variance to at least [`VARIANCE_FLOOR`].
///
/// Non-finite inputs also map to the floor.
#[inline]
pub fn floor_variance(variance: f64) -> f64 {
    if variance.is_finite() && variance > VARIANCE_FLOOR { variance } else { VARIANCE_FLOOR }
}
