//! Local-level model parameters and their optimizer-space representation.
//!
//! The model has two non-negative variances: the irregular (observation
//! noise) variance `σ²_ε` and the level (state innovation) variance `σ²_η`.
//! The optimizer works on `θ = (θ_ε, θ_η)` with `σ² = θ²`.
use crate::{
    optimization::{
        loglik_optimizer::Theta,
        numerical_stability::transformations::{theta_from_variance, variance_from_theta},
    },
    state_space::errors::{StateSpaceError, StateSpaceResult},
};
use ndarray::{ArrayView1, array};

/// Number of free parameters in the local-level model.
pub const N_PARAMS: usize = 2;

/// Variances of the local-level model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalLevelParams {
    /// Irregular (observation noise) variance `σ²_ε`.
    pub sigma2_irregular: f64,
    /// Level (state innovation) variance `σ²_η`.
    pub sigma2_level: f64,
}

impl LocalLevelParams {
    /// Build parameters from model-space variances.
    ///
    /// # Errors
    /// `StateSpaceError::InvalidThetaInput` if a variance is negative or
    /// non-finite (index 0 = irregular, 1 = level).
    pub fn new(sigma2_irregular: f64, sigma2_level: f64) -> StateSpaceResult<Self> {
        for (index, value) in [sigma2_irregular, sigma2_level].into_iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(StateSpaceError::InvalidThetaInput { index, value });
            }
        }
        Ok(LocalLevelParams { sigma2_irregular, sigma2_level })
    }

    /// Map an unconstrained optimizer vector into variances.
    ///
    /// # Errors
    /// Propagates [`validate_theta`] failures.
    pub fn from_theta(theta: ArrayView1<'_, f64>) -> StateSpaceResult<Self> {
        validate_theta(theta)?;
        Ok(LocalLevelParams {
            sigma2_irregular: variance_from_theta(theta[0]),
            sigma2_level: variance_from_theta(theta[1]),
        })
    }

    /// Non-negative optimizer coordinates for these variances.
    pub fn to_theta(&self) -> Theta {
        array![theta_from_variance(self.sigma2_irregular), theta_from_variance(self.sigma2_level)]
    }

    /// Signal-to-noise ratio `σ²_η / σ²_ε`.
    ///
    /// `+inf` when the irregular variance is exactly zero and the level
    /// variance is positive; `NaN` when both are zero.
    pub fn signal_to_noise(&self) -> f64 {
        self.sigma2_level / self.sigma2_irregular
    }
}

/// Validate an unconstrained parameter vector.
///
/// # Errors
/// - `StateSpaceError::ThetaLengthMismatch` when `theta.len() != 2`.
/// - `StateSpaceError::InvalidThetaInput` for the first non-finite entry.
pub fn validate_theta(theta: ArrayView1<'_, f64>) -> StateSpaceResult<()> {
    if theta.len() != N_PARAMS {
        return Err(StateSpaceError::ThetaLengthMismatch {
            expected: N_PARAMS,
            actual: theta.len(),
        });
    }
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(StateSpaceError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // `from_theta` squares coordinates and `to_theta` maps back to the
    // non-negative root.
    //
    // Given
    // -----
    // - `θ = (-0.2, 0.05)`.
    //
    // Expect
    // ------
    // - Variances `(0.04, 0.0025)`, SNR `0.0625`, `to_theta = (0.2, 0.05)`.
    fn from_theta_squares_coordinates() {
        // Act
        let params = LocalLevelParams::from_theta(array![-0.2, 0.05].view())
            .expect("finite theta should map");

        // Assert
        assert_relative_eq!(params.sigma2_irregular, 0.04, max_relative = 1e-12);
        assert_relative_eq!(params.sigma2_level, 0.0025, max_relative = 1e-12);
        assert_relative_eq!(params.signal_to_noise(), 0.0625, max_relative = 1e-12);
        let back = params.to_theta();
        assert_relative_eq!(back[0], 0.2, max_relative = 1e-12);
        assert_relative_eq!(back[1], 0.05, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Malformed optimizer vectors and variances are rejected.
    //
    // Given
    // -----
    // - A length-3 theta, a theta with NaN, and a negative level variance.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch`, `InvalidThetaInput { index: 0 }` and
    //   `InvalidThetaInput { index: 1 }`.
    fn invalid_inputs_are_rejected() {
        assert_eq!(
            validate_theta(array![0.1, 0.2, 0.3].view()),
            Err(StateSpaceError::ThetaLengthMismatch { expected: 2, actual: 3 })
        );
        assert!(matches!(
            LocalLevelParams::from_theta(array![f64::NAN, 0.2].view()),
            Err(StateSpaceError::InvalidThetaInput { index: 0, .. })
        ));
        assert_eq!(
            LocalLevelParams::new(0.1, -1.0),
            Err(StateSpaceError::InvalidThetaInput { index: 1, value: -1.0 })
        );
    }
}
