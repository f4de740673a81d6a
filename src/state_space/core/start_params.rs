//! Start values for local-level fits.
//!
//! Purpose
//! -------
//! Produce the starting variances handed to the optimizer: a single default
//! pair derived from a Hodrick–Prescott decomposition, or a linear grid of
//! candidates scaled by the sample variance for multi-start search.
//!
//! Key behaviors
//! -------------
//! - [`hp_filter`] solves `(I + λ DᵀD) τ = y` with a dense Cholesky
//!   factorization, `D` being the second-difference operator.
//! - [`default_start_values`] uses the population variance of the cycle for
//!   the irregular start and that of the trend for the level start, both
//!   floored at the shared variance floor.
//! - [`grid_candidates`] returns `linspace(0.01, 2.0, g) · s²`.
//!
//! Conventions
//! -----------
//! - Missing values are dropped before any of these statistics; the HP
//!   filter runs on the observed points only, in time order.
use crate::{
    optimization::numerical_stability::transformations::floor_variance,
    state_space::{
        core::{data::ObservationSeries, params::LocalLevelParams},
        errors::{StateSpaceError, StateSpaceResult},
    },
};
use nalgebra::{DMatrix, DVector};

/// Smoothing parameter of the Hodrick–Prescott filter.
pub const HP_LAMBDA: f64 = 1600.0;

/// Lower and upper multipliers of the start-value grid.
pub const GRID_LOW: f64 = 0.01;
pub const GRID_HIGH: f64 = 2.0;

/// Trend/cycle split returned by [`hp_filter`].
#[derive(Debug, Clone, PartialEq)]
pub struct HpDecomposition {
    pub trend: Vec<f64>,
    pub cycle: Vec<f64>,
}

/// Hodrick–Prescott filter with smoothing parameter `lambda`.
///
/// Series shorter than three points have no second differences; their trend
/// is the series itself.
///
/// # Errors
/// `StateSpaceError::StartValuesFailed` if the system matrix is not
/// positive definite (only possible for non-finite `lambda`).
pub fn hp_filter(y: &[f64], lambda: f64) -> StateSpaceResult<HpDecomposition> {
    let n = y.len();
    if n < 3 {
        return Ok(HpDecomposition { trend: y.to_vec(), cycle: vec![0.0; n] });
    }

    let mut d = DMatrix::<f64>::zeros(n - 2, n);
    for i in 0..n - 2 {
        d[(i, i)] = 1.0;
        d[(i, i + 1)] = -2.0;
        d[(i, i + 2)] = 1.0;
    }
    let system = DMatrix::<f64>::identity(n, n) + (d.transpose() * &d) * lambda;
    let chol = system.cholesky().ok_or(StateSpaceError::StartValuesFailed {
        reason: "HP system matrix is not positive definite",
    })?;
    let trend = chol.solve(&DVector::from_column_slice(y));

    let trend: Vec<f64> = trend.iter().copied().collect();
    let cycle = y.iter().zip(&trend).map(|(obs, tr)| obs - tr).collect();
    Ok(HpDecomposition { trend, cycle })
}

/// Population variance (`n` denominator). Zero for an empty slice.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

/// Sample variance (`n − 1` denominator) of the non-missing entries.
///
/// `None` with fewer than two non-missing values.
pub fn sample_variance(series: &ObservationSeries) -> Option<f64> {
    let observed = series.observed();
    let n = observed.len();
    if n < 2 {
        return None;
    }
    Some(population_variance(&observed) * n as f64 / (n - 1) as f64)
}

/// Default start variances from an HP decomposition of the observed points.
///
/// # Errors
/// Propagates [`hp_filter`] failures.
pub fn default_start_values(series: &ObservationSeries) -> StateSpaceResult<LocalLevelParams> {
    let hp = hp_filter(&series.observed(), HP_LAMBDA)?;
    LocalLevelParams::new(
        floor_variance(population_variance(&hp.cycle)),
        floor_variance(population_variance(&hp.trend)),
    )
}

/// Linearly spaced start variances `linspace(GRID_LOW, GRID_HIGH, g) · variance`.
///
/// `g = 1` yields the lower end only; `g = 0` yields an empty grid. Values
/// are floored like every other start variance.
pub fn grid_candidates(variance: f64, grid_size: usize) -> Vec<f64> {
    match grid_size {
        0 => Vec::new(),
        1 => vec![floor_variance(GRID_LOW * variance)],
        g => {
            let step = (GRID_HIGH - GRID_LOW) / (g - 1) as f64;
            (0..g)
                .map(|i| floor_variance((GRID_LOW + step * i as f64) * variance))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::numerical_stability::transformations::VARIANCE_FLOOR;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // A straight line has zero second differences, so the HP trend is the
    // line itself.
    //
    // Given
    // -----
    // - `y_t = 0.5 - 0.1 t` for `t = 0..8`.
    //
    // Expect
    // ------
    // - `trend ≈ y`, `cycle ≈ 0`.
    fn hp_filter_reproduces_linear_trend() {
        // Arrange
        let y: Vec<f64> = (0..8).map(|t| 0.5 - 0.1 * t as f64).collect();

        // Act
        let hp = hp_filter(&y, HP_LAMBDA).expect("HP solve should succeed");

        // Assert
        for (t, obs) in y.iter().enumerate() {
            assert_relative_eq!(hp.trend[t], *obs, epsilon = 1e-8);
            assert!(hp.cycle[t].abs() < 1e-8);
        }
    }

    #[test]
    // Purpose
    // -------
    // The HP trend of a zig-zag is much smoother than the data and the
    // decomposition adds back up.
    //
    // Given
    // -----
    // - Alternating `±1` around zero, ten points.
    //
    // Expect
    // ------
    // - `trend + cycle == y`, trend variance far below cycle variance.
    fn hp_filter_separates_high_frequency_cycle() {
        // Arrange
        let y: Vec<f64> = (0..10).map(|t| if t % 2 == 0 { 1.0 } else { -1.0 }).collect();

        // Act
        let hp = hp_filter(&y, HP_LAMBDA).expect("HP solve should succeed");

        // Assert
        for t in 0..y.len() {
            assert_relative_eq!(hp.trend[t] + hp.cycle[t], y[t], epsilon = 1e-12);
        }
        assert!(population_variance(&hp.trend) < 0.1 * population_variance(&hp.cycle));
    }

    #[test]
    // Purpose
    // -------
    // Variances skip missing values and use the documented denominators.
    //
    // Given
    // -----
    // - `[1, NaN, 2, 3, 4]`.
    //
    // Expect
    // ------
    // - Sample variance `5/3`, population variance of the observed `1.25`.
    fn variances_skip_missing_values() {
        // Arrange
        let series =
            ObservationSeries::new(array![1.0, f64::NAN, 2.0, 3.0, 4.0]).expect("valid series");

        // Act / Assert
        assert_relative_eq!(
            sample_variance(&series).expect("four observed points"),
            5.0 / 3.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(population_variance(&series.observed()), 1.25, max_relative = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Grid candidates follow `linspace(0.01, 2.0, g)` scaled by the variance.
    //
    // Given
    // -----
    // - Variance `0.5` with `g = 3`, `g = 1` and `g = 0`.
    //
    // Expect
    // ------
    // - `[0.005, 0.5025, 1.0]`, `[0.005]` and `[]`.
    fn grid_candidates_are_linearly_spaced() {
        // Act
        let three = grid_candidates(0.5, 3);
        let one = grid_candidates(0.5, 1);
        let none = grid_candidates(0.5, 0);

        // Assert
        assert_eq!(three.len(), 3);
        assert_relative_eq!(three[0], 0.005, max_relative = 1e-12);
        assert_relative_eq!(three[1], 0.5025, max_relative = 1e-12);
        assert_relative_eq!(three[2], 1.0, max_relative = 1e-12);
        assert_eq!(one.len(), 1);
        assert_relative_eq!(one[0], 0.005, max_relative = 1e-12);
        assert!(none.is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Default start values are positive even for a perfectly linear series,
    // whose HP cycle is identically zero.
    //
    // Given
    // -----
    // - A linear series of six points.
    //
    // Expect
    // ------
    // - Irregular start at the floor; level start equal to the trend variance.
    fn default_start_values_floor_zero_cycle_variance() {
        // Arrange
        let series =
            ObservationSeries::new(array![0.0, 0.1, 0.2, 0.3, 0.4, 0.5]).expect("valid series");

        // Act
        let start = default_start_values(&series).expect("start values should compute");

        // Assert
        assert!(start.sigma2_irregular <= 1e-9);
        assert!(start.sigma2_irregular >= VARIANCE_FLOOR);
        assert_relative_eq!(
            start.sigma2_level,
            population_variance(&[0.0, 0.1, 0.2, 0.3, 0.4, 0.5]),
            max_relative = 1e-6
        );
    }
}
