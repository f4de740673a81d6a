//! Normal-approximation confidence intervals for R.
//!
//! `z = Φ⁻¹(1 − α/2)` from the standard normal quantile in `statrs`;
//! bounds are `R ± z·se`. The batch output carries the 95% and 50% levels.
use crate::batch::errors::{BatchError, BatchResult};
use statrs::distribution::{ContinuousCDF, Normal};

/// Significance level of the 95% interval.
pub const ALPHA_95: f64 = 0.05;

/// Significance level of the 50% interval.
pub const ALPHA_50: f64 = 0.5;

/// Two-sided critical value `Φ⁻¹(1 − α/2)`.
///
/// # Errors
/// `BatchError::InvalidConfig` unless `0 < alpha < 1`.
pub fn z_critical(alpha: f64) -> BatchResult<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(BatchError::InvalidConfig { field: "alpha", reason: "must lie in (0, 1)" });
    }
    let normal = Normal::new(0.0, 1.0)?;
    Ok(normal.inverse_cdf(1.0 - alpha / 2.0))
}

/// Lower and upper bound of one interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// `r ± z·se`.
    pub fn around(r: f64, se: f64, z: f64) -> Self {
        Interval { lower: r - z * se, upper: r + z * se }
    }
}

/// Critical values for the 95% and 50% intervals, computed once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
    pub z95: f64,
    pub z50: f64,
}

impl CriticalValues {
    pub fn new() -> BatchResult<Self> {
        Ok(CriticalValues { z95: z_critical(ALPHA_95)?, z50: z_critical(ALPHA_50)? })
    }

    /// `(95% interval, 50% interval)` around `r`.
    pub fn intervals(&self, r: f64, se: f64) -> (Interval, Interval) {
        (Interval::around(r, se, self.z95), Interval::around(r, se, self.z50))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    // Purpose
    // -------
    // Critical values match the standard normal quantiles.
    //
    // Given
    // -----
    // - `α = 0.05` and `α = 0.5`.
    //
    // Expect
    // ------
    // - `1.959963984540054` and `0.6744897501960817`.
    fn z_critical_matches_normal_quantiles() {
        assert_relative_eq!(z_critical(0.05).expect("valid alpha"), 1.959963984540054, max_relative = 1e-9);
        assert_relative_eq!(z_critical(0.5).expect("valid alpha"), 0.6744897501960817, max_relative = 1e-9);
        assert!(matches!(z_critical(0.0), Err(BatchError::InvalidConfig { .. })));
        assert!(matches!(z_critical(1.5), Err(BatchError::InvalidConfig { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Both intervals contain R and the 95% interval nests the 50% one.
    //
    // Given
    // -----
    // - `R = 1.2`, `se = 0.3`.
    //
    // Expect
    // ------
    // - `l95 ≤ l50 ≤ R ≤ u50 ≤ u95`.
    fn intervals_are_nested_around_r() {
        // Arrange
        let z = CriticalValues::new().expect("quantiles should build");

        // Act
        let (ci95, ci50) = z.intervals(1.2, 0.3);

        // Assert
        assert!(ci95.lower <= ci50.lower);
        assert!(ci50.lower <= 1.2 && 1.2 <= ci50.upper);
        assert!(ci50.upper <= ci95.upper);
        assert_relative_eq!(ci95.upper - ci95.lower, 2.0 * 0.3 * z.z95, max_relative = 1e-12);
    }
}
