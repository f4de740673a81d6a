//! Observation series container for the local-level model.
//!
//! Purpose
//! -------
//! Provide a small, validated container for one country's growth-rate series.
//! Validation happens once at the boundary so the filter, the start-value
//! heuristics and the likelihood can assume clean input.
//!
//! Key behaviors
//! -------------
//! - [`ObservationSeries::new`] rejects empty series, `±inf` entries and
//!   series with fewer than [`MIN_OBSERVED`] non-missing values.
//! - `NaN` entries are kept in place as missing observations.
//!
//! Invariants & assumptions
//! ------------------------
//! - `values.len() > 0`.
//! - Every entry is finite or `NaN`.
//! - At least [`MIN_OBSERVED`] entries are finite.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path with missing values, empty input,
//!   infinite values and too few observed points.
use crate::state_space::errors::{StateSpaceError, StateSpaceResult};
use ndarray::{Array1, ArrayView1};

/// Minimum number of non-missing observations needed to identify the two
/// variances.
pub const MIN_OBSERVED: usize = 2;

/// `ObservationSeries` — validated growth-rate series with missing values.
///
/// Fields
/// ------
/// - `values`: `Array1<f64>`
///   Observations in time order; `NaN` marks a missing value.
/// - `n_observed`: `usize`
///   Number of finite entries in `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationSeries {
    values: Array1<f64>,
    n_observed: usize,
}

impl ObservationSeries {
    /// Construct a validated series from raw values.
    ///
    /// Errors
    /// ------
    /// - `StateSpaceError::EmptySeries` when `values.len() == 0`.
    /// - `StateSpaceError::InfiniteData { index, value }` for the first `±inf`.
    /// - `StateSpaceError::InsufficientObservations` when fewer than
    ///   [`MIN_OBSERVED`] entries are finite.
    pub fn new(values: Array1<f64>) -> StateSpaceResult<Self> {
        if values.is_empty() {
            return Err(StateSpaceError::EmptySeries);
        }

        let mut n_observed = 0;
        for (index, &value) in values.iter().enumerate() {
            if value.is_infinite() {
                return Err(StateSpaceError::InfiniteData { index, value });
            }
            if value.is_finite() {
                n_observed += 1;
            }
        }

        if n_observed < MIN_OBSERVED {
            return Err(StateSpaceError::InsufficientObservations {
                found: n_observed,
                required: MIN_OBSERVED,
            });
        }

        Ok(ObservationSeries { values, n_observed })
    }

    /// Copy a borrowed view into a validated series.
    pub fn from_view(values: ArrayView1<'_, f64>) -> StateSpaceResult<Self> {
        Self::new(values.to_owned())
    }

    /// All entries, missing values included.
    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Series length including missing entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false` for a validated series.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of non-missing entries.
    pub fn n_observed(&self) -> usize {
        self.n_observed
    }

    /// Non-missing entries in time order.
    pub fn observed(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| !v.is_nan()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Missing values are kept and counted separately from observed ones.
    //
    // Given
    // -----
    // - `[0.1, NaN, 0.3, 0.2]`.
    //
    // Expect
    // ------
    // - Length 4, three observed entries, `observed()` in order.
    fn new_keeps_missing_values_in_place() {
        // Act
        let series = ObservationSeries::new(array![0.1, f64::NAN, 0.3, 0.2])
            .expect("series with one gap should validate");

        // Assert
        assert_eq!(series.len(), 4);
        assert_eq!(series.n_observed(), 3);
        assert_eq!(series.observed(), vec![0.1, 0.3, 0.2]);
        assert!(series.values()[1].is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Invalid inputs are rejected with the matching variant.
    //
    // Given
    // -----
    // - An empty array, an array with `-inf`, and an array with one finite value.
    //
    // Expect
    // ------
    // - `EmptySeries`, `InfiniteData { index: 1, .. }` and
    //   `InsufficientObservations { found: 1, required: 2 }`.
    fn new_rejects_empty_infinite_and_short_series() {
        assert_eq!(ObservationSeries::new(Array1::zeros(0)), Err(StateSpaceError::EmptySeries));
        assert!(matches!(
            ObservationSeries::new(array![0.1, f64::NEG_INFINITY, 0.2]),
            Err(StateSpaceError::InfiniteData { index: 1, .. })
        ));
        assert_eq!(
            ObservationSeries::new(array![f64::NAN, 0.4, f64::NAN]),
            Err(StateSpaceError::InsufficientObservations { found: 1, required: 2 })
        );
    }
}
