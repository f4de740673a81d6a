//! Scalar Kalman filter and Rauch–Tung–Striebel smoother for the local-level
//! model.
//!
//! Purpose
//! -------
//! Evaluate the Gaussian log-likelihood of a local-level model by prediction
//! error decomposition and produce the smoothed level with its variance.
//!
//! Model
//! -----
//! `y_t = μ_t + ε_t`, `ε_t ~ N(0, σ²_ε)`;
//! `μ_{t+1} = μ_t + η_t`, `η_t ~ N(0, σ²_η)`.
//!
//! Key behaviors
//! -------------
//! - Approximate diffuse start: `a_0 = 0`, `P_0 = DIFFUSE_VARIANCE`.
//! - The first [`LOGLIK_BURN`] steps update the state but do not contribute to
//!   the log-likelihood.
//! - `NaN` observations are prediction-only steps: the filtered moments equal
//!   the predicted ones and nothing is added to the log-likelihood.
//! - The smoother uses a zero gain when the next predicted variance is not
//!   positive and clamps smoothed variances at zero.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs come from a validated [`ObservationSeries`]; `±inf` never reaches
//!   the recursion.
//! - A prediction-error variance `f_t ≤ 0` (or non-finite) is reported as
//!   `StateSpaceError::NonPositiveInnovationVariance`.
//!
//! Testing notes
//! -------------
//! - Unit tests compare filter and smoother moments against hand-computed
//!   values on a four-point series with one gap.
use crate::state_space::{
    core::{data::ObservationSeries, params::LocalLevelParams},
    errors::{StateSpaceError, StateSpaceResult},
};
use ndarray::Array1;

/// Initial state variance of the approximate diffuse prior.
pub const DIFFUSE_VARIANCE: f64 = 1e6;

/// Number of leading steps excluded from the log-likelihood.
pub const LOGLIK_BURN: usize = 1;

const LN_2PI: f64 = 1.837_877_066_409_345_5;

/// Output of one forward filtering pass.
///
/// `predicted_*[t]` are the moments of `μ_t` given `y_0..y_{t-1}`;
/// `filtered_*[t]` condition on `y_t` as well.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutput {
    pub predicted_mean: Array1<f64>,
    pub predicted_variance: Array1<f64>,
    pub filtered_mean: Array1<f64>,
    pub filtered_variance: Array1<f64>,
    /// Sum of log-likelihood contributions after the burn-in.
    pub loglik: f64,
    /// Number of observations contributing to `loglik`.
    pub n_loglik: usize,
}

impl FilterOutput {
    /// Mean log-likelihood per contributing observation.
    pub fn mean_loglik(&self) -> StateSpaceResult<f64> {
        if self.n_loglik == 0 {
            return Err(StateSpaceError::InsufficientObservations {
                found: self.n_loglik,
                required: 1,
            });
        }
        Ok(self.loglik / self.n_loglik as f64)
    }
}

/// Smoothed level and its variance at every time index.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedState {
    pub level: Array1<f64>,
    pub variance: Array1<f64>,
}

/// Run the forward filter over `series` at fixed variances.
///
/// # Errors
/// `StateSpaceError::NonPositiveInnovationVariance` when `f_t = P_t + σ²_ε`
/// is not strictly positive and finite at an observed step.
pub fn kalman_filter(
    series: &ObservationSeries, params: &LocalLevelParams,
) -> StateSpaceResult<FilterOutput> {
    let n = series.len();
    let sigma2_eps = params.sigma2_irregular;
    let sigma2_eta = params.sigma2_level;

    let mut predicted_mean = Array1::zeros(n);
    let mut predicted_variance = Array1::zeros(n);
    let mut filtered_mean = Array1::zeros(n);
    let mut filtered_variance = Array1::zeros(n);
    let mut loglik = 0.0;
    let mut n_loglik = 0;

    let mut a = 0.0;
    let mut p = DIFFUSE_VARIANCE;
    for (t, &y) in series.values().iter().enumerate() {
        predicted_mean[t] = a;
        predicted_variance[t] = p;

        let (m, v) = if y.is_nan() {
            (a, p)
        } else {
            let f = p + sigma2_eps;
            if !(f > 0.0 && f.is_finite()) {
                return Err(StateSpaceError::NonPositiveInnovationVariance { t, value: f });
            }
            let innovation = y - a;
            let gain = p / f;
            if t >= LOGLIK_BURN {
                loglik += -0.5 * (LN_2PI + f.ln() + innovation * innovation / f);
                n_loglik += 1;
            }
            // p * σ²_ε / f == p * (1 - gain), without cancellation.
            (a + gain * innovation, p * sigma2_eps / f)
        };

        filtered_mean[t] = m;
        filtered_variance[t] = v;
        a = m;
        p = v + sigma2_eta;
    }

    Ok(FilterOutput {
        predicted_mean,
        predicted_variance,
        filtered_mean,
        filtered_variance,
        loglik,
        n_loglik,
    })
}

/// Backward RTS pass over a completed filter run.
pub fn rts_smoother(filtered: &FilterOutput) -> SmoothedState {
    let n = filtered.filtered_mean.len();
    let mut level = filtered.filtered_mean.clone();
    let mut variance = filtered.filtered_variance.clone();
    if n < 2 {
        return SmoothedState { level, variance };
    }

    for t in (0..n - 1).rev() {
        let p_next = filtered.predicted_variance[t + 1];
        let gain = if p_next > 0.0 { filtered.filtered_variance[t] / p_next } else { 0.0 };
        level[t] = filtered.filtered_mean[t]
            + gain * (level[t + 1] - filtered.predicted_mean[t + 1]);
        let v = filtered.filtered_variance[t] + gain * gain * (variance[t + 1] - p_next);
        variance[t] = v.max(0.0);
    }

    SmoothedState { level, variance }
}

/// Filter then smooth.
pub fn smooth(
    series: &ObservationSeries, params: &LocalLevelParams,
) -> StateSpaceResult<SmoothedState> {
    let filtered = kalman_filter(series, params)?;
    Ok(rts_smoother(&filtered))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn fixture() -> (ObservationSeries, LocalLevelParams) {
        let series = ObservationSeries::new(array![1.0, 2.0, f64::NAN, 1.5])
            .expect("fixture series should validate");
        let params = LocalLevelParams::new(1.0, 0.5).expect("fixture params should validate");
        (series, params)
    }

    #[test]
    // Purpose
    // -------
    // Filtered moments and the log-likelihood match a hand computation, and
    // the missing step carries the prediction forward.
    //
    // Given
    // -----
    // - `y = [1, 2, NaN, 1.5]`, `σ²_ε = 1`, `σ²_η = 0.5`, diffuse start.
    //
    // Expect
    // ------
    // - Moments and `loglik ≈ -2.97570146` over two contributing points.
    fn filter_matches_hand_computation() {
        // Arrange
        let (series, params) = fixture();

        // Act
        let out = kalman_filter(&series, &params).expect("filter should run");

        // Assert
        let expected_mean = [0.999999000001, 1.5999994400003361, 1.5999994400003361, 1.5384613254439017];
        let expected_var = [0.999999000001, 0.599999840000096, 1.099999840000096, 0.6153845917159891];
        for t in 0..4 {
            assert_relative_eq!(out.filtered_mean[t], expected_mean[t], max_relative = 1e-9);
            assert_relative_eq!(out.filtered_variance[t], expected_var[t], max_relative = 1e-9);
        }
        assert_eq!(out.filtered_mean[2], out.predicted_mean[2]);
        assert_eq!(out.filtered_variance[2], out.predicted_variance[2]);
        assert_eq!(out.n_loglik, 2);
        assert_relative_eq!(out.loglik, -2.9757014595940303, max_relative = 1e-9);
        assert_relative_eq!(
            out.mean_loglik().expect("two contributions"),
            -2.9757014595940303 / 2.0,
            max_relative = 1e-9
        );
    }

    #[test]
    // Purpose
    // -------
    // The RTS pass matches a hand computation and leaves the final step equal
    // to the filtered one.
    //
    // Given
    // -----
    // - The same fixture as above.
    //
    // Expect
    // ------
    // - Smoothed levels/variances at the reference values; all variances ≥ 0.
    fn smoother_matches_hand_computation() {
        // Arrange
        let (series, params) = fixture();

        // Act
        let state = smooth(&series, &params).expect("smoother should run");

        // Assert
        let expected_level = [1.384614639053656, 1.5769226508878036, 1.5576919881658526, 1.5384613254439017];
        let expected_var = [0.5384612485208662, 0.46153836686395633, 0.6346153313609755, 0.6153845917159891];
        for t in 0..4 {
            assert_relative_eq!(state.level[t], expected_level[t], max_relative = 1e-9);
            assert_relative_eq!(state.variance[t], expected_var[t], max_relative = 1e-9);
            assert!(state.variance[t] >= 0.0);
        }
    }

    #[test]
    // Purpose
    // -------
    // Two zero variances make `f_t` collapse after the first update.
    //
    // Given
    // -----
    // - `σ²_ε = σ²_η = 0` on a three-point series.
    //
    // Expect
    // ------
    // - `NonPositiveInnovationVariance { t: 1, value: 0.0 }`.
    fn zero_variances_report_non_positive_innovation_variance() {
        // Arrange
        let series = ObservationSeries::new(array![0.1, 0.2, 0.3]).expect("valid series");
        let params = LocalLevelParams::new(0.0, 0.0).expect("zero variances are admissible");

        // Act
        let result = kalman_filter(&series, &params);

        // Assert
        assert_eq!(
            result,
            Err(StateSpaceError::NonPositiveInnovationVariance { t: 1, value: 0.0 })
        );
    }
}
