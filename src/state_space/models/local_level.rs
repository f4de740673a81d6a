//! Local-level model: Kalman-filter log-likelihood wired to the optimizer.
//!
//! This module connects the scalar Kalman filter to the `LogLikelihood`
//! trait. The optimizer sees `θ = (θ_ε, θ_η)` with `σ² = θ²`; the objective is
//! the **mean** log-likelihood over the observations after the burn-in, so
//! `-value` is directly the "negative log-likelihood per observation" used to
//! rank grid starts.
//!
//! Key ideas:
//! - No analytic score: the adapter differentiates the cost numerically.
//! - [`LocalLevelModel::fit_from`] stores the optimizer outcome and the
//!   fitted variances; [`LocalLevelModel::smooth`] reuses them.
use crate::{
    optimization::{
        errors::OptResult,
        loglik_optimizer::{LogLikelihood, MLEOptions, OptimOutcome, Theta, maximize},
    },
    state_space::{
        core::{
            data::ObservationSeries,
            kalman::{SmoothedState, kalman_filter, smooth},
            params::{LocalLevelParams, validate_theta},
        },
        errors::{StateSpaceError, StateSpaceResult},
    },
};

/// Local-level model with stored fit results.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalLevelModel {
    /// Optimizer options used by every fit.
    pub mle_opts: MLEOptions,
    /// Last optimization outcome (populated after `fit_from`).
    pub results: Option<OptimOutcome>,
    /// Fitted variances (populated after `fit_from`).
    pub fitted_params: Option<LocalLevelParams>,
}

impl LocalLevelModel {
    pub fn new(mle_opts: MLEOptions) -> LocalLevelModel {
        LocalLevelModel { mle_opts, results: None, fitted_params: None }
    }

    /// Fit by maximum likelihood starting from the variances in `start`.
    ///
    /// Returns the outcome and caches it together with the fitted variances.
    ///
    /// # Errors
    /// Optimizer failures, including model errors raised inside the
    /// likelihood (e.g. a collapsed prediction-error variance).
    pub fn fit_from(
        &mut self, start: &LocalLevelParams, data: &ObservationSeries,
    ) -> OptResult<&OptimOutcome> {
        let outcome = maximize(&*self, start.to_theta(), data, &self.mle_opts)?;
        let fitted = LocalLevelParams::from_theta(outcome.theta_hat.view())?;
        self.fitted_params = Some(fitted);
        Ok(self.results.insert(outcome))
    }

    /// Smoothed level at the fitted variances.
    ///
    /// # Errors
    /// `StateSpaceError::OptimizationFailed` if called before a successful fit;
    /// filter errors otherwise.
    pub fn smooth(&self, data: &ObservationSeries) -> StateSpaceResult<SmoothedState> {
        let params = self.fitted_params.as_ref().ok_or_else(|| {
            StateSpaceError::OptimizationFailed { status: "model has not been fitted".to_string() }
        })?;
        smooth(data, params)
    }
}

impl LogLikelihood for LocalLevelModel {
    type Data = ObservationSeries;

    /// Mean log-likelihood per contributing observation at `θ`.
    ///
    /// # Errors
    /// Filter errors, converted into `OptError` so the optimizer can report
    /// them.
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<f64> {
        let params = LocalLevelParams::from_theta(theta.view())?;
        let filtered = kalman_filter(data, &params)?;
        Ok(filtered.mean_loglik()?)
    }

    /// Checks `θ.len() == 2` and finite entries.
    fn check(&self, theta: &Theta, _data: &Self::Data) -> OptResult<()> {
        validate_theta(theta.view())?;
        Ok(())
    }
}
