//! Estimation entry point: local-level fit, smoothing and conversion to R.
//!
//! Purpose
//! -------
//! Turn one growth-rate series into a smoothed effective reproduction number
//! `R(t)` with standard errors and fit diagnostics.
//!
//! Key behaviors
//! -------------
//! - Validate arguments before any computation (series, `gamma`, options).
//! - Single start (`grid_size == 0`): fit from HP-based default variances.
//! - Multi-start (`grid_size = g > 0`): fit from every pair of
//!   `linspace(0.01, 2.0, g) · s²` start variances, rank the fits by
//!   objective with a stable sort, and refit once at the best start. Fits that
//!   fail numerically rank last with objective `+∞` and flag 2.
//! - Smooth at the fitted variances and map the level to
//!   `R(t) = 1 + μ̂_t / γ`, `se(t) = √Var(μ̂_t) / γ`.
//! - Emit a `tracing` warning when the final fit did not converge; the
//!   returned flag is unaffected.
//!
//! Invariants & assumptions
//! ------------------------
//! - `R` and `se` have the same length as the input series, missing
//!   observations included.
//! - The objective is the negative mean log-likelihood, so lower is better.
//!
//! Downstream usage
//! ----------------
//! - The batch driver calls [`estimate_r`] once per country and records the
//!   diagnostics fields.
//! - [`reproduction_from_smoothed`] is public so callers can reuse the
//!   conversion on a smoothed state of their own.
use crate::{
    optimization::loglik_optimizer::{MLEOptions, OptimOutcome},
    state_space::{
        core::{
            data::ObservationSeries,
            kalman::SmoothedState,
            options::EstimatorOptions,
            params::LocalLevelParams,
            start_params::{default_start_values, grid_candidates, sample_variance},
        },
        errors::{StateSpaceError, StateSpaceResult},
        models::LocalLevelModel,
    },
};
use ndarray::{Array1, ArrayView1};
use tracing::{debug, warn};

/// Number of leading standard errors reported at `debug` level.
const SE_PREVIEW: usize = 10;

/// One evaluated grid start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCandidate {
    /// Start variances of this fit.
    pub start: LocalLevelParams,
    /// Negative mean log-likelihood at the optimum; `+∞` if the fit failed.
    pub objective: f64,
    /// Warning flag of the fit (2 if it failed).
    pub flag: i32,
}

/// Result of one `estimate_r` call.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationResult {
    /// `R(t) = 1 + level(t) / gamma`.
    pub r: Array1<f64>,
    /// `se(t) = sqrt(var(t)) / gamma`.
    pub se: Array1<f64>,
    /// Optimizer warning flag: 0 converged, 1 iteration cap, 2 other.
    pub flag: i32,
    pub sigma2_irregular: f64,
    pub sigma2_level: f64,
    /// `sigma2_level / sigma2_irregular`.
    pub signal_to_noise: f64,
    pub gamma: f64,
    /// Mean log-likelihood at the optimum.
    pub loglik: f64,
    /// Negative mean log-likelihood at the optimum.
    pub objective: f64,
    pub iterations: usize,
    /// Termination status reported by the optimizer.
    pub status: String,
    /// Start variances of the final fit.
    pub start: LocalLevelParams,
    /// Every grid start in ranking order (empty for a single-start fit).
    pub grid: Vec<GridCandidate>,
}

/// Estimate a smoothed reproduction number from a growth-rate series.
///
/// # Parameters
/// - `series`: growth rates in time order; `NaN` marks a missing value.
/// - `gamma`: recovery rate `1 / infectious period`, finite and `> 0`.
/// - `options`: grid size, iteration cap and solver tolerances.
///
/// # Errors
/// - Preconditions: `EmptySeries`, `InfiniteData`, `InsufficientObservations`,
///   `InvalidGamma`, `InvalidMaxIterations`, `InvalidTolerance`.
/// - Numerical: `DegenerateSeries` for a constant series, optimizer and
///   filter failures of the final fit.
pub fn estimate_r(
    series: ArrayView1<'_, f64>, gamma: f64, options: &EstimatorOptions,
) -> StateSpaceResult<EstimationResult> {
    let data = ObservationSeries::from_view(series)?;
    if !gamma.is_finite() || gamma <= 0.0 {
        return Err(StateSpaceError::InvalidGamma { value: gamma });
    }
    let mle_opts = options.to_mle_options()?;

    let variance = sample_variance(&data).unwrap_or(0.0);
    if !(variance > 0.0) {
        return Err(StateSpaceError::DegenerateSeries { variance });
    }

    let (start, grid) = if options.grid_size > 0 {
        let grid = grid_search(&data, variance, options.grid_size, &mle_opts)?;
        (grid[0].start, grid)
    } else {
        (default_start_values(&data)?, Vec::new())
    };

    let mut model = LocalLevelModel::new(mle_opts);
    let outcome = model.fit_from(&start, &data)?.clone();
    let smoothed = model.smooth(&data)?;
    let params = LocalLevelParams::from_theta(outcome.theta_hat.view())?;
    let (r, se) = reproduction_from_smoothed(&smoothed, gamma);

    if outcome.warn_flag != 0 {
        warn!(
            flag = outcome.warn_flag,
            status = %outcome.status,
            iterations = outcome.iterations,
            "ConvergenceWarning: maximum likelihood optimization failed to converge"
        );
    }
    debug!(se = ?se.iter().take(SE_PREVIEW).collect::<Vec<_>>(), "leading standard errors of R");

    Ok(EstimationResult {
        r,
        se,
        flag: outcome.warn_flag,
        sigma2_irregular: params.sigma2_irregular,
        sigma2_level: params.sigma2_level,
        signal_to_noise: params.signal_to_noise(),
        gamma,
        loglik: outcome.value,
        objective: -outcome.value,
        iterations: outcome.iterations,
        status: outcome.status,
        start,
        grid,
    })
}

/// Map a smoothed level to `R(t) = 1 + level / gamma` and
/// `se(t) = sqrt(variance) / gamma`.
pub fn reproduction_from_smoothed(
    state: &SmoothedState, gamma: f64,
) -> (Array1<f64>, Array1<f64>) {
    let r = state.level.mapv(|level| 1.0 + level / gamma);
    let se = state.variance.mapv(|variance| variance.sqrt() / gamma);
    (r, se)
}

// ---- Helper Methods ----

/// Fit every pair of grid starts and return them ranked by objective.
///
/// The result is non-empty whenever `grid_size > 0`.
fn grid_search(
    data: &ObservationSeries, variance: f64, grid_size: usize, mle_opts: &MLEOptions,
) -> StateSpaceResult<Vec<GridCandidate>> {
    let candidates = grid_candidates(variance, grid_size);
    let mut grid = Vec::with_capacity(candidates.len() * candidates.len());
    for &irregular in &candidates {
        for &level in &candidates {
            let start = LocalLevelParams::new(irregular, level)?;
            let mut model = LocalLevelModel::new(mle_opts.clone());
            let candidate = match model.fit_from(&start, data) {
                Ok(outcome) => evaluated(start, outcome),
                Err(err) => {
                    debug!(
                        sigma2_irregular = irregular,
                        sigma2_level = level,
                        error = %err,
                        "grid start failed"
                    );
                    GridCandidate { start, objective: f64::INFINITY, flag: 2 }
                }
            };
            grid.push(candidate);
        }
    }
    grid.sort_by(|a, b| a.objective.total_cmp(&b.objective));
    Ok(grid)
}

fn evaluated(start: LocalLevelParams, outcome: &OptimOutcome) -> GridCandidate {
    GridCandidate { start, objective: -outcome.value, flag: outcome.warn_flag }
}
