//! Estimator options — grid size, iteration cap and solver tolerances.
//!
//! Purpose
//! -------
//! Collect the knobs of one `estimate_r` call in a validated struct and turn
//! them into the optimizer's [`MLEOptions`].
//!
//! Key behaviors
//! -------------
//! - [`EstimatorOptions::new`] checks `max_iterations > 0` and finite,
//!   positive tolerances.
//! - [`EstimatorOptions::default`] mirrors the classic L-BFGS-B defaults used
//!   for these fits: `grid_size = 0`, `max_iterations = 200`, projected
//!   gradient tolerance `1e-5` and a cost-change tolerance of `1e7 · ε`.
//! - [`EstimatorOptions::to_mle_options`] builds validated [`MLEOptions`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Fields are public for struct-update syntax; [`EstimatorOptions::validate`]
//!   is re-run by the estimator so hand-built values are still checked.
use crate::{
    optimization::loglik_optimizer::{LineSearcher, MLEOptions, Tolerances},
    state_space::errors::{StateSpaceError, StateSpaceResult},
};

/// Default iteration cap per fit.
pub const DEFAULT_MAX_ITERATIONS: usize = 200;

/// Default gradient-norm tolerance.
pub const DEFAULT_TOL_GRAD: f64 = 1e-5;

/// Default cost-change tolerance.
pub const DEFAULT_TOL_COST: f64 = 1e7 * f64::EPSILON;

/// Options for one local-level estimation.
///
/// Fields
/// ------
/// - `grid_size`: number of start values per variance; `0` disables the
///   multi-start search, otherwise `grid_size²` fits are run.
/// - `max_iterations`: L-BFGS iteration cap for every fit.
/// - `line_searcher`: line search used by L-BFGS.
/// - `tol_grad`, `tol_cost`: stopping tolerances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimatorOptions {
    pub grid_size: usize,
    pub max_iterations: usize,
    pub line_searcher: LineSearcher,
    pub tol_grad: f64,
    pub tol_cost: f64,
}

impl EstimatorOptions {
    /// Construct validated options with the default solver settings.
    ///
    /// # Errors
    /// `StateSpaceError::InvalidMaxIterations` when `max_iterations == 0`.
    pub fn new(grid_size: usize, max_iterations: usize) -> StateSpaceResult<Self> {
        let options = EstimatorOptions { grid_size, max_iterations, ..Default::default() };
        options.validate()?;
        Ok(options)
    }

    /// Replace the stopping tolerances.
    ///
    /// # Errors
    /// `StateSpaceError::InvalidTolerance` for non-finite or non-positive
    /// values.
    pub fn with_tolerances(mut self, tol_grad: f64, tol_cost: f64) -> StateSpaceResult<Self> {
        self.tol_grad = tol_grad;
        self.tol_cost = tol_cost;
        self.validate()?;
        Ok(self)
    }

    /// Replace the line search.
    pub fn with_line_searcher(mut self, line_searcher: LineSearcher) -> Self {
        self.line_searcher = line_searcher;
        self
    }

    /// Re-check every field.
    pub fn validate(&self) -> StateSpaceResult<()> {
        if self.max_iterations == 0 {
            return Err(StateSpaceError::InvalidMaxIterations { value: self.max_iterations });
        }
        for (name, value) in [("tol_grad", self.tol_grad), ("tol_cost", self.tol_cost)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(StateSpaceError::InvalidTolerance { name, value });
            }
        }
        Ok(())
    }

    /// Optimizer options for one fit.
    ///
    /// # Errors
    /// Propagates [`EstimatorOptions::validate`] failures.
    pub fn to_mle_options(&self) -> StateSpaceResult<MLEOptions> {
        self.validate()?;
        let tols =
            Tolerances::new(Some(self.tol_grad), Some(self.tol_cost), Some(self.max_iterations))?;
        Ok(MLEOptions::new(tols, self.line_searcher, false, None)?)
    }
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        EstimatorOptions {
            grid_size: 0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            line_searcher: LineSearcher::MoreThuente,
            tol_grad: DEFAULT_TOL_GRAD,
            tol_cost: DEFAULT_TOL_COST,
        }
    }
}
