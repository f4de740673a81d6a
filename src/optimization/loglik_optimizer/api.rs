//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`),
//! and delegates the run to `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an `ArgMinAdapter` that exposes a *minimization*
///   problem `c(θ) = -ℓ(θ)` to `argmin`.
/// - Builds an L-BFGS solver with either **Hager–Zhang** or **More–Thuente**
///   line search based on `opts.line_searcher`.
/// - Calls `run_lbfgs`, which configures the executor (initial params,
///   max iters, optional observers) and returns an `OptimOutcome`.
///
/// # Parameters
/// - `f`: Your model implementing [`LogLikelihood`].
/// - `theta0`: Initial parameter vector.
/// - `data`: Model data passed through to `value`/`grad`.
/// - `opts`: Optimizer options (tolerances, line search choice, verbosity, etc.).
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors from `build_optimizer_*`.
/// - Propagates runtime errors from `run_lbfgs` (e.g., line search failures).
///
/// # Returns
/// An [`OptimOutcome`] with `theta_hat`, the best value `ℓ(θ̂)`, the warning
/// flag and termination status, and iteration/evaluation counters.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use kalman_rt::optimization::errors::OptResult;
/// use kalman_rt::optimization::loglik_optimizer::{
///     maximize, LineSearcher, LogLikelihood, MLEOptions, Theta, Tolerances,
/// };
///
/// struct Concave;
/// impl LogLikelihood for Concave {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let tols = Tolerances::new(Some(1e-6), None, Some(200))?;
/// let opts = MLEOptions::new(tols, LineSearcher::HagerZhang, false, None)?;
/// let out = maximize(&Concave, array![0.1, -0.2, 0.3], &(), &opts)?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), kalman_rt::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::loglik_optimizer::Tolerances;
    use crate::optimization::loglik_optimizer::types::Theta;
    use crate::optimization::errors::OptError;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // Concave log-likelihood with maximum at `target`; no analytic gradient,
    // so the adapter's finite-difference path is used.
    struct ShiftedBowl {
        target: [f64; 2],
    }

    impl LogLikelihood for ShiftedBowl {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<f64> {
            let d0 = theta[0] - self.target[0];
            let d1 = theta[1] - self.target[1];
            Ok(-(d0 * d0 + 2.0 * d1 * d1))
        }

        fn check(&self, theta: &Theta, _data: &()) -> OptResult<()> {
            if theta.len() != 2 {
                return Err(OptError::ThetaLengthMismatch { expected: 2, actual: theta.len() });
            }
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // `maximize` locates the optimum of a smooth concave objective with both
    // line searches and reports a converged flag.
    //
    // Given
    // -----
    // - `ℓ(θ) = -((θ₀ - 1)² + 2(θ₁ + 0.5)²)` starting at the origin.
    //
    // Expect
    // ------
    // - `θ̂ ≈ (1, -0.5)`, `ℓ(θ̂) ≈ 0`, `warn_flag == 0`.
    fn maximize_finds_optimum_of_concave_bowl() {
        // Arrange
        let model = ShiftedBowl { target: [1.0, -0.5] };
        for ls in [LineSearcher::MoreThuente, LineSearcher::HagerZhang] {
            let tols = Tolerances::new(Some(1e-6), None, Some(200)).expect("valid tolerances");
            let opts = MLEOptions::new(tols, ls, false, None).expect("valid options");

            // Act
            let out = maximize(&model, array![0.0, 0.0], &(), &opts).expect("fit should succeed");

            // Assert
            assert_abs_diff_eq!(out.theta_hat[0], 1.0, epsilon = 1e-3);
            assert_abs_diff_eq!(out.theta_hat[1], -0.5, epsilon = 1e-3);
            assert_abs_diff_eq!(out.value, 0.0, epsilon = 1e-6);
            assert_eq!(out.warn_flag, 0);
            assert!(out.converged);
        }
    }

    #[test]
    // Purpose
    // -------
    // `maximize` runs `check` before building a solver.
    //
    // Given
    // -----
    // - A three-element start vector for a two-parameter model.
    //
    // Expect
    // ------
    // - `Err(OptError::ThetaLengthMismatch { expected: 2, actual: 3 })`.
    fn maximize_rejects_start_rejected_by_check() {
        // Arrange
        let model = ShiftedBowl { target: [0.0, 0.0] };
        let opts = MLEOptions::default();

        // Act
        let result = maximize(&model, array![0.0, 0.0, 0.0], &(), &opts);

        // Assert
        assert_eq!(result, Err(OptError::ThetaLengthMismatch { expected: 2, actual: 3 }));
    }
}
