//! Execution helper that runs an `argmin` solver on a log-likelihood problem and
//! returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, LogLikelihood, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter,
    },
};
use argmin::core::{CostFunction, Executor, Gradient, State};
use argmin_math::ArgminL2Norm;

/// Run an `argmin` optimization for a log-likelihood problem.
///
/// Shared runner for both line-search variants. It sets `theta0` and the
/// optional iteration cap on the executor, attaches the slog observer when
/// `opts.verbose` and the `obs_slog` feature are both on, runs the solver and
/// converts the final state into an [`OptimOutcome`].
///
/// # Errors
/// - Argmin runtime errors (line-search failures, errors raised by the
///   likelihood during a run) via `From<argmin::core::Error>`.
/// - Validation errors from [`OptimOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    if opts.verbose {
        log_initial_state(&theta0, &problem);
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        optimizer = optimizer.configure(|state| state.max_iters(max_iter as u64));
    }

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper Methods ----

fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>)
where
    F: LogLikelihood,
{
    let ll0 = problem.cost(theta0).map(|c| -c).ok();
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    tracing::debug!(
        loglik = ?ll0,
        grad_norm = ?g0n,
        theta0 = ?theta0.to_vec(),
        "starting L-BFGS run"
    );
}
