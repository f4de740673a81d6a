//! loglik_optimizer::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Hide Argmin's generic wiring behind two small builders, one per supported
//! line search, and apply crate-level options (tolerances, memory size) in a
//! single shared helper.
//!
//! Conventions
//! -----------
//! - Builders never set `theta0` or `max_iters`; those are runtime concerns
//!   applied by [`run_lbfgs`](crate::optimization::loglik_optimizer::run::run_lbfgs).
//! - The L-BFGS memory is `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
//! - Argmin configuration errors surface as [`OptResult`] via the crate's
//!   `From<argmin::core::Error>` conversion.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
};

/// Construct L-BFGS with a Hager–Zhang line search and the tolerances in `opts`.
///
/// # Errors
/// Returns an `OptError` if Argmin rejects a tolerance.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Construct L-BFGS with a More–Thuente line search and the tolerances in `opts`.
///
/// This is the default solver for local-level fits.
///
/// # Errors
/// Returns an `OptError` if Argmin rejects a tolerance.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// Apply optional gradient-norm and cost-change tolerances to an L-BFGS solver.
///
/// A `None` tolerance leaves Argmin's default in place (`√ε` for the
/// gradient, `ε` for the cost change).
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
