//! loglik_optimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for every supported [`Method`], so that
//! higher-level code can request a configured solver without touching
//! Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct line searches with the curvature constant the solver needs:
//!   conjugate-gradient directions are only guaranteed to be descent
//!   directions under a strong Wolfe search with `c₂ < ½`, so the CG
//!   builders tighten it to `0.1`; L-BFGS keeps Argmin's defaults.
//! - Construct L-BFGS, nonlinear CG (Fletcher–Reeves / Polak–Ribière+), and
//!   a Nelder–Mead simplex whose edge is `step_size`.
//! - Wrap every solver in a [`ConvergenceGuard`] carrying the tolerances
//!   from [`EstimationParams`].
//!
//! Conventions
//! -----------
//! - The builders do **not** set an initial parameter vector or
//!   `max_iters`; the runner applies those (except Nelder–Mead, whose
//!   simplex is built around `θ₀`).
//! - Errors are reported via [`OptResult`]; Argmin's `Error` is converted
//!   through `From<argmin::core::Error>`.
//!
//! Testing notes
//! -------------
//! - Unit tests check that each builder accepts valid options and that the
//!   simplex has `n + 1` vertices spaced by `step_size`.
use argmin::solver::{
    conjugategradient::beta::{FletcherReeves, PolakRibierePlus},
    quasinewton::LBFGS,
};

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        convergence::ConvergenceGuard,
        traits::{EstimationParams, Method},
        types::{
            ConjugateGradient, Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang,
            LbfgsMoreThuente, MoreThuenteLS, Simplex, Theta,
        },
    },
};

/// Sufficient-decrease constant for the CG line searches.
pub const CG_WOLFE_C1: f64 = 1e-4;
/// Curvature constant for the CG line searches (strong Wolfe, `< 0.5`).
pub const CG_WOLFE_C2: f64 = 0.1;
/// Nelder–Mead spread tolerance when no cost tolerance is configured.
pub const DEFAULT_SIMPLEX_SD_TOL: f64 = 1e-8;
/// Restart CG along steepest descent at least this often.
pub const CG_RESTART_ITERS: u64 = 10;
/// Restart CG when successive gradients lose orthogonality beyond this.
pub const CG_RESTART_ORTHOGONALITY: f64 = 0.1;

/// More–Thuente search tightened for conjugate-gradient directions.
pub fn cg_more_thuente() -> OptResult<MoreThuenteLS> {
    Ok(MoreThuenteLS::new().with_c(CG_WOLFE_C1, CG_WOLFE_C2)?)
}

/// Hager–Zhang search tightened for conjugate-gradient directions.
pub fn cg_hager_zhang() -> OptResult<HagerZhangLS> {
    Ok(HagerZhangLS::new().with_delta_sigma(CG_WOLFE_C2 / 2.0, CG_WOLFE_C2)?)
}

/// Nonlinear conjugate gradient over line search `L` with the β-update
/// selected by `method`'s family.
///
/// Restarts every [`CG_RESTART_ITERS`] iterations or when successive
/// gradients stop being close to orthogonal.
pub fn build_conjugate_gradient<L, B>(
    linesearch: L, beta: B, opts: &EstimationParams,
) -> ConvergenceGuard<ConjugateGradient<L, B>> {
    let solver = ConjugateGradient::new(linesearch, beta)
        .restart_iters(CG_RESTART_ITERS)
        .restart_orthogonality(CG_RESTART_ORTHOGONALITY);
    ConvergenceGuard::new(solver, opts.tols.tol_grad, opts.tols.tol_cost)
}

/// Fletcher–Reeves CG with the More–Thuente search.
pub fn build_fletcher_reeves_more_thuente(
    opts: &EstimationParams,
) -> OptResult<ConvergenceGuard<ConjugateGradient<MoreThuenteLS, FletcherReeves>>> {
    Ok(build_conjugate_gradient(cg_more_thuente()?, FletcherReeves::new(), opts))
}

/// Fletcher–Reeves CG with the Hager–Zhang search.
pub fn build_fletcher_reeves_hager_zhang(
    opts: &EstimationParams,
) -> OptResult<ConvergenceGuard<ConjugateGradient<HagerZhangLS, FletcherReeves>>> {
    Ok(build_conjugate_gradient(cg_hager_zhang()?, FletcherReeves::new(), opts))
}

/// Polak–Ribière+ CG with the More–Thuente search.
pub fn build_polak_ribiere_more_thuente(
    opts: &EstimationParams,
) -> OptResult<ConvergenceGuard<ConjugateGradient<MoreThuenteLS, PolakRibierePlus>>> {
    Ok(build_conjugate_gradient(cg_more_thuente()?, PolakRibierePlus::new(), opts))
}

/// Polak–Ribière+ CG with the Hager–Zhang search.
pub fn build_polak_ribiere_hager_zhang(
    opts: &EstimationParams,
) -> OptResult<ConvergenceGuard<ConjugateGradient<HagerZhangLS, PolakRibierePlus>>> {
    Ok(build_conjugate_gradient(cg_hager_zhang()?, PolakRibierePlus::new(), opts))
}

/// L-BFGS with the Hager–Zhang line search.
///
/// Uses `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
pub fn build_lbfgs_hager_zhang(
    opts: &EstimationParams,
) -> OptResult<ConvergenceGuard<LbfgsHagerZhang>> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(HagerZhangLS::new(), mem);
    let solver = configure_lbfgs(lbfgs, opts)?;
    Ok(ConvergenceGuard::new(solver, opts.tols.tol_grad, opts.tols.tol_cost))
}

/// L-BFGS with the More–Thuente line search.
///
/// Uses `opts.lbfgs_mem` or [`DEFAULT_LBFGS_MEM`].
pub fn build_lbfgs_more_thuente(
    opts: &EstimationParams,
) -> OptResult<ConvergenceGuard<LbfgsMoreThuente>> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(MoreThuenteLS::new(), mem);
    let solver = configure_lbfgs(lbfgs, opts)?;
    Ok(ConvergenceGuard::new(solver, opts.tols.tol_grad, opts.tols.tol_cost))
}

/// configure_lbfgs — apply optional tolerances to an L-BFGS solver.
///
/// When a tolerance is `None`, the corresponding `with_tolerance_*` method
/// is not called and Argmin's default remains in effect.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &EstimationParams,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Nelder–Mead simplex around `theta0`.
///
/// Vertices are `θ₀` and `θ₀ + step_size · eᵢ` for every coordinate `i`.
/// The spread tolerance is `tol_cost` when set, else
/// [`DEFAULT_SIMPLEX_SD_TOL`]. The guard only records the trace here:
/// there is no gradient, and equal best costs across shrink steps are not
/// evidence of convergence.
pub fn build_nelder_mead(
    theta0: &Theta, opts: &EstimationParams,
) -> OptResult<ConvergenceGuard<Simplex>> {
    let simplex = initial_simplex(theta0, opts.step_size);
    let sd_tol = opts.tols.tol_cost.unwrap_or(DEFAULT_SIMPLEX_SD_TOL);
    let solver = Simplex::new(simplex).with_sd_tolerance(sd_tol)?;
    Ok(ConvergenceGuard::new(solver, None, None))
}

/// `θ₀` plus one vertex per coordinate displaced by `step`.
pub fn initial_simplex(theta0: &Theta, step: f64) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(theta0.len() + 1);
    vertices.push(theta0.clone());
    for i in 0..theta0.len() {
        let mut vertex = theta0.clone();
        vertex[i] += step;
        vertices.push(vertex);
    }
    vertices
}

/// Human-readable solver family, used in log fields.
pub fn method_label(method: Method) -> &'static str {
    match method {
        Method::NelderMead => "nelder-mead",
        Method::ConjugateFletcherReeves => "cg-fletcher-reeves",
        Method::Lbfgs => "lbfgs",
        Method::ConjugatePolakRibiere => "cg-polak-ribiere",
    }
}
