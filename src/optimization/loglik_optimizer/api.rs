//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! This selects the solver named by [`EstimationParams::method`] (and, for
//! gradient methods, the line search), wraps the model in an `ArgMinAdapter`
//! (which *minimizes* `-ℓ̃(θ)`), and delegates the run to `run_solver`.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{
            build_fletcher_reeves_hager_zhang, build_fletcher_reeves_more_thuente,
            build_lbfgs_hager_zhang, build_lbfgs_more_thuente, build_nelder_mead,
            build_polak_ribiere_hager_zhang, build_polak_ribiere_more_thuente, initial_simplex,
        },
        run::run_solver,
        traits::{EstimationParams, LineSearcher, LogLikelihood, Method},
    },
};
use argmin::core::CostFunction;

/// Maximize a log-likelihood `ℓ(θ)` with the configured method.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Applies the model's constraints once at `θ₀`, so a malformed
///   constraint is reported before any solver work.
/// - Wraps `(f, data)` in an `ArgMinAdapter` that exposes a *minimization*
///   problem `c(θ) = -(ℓ(β′) − penalty)` to `argmin`.
/// - Builds the solver for `opts.method`: Nelder–Mead, L-BFGS, or nonlinear
///   CG with the Fletcher–Reeves or Polak–Ribière+ update; gradient methods
///   use the line search in `opts.line_searcher`.
/// - For Nelder–Mead, evaluates every vertex of the initial simplex first,
///   so a vertex the model cannot evaluate is returned as an error.
/// - Calls `run_solver`, which configures the executor (initial params,
///   max iters, optional observers) and returns an `OptimOutcome`.
///
/// # Errors
/// - Propagates any error from `f.check` or from constraint validation.
/// - Propagates the first error raised while evaluating the initial
///   Nelder–Mead simplex.
/// - Propagates builder errors.
/// - Propagates runtime errors from `run_solver` (e.g., line search
///   failures or model domain errors).
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use constrained_mle::optimization::errors::OptResult;
/// use constrained_mle::optimization::loglik_optimizer::{
///     EstimationParams, LogLikelihood, Theta, maximize,
/// };
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     type Context = ();
///     fn value(&self, theta: &Theta, _: &(), _: &mut ()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.1, -0.2, 0.3], &(), &EstimationParams::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), constrained_mle::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &EstimationParams,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    f.constraints().apply(&theta0)?;
    let problem = ArgMinAdapter::new(f, data);
    match (opts.method, opts.line_searcher) {
        (Method::NelderMead, _) => {
            check_simplex(&problem, &theta0, opts.step_size)?;
            let solver = build_nelder_mead(&theta0, opts)?;
            run_solver(theta0, opts, problem, solver)
        }
        (Method::Lbfgs, LineSearcher::MoreThuente) => {
            let solver = build_lbfgs_more_thuente(opts)?;
            run_solver(theta0, opts, problem, solver)
        }
        (Method::Lbfgs, LineSearcher::HagerZhang) => {
            let solver = build_lbfgs_hager_zhang(opts)?;
            run_solver(theta0, opts, problem, solver)
        }
        (Method::ConjugateFletcherReeves, LineSearcher::MoreThuente) => {
            let solver = build_fletcher_reeves_more_thuente(opts)?;
            run_solver(theta0, opts, problem, solver)
        }
        (Method::ConjugateFletcherReeves, LineSearcher::HagerZhang) => {
            let solver = build_fletcher_reeves_hager_zhang(opts)?;
            run_solver(theta0, opts, problem, solver)
        }
        (Method::ConjugatePolakRibiere, LineSearcher::MoreThuente) => {
            let solver = build_polak_ribiere_more_thuente(opts)?;
            run_solver(theta0, opts, problem, solver)
        }
        (Method::ConjugatePolakRibiere, LineSearcher::HagerZhang) => {
            let solver = build_polak_ribiere_hager_zhang(opts)?;
            run_solver(theta0, opts, problem, solver)
        }
    }
}

/// Argmin's simplex setup cannot report a vertex it fails to evaluate, so
/// every vertex is costed here and the first error is returned.
fn check_simplex<F: LogLikelihood>(
    problem: &ArgMinAdapter<'_, F>, theta0: &Theta, step: f64,
) -> OptResult<()> {
    for vertex in initial_simplex(theta0, step) {
        problem.cost(&vertex)?;
    }
    Ok(())
}
