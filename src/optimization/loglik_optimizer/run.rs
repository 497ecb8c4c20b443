//! Execution helper that runs a guarded `argmin` solver on a log-likelihood
//! problem and returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Theta,
        adapter::ArgMinAdapter,
        convergence::{ConvergenceGuard, GradientNorm},
        traits::{EstimationParams, LogLikelihood, OptimOutcome},
    },
};
use argmin::core::{Executor, IterState, Solver, State};
use argmin_math::ArgminL2Norm;
use tracing::debug;

/// Run an `argmin` optimization for a log-likelihood problem.
///
/// This is the shared runner used by every method. It wires up:
/// - the user model via [`ArgMinAdapter`],
/// - the chosen solver wrapped in a [`ConvergenceGuard`],
/// - initial parameter `theta0`,
/// - optional observers (behind the `obs_slog` feature),
/// - optional `max_iters`,
///   then executes the solver and converts the result into [`OptimOutcome`].
///
/// # Type Parameters
/// - `F`: the log-likelihood type implementing [`LogLikelihood`].
/// - `S`: any `argmin` solver over `ArgMinAdapter<'a, F>` whose state is
///   `IterState<Theta, G, (), (), (), f64>`.
/// - `G`: the gradient slot of that state: `Grad` for gradient methods,
///   `()` for Nelder–Mead.
///
/// # Feature flags
/// If the `obs_slog` feature is enabled and `opts.verbose == true`, a terminal
/// slog observer is attached with `ObserverMode::Always`. Independently of the
/// feature, verbose runs emit a `debug` event with ℓ(θ₀) and, if available,
/// ‖∇ℓ(θ₀)‖ before the first iteration.
///
/// # Errors
/// - Propagates any `argmin` runtime error (solver errors, line-search
///   failures, model errors raised inside cost/gradient) via
///   `From<argmin::core::Error>`, which recovers the original `OptError`.
/// - Propagates validation errors encountered when constructing
///   [`OptimOutcome`].
pub fn run_solver<'a, F, S, G>(
    theta0: Theta, opts: &EstimationParams, problem: ArgMinAdapter<'a, F>,
    solver: ConvergenceGuard<S>,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: Solver<ArgMinAdapter<'a, F>, IterState<Theta, G, (), (), (), f64>> + Send + 'static,
    G: Clone + Send + Sync + 'static,
    IterState<Theta, G, (), (), (), f64>: GradientNorm,
{
    if opts.verbose {
        log_initial_state(&theta0, &problem);
    }
    let mut executor = Executor::new(problem, solver);
    executor = executor.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    if let Some(max_iter) = opts.tols.max_iter {
        executor = executor.configure(|state| state.max_iters(max_iter as u64));
    }

    let result = executor.run()?;
    let history = result.solver().history().to_vec();
    let mut state = result.state().clone();
    let iterations = state.get_iter();
    let function_counts = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    let grad_norm = state.gradient_norm();
    OptimOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        &termination,
        iterations,
        function_counts,
        grad_norm,
        history,
    )
}

// ---- Helper Methods ----

fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>)
where
    F: LogLikelihood,
{
    match problem.value_and_gradient(theta0) {
        Ok((ll0, g0)) => debug!(ll0, grad_norm = g0.l2_norm(), "initial state"),
        Err(err) => debug!(%err, "initial state not evaluable"),
    }
}
