//! loglik_optimizer::convergence — uniform stopping rules across solvers.
//!
//! Argmin's solvers disagree on which stopping rules they implement:
//! L-BFGS checks gradient norm and cost change, nonlinear conjugate gradient
//! checks nothing, Nelder–Mead checks the simplex spread. [`ConvergenceGuard`]
//! wraps any of them, delegates the actual iteration, and adds the two rules
//! every gradient method should honor:
//!
//! - `‖∇c(θ)‖ < tol_grad`, and
//! - `|ℓₖ − ℓₖ₋₁| ≤ tol_cost · max(1, |ℓₖ|)` over accepted iterates.
//!
//! Both rules terminate with `TerminationReason::SolverConverged`. The
//! iteration cap stays with the executor and is reported as
//! `MaxItersReached`, which the outcome maps to "not converged".
//!
//! The guard also records the objective after initialization and after
//! every iteration, which is what the estimate exposes as its history.
use crate::optimization::loglik_optimizer::types::{Cost, Grad, Theta};
use argmin::core::{
    Error, IterState, KV, Problem, Solver, State, TerminationReason, TerminationStatus,
};
use argmin_math::ArgminL2Norm;

/// Read access to the last gradient norm, when the state carries one.
pub trait GradientNorm {
    fn gradient_norm(&self) -> Option<f64>;
}

impl GradientNorm for IterState<Theta, Grad, (), (), (), Cost> {
    fn gradient_norm(&self) -> Option<f64> {
        self.get_gradient().map(|g| g.l2_norm())
    }
}

impl GradientNorm for IterState<Theta, (), (), (), (), Cost> {
    fn gradient_norm(&self) -> Option<f64> {
        None
    }
}

/// Solver wrapper adding gradient-norm and relative cost-change stopping
/// rules and recording the objective trace.
#[derive(Debug, Clone)]
pub struct ConvergenceGuard<S> {
    inner: S,
    tol_grad: Option<f64>,
    tol_cost: Option<f64>,
    history: Vec<f64>,
}

impl<S> ConvergenceGuard<S> {
    pub fn new(inner: S, tol_grad: Option<f64>, tol_cost: Option<f64>) -> Self {
        Self { inner, tol_grad, tol_cost, history: Vec::new() }
    }

    /// Objective `ℓ` (penalized) after init and after each iteration.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    fn record(&mut self, cost: Cost) {
        if cost.is_finite() {
            self.history.push(-cost);
        }
    }

    fn cost_change_converged(&self) -> bool {
        let Some(tol) = self.tol_cost else {
            return false;
        };
        match self.history.as_slice() {
            [.., prev, last] => (last - prev).abs() <= tol * last.abs().max(1.0),
            _ => false,
        }
    }
}

impl<O, S, I> Solver<O, I> for ConvergenceGuard<S>
where
    S: Solver<O, I>,
    I: State<Float = Cost> + GradientNorm,
{
    const NAME: &'static str = S::NAME;

    fn init(&mut self, problem: &mut Problem<O>, state: I) -> Result<(I, Option<KV>), Error> {
        let (state, kv) = self.inner.init(problem, state)?;
        self.record(state.get_cost());
        Ok((state, kv))
    }

    fn next_iter(&mut self, problem: &mut Problem<O>, state: I) -> Result<(I, Option<KV>), Error> {
        let (state, kv) = self.inner.next_iter(problem, state)?;
        self.record(state.get_cost());
        Ok((state, kv))
    }

    fn terminate(&mut self, state: &I) -> TerminationStatus {
        let inner = self.inner.terminate(state);
        if inner.terminated() {
            return inner;
        }
        let grad_converged = match (self.tol_grad, state.gradient_norm()) {
            (Some(tol), Some(norm)) => norm < tol,
            _ => false,
        };
        if grad_converged || self.cost_change_converged() {
            return TerminationStatus::Terminated(TerminationReason::SolverConverged);
        }
        TerminationStatus::NotTerminated
    }
}
