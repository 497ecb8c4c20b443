//! Adapter that exposes a user `LogLikelihood` as an `argmin` problem.
//!
//! We convert a *maximization* of a log-likelihood `ℓ(θ)` into a *minimization*
//! problem by defining the cost as `c(θ) = -ℓ̃(θ)`, where `ℓ̃` is the penalized
//! objective `ℓ(β′) − penalty` produced by the model's constraint set (see
//! [`crate::optimization::constraints`]). Without binding constraints
//! `ℓ̃ = ℓ` and analytic gradients (if provided by the user) are negated.
//! Otherwise we finite-difference the **cost** closure, so no sign flip is
//! needed in that branch.
//!
//! The adapter owns the model's per-estimation [`LogLikelihood::Context`].
//! It is created with the adapter and dropped with it, so cached
//! intermediates never outlive or leak between estimations.
use std::cell::RefCell;

use crate::optimization::{
    constraints::Penalized,
    errors::{OptError, OptResult},
    loglik_optimizer::{
        finite_diff::forward_gradient,
        traits::LogLikelihood,
        types::{Cost, Grad, Theta},
        validation::validate_grad,
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user `LogLikelihood` to `argmin`'s `CostFunction` and `Gradient`.
///
/// - `CostFunction::cost` returns `-(ℓ(β′) − penalty)`.
/// - `Gradient::gradient` returns:
///   - `-∇ℓ(θ)` if no constraint binds and the user provides an analytic
///     gradient, or
///   - a finite-difference gradient of the cost otherwise.
pub struct ArgMinAdapter<'a, F: LogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
    context: RefCell<F::Context>,
}

impl<'a, F: LogLikelihood> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the cost `c(θ) = -(ℓ(β′) − penalty)`.
    ///
    /// # Errors
    /// - Constraint validation errors.
    /// - Any `OptError` from the user's `value`.
    /// - `NonFiniteCost` if the penalized objective is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let penalized = self.f.constraints().apply(theta)?;
        let objective = self.penalized_value(theta, &penalized)?;
        Ok(-objective)
    }
}

impl<'a, F: LogLikelihood> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `θ`.
    ///
    /// Behavior:
    /// - A binding constraint means the surface is `ℓ(β′) − penalty`, which
    ///   the analytic `∇ℓ` does not describe; finite differences of the cost
    ///   are used.
    /// - Otherwise, if the user implements `grad`, we validate it and return
    ///   `-grad`.
    /// - Without an analytic gradient we finite-difference the cost: central
    ///   first, forward when a closure evaluation failed or the central
    ///   result does not validate.
    ///
    /// # Errors
    /// - Propagates user errors from `grad` (non-`GradientNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during FD.
    /// - Returns validation errors if the gradient has wrong dimension or
    ///   non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let penalized = self.f.constraints().apply(theta)?;
        if penalized.is_binding() {
            return Ok(self.fd_gradient(theta)?);
        }
        let analytic = {
            let mut ctx = self.context.borrow_mut();
            self.f.grad(theta, self.data, &mut ctx)
        };
        match analytic {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(-g)
            }
            Err(OptError::GradientNotImplemented) => Ok(self.fd_gradient(theta)?),
            Err(e) => Err(e.into()),
        }
    }
}

impl<'a, F: LogLikelihood> ArgMinAdapter<'a, F> {
    /// Construct a new adapter with a fresh per-estimation context.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data, context: RefCell::new(F::Context::default()) }
    }

    /// Un-penalized `ℓ` at the point the constraints would evaluate:
    /// the feasible substitute when a constraint binds, `θ` otherwise.
    ///
    /// Returns the evaluation point together with the value.
    pub fn log_likelihood(&self, theta: &Theta) -> OptResult<(Theta, f64)> {
        let penalized = self.f.constraints().apply(theta)?;
        let point = penalized.evaluation_point(theta).clone();
        let value = {
            let mut ctx = self.context.borrow_mut();
            self.f.value(&point, self.data, &mut ctx)?
        };
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value });
        }
        Ok((point, value))
    }

    /// Penalized objective `ℓ̃(θ)` and its gradient `∇ℓ̃(θ)` in
    /// log-likelihood units, using the model's joint evaluator when no
    /// constraint binds.
    pub fn value_and_gradient(&self, theta: &Theta) -> OptResult<(f64, Grad)> {
        let penalized = self.f.constraints().apply(theta)?;
        if !penalized.is_binding() {
            let joint = {
                let mut ctx = self.context.borrow_mut();
                self.f.value_and_grad(theta, self.data, &mut ctx)
            };
            match joint {
                Ok((value, grad)) => {
                    if !value.is_finite() {
                        return Err(OptError::NonFiniteCost { value });
                    }
                    validate_grad(&grad, theta.len())?;
                    return Ok((value, grad));
                }
                Err(OptError::GradientNotImplemented) => {}
                Err(e) => return Err(e),
            }
        }
        let value = self.penalized_value(theta, &penalized)?;
        let grad = -self.fd_gradient(theta)?;
        Ok((value, grad))
    }

    fn penalized_value(&self, theta: &Theta, penalized: &Penalized) -> OptResult<f64> {
        let point = penalized.evaluation_point(theta);
        let value = {
            let mut ctx = self.context.borrow_mut();
            self.f.value(point, self.data, &mut ctx)?
        };
        let objective = value - penalized.penalty;
        if !objective.is_finite() {
            return Err(OptError::NonFiniteCost { value: objective });
        }
        Ok(objective)
    }

    /// Finite-difference gradient of the cost with error capture.
    ///
    /// The FD closure must return `f64`, so we can’t use `?` inside it; we
    /// capture the first error in `closure_err` and return `NaN` from the
    /// closure, then retry with forward differences or surface the error.
    fn fd_gradient(&self, theta: &Theta) -> OptResult<Grad> {
        let dim = theta.len();
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_func = |theta: &Theta| -> f64 {
            match self.cost(theta) {
                Ok(val) => val,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let fd_grad = theta.central_diff(&cost_func);
        if closure_err.borrow().is_some() {
            return forward_gradient(theta, &cost_func, &closure_err);
        }
        match validate_grad(&fd_grad, dim) {
            Ok(()) => Ok(fd_grad),
            Err(_) => forward_gradient(theta, &cost_func, &closure_err),
        }
    }
}
