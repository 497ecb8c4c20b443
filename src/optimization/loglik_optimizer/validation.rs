//! Input and output checks for the optimizer.
//!
//! Configuration values (tolerances, simplex edge) must be finite and
//! strictly positive. Vectors and matrices crossing the solver boundary
//! (`θ₀`, gradients, Hessians, `θ̂`) must have the expected shape and only
//! finite entries. Every check reports the first offending value through a
//! dedicated [`OptError`] variant.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::{Grad, Hessian, Theta},
};

/// `Err(reason)` unless `x` is finite and strictly positive.
fn positive_finite(x: f64) -> Result<(), &'static str> {
    if !x.is_finite() {
        Err("must be finite")
    } else if x <= 0.0 {
        Err("must be positive")
    } else {
        Ok(())
    }
}

/// `None` disables the gradient-norm rule.
///
/// # Errors
/// [`OptError::InvalidTolGrad`] for non-finite or non-positive values.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) => positive_finite(tol).map_err(|reason| OptError::InvalidTolGrad { tol, reason }),
        None => Ok(()),
    }
}

/// `None` disables the relative cost-change rule.
///
/// # Errors
/// [`OptError::InvalidTolCost`] for non-finite or non-positive values.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    match tol {
        Some(tol) => positive_finite(tol).map_err(|reason| OptError::InvalidTolCost { tol, reason }),
        None => Ok(()),
    }
}

/// # Errors
/// [`OptError::InvalidStepSize`] for non-finite or non-positive values.
pub fn verify_step_size(step: f64) -> OptResult<()> {
    positive_finite(step).map_err(|reason| OptError::InvalidStepSize { step, reason })
}

/// Validate a starting point against the resolved parameter count.
///
/// # Errors
/// - [`OptError::ParameterCountMismatch`] if `theta0.len() != dim`.
/// - [`OptError::InvalidStartingPoint`] for the first non-finite entry.
pub fn validate_starting_point(theta0: &Theta, dim: usize) -> OptResult<()> {
    if theta0.len() != dim {
        return Err(OptError::ParameterCountMismatch { expected: dim, actual: theta0.len() });
    }
    if let Some((index, &value)) = theta0.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidStartingPoint { index, value });
    }
    Ok(())
}

/// Gradient of length `dim` with finite entries.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] on a length mismatch.
/// - [`OptError::InvalidGradient`] for the first non-finite entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match grad.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(OptError::InvalidGradient {
            index,
            value,
            reason: "gradient entries must be finite",
        }),
        None => Ok(()),
    }
}

/// Take the solver's best parameter vector, rejecting a missing or
/// non-finite one.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] when the solver kept no best point.
/// - [`OptError::InvalidThetaHat`] for the first non-finite entry.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value,
            reason: "parameter estimates must be finite",
        });
    }
    Ok(theta)
}

/// # Errors
/// [`OptError::NonFiniteCost`] for `NaN` or `±∞`.
pub fn validate_value(value: f64) -> OptResult<()> {
    if value.is_finite() { Ok(()) } else { Err(OptError::NonFiniteCost { value }) }
}

/// Square `dim × dim` matrix with finite entries.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] on a shape mismatch.
/// - [`OptError::InvalidHessian`] for the first non-finite entry.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    match hessian.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => Err(OptError::InvalidHessian { row, col, value }),
        None => Ok(()),
    }
}
