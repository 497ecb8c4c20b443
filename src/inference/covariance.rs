//! inference::covariance — observed-information covariance and confidence.
//!
//! Purpose
//! -------
//! Turn a cost-gradient callback at the optimum into the parameter
//! covariance `Σ̂ = J(θ̂)⁻¹`, where `J` is the observed information (the
//! Hessian of the negative log-likelihood), and summarize each parameter by
//! a two-sided confidence level.
//!
//! Key behaviors
//! -------------
//! - Build `J(θ̂)` with [`compute_hessian`] (central differences of the
//!   gradient, symmetrized and validated upstream).
//! - Copy `J` into a `nalgebra::DMatrix` and invert it through a Cholesky
//!   factorization; a failed factorization means `J` is not positive
//!   definite and is reported as [`OptError::NotPositiveDefinite`].
//! - Report `confidenceᵢ = 2Φ(|βᵢ| / seᵢ) − 1` with `seᵢ = √Σ̂ᵢᵢ`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The gradient callback is on the **total** (not average) negative
//!   log-likelihood scale, so `Σ̂` needs no further rescaling.
//! - Errors raised inside the callback are captured and surfaced in place
//!   of the Hessian validation error they would otherwise cause.
//!
//! Conventions
//! -----------
//! - No pseudo-inverse: an indefinite or singular information matrix means
//!   no covariance at all. Callers decide whether that is fatal.
use std::cell::RefCell;

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, finite_diff::compute_hessian},
    numerical_stability::std_normal_cdf,
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Covariance `J(θ̂)⁻¹` from a fallible cost-gradient callback.
///
/// # Errors
/// - The first error returned by `cost_grad` while differencing.
/// - Hessian validation errors from [`compute_hessian`].
/// - [`OptError::NotPositiveDefinite`] when `J(θ̂)` has no Cholesky factor.
pub fn observed_information_covariance<F>(cost_grad: F, theta_hat: &Theta) -> OptResult<Array2<f64>>
where
    F: Fn(&Theta) -> OptResult<Grad>,
{
    let dim = theta_hat.len();
    let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
    let grad_fn = |theta: &Theta| -> Grad {
        match cost_grad(theta) {
            Ok(g) => g,
            Err(e) => {
                let mut slot = closure_err.borrow_mut();
                if slot.is_none() {
                    *slot = Some(e);
                }
                Array1::from_elem(dim, f64::NAN)
            }
        }
    };
    let hessian = compute_hessian(&grad_fn, theta_hat);
    if let Some(err) = closure_err.borrow_mut().take() {
        return Err(err);
    }
    invert_information(&hessian?)
}

/// Invert a symmetric positive-definite information matrix.
///
/// # Errors
/// - [`OptError::NotPositiveDefinite`] when the Cholesky factorization
///   fails.
pub fn invert_information(information: &Array2<f64>) -> OptResult<Array2<f64>> {
    let dim = information.nrows();
    let mut info_nalg = DMatrix::<f64>::zeros(dim, information.ncols());
    fill_dmatrix(information, &mut info_nalg);
    let cholesky = info_nalg.cholesky().ok_or(OptError::NotPositiveDefinite { dim })?;
    let inverse = cholesky.inverse();
    Ok(Array2::from_shape_fn((dim, dim), |(i, j)| inverse[(i, j)]))
}

/// Standard errors `√Σ̂ᵢᵢ`.
pub fn standard_errors(covariance: &Array2<f64>) -> Array1<f64> {
    covariance.diag().mapv(f64::sqrt)
}

/// Two-sided confidence `2Φ(|βᵢ|/seᵢ) − 1` that each parameter is nonzero.
///
/// Entries with a non-positive or non-finite standard error are `NaN`.
pub fn confidence_levels(theta: &Theta, covariance: &Array2<f64>) -> Array1<f64> {
    let se = standard_errors(covariance);
    Array1::from_iter(theta.iter().zip(se.iter()).map(|(&beta, &s)| {
        if s.is_finite() && s > 0.0 {
            2.0 * std_normal_cdf(beta.abs() / s) - 1.0
        } else {
            f64::NAN
        }
    }))
}

// ---- Helper methods ----

fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    for ((i, j), &value) in src.indexed_iter() {
        dst[(i, j)] = value;
    }
}
