//! Numerical derivatives used by the objective adapter and by covariance
//! estimation.
//!
//! - [`forward_gradient`]: the adapter's second attempt at a cost gradient,
//!   after a central sweep captured an evaluation error or produced a
//!   non-finite entry. Evaluation errors cannot cross `finitediff`'s
//!   `Fn(&Theta) -> f64` signature; closures park the first one in a
//!   `RefCell<Option<Error>>` and return `NaN`, and this module surfaces it.
//! - [`compute_hessian`]: differentiates a gradient map once more. Applied
//!   to the cost gradient at `θ̂` this is the observed information.
//!
//! Results are validated before they are returned.
use std::cell::RefCell;

use argmin::core::Error;
use finitediff::FiniteDiff;

use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        types::{Grad, Hessian, Theta},
        validation::{validate_grad, validate_hessian},
    },
};

/// Forward-difference gradient of `cost` at `theta`.
///
/// Clears `parked` before the sweep and reports whatever the closure parked
/// during it.
///
/// # Errors
/// - The parked evaluation error, converted into an `OptError`.
/// - `GradientDimMismatch` / `InvalidGradient` from [`validate_grad`].
///
/// # Examples
/// ```rust
/// # use std::cell::RefCell;
/// # use ndarray::array;
/// # use constrained_mle::optimization::loglik_optimizer::{Theta, finite_diff::forward_gradient};
/// let parked = RefCell::new(None);
/// let cost = |t: &Theta| t[0] - 3.0 * t[1];
/// let grad = forward_gradient(&array![1.0, -2.0], &cost, &parked).unwrap();
/// assert!((grad[1] + 3.0).abs() < 1e-6);
/// ```
pub fn forward_gradient<C: Fn(&Theta) -> f64>(
    theta: &Theta, cost: &C, parked: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    parked.replace(None);
    let grad = theta.forward_diff(cost);
    if let Some(err) = parked.take() {
        return Err(err.into());
    }
    validate_grad(&grad, theta.len())?;
    Ok(grad)
}

/// Jacobian of the gradient map `grad_fn` at `theta`, symmetrized.
///
/// Central differences first; if that matrix fails validation the forward
/// scheme is used, and its validation error is the one reported.
///
/// # Errors
/// - `HessianDimMismatch` / `InvalidHessian` from [`validate_hessian`].
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(grad_fn: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let central = theta.central_hessian(grad_fn);
    let mut hessian = match validate_hessian(&central, dim) {
        Ok(()) => central,
        Err(_) => {
            let forward = theta.forward_hessian(grad_fn);
            validate_hessian(&forward, dim)?;
            forward
        }
    };
    symmetrize(&mut hessian);
    Ok(hessian)
}

/// Replace each off-diagonal pair by its mean.
fn symmetrize(m: &mut Hessian) {
    let n = m.nrows();
    for i in 1..n {
        for j in 0..i {
            let mean = 0.5 * (m[[i, j]] + m[[j, i]]);
            m[[i, j]] = mean;
            m[[j, i]] = mean;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::errors::OptError;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Forward gradients of a smooth cost, parked-error propagation, and
    //   rejection of non-finite sweeps.
    // - Observed information of a Gaussian log-likelihood and the symmetry
    //   of the returned matrix.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The forward gradient of a Gaussian negative log-likelihood matches
    // its analytic derivative.
    //
    // Given
    // -----
    // - c(μ) = ½ Σ (yᵢ − μ)² with y = [1, 2, 6], at μ = 2.
    //
    // Expect
    // ------
    // - c'(2) = Σ (μ − yᵢ) = −3, within 1e-5.
    fn forward_gradient_matches_gaussian_score() {
        // Arrange
        let y = [1.0, 2.0, 6.0];
        let cost = |t: &Theta| 0.5 * y.iter().map(|v| (v - t[0]).powi(2)).sum::<f64>();
        let parked = RefCell::new(None);

        // Act
        let grad = forward_gradient(&array![2.0], &cost, &parked).expect("gradient");

        // Assert
        assert!((grad[0] + 3.0).abs() < 1e-5, "grad = {grad}");
    }

    #[test]
    // Purpose
    // -------
    // An error parked by the cost closure is reported instead of the NaN
    // gradient it produced.
    //
    // Given
    // -----
    // - A cost that parks `DomainViolation` whenever θ₀ ≤ 0, evaluated at 0.
    //
    // Expect
    // ------
    // - `Err(OptError::DomainViolation { .. })`.
    fn forward_gradient_reports_parked_error() {
        // Arrange
        let parked: RefCell<Option<Error>> = RefCell::new(None);
        let cost = |t: &Theta| {
            if t[0] <= 0.0 {
                let err = OptError::DomainViolation {
                    index: 0,
                    value: t[0],
                    reason: "scale must be positive",
                };
                parked.borrow_mut().get_or_insert(err.into());
                return f64::NAN;
            }
            t[0].ln()
        };

        // Act
        let result = forward_gradient(&array![0.0], &cost, &parked);

        // Assert
        assert!(matches!(result, Err(OptError::DomainViolation { index: 0, .. })));
    }

    #[test]
    // Purpose
    // -------
    // A sweep that yields NaN without parking an error is still rejected.
    //
    // Given
    // -----
    // - A cost that is NaN everywhere.
    //
    // Expect
    // ------
    // - `Err(OptError::InvalidGradient { .. })`.
    fn forward_gradient_rejects_non_finite_sweep() {
        let parked = RefCell::new(None);
        let result = forward_gradient(&array![0.5, 0.5], &|_: &Theta| f64::NAN, &parked);
        assert!(matches!(result, Err(OptError::InvalidGradient { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Differentiating the cost gradient of a bivariate Gaussian mean model
    // gives its information matrix.
    //
    // Given
    // -----
    // - ∇c(θ) = A θ − b with A = [[4, 1], [1, 3]] (n-weighted precision).
    //
    // Expect
    // ------
    // - The Hessian equals A within 1e-6 and is exactly symmetric.
    fn hessian_of_linear_score_is_information_matrix() {
        // Arrange
        let a = array![[4.0, 1.0], [1.0, 3.0]];
        let b = array![0.5, -1.0];
        let grad_fn = |t: &Theta| -> Grad { a.dot(t) - &b };

        // Act
        let h = compute_hessian(&grad_fn, &array![0.3, 0.7]).expect("hessian");

        // Assert
        for ((i, j), v) in h.indexed_iter() {
            assert!((v - a[[i, j]]).abs() < 1e-6, "h[{i},{j}] = {v}");
        }
        assert_eq!(h[[0, 1]], h[[1, 0]]);
    }

    #[test]
    // Purpose
    // -------
    // Asymmetric finite-difference noise is averaged away.
    //
    // Given
    // -----
    // - A gradient map whose Jacobian is [[2, 1], [0, 2]].
    //
    // Expect
    // ------
    // - Off-diagonal entries both ≈ 0.5; diagonal ≈ 2.
    fn hessian_is_symmetrized() {
        let grad_fn = |t: &Theta| -> Grad { array![2.0 * t[0] + t[1], 2.0 * t[1]] };
        let h = compute_hessian(&grad_fn, &array![1.0, 1.0]).expect("hessian");
        assert!((h[[0, 1]] - 0.5).abs() < 1e-6 && h[[0, 1]] == h[[1, 0]]);
        assert!((h[[0, 0]] - 2.0).abs() < 1e-6 && (h[[1, 1]] - 2.0).abs() < 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // A gradient map that is NaN everywhere fails both schemes.
    //
    // Given
    // -----
    // - grad_fn(θ) = [NaN].
    //
    // Expect
    // ------
    // - `Err(OptError::InvalidHessian { .. })`.
    fn hessian_rejects_non_finite_gradient_map() {
        let grad_fn = |_: &Theta| Array1::from_elem(1, f64::NAN);
        let result = compute_hessian(&grad_fn, &array![0.0]);
        assert!(matches!(result, Err(OptError::InvalidHessian { .. })));
    }
}
