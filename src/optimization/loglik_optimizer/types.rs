//! Numeric aliases and concrete solver types for the optimizer.
//!
//! Vectors and matrices are `ndarray` containers over `f64`. `Cost` is the
//! minimized quantity `c(θ) = −ℓ̃(θ)`, the negated penalized
//! log-likelihood; everything above the adapter speaks in `ℓ`.
use argmin::solver::{
    conjugategradient::NonlinearConjugateGradient,
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    neldermead::NelderMead,
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ` (`β` for regression models, `μ` for rank data).
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, same shape as `Theta`.
pub type Grad = Array1<f64>;

/// Dense `n × n` Hessian for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

pub type Cost = f64;

/// Evaluation counters keyed by argmin's names (`"cost_count"`,
/// `"gradient_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;

/// Nonlinear conjugate gradient over line search `L` and β-update `B`.
pub type ConjugateGradient<L, B> = NonlinearConjugateGradient<Theta, L, B, Cost>;

/// Derivative-free simplex search.
pub type Simplex = NelderMead<Theta, Cost>;
