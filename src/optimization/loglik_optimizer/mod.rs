//! loglik_optimizer — argmin-powered maximizer for penalized log-likelihoods.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], and invoke [`maximize`] to run the configured method
//! (Nelder–Mead, nonlinear conjugate gradient, or L-BFGS) with tolerances,
//! constraint penalties, and finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied log-likelihoods into Argmin-compatible cost
//!   functions `c(θ) = -(ℓ(β′) − penalty)` via [`adapter::ArgMinAdapter`].
//! - Expose a single entrypoint [`maximize`] that:
//!   - validates the initial guess with [`LogLikelihood::check`],
//!   - selects a solver via [`builders`] based on [`Method`] and
//!     [`LineSearcher`],
//!   - wraps it in a [`convergence::ConvergenceGuard`] so every method
//!     honors the same tolerances,
//!   - executes it via [`run::run_solver`], and
//!   - normalizes results into an [`OptimOutcome`].
//! - Provide finite-difference helpers in [`finite_diff`] for gradients and
//!   Hessians when analytic derivatives are missing or a constraint binds.
//! - Centralize configuration ([`Tolerances`], [`EstimationParams`]) and
//!   validation logic ([`validation`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** `ℓ(θ)` by minimizing `c(θ)`; models
//!   implement `ℓ(θ)` and `∇ℓ(θ)` (when available), **never** the cost.
//! - [`LogLikelihood::value`] and [`LogLikelihood::grad`] report invalid
//!   inputs as recoverable [`OptError`](crate::optimization::errors::OptError)
//!   values, not panics.
//! - Each call to [`maximize`] owns a fresh [`LogLikelihood::Context`];
//!   nothing persists between calls, so concurrent estimations on distinct
//!   inputs are independent.
//!
//! Conventions
//! -----------
//! - Gradients exposed by [`LogLikelihood::grad`] are for the
//!   log-likelihood; the adapter flips signs for the cost.
//! - [`OptimOutcome::value`] and [`OptimOutcome::history`] are expressed in
//!   terms of the (penalized) log-likelihood.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover sign conventions and constraint
//!   handling in [`adapter`], solver construction in [`builders`], stopping
//!   rules in [`convergence`], finite-difference and validation behavior,
//!   and configuration invariants in [`traits`].
//! - [`api`] tests run every method on toy objectives.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod convergence;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{
    DEFAULT_STEP_SIZE, EstimationParams, LineSearcher, LogLikelihood, Method, OptimOutcome,
    Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use constrained_mle::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{
        EstimationParams, LineSearcher, LogLikelihood, Method, OptimOutcome, Tolerances,
    };
    pub use super::types::{Cost, Grad, Theta};
}
