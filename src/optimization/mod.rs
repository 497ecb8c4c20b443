//! optimization — MLE stack, constraint penalties, numerical helpers, and
//! unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for model fitting, combining an
//! Argmin-backed log-likelihood optimizer, a penalty transform for
//! constrained parameters, numerically stable primitives, and a single
//! error/result surface. Callers implement a log-likelihood, choose a
//! method and tolerances, and obtain fitted parameters and diagnostics
//! without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`), including method selection and stopping
//!   criteria.
//! - Convert constrained problems into unconstrained ones (`constraints`):
//!   an infeasible `θ` is evaluated at a feasible substitute and charged a
//!   penalty.
//! - Supply shared numerical primitives (`numerical_stability`): tail-safe
//!   normal functions and compensated summation.
//! - Normalize configuration issues, data problems, numerical failures, and
//!   backend solver errors into a single enum (`errors::OptError`) with a
//!   common result alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Invalid states are reported as `OptError`, not panics.
//! - Model domain violations (e.g. a non-positive scale) surface as
//!   recoverable errors through the optimization layer.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize `ℓ(θ)` by minimizing an internal cost
//!   `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are expressed in terms
//!   of `ℓ`.
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - Logging is limited to `tracing` events from the runner; no I/O.
//!
//! Downstream usage
//! ----------------
//! - Model code implements `LogLikelihood` and, if needed, returns a
//!   `ConstraintSet` from `LogLikelihood::constraints`.
//! - The estimation driver calls `maximize` and reads the `OptimOutcome`.
//! - Front-ends typically import the curated surface via
//!   `optimization::prelude::*`.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns: solver wiring and
//!   stopping rules, penalty composition, tail behavior of the normal
//!   helpers, and error conversions.

pub mod constraints;
pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use constrained_mle::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::constraints::{Constraint, ConstraintCheck, ConstraintSet, LowerBound};
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
