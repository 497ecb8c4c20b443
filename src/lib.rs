//! constrained_mle — constrained maximum-likelihood estimation with pluggable
//! statistical models.
//!
//! Purpose
//! -------
//! Fit statistical models by maximizing their log-likelihood with standard
//! unconstrained optimizers, turning parameter constraints into penalties,
//! and report exactly the outputs each model promises.
//!
//! Key behaviors
//! -------------
//! - [`optimization`]: the Argmin-backed maximizer, the constraint/penalty
//!   transform, tail-safe numerics, and the crate-wide error type.
//! - [`inference`]: observed-information covariance and confidence levels.
//! - [`estimation`]: the [`estimation::Model`] trait, datasets, the
//!   capability [`estimation::Inventory`], the
//!   [`estimation::maximum_likelihood`] driver, and the
//!   [`estimation::Estimate`] result.
//! - [`models`]: reference models, [`models::Probit`] and
//!   [`models::RankExponential`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Every fallible public entry point returns
//!   [`optimization::errors::OptResult`]; library code does not panic on bad
//!   input.
//! - Estimations share no mutable state; independent fits may run on
//!   separate threads.
//!
//! Conventions
//! -----------
//! - Diagnostics go through `tracing`; the library never installs a
//!   subscriber. Enable the `obs_slog` feature and set
//!   `EstimationParams::verbose` for Argmin's per-iteration terminal log.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to the code; `tests/integration_mle_pipeline.rs`
//!   drives the public API end to end on simulated data.

pub mod estimation;
pub mod inference;
pub mod models;
pub mod optimization;

pub mod prelude {
    pub use crate::estimation::prelude::*;
    pub use crate::models::{Probit, RankExponential};
    pub use crate::optimization::prelude::*;
}
