//! inference — post-estimation uncertainty for fitted parameters.
//!
//! Purpose
//! -------
//! Provide the covariance and confidence computations that an estimate
//! reports on top of a point estimate `θ̂`.
//!
//! Key behaviors
//! -------------
//! - Build the observed information `J(θ̂)` from a cost-gradient callback and
//!   invert it via Cholesky ([`observed_information_covariance`]).
//! - Summarize parameters by standard errors and two-sided confidence
//!   levels ([`standard_errors`], [`confidence_levels`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Gradients are on the total negative log-likelihood scale at the
//!   reported (feasible) parameter vector.
//! - Failures are reported as `OptError` values; the estimation driver
//!   downgrades them to a covariance status instead of failing the fit.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`covariance`] check quadratic objectives with known
//!   inverses, indefinite information, and callback error capture.

pub mod covariance;

pub use self::covariance::{
    confidence_levels, invert_information, observed_information_covariance, standard_errors,
};

pub mod prelude {
    pub use super::covariance::{confidence_levels, observed_information_covariance};
}
