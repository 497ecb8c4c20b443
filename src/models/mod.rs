//! models — concrete statistical models for the estimation engine.
//!
//! - [`Probit`]: binary outcome with a normal link, fitted numerically,
//!   with an analytic gradient and a cached linear predictor.
//! - [`RankExponential`]: mean rank of rank-ordered counts, estimated in
//!   closed form, with a positivity constraint and a sampler.

pub mod probit;
pub mod rank_exponential;

pub use self::probit::{Probit, ProbitContext};
pub use self::rank_exponential::{MEAN_RANK_TOLERANCE, RankExponential};
