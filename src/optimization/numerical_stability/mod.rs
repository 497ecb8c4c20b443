//! numerical_stability — tail-safe normal functions and compensated sums.
//!
//! Purpose
//! -------
//! Collect the small numerical primitives that log-likelihood code leans on
//! so that model implementations can assume finite, well-conditioned `f64`
//! arithmetic even for extreme linear predictors or long datasets.
//!
//! Key behaviors
//! -------------
//! - Evaluate `Φ`, `ln Φ`, `ln φ` and the inverse Mills ratio without
//!   underflow in the far tails ([`normal`]).
//! - Accumulate per-observation log-likelihood terms with Neumaier's
//!   variant of Kahan compensation ([`summation::KahanSum`]).
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are finite `f64`; dataset validation happens upstream.
//! - `log_std_normal_cdf` is finite and non-positive for every finite input.
//!
//! Conventions
//! -----------
//! - Pure functions, no allocation, no logging.
//!
//! Testing notes
//! -------------
//! - Unit tests compare against naïve formulas on safe grids and check
//!   continuity across the asymptotic cutoff.

pub mod normal;
pub mod summation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::normal::{
    LOG_CDF_ASYMPTOTIC_CUTOFF, inverse_mills_ratio, log_std_normal_cdf, log_std_normal_pdf,
    std_normal_cdf,
};
pub use self::summation::KahanSum;

pub mod prelude {
    pub use super::normal::{inverse_mills_ratio, log_std_normal_cdf, std_normal_cdf};
    pub use super::summation::KahanSum;
}
