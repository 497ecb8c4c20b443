//! Rank-exponential — exponential model for rank-ordered count data.
//!
//! Column `k` of the dataset holds the counts (or weights) observed at rank
//! `k = 0, 1, …`; rows are observational units and are pooled. The single
//! parameter is the mean rank `μ > 0`, with
//!
//! ```text
//! ℓ(μ)   = Σ_k Σ_i x_ik (−ln μ − k/μ)
//! ∂ℓ/∂μ  = Σ_k Σ_i x_ik (k/μ² − 1/μ)
//! ```
//!
//! The maximizer is the count-weighted mean rank, so [`Model::estimate`] is
//! overridden with the closed form and never runs the optimizer. The
//! likelihood, gradient, and `μ > 0` constraint are still exposed, which is
//! what the closed-form covariance and any explicit numerical fit use.
use ndarray::array;
use rand::Rng;
use rand_distr::{Distribution, Exp1};
use tracing::info_span;

use crate::{
    estimation::{
        dataset::Dataset,
        driver::assemble,
        estimate::{Estimate, EstimateStatus},
        inventory::Inventory,
        model::{Model, ParameterCount, Sampler},
    },
    optimization::{
        constraints::{ConstraintSet, LowerBound},
        errors::{OptError, OptResult},
        loglik_optimizer::{EstimationParams, Grad, LogLikelihood, Theta},
        numerical_stability::KahanSum,
    },
};

/// Feasibility margin used when `μ` is pushed back above zero.
pub const MEAN_RANK_TOLERANCE: f64 = 1e10 * f64::EPSILON;

/// Rank-exponential model with the `μ > 0` constraint.
#[derive(Debug)]
pub struct RankExponential {
    constraints: ConstraintSet,
}

impl RankExponential {
    pub fn new() -> Self {
        Self {
            constraints: ConstraintSet::new().with(LowerBound::new(0, 0.0, MEAN_RANK_TOLERANCE)),
        }
    }

    /// Closed-form maximizer `Σ_k k·colsum_k / Σ_k colsum_k`.
    ///
    /// # Errors
    /// - `NegativeCount` for any negative cell.
    /// - `DegenerateEstimate` when all counts are zero or every count sits
    ///   at rank 0.
    pub fn mean_rank(data: &Dataset) -> OptResult<f64> {
        validate_counts(data)?;
        let (total, weighted) = sufficient_statistics(data);
        if total == 0.0 {
            return Err(OptError::DegenerateEstimate { reason: "all counts are zero" });
        }
        let mu = weighted / total;
        if mu == 0.0 {
            return Err(OptError::DegenerateEstimate { reason: "every count is at rank 0" });
        }
        Ok(mu)
    }
}

impl Default for RankExponential {
    fn default() -> Self {
        Self::new()
    }
}

impl LogLikelihood for RankExponential {
    type Data = Dataset;
    type Context = ();

    fn value(&self, theta: &Theta, data: &Dataset, _: &mut ()) -> OptResult<f64> {
        let mu = positive_mean(theta)?;
        let (total, weighted) = sufficient_statistics(data);
        Ok(-total * mu.ln() - weighted / mu)
    }

    /// # Errors
    /// - `ParameterCountMismatch` unless `θ` has exactly one entry.
    /// - `NegativeCount` for any negative cell.
    fn check(&self, theta: &Theta, data: &Dataset) -> OptResult<()> {
        if theta.len() != 1 {
            return Err(OptError::ParameterCountMismatch { expected: 1, actual: theta.len() });
        }
        validate_counts(data)
    }

    fn grad(&self, theta: &Theta, data: &Dataset, _: &mut ()) -> OptResult<Grad> {
        let mu = positive_mean(theta)?;
        let (total, weighted) = sufficient_statistics(data);
        Ok(array![weighted / (mu * mu) - total / mu])
    }

    fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }
}

impl Model for RankExponential {
    fn name(&self) -> &str {
        "rank_exponential"
    }

    fn parameter_count(&self) -> ParameterCount {
        ParameterCount::Fixed(1)
    }

    fn inventory(&self) -> Inventory {
        Inventory {
            parameters: true,
            covariance: true,
            confidence: true,
            log_likelihood: true,
            ..Inventory::none()
        }
    }

    fn estimate(
        &self, data: &Dataset, request: Inventory, _params: &EstimationParams,
    ) -> OptResult<Estimate> {
        let _span = info_span!("closed_form_estimate", model = self.name()).entered();
        let mu = Self::mean_rank(data)?;
        let filtered = request.filter(self.inventory());
        assemble(self, data, filtered, &array![mu], EstimateStatus::closed_form())
    }
}

/// Draws are `μ · E` with `E ~ Exp(1)`.
impl Sampler for RankExponential {
    fn draw<R: Rng + ?Sized>(&self, theta: &Theta, rng: &mut R) -> OptResult<f64> {
        let mu = positive_mean(theta)?;
        let e: f64 = Exp1.sample(rng);
        Ok(mu * e)
    }
}

// ---- Helper methods ----

fn positive_mean(theta: &Theta) -> OptResult<f64> {
    if theta.len() != 1 {
        return Err(OptError::ParameterCountMismatch { expected: 1, actual: theta.len() });
    }
    let mu = theta[0];
    if mu <= 0.0 {
        return Err(OptError::DomainViolation {
            index: 0,
            value: mu,
            reason: "mean rank must be positive",
        });
    }
    Ok(mu)
}

/// `(Σ_k colsum_k, Σ_k k·colsum_k)`.
fn sufficient_statistics(data: &Dataset) -> (f64, f64) {
    let mut total = KahanSum::new();
    let mut weighted = KahanSum::new();
    for (k, col) in data.matrix().columns().into_iter().enumerate() {
        let colsum: f64 = col.iter().copied().collect::<KahanSum>().sum();
        total.add(colsum);
        weighted.add(k as f64 * colsum);
    }
    (total.sum(), weighted.sum())
}

fn validate_counts(data: &Dataset) -> OptResult<()> {
    match data.matrix().indexed_iter().find(|(_, v)| **v < 0.0) {
        Some(((row, col), &value)) => Err(OptError::NegativeCount { row, col, value }),
        None => Ok(()),
    }
}
