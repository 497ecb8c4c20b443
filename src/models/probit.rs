//! Probit — binary-choice model with a normal link.
//!
//! Data layout
//! -----------
//! Column 0 holds the 0/1 outcome; columns `1..` are covariates (include a
//! column of ones for an intercept). One parameter per covariate.
//!
//! Likelihood
//! ----------
//! With `ηᵢ = xᵢᵀβ`, an outcome of 0 contributes `ln Φ(ηᵢ)` and an outcome
//! of 1 contributes `ln(1 − Φ(ηᵢ)) = ln Φ(−ηᵢ)`. The score is
//! `Σᵢ xᵢ λ(ηᵢ)` for outcome 0 and `−Σᵢ xᵢ λ(−ηᵢ)` for outcome 1, where `λ`
//! is the inverse Mills ratio. Both use the tail-safe helpers from
//! `numerical_stability`, so separable data cannot drive them to `±∞`.
//!
//! Caching
//! -------
//! The linear predictor `Xβ` is kept in a [`ProbitContext`] owned by the
//! estimation in flight. It records the `β` and row count it was built for
//! and is rebuilt whenever either differs, so the value and gradient of the
//! same `β` share one matrix-vector product.
use ndarray::{Array1, ArrayView1, ArrayView2, Zip, linalg::general_mat_vec_mul, s};

use crate::{
    estimation::{
        dataset::Dataset,
        inventory::Inventory,
        model::{Model, ParameterCount},
    },
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{Grad, LogLikelihood, Theta},
        numerical_stability::{KahanSum, inverse_mills_ratio, log_std_normal_cdf},
    },
};

/// Per-estimation scratch space: the cached linear predictor `η = Xβ`.
#[derive(Debug, Clone, Default)]
pub struct ProbitContext {
    eta: Array1<f64>,
    at: Option<Theta>,
}

impl ProbitContext {
    /// `true` when the cached `η` was computed for exactly `theta` on a
    /// dataset with `rows` observations.
    pub fn is_fresh(&self, theta: &Theta, rows: usize) -> bool {
        self.eta.len() == rows && self.at.as_ref() == Some(theta)
    }

    /// Return `Xβ`, recomputing only when the cache is stale.
    fn linear_predictor(
        &mut self, theta: &Theta, x: &ArrayView2<'_, f64>,
    ) -> OptResult<&Array1<f64>> {
        if theta.len() != x.ncols() {
            return Err(OptError::ParameterCountMismatch { expected: x.ncols(), actual: theta.len() });
        }
        let rows = x.nrows();
        if !self.is_fresh(theta, rows) {
            if self.eta.len() != rows {
                self.eta = Array1::zeros(rows);
            }
            general_mat_vec_mul(1.0, x, theta, 0.0, &mut self.eta);
            self.at = Some(theta.clone());
        }
        Ok(&self.eta)
    }
}

/// Probit model. Stateless; all per-call state lives in [`ProbitContext`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Probit;

impl Probit {
    fn design(data: &Dataset) -> ArrayView2<'_, f64> {
        data.matrix().slice(s![.., 1..])
    }

    fn row_weights(eta: &Array1<f64>, y: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut w = Array1::zeros(eta.len());
        Zip::from(&mut w).and(eta).and(&y).for_each(|w, &e, &yi| {
            *w = if yi == 0.0 { inverse_mills_ratio(e) } else { -inverse_mills_ratio(-e) };
        });
        w
    }

    fn log_likelihood_at(eta: &Array1<f64>, y: ArrayView1<'_, f64>) -> f64 {
        eta.iter()
            .zip(y.iter())
            .map(|(&e, &yi)| if yi == 0.0 { log_std_normal_cdf(e) } else { log_std_normal_cdf(-e) })
            .collect::<KahanSum>()
            .sum()
    }
}

impl LogLikelihood for Probit {
    type Data = Dataset;
    type Context = ProbitContext;

    fn value(&self, theta: &Theta, data: &Dataset, ctx: &mut ProbitContext) -> OptResult<f64> {
        let x = Self::design(data);
        let eta = ctx.linear_predictor(theta, &x)?;
        Ok(Self::log_likelihood_at(eta, data.column(0)))
    }

    /// Validate layout, parameter length, and outcome coding.
    ///
    /// # Errors
    /// - `ShapeMismatch` with fewer than two columns.
    /// - `ParameterCountMismatch` when `θ.len() != ncols − 1`.
    /// - `InvalidOutcome` for the first outcome outside {0, 1}.
    fn check(&self, theta: &Theta, data: &Dataset) -> OptResult<()> {
        if data.ncols() < 2 {
            return Err(OptError::ShapeMismatch {
                min_cols: 2,
                found: data.ncols(),
                reason: "probit needs an outcome column and at least one covariate",
            });
        }
        if theta.len() != data.ncols() - 1 {
            return Err(OptError::ParameterCountMismatch {
                expected: data.ncols() - 1,
                actual: theta.len(),
            });
        }
        if let Some((row, &value)) =
            data.column(0).iter().enumerate().find(|&(_, &v)| v != 0.0 && v != 1.0)
        {
            return Err(OptError::InvalidOutcome { row, value });
        }
        Ok(())
    }

    fn grad(&self, theta: &Theta, data: &Dataset, ctx: &mut ProbitContext) -> OptResult<Grad> {
        let x = Self::design(data);
        let eta = ctx.linear_predictor(theta, &x)?;
        let w = Self::row_weights(eta, data.column(0));
        Ok(x.t().dot(&w))
    }

    fn value_and_grad(
        &self, theta: &Theta, data: &Dataset, ctx: &mut ProbitContext,
    ) -> OptResult<(f64, Grad)> {
        let x = Self::design(data);
        let y = data.column(0);
        let eta = ctx.linear_predictor(theta, &x)?;
        let value = Self::log_likelihood_at(eta, y);
        let w = Self::row_weights(eta, y);
        Ok((value, x.t().dot(&w)))
    }
}

impl Model for Probit {
    fn name(&self) -> &str {
        "probit"
    }

    fn parameter_count(&self) -> ParameterCount {
        ParameterCount::ColumnsMinusOne
    }

    fn inventory(&self) -> Inventory {
        Inventory {
            parameters: true,
            covariance: true,
            confidence: true,
            log_likelihood: true,
            names: true,
            ..Inventory::none()
        }
    }
}
