//! Model descriptor — what a statistical model tells the estimation engine.
//!
//! A model is a [`LogLikelihood`] over a [`Dataset`] plus a small amount of
//! identity: a bounded name, a parameter count (fixed or derived from the
//! data), and the set of outputs it can produce. Every other capability is a
//! trait default the engine can fall back on:
//!
//! | capability | default when not overridden |
//! |---|---|
//! | gradient (`LogLikelihood::grad`) | finite differences of the objective |
//! | joint value + gradient | separate value and gradient calls |
//! | constraints | none |
//! | `estimate` | [`maximum_likelihood`] |
//! | fitted values | none (no predicted/residuals) |
//! | sampling ([`Sampler`]) | separate opt-in trait |
use ndarray::Array1;
use rand::Rng;

use crate::{
    estimation::{
        dataset::Dataset, driver::maximum_likelihood, estimate::Estimate, inventory::Inventory,
    },
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{EstimationParams, LogLikelihood, Theta},
    },
};

/// Upper bound on [`Model::name`] length, in characters.
pub const MAX_MODEL_NAME_LEN: usize = 100;

/// Number of free parameters a model estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterCount {
    /// Always `k` parameters; `k` must be positive.
    Fixed(usize),
    /// One parameter per data column after the first.
    ColumnsMinusOne,
}

impl ParameterCount {
    /// Effective parameter count for `data`.
    ///
    /// # Errors
    /// - `OptError::ParameterCountMismatch` for `Fixed(0)`.
    /// - `OptError::ShapeMismatch` when `ColumnsMinusOne` meets a dataset
    ///   with fewer than two columns.
    pub fn resolve(self, data: &Dataset) -> OptResult<usize> {
        match self {
            ParameterCount::Fixed(0) => {
                Err(OptError::ParameterCountMismatch { expected: 1, actual: 0 })
            }
            ParameterCount::Fixed(k) => Ok(k),
            ParameterCount::ColumnsMinusOne if data.ncols() < 2 => Err(OptError::ShapeMismatch {
                min_cols: 2,
                found: data.ncols(),
                reason: "parameter count is one per column after the first",
            }),
            ParameterCount::ColumnsMinusOne => Ok(data.ncols() - 1),
        }
    }
}

/// A statistical model the estimation engine can fit.
pub trait Model: LogLikelihood<Data = Dataset> {
    /// Short identifier, at most [`MAX_MODEL_NAME_LEN`] characters.
    fn name(&self) -> &str;

    fn parameter_count(&self) -> ParameterCount;

    /// Outputs this model can produce.
    fn inventory(&self) -> Inventory;

    /// Labels for the `k` estimated parameters.
    ///
    /// Defaults to the dataset's column names after the first when the
    /// dataset is named and has exactly `k + 1` columns, and to
    /// `beta_0 … beta_{k−1}` otherwise.
    fn parameter_names(&self, data: &Dataset, k: usize) -> Vec<String> {
        match data.names() {
            Some(names) if names.len() == k + 1 => names[1..].to_vec(),
            _ => (0..k).map(|i| format!("beta_{i}")).collect(),
        }
    }

    /// Per-observation fitted values of column 0, when the model has them.
    ///
    /// Residuals are derived as `column 0 − fitted`.
    fn fitted_values(&self, _theta: &Theta, _data: &Dataset) -> OptResult<Option<Array1<f64>>> {
        Ok(None)
    }

    /// Fit the model. Likelihood models use the numerical driver; models
    /// with a closed form override this.
    fn estimate(
        &self, data: &Dataset, request: Inventory, params: &EstimationParams,
    ) -> OptResult<Estimate>
    where
        Self: Sized,
    {
        maximum_likelihood(data, request, self, params)
    }
}

/// Random draws from a model's distribution at given parameters.
pub trait Sampler {
    fn draw<R: Rng + ?Sized>(&self, theta: &Theta, rng: &mut R) -> OptResult<f64>;
}

/// Reject empty names and names longer than [`MAX_MODEL_NAME_LEN`].
pub fn validate_model_name(name: &str) -> OptResult<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_MODEL_NAME_LEN {
        return Err(OptError::InvalidModelName { len });
    }
    Ok(())
}
