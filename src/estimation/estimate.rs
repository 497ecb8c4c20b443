//! Estimate — the result of one estimation call.
//!
//! Purpose
//! -------
//! Hold the fitted outputs of a model together with the convergence status
//! of the search, populating only the fields that were both requested by
//! the caller and supported by the model.
//!
//! Key behaviors
//! -------------
//! - Every optional output is stored through a setter that consults the
//!   filtered [`Inventory`]; a value offered for a disabled flag is dropped.
//! - [`Estimate::valid`] reports which fields are actually populated, so
//!   the mask never claims more than was computed (an omitted covariance
//!   clears its flag).
//! - [`EstimateStatus`] carries the solver outcome, including an explicit
//!   not-converged marker when the iteration bound was hit.
//!
//! Invariants & assumptions
//! ------------------------
//! - `valid() ⊆ filtered ⊆ requested ∧ supported`.
//! - A fresh `Estimate` is created per call; nothing is shared.
use ndarray::{Array1, Array2};

use crate::{
    estimation::inventory::Inventory,
    optimization::loglik_optimizer::{FnEvalMap, OptimOutcome},
};

/// Why a covariance matrix is or is not present.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CovarianceStatus {
    /// Neither covariance nor confidence was requested and supported.
    #[default]
    NotRequested,
    /// Covariance was computed from the observed information.
    Computed,
    /// Computation was attempted and failed (e.g. the information matrix is
    /// not positive definite); the estimate itself is still valid.
    Unavailable { reason: String },
}

/// Solver-side summary of an estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateStatus {
    /// `true` when a tolerance was met; `false` when the iteration bound
    /// stopped the search.
    pub converged: bool,
    /// Termination message reported by the solver.
    pub message: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
    /// Objective after initialization and after each iteration.
    pub history: Vec<f64>,
}

impl EstimateStatus {
    /// Status of a closed-form estimate: converged, no iterations.
    pub fn closed_form() -> Self {
        Self {
            converged: true,
            message: "closed form".to_string(),
            iterations: 0,
            fn_evals: FnEvalMap::new(),
            grad_norm: None,
            history: Vec::new(),
        }
    }
}

impl From<&OptimOutcome> for EstimateStatus {
    fn from(outcome: &OptimOutcome) -> Self {
        Self {
            converged: outcome.converged,
            message: outcome.status.clone(),
            iterations: outcome.iterations,
            fn_evals: outcome.fn_evals.clone(),
            grad_norm: outcome.grad_norm,
            history: outcome.history.clone(),
        }
    }
}

/// Fitted outputs of one model on one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    model: String,
    filtered: Inventory,
    parameters: Option<Array1<f64>>,
    covariance: Option<Array2<f64>>,
    confidence: Option<Array1<f64>>,
    predicted: Option<Array1<f64>>,
    residuals: Option<Array1<f64>>,
    log_likelihood: Option<f64>,
    names: Option<Vec<String>>,
    status: EstimateStatus,
    covariance_status: CovarianceStatus,
}

impl Estimate {
    /// Empty estimate that will accept only the fields set in `filtered`.
    pub fn new(model: impl Into<String>, filtered: Inventory, status: EstimateStatus) -> Self {
        Self {
            model: model.into(),
            filtered,
            parameters: None,
            covariance: None,
            confidence: None,
            predicted: None,
            residuals: None,
            log_likelihood: None,
            names: None,
            status,
            covariance_status: CovarianceStatus::NotRequested,
        }
    }

    // ---- setters, gated by the filtered inventory ----

    pub fn set_parameters(&mut self, value: Array1<f64>) {
        if self.filtered.parameters {
            self.parameters = Some(value);
        }
    }

    pub fn set_covariance(&mut self, value: Array2<f64>) {
        if self.filtered.covariance {
            self.covariance = Some(value);
        }
    }

    pub fn set_confidence(&mut self, value: Array1<f64>) {
        if self.filtered.confidence {
            self.confidence = Some(value);
        }
    }

    pub fn set_predicted(&mut self, value: Array1<f64>) {
        if self.filtered.predicted {
            self.predicted = Some(value);
        }
    }

    pub fn set_residuals(&mut self, value: Array1<f64>) {
        if self.filtered.residuals {
            self.residuals = Some(value);
        }
    }

    pub fn set_log_likelihood(&mut self, value: f64) {
        if self.filtered.log_likelihood {
            self.log_likelihood = Some(value);
        }
    }

    pub fn set_names(&mut self, value: Vec<String>) {
        if self.filtered.names {
            self.names = Some(value);
        }
    }

    pub fn set_covariance_status(&mut self, status: CovarianceStatus) {
        self.covariance_status = status;
    }

    // ---- accessors ----

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `requested ∧ supported` for this call.
    pub fn filtered(&self) -> Inventory {
        self.filtered
    }

    /// Which fields are actually populated.
    pub fn valid(&self) -> Inventory {
        Inventory {
            parameters: self.parameters.is_some(),
            covariance: self.covariance.is_some(),
            confidence: self.confidence.is_some(),
            predicted: self.predicted.is_some(),
            residuals: self.residuals.is_some(),
            log_likelihood: self.log_likelihood.is_some(),
            names: self.names.is_some(),
        }
    }

    pub fn parameters(&self) -> Option<&Array1<f64>> {
        self.parameters.as_ref()
    }

    pub fn covariance(&self) -> Option<&Array2<f64>> {
        self.covariance.as_ref()
    }

    pub fn confidence(&self) -> Option<&Array1<f64>> {
        self.confidence.as_ref()
    }

    pub fn predicted(&self) -> Option<&Array1<f64>> {
        self.predicted.as_ref()
    }

    pub fn residuals(&self) -> Option<&Array1<f64>> {
        self.residuals.as_ref()
    }

    pub fn log_likelihood(&self) -> Option<f64> {
        self.log_likelihood
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    pub fn status(&self) -> &EstimateStatus {
        &self.status
    }

    pub fn converged(&self) -> bool {
        self.status.converged
    }

    pub fn covariance_status(&self) -> &CovarianceStatus {
        &self.covariance_status
    }
}
