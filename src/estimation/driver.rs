//! MLE driver — fit a [`Model`] by numerical maximization and package the
//! result.
//!
//! Purpose
//! -------
//! Implement the default [`Model::estimate`]: resolve the parameter count,
//! seed the optimizer, maximize the (penalized) log-likelihood, and fill an
//! [`Estimate`] with exactly the outputs the caller asked for and the model
//! supports.
//!
//! Key behaviors
//! -------------
//! - Data and configuration problems (bad name, shape, starting point,
//!   constraint) are errors raised before the search starts.
//! - A starting point that violates the model's constraints is moved before
//!   the search: to the default vector of ones when that is feasible,
//!   otherwise to the constraints' substitute.
//! - Hitting the iteration bound is not an error: the best point is
//!   returned with `converged == false`.
//! - Covariance failures are not errors either: the estimate carries
//!   [`CovarianceStatus::Unavailable`] instead.
//!
//! Conventions
//! -----------
//! - The reported parameter vector is the point the objective was actually
//!   evaluated at: the feasible substitute when a constraint binds at `θ̂`.
//! - The reported log-likelihood is un-penalized.
use tracing::{debug, info_span, warn};

use crate::{
    estimation::{
        dataset::Dataset,
        estimate::{CovarianceStatus, Estimate, EstimateStatus},
        inventory::Inventory,
        model::{Model, validate_model_name},
    },
    inference::covariance::{confidence_levels, observed_information_covariance},
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{
            EstimationParams, LogLikelihood, Theta, adapter::ArgMinAdapter,
            builders::method_label, maximize, validation::validate_starting_point,
        },
    },
};

/// Fit `model` on `data` by maximum likelihood.
///
/// Steps
/// -----
/// 1. Validate the model name and resolve the parameter count `k`.
/// 2. Seed at `params.starting_point` (checked against `k`) or at a vector
///    of ones, then move an infeasible seed into the feasible region.
/// 3. Filter `request` by the model's inventory.
/// 4. Run [`maximize`] with the configured method and tolerances.
/// 5. Package the result via [`assemble`].
///
/// # Errors
/// - Name, shape, data, starting-point, and constraint errors.
/// - Solver runtime errors (line-search failures, model domain errors).
pub fn maximum_likelihood<M: Model>(
    data: &Dataset, request: Inventory, model: &M, params: &EstimationParams,
) -> OptResult<Estimate> {
    validate_model_name(model.name())?;
    let k = model.parameter_count().resolve(data)?;
    let theta0 = starting_point(model, params, k)?;
    let filtered = request.filter(model.inventory());
    let _span = info_span!(
        "maximum_likelihood",
        model = model.name(),
        k,
        method = method_label(params.method),
        rows = data.nrows(),
    )
    .entered();

    let outcome = maximize(model, theta0, data, params)?;
    debug!(
        iterations = outcome.iterations,
        value = outcome.value,
        converged = outcome.converged,
        "search finished"
    );
    if !outcome.converged {
        warn!(status = %outcome.status, iterations = outcome.iterations, "estimation did not converge");
    }
    assemble(model, data, filtered, &outcome.theta_hat, EstimateStatus::from(&outcome))
}

/// Fill an [`Estimate`] for `theta_hat`.
///
/// Shared by the numerical driver and closed-form estimators so both report
/// log-likelihood, covariance, and confidence the same way. Covariance is
/// computed when either covariance or confidence is enabled, since the
/// latter is derived from it.
pub fn assemble<M: Model>(
    model: &M, data: &Dataset, filtered: Inventory, theta_hat: &Theta, status: EstimateStatus,
) -> OptResult<Estimate> {
    let adapter = ArgMinAdapter::new(model, data);
    let (theta, log_likelihood) = adapter.log_likelihood(theta_hat)?;
    let mut estimate = Estimate::new(model.name(), filtered, status);
    estimate.set_log_likelihood(log_likelihood);

    if filtered.covariance || filtered.confidence {
        let cost_grad = |t: &Theta| adapter.value_and_gradient(t).map(|(_, g)| -g);
        match observed_information_covariance(cost_grad, &theta) {
            Ok(cov) => {
                estimate.set_confidence(confidence_levels(&theta, &cov));
                estimate.set_covariance(cov);
                estimate.set_covariance_status(CovarianceStatus::Computed);
            }
            Err(err) => {
                warn!(%err, "covariance unavailable");
                estimate
                    .set_covariance_status(CovarianceStatus::Unavailable { reason: err.to_string() });
            }
        }
    }

    if filtered.predicted || filtered.residuals {
        if let Some(fitted) = model.fitted_values(&theta, data)? {
            if fitted.len() != data.nrows() {
                return Err(OptError::FittedLengthMismatch {
                    expected: data.nrows(),
                    found: fitted.len(),
                });
            }
            estimate.set_residuals(&data.column(0) - &fitted);
            estimate.set_predicted(fitted);
        }
    }

    if filtered.names {
        estimate.set_names(model.parameter_names(data, theta.len()));
    }
    estimate.set_parameters(theta);
    Ok(estimate)
}

fn starting_point<F: LogLikelihood>(
    model: &F, params: &EstimationParams, k: usize,
) -> OptResult<Theta> {
    let theta0 = match &params.starting_point {
        Some(theta0) => {
            validate_starting_point(theta0, k)?;
            theta0.clone()
        }
        None => Theta::ones(k),
    };
    let constraints = model.constraints();
    let Some(substitute) = constraints.apply(&theta0)?.point else {
        return Ok(theta0);
    };
    // The substitute lies on the feasible edge; it is only the last resort.
    let fallback = Theta::ones(k);
    let start = if constraints.apply(&fallback)?.is_binding() { substitute } else { fallback };
    warn!(%theta0, %start, "starting point violates the model's constraints; moved");
    Ok(start)
}
