//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait users implement for their model.
//! - [`EstimationParams`] and [`Tolerances`]: configuration for the optimizer.
//! - [`Method`]: which unconstrained optimizer runs the search.
//! - [`LineSearcher`]: line search used by the gradient-based methods.
//! - [`OptimOutcome`]: normalized result returned by the high-level `maximize` API.
//!
//! Convention: we *maximize* a user log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. If an analytic gradient is provided, it should be the gradient
//! of the log-likelihood (`∇ℓ(θ)`); the adapter flips the sign as needed.
use crate::optimization::{
    constraints::{ConstraintSet, NO_CONSTRAINTS},
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{
            validate_theta_hat, validate_value, verify_step_size, verify_tol_cost,
            verify_tol_grad,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use std::str::FromStr;

/// User-implemented log-likelihood interface.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
/// If you provide an analytic gradient, return the gradient of the
/// log-likelihood `∇ℓ(θ)` (the adapter flips the sign to match the cost).
///
/// - `type Data`: per-model data carried into `value`/`grad`/`check`.
/// - `type Context`: per-estimation scratch state. One context is created
///   when an estimation starts and dropped when it returns; it is never
///   shared between concurrent estimations.
///
/// Required:
/// - `value(&Theta, &Data, &mut Context) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: reject incompatible `θ`/`data`
///   pairs. Called once before optimization.
///
/// Optional:
/// - `grad`: analytic gradient `∇ℓ(θ)`. Without it, finite differences are
///   used automatically.
/// - `value_and_grad`: joint evaluation; defaults to `value` then `grad`.
/// - `constraints`: ordered constraint list; defaults to none.
pub trait LogLikelihood {
    type Data: 'static;
    type Context: Default;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data, ctx: &mut Self::Context) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(
        &self, _theta: &Theta, _data: &Self::Data, _ctx: &mut Self::Context,
    ) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }

    fn value_and_grad(
        &self, theta: &Theta, data: &Self::Data, ctx: &mut Self::Context,
    ) -> OptResult<(Cost, Grad)> {
        let value = self.value(theta, data, ctx)?;
        let grad = self.grad(theta, data, ctx)?;
        Ok((value, grad))
    }

    fn constraints(&self) -> &ConstraintSet {
        &NO_CONSTRAINTS
    }
}

/// Choice of line search used inside the gradient-based solvers.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"MoreThuente"`, `"HagerZhang"`). Unknown names return
/// `OptError::InvalidLineSearch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Unconstrained optimizer selected by integer code or name.
///
/// | code | variant |
/// |------|---------|
/// | 0 | [`Method::NelderMead`] |
/// | 1 | [`Method::ConjugateFletcherReeves`] (default) |
/// | 2 | [`Method::Lbfgs`] |
/// | 3 | [`Method::ConjugatePolakRibiere`] |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Derivative-free simplex; `step_size` is the initial simplex edge.
    NelderMead,
    /// Nonlinear conjugate gradient with the Fletcher–Reeves update.
    #[default]
    ConjugateFletcherReeves,
    /// Limited-memory BFGS.
    Lbfgs,
    /// Nonlinear conjugate gradient with the Polak–Ribière (+) update.
    ConjugatePolakRibiere,
}

impl Method {
    pub fn code(self) -> i32 {
        match self {
            Method::NelderMead => 0,
            Method::ConjugateFletcherReeves => 1,
            Method::Lbfgs => 2,
            Method::ConjugatePolakRibiere => 3,
        }
    }
}

impl TryFrom<i32> for Method {
    type Error = OptError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Method::NelderMead),
            1 => Ok(Method::ConjugateFletcherReeves),
            2 => Ok(Method::Lbfgs),
            3 => Ok(Method::ConjugatePolakRibiere),
            _ => Err(OptError::InvalidMethodCode { code }),
        }
    }
}

impl FromStr for Method {
    type Err = OptError;

    /// Accepts the integer code or a case-insensitive name:
    /// `"NelderMead"`, `"FletcherReeves"`, `"LBFGS"`, `"PolakRibiere"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.trim().parse::<i32>() {
            return Method::try_from(code);
        }
        match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "neldermead" | "simplex" => Ok(Method::NelderMead),
            "fletcherreeves" | "conjugategradient" | "cg" => Ok(Method::ConjugateFletcherReeves),
            "lbfgs" => Ok(Method::Lbfgs),
            "polakribiere" | "polakribiereplus" => Ok(Method::ConjugatePolakRibiere),
            _ => Err(OptError::InvalidMethodName { name: s.to_string() }),
        }
    }
}

/// Default simplex edge / step size.
pub const DEFAULT_STEP_SIZE: f64 = 0.05;

/// Estimation-level configuration.
///
/// Fields:
/// - `starting_point`: initial `θ₀`; `None` means a vector of ones of the
///   model's resolved parameter count.
/// - `method`: optimizer, see [`Method`].
/// - `line_searcher`: line search for the gradient-based methods.
/// - `step_size`: initial simplex edge for [`Method::NelderMead`]; must be
///   finite and positive.
/// - `tols`: numerical tolerances and iteration limits.
/// - `verbose`: emit the initial objective through `tracing` and, behind
///   the `obs_slog` feature, attach argmin's terminal observer.
/// - `lbfgs_mem`: L-BFGS history size (`None` uses the default of 7).
///
/// Default:
/// - method 1 (Fletcher–Reeves), More–Thuente, step 0.05,
///   `tol_grad = tol_cost = 1e-6`, `max_iter = 500`, quiet, default memory.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimationParams {
    pub starting_point: Option<Theta>,
    pub method: Method,
    pub line_searcher: LineSearcher,
    pub step_size: f64,
    pub tols: Tolerances,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl EstimationParams {
    /// Create a validated set of estimation parameters.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] when `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, method: Method, line_searcher: LineSearcher, verbose: bool,
        lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self {
            starting_point: None,
            method,
            line_searcher,
            step_size: DEFAULT_STEP_SIZE,
            tols,
            verbose,
            lbfgs_mem,
        })
    }

    /// Use `theta0` as the starting point. Length is checked against the
    /// model when estimation starts.
    pub fn with_starting_point(mut self, theta0: Theta) -> Self {
        self.starting_point = Some(theta0);
        self
    }

    /// Set the simplex edge used by [`Method::NelderMead`].
    ///
    /// # Errors
    /// - [`OptError::InvalidStepSize`] for non-finite or non-positive values.
    pub fn with_step_size(mut self, step_size: f64) -> OptResult<Self> {
        verify_step_size(step_size)?;
        self.step_size = step_size;
        Ok(self)
    }
}

impl Default for EstimationParams {
    fn default() -> Self {
        Self {
            starting_point: None,
            method: Method::default(),
            line_searcher: LineSearcher::MoreThuente,
            step_size: DEFAULT_STEP_SIZE,
            tols: Tolerances::default(),
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: stop when the gradient norm falls below this threshold.
/// - `tol_cost`: stop when successive accepted objective values differ by at
///   most `tol_cost · max(1, |ℓ|)`; for Nelder–Mead it is the simplex
///   standard-deviation tolerance.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_grad: Some(1e-6), tol_cost: Some(1e-6), max_iter: Some(500) }
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best (penalized) **log-likelihood** value, not the cost.
/// - `converged`: `true` only when a convergence criterion fired; hitting the
///   iteration cap reports `false` together with the best point found.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`.
/// - `grad_norm`: norm of the last available cost gradient, if any.
/// - `history`: objective value `ℓ` after initialization and after every
///   accepted iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
    pub history: Vec<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// # Errors
    /// - Propagates validation errors for `theta_hat` (missing / non-finite)
    ///   or `value` (non-finite).
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: &TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap, grad_norm: Option<f64>, history: Vec<f64>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let converged = matches!(
            termination,
            TerminationStatus::Terminated(
                TerminationReason::SolverConverged | TerminationReason::TargetCostReached
            )
        );
        let status = format!("{termination:?}");
        let iterations = iterations as usize;
        Ok(Self { theta_hat, value, converged, status, iterations, fn_evals, grad_norm, history })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parsing of `Method` (codes and names) and `LineSearcher`.
    // - Validation rules of `Tolerances` and `EstimationParams`.
    // - The mapping from Argmin termination status to `converged`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Every method code round-trips and unknown codes are rejected.
    //
    // Given
    // -----
    // - Codes 0..=3 and the out-of-range codes -1 and 4.
    //
    // Expect
    // ------
    // - `Method::try_from(c)?.code() == c` for valid codes.
    // - `OptError::InvalidMethodCode` otherwise.
    fn method_codes_round_trip_and_reject_unknown() {
        // Arrange / Act / Assert
        for code in 0..=3 {
            let method = Method::try_from(code).expect("valid code");
            assert_eq!(method.code(), code);
        }
        assert_eq!(Method::try_from(4), Err(OptError::InvalidMethodCode { code: 4 }));
        assert_eq!(Method::try_from(-1), Err(OptError::InvalidMethodCode { code: -1 }));
        assert_eq!(Method::default(), Method::ConjugateFletcherReeves);
    }

    #[test]
    // Purpose
    // -------
    // Method names parse case-insensitively, and numeric strings go through
    // the code table.
    //
    // Given
    // -----
    // - "L-BFGS", "nelder_mead", "PolakRibiere", "2" and "bogus".
    //
    // Expect
    // ------
    // - The matching variants; `InvalidMethodName` for "bogus".
    fn method_names_parse_case_insensitively() {
        // Arrange / Act / Assert
        assert_eq!("L-BFGS".parse::<Method>(), Ok(Method::Lbfgs));
        assert_eq!("nelder_mead".parse::<Method>(), Ok(Method::NelderMead));
        assert_eq!("PolakRibiere".parse::<Method>(), Ok(Method::ConjugatePolakRibiere));
        assert_eq!("2".parse::<Method>(), Ok(Method::Lbfgs));
        assert!(matches!("bogus".parse::<Method>(), Err(OptError::InvalidMethodName { .. })));
        assert_eq!("HAGERZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
    }

    #[test]
    // Purpose
    // -------
    // Tolerance validation rejects missing, non-positive and zero settings.
    //
    // Given
    // -----
    // - All-`None`, a negative gradient tolerance, an infinite cost
    //   tolerance and `max_iter = 0`.
    //
    // Expect
    // ------
    // - The matching `OptError` variant for each case.
    fn tolerances_reject_invalid_settings() {
        // Arrange / Act / Assert
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(Some(-1.0), None, None),
            Err(OptError::InvalidTolGrad { .. })
        ));
        assert!(matches!(
            Tolerances::new(None, Some(f64::INFINITY), None),
            Err(OptError::InvalidTolCost { .. })
        ));
        assert!(matches!(
            Tolerances::new(None, None, Some(0)),
            Err(OptError::InvalidMaxIter { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `EstimationParams` validates step size and L-BFGS memory.
    //
    // Given
    // -----
    // - Step sizes 0 and NaN; `lbfgs_mem = Some(0)`.
    //
    // Expect
    // ------
    // - `InvalidStepSize` and `InvalidLBFGSMem` respectively; a valid
    //   starting point is stored as given.
    fn estimation_params_validate_inputs() {
        // Arrange
        let params = EstimationParams::default();

        // Act / Assert
        assert!(matches!(
            params.clone().with_step_size(0.0),
            Err(OptError::InvalidStepSize { .. })
        ));
        assert!(matches!(
            params.clone().with_step_size(f64::NAN),
            Err(OptError::InvalidStepSize { .. })
        ));
        assert!(matches!(
            EstimationParams::new(Tolerances::default(), Method::Lbfgs, LineSearcher::MoreThuente, false, Some(0)),
            Err(OptError::InvalidLBFGSMem { .. })
        ));
        let with_start = params.with_starting_point(array![0.5, -0.5]);
        assert_eq!(with_start.starting_point, Some(array![0.5, -0.5]));
    }

    #[test]
    // Purpose
    // -------
    // Only convergence criteria count as convergence; the iteration cap does
    // not.
    //
    // Given
    // -----
    // - `SolverConverged` and `MaxItersReached` terminations.
    //
    // Expect
    // ------
    // - `converged == true` for the former, `false` for the latter.
    fn outcome_converged_flag_excludes_iteration_cap() {
        // Arrange
        let theta = array![1.0];
        let done = TerminationStatus::Terminated(TerminationReason::SolverConverged);
        let capped = TerminationStatus::Terminated(TerminationReason::MaxItersReached);

        // Act
        let ok = OptimOutcome::new(Some(theta.clone()), -1.0, &done, 3, FnEvalMap::new(), None, vec![])
            .expect("valid outcome");
        let cap = OptimOutcome::new(Some(theta), -1.0, &capped, 3, FnEvalMap::new(), None, vec![])
            .expect("valid outcome");

        // Assert
        assert!(ok.converged);
        assert!(!cap.converged);
        assert!(!cap.status.is_empty());
    }
}
