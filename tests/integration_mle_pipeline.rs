//! Integration tests for the constrained MLE pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end path from a validated `Dataset`, through model
//!   selection and `EstimationParams`, to a populated `Estimate`.
//! - Exercise realistic settings (simulated probit data, every optimizer
//!   method, iteration caps, parallel fits) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `estimation`:
//!   - `Dataset` with column names, `Inventory` filtering, `Estimate`
//!     validity and status.
//! - `models::Probit`:
//!   - Recovery of simulated coefficients, covariance and confidence,
//!     separable data, input errors.
//! - `models::RankExponential`:
//!   - Closed-form estimate through the public `Model::estimate` entry.
//! - `optimization::loglik_optimizer`:
//!   - Method selection by code and name, tolerances and iteration caps.
//!
//! Exclusions
//! ----------
//! - Low-level building blocks (penalty composition, tail helpers, solver
//!   builders) are covered by unit tests.
use constrained_mle::{
    estimation::{CovarianceStatus, Dataset, Estimate, Inventory, Model, maximum_likelihood},
    models::{Probit, RankExponential},
    optimization::{
        errors::OptError,
        loglik_optimizer::{EstimationParams, LineSearcher, Method, Tolerances},
    },
};
use ndarray::{Array2, array};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::StandardNormal;

/// Purpose
/// -------
/// Simulate a probit dataset with an intercept and one standard-normal
/// covariate.
///
/// Layout
/// ------
/// - Column 0: outcome, 0 with probability `Φ(η)` and 1 otherwise, where
///   `η = β₀ + β₁ x`.
/// - Column 1: ones. Column 2: `x ~ N(0, 1)`.
///
/// Invariants
/// ----------
/// - Deterministic for a given `seed`.
fn simulate_probit(n: usize, beta: [f64; 2], seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut m = Array2::<f64>::zeros((n, 3));
    for i in 0..n {
        let x: f64 = rng.sample(StandardNormal);
        let z: f64 = rng.sample(StandardNormal);
        let eta = beta[0] + beta[1] * x;
        m[[i, 0]] = if z < eta { 0.0 } else { 1.0 };
        m[[i, 1]] = 1.0;
        m[[i, 2]] = x;
    }
    Dataset::new(m)
        .and_then(|d| d.with_names(["y", "const", "x"]))
        .expect("simulated dataset should be valid")
}

fn params(method: Method) -> EstimationParams {
    let tols = Tolerances::new(Some(1e-7), Some(1e-10), Some(1000))
        .expect("Tolerances should be valid");
    EstimationParams::new(tols, method, LineSearcher::MoreThuente, false, None)
        .expect("EstimationParams should be valid")
}

fn coefficients(est: &Estimate) -> Vec<f64> {
    est.parameters().expect("parameters should be present").to_vec()
}

#[test]
// Purpose
// -------
// Probit recovers simulated coefficients and reports covariance,
// confidence, log-likelihood, and names.
//
// Given
// -----
// - n = 2000, β = (0.3, −0.8), seed 42; default estimation parameters.
//
// Expect
// ------
// - Converged, each β̂ within 0.15 of the truth.
// - Positive variances, confidence in [0, 1] (near 1 for both effects).
// - Names taken from the covariate columns; no predicted/residuals.
fn probit_recovers_simulated_coefficients() {
    // Arrange
    let data = simulate_probit(2000, [0.3, -0.8], 42);

    // Act
    let est = Probit
        .estimate(&data, Inventory::all(), &EstimationParams::default())
        .expect("probit estimation should succeed");

    // Assert
    assert!(est.converged(), "status = {}", est.status().message);
    let beta = coefficients(&est);
    assert!((beta[0] - 0.3).abs() < 0.15, "beta = {beta:?}");
    assert!((beta[1] + 0.8).abs() < 0.15, "beta = {beta:?}");

    let cov = est.covariance().expect("covariance should be present");
    assert!(cov[[0, 0]] > 0.0 && cov[[1, 1]] > 0.0);
    assert!((cov[[0, 1]] - cov[[1, 0]]).abs() < 1e-10);
    let conf = est.confidence().expect("confidence should be present");
    assert!(conf.iter().all(|&c| (0.0..=1.0).contains(&c)));
    assert!(conf.iter().all(|&c| c > 0.99), "conf = {conf}");

    assert!(est.log_likelihood().expect("log-likelihood should be present") < 0.0);
    assert_eq!(est.names(), Some(&["const".to_string(), "x".to_string()][..]));
    assert!(est.predicted().is_none() && est.residuals().is_none());
    assert_eq!(est.covariance_status(), &CovarianceStatus::Computed);
}

#[test]
// Purpose
// -------
// Every optimizer method lands on the same probit maximum.
//
// Given
// -----
// - n = 500 simulated rows; methods selected by code (0, 2, 3) and name.
//
// Expect
// ------
// - Coefficients within 1e-2 of the default method's.
fn optimizer_methods_agree_on_probit() {
    // Arrange
    let data = simulate_probit(500, [-0.2, 0.6], 7);
    let reference = coefficients(
        &Probit.estimate(&data, Inventory::all(), &params(Method::default())).expect("default fit"),
    );
    let methods = [
        Method::try_from(0).expect("code 0"),
        Method::try_from(2).expect("code 2"),
        Method::try_from(3).expect("code 3"),
        "lbfgs".parse::<Method>().expect("name lbfgs"),
    ];

    for method in methods {
        // Act
        let est = Probit
            .estimate(&data, Inventory::all(), &params(method))
            .expect("probit estimation should succeed");

        // Assert
        let beta = coefficients(&est);
        for (b, r) in beta.iter().zip(&reference) {
            assert!((b - r).abs() < 1e-2, "{method:?}: {beta:?} vs {reference:?}");
        }
    }
}

#[test]
// Purpose
// -------
// Perfectly separable data stops at finite parameters with a
// non-decreasing log-likelihood trace.
//
// Given
// -----
// - Outcome 1 exactly when the covariate is positive.
//
// Expect
// ------
// - Finite coefficients, a converged status, and a monotone history.
fn separable_probit_stays_finite_and_monotone() {
    // Arrange
    let data = Dataset::new(array![
        [0.0, 1.0, -2.0],
        [0.0, 1.0, -1.0],
        [0.0, 1.0, -0.5],
        [1.0, 1.0, 0.5],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, 2.0],
    ])
    .expect("dataset should be valid");
    let request = Inventory { parameters: true, log_likelihood: true, ..Inventory::none() };

    // Act
    let est = Probit
        .estimate(&data, request, &EstimationParams::default())
        .expect("probit estimation should succeed");

    // Assert
    assert!(coefficients(&est).iter().all(|b| b.is_finite()));
    assert!(est.converged(), "status = {}", est.status().message);
    let history = &est.status().history;
    assert!(history.len() >= 2);
    for pair in history.windows(2) {
        assert!(pair[1] >= pair[0] - 1e-12, "history not monotone: {history:?}");
    }
}

#[test]
// Purpose
// -------
// Identical estimations are bit-identical, sequentially and on parallel
// threads.
//
// Given
// -----
// - One simulated dataset; two sequential fits and four scoped-thread fits.
//
// Expect
// ------
// - All six estimates compare equal.
fn repeated_and_parallel_estimations_are_identical() {
    // Arrange
    let data = simulate_probit(300, [0.1, 1.2], 3);
    let params = EstimationParams::default();

    // Act
    let first = Probit.estimate(&data, Inventory::all(), &params).expect("first fit");
    let second = Probit.estimate(&data, Inventory::all(), &params).expect("second fit");
    let parallel: Vec<Estimate> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| Probit.estimate(&data, Inventory::all(), &params)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic").expect("parallel fit"))
            .collect()
    });

    // Assert
    assert_eq!(first, second);
    for est in &parallel {
        assert_eq!(est, &first);
    }
}

#[test]
// Purpose
// -------
// Hitting the iteration cap returns the best point with an explicit
// not-converged marker instead of an error.
//
// Given
// -----
// - max_iter = 1 with very tight tolerances.
//
// Expect
// ------
// - `Ok`, `converged == false`, parameters present and finite.
fn iteration_cap_reports_not_converged() {
    // Arrange
    let data = simulate_probit(400, [0.5, -1.5], 11);
    let tols =
        Tolerances::new(Some(1e-12), Some(1e-14), Some(1)).expect("Tolerances should be valid");
    let params = EstimationParams::new(tols, Method::default(), LineSearcher::MoreThuente, false, None)
        .expect("EstimationParams should be valid");

    // Act
    let est = Probit.estimate(&data, Inventory::all(), &params).expect("estimation should run");

    // Assert
    assert!(!est.converged());
    assert_eq!(est.status().iterations, 1);
    assert!(coefficients(&est).iter().all(|b| b.is_finite()));
}

#[test]
// Purpose
// -------
// Shape and data problems are reported before any optimization.
//
// Given
// -----
// - A one-column probit dataset, an outcome of 3, and a starting point of
//   the wrong length.
//
// Expect
// ------
// - `ShapeMismatch`, `InvalidOutcome`, and `ParameterCountMismatch`.
fn probit_input_errors_are_reported() {
    // Arrange
    let one_col = Dataset::new(array![[0.0], [1.0]]).expect("dataset should be valid");
    let bad_outcome =
        Dataset::new(array![[0.0, 1.0], [3.0, 1.0]]).expect("dataset should be valid");
    let good = simulate_probit(20, [0.0, 1.0], 5);
    let wrong_start = EstimationParams::default().with_starting_point(array![0.0, 0.0, 0.0]);

    // Act
    let shape = maximum_likelihood(&one_col, Inventory::all(), &Probit, &EstimationParams::default());
    let outcome =
        maximum_likelihood(&bad_outcome, Inventory::all(), &Probit, &EstimationParams::default());
    let start = maximum_likelihood(&good, Inventory::all(), &Probit, &wrong_start);

    // Assert
    assert!(matches!(shape, Err(OptError::ShapeMismatch { .. })));
    assert_eq!(outcome, Err(OptError::InvalidOutcome { row: 1, value: 3.0 }));
    assert_eq!(start, Err(OptError::ParameterCountMismatch { expected: 2, actual: 3 }));
}

#[test]
// Purpose
// -------
// The rank-exponential model estimates in closed form and silently drops
// unsupported requests.
//
// Given
// -----
// - Rank counts with column sums [10, 5, 2]; a request for parameters,
//   predicted, residuals, and names.
//
// Expect
// ------
// - μ̂ = 9/17; only `parameters` is populated; covariance not requested.
fn rank_exponential_filters_unsupported_outputs() {
    // Arrange
    let data = Dataset::new(array![[10.0, 5.0, 2.0]]).expect("dataset should be valid");
    let request: Inventory =
        "parameters, predicted, residuals, names".parse().expect("valid flag names");

    // Act
    let est = RankExponential::new()
        .estimate(&data, request, &EstimationParams::default())
        .expect("closed-form estimate should succeed");

    // Assert
    assert!((coefficients(&est)[0] - 9.0 / 17.0).abs() < 1e-15);
    assert_eq!(est.valid(), Inventory { parameters: true, ..Inventory::none() });
    assert_eq!(est.covariance_status(), &CovarianceStatus::NotRequested);
}

#[test]
// Purpose
// -------
// Fitting the rank-exponential likelihood numerically succeeds from a
// starting point outside or on the edge of `μ > 0`, for every method.
//
// Given
// -----
// - Rank counts with column sums [10, 5, 2]; μ₀ ∈ {−1, 0}.
// - Each `Method`, default tolerances.
//
// Expect
// ------
// - `Ok`, a positive reported μ, and μ within 1e-3 of the closed form 9/17.
fn rank_exponential_fits_from_infeasible_starts() {
    // Arrange
    let data = Dataset::new(array![[10.0, 5.0, 2.0]]).expect("dataset should be valid");
    let model = RankExponential::new();
    let request = Inventory { parameters: true, log_likelihood: true, ..Inventory::none() };
    let methods = [
        Method::NelderMead,
        Method::ConjugateFletcherReeves,
        Method::Lbfgs,
        Method::ConjugatePolakRibiere,
    ];

    for mu0 in [-1.0, 0.0] {
        for method in methods {
            let mut params = EstimationParams::default().with_starting_point(array![mu0]);
            params.method = method;

            // Act
            let est = maximum_likelihood(&data, request, &model, &params)
                .unwrap_or_else(|e| panic!("{method:?} from {mu0}: {e}"));

            // Assert
            let mu = coefficients(&est)[0];
            assert!(mu > 0.0, "{method:?} from {mu0}: mu = {mu}");
            assert!((mu - 9.0 / 17.0).abs() < 1e-3, "{method:?} from {mu0}: mu = {mu}");
            assert!(est.log_likelihood().expect("log-likelihood").is_finite());
        }
    }
}
