use argmin::core::{ArgminError, Error};

/// Crate-wide result alias for estimation and optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// Implies that FD should be used
    GradientNotImplemented,

    /// Gradient dimensions do not match parameter dimensions.
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },

    /// Gradient elements need to be finite
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- EstimationParams ----
    /// Gradient tolerance needs to be positive and finite.
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    /// Cost change tolerance needs to be positive and finite.
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    /// Maximum iterations needs to be positive.
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    /// At least one tolerance must be provided.
    NoTolerancesProvided,

    /// Invalid line searcher name.
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },

    /// lbfgs_mem needs to be at least 1.
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    /// Unknown integer method code.
    InvalidMethodCode {
        code: i32,
    },

    /// Unknown method name.
    InvalidMethodName {
        name: String,
    },

    /// Step size needs to be positive and finite.
    InvalidStepSize {
        step: f64,
        reason: &'static str,
    },

    /// Starting point entries need to be finite.
    InvalidStartingPoint {
        index: usize,
        value: f64,
    },

    // ---- Cost function ----
    /// Cost function returned a non-finite value.
    NonFiniteCost {
        value: f64,
    },

    // ---- Optimizer outcome ----
    /// Estimated parameters must be finite.
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Theta hat is missing
    MissingThetaHat,

    // ---- Argmin ---
    /// Wrapper for argmin::InvalidParameter
    InvalidParameter {
        text: String,
    },
    /// Wrapper for argmin::NotImplemented
    NotImplemented {
        text: String,
    },
    /// Wrapper for argmin::NotInitialized
    NotInitialized {
        text: String,
    },
    /// Wrapper for argmin::ConditionViolated
    ConditionViolated {
        text: String,
    },
    /// Wrapper for argmin::CheckPointNotFound
    CheckPointNotFound {
        text: String,
    },
    /// Wrapper for argmin::PotentialBug
    PotentialBug {
        text: String,
    },
    /// Wrapper for argmin::ImpossibleError
    ImpossibleError {
        text: String,
    },
    /// Wrapper for other argmin::Error types
    BackendError {
        text: String,
    },

    // ---- Finite Diffs / Covariance ----
    /// Hessian matrix dimensions do not match parameter dimensions.
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },

    /// Hessian values need to be finite.
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    /// Observed information is not positive definite, so it has no Cholesky inverse.
    NotPositiveDefinite {
        dim: usize,
    },

    // ---- Data ----
    /// Dataset has no rows or no columns.
    EmptyDataset {
        rows: usize,
        cols: usize,
    },

    /// Dataset cells need to be finite.
    NonFiniteData {
        row: usize,
        col: usize,
        value: f64,
    },

    /// Number of column names does not match the number of columns.
    ColumnNameMismatch {
        expected: usize,
        found: usize,
    },

    /// Dataset shape incompatible with the model.
    ShapeMismatch {
        min_cols: usize,
        found: usize,
        reason: &'static str,
    },

    /// Parameter vector length does not match the model's parameter count.
    ParameterCountMismatch {
        expected: usize,
        actual: usize,
    },

    /// Binary outcome cell is neither 0 nor 1.
    InvalidOutcome {
        row: usize,
        value: f64,
    },

    /// Count cell is negative.
    NegativeCount {
        row: usize,
        col: usize,
        value: f64,
    },

    /// Unknown capability flag name.
    UnknownInventoryFlag {
        name: String,
    },

    // ---- Constraints ----
    /// Constraint returned an unusable penalty or substitute.
    InvalidConstraint {
        index: usize,
        reason: &'static str,
    },

    // ---- Models ----
    /// Model name is empty or longer than the supported bound.
    InvalidModelName {
        len: usize,
    },

    /// Parameter outside the log-likelihood's domain.
    DomainViolation {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    /// Closed-form estimator has no well-defined answer for this dataset.
    DegenerateEstimate {
        reason: &'static str,
    },

    /// Fitted values do not have one entry per observation.
    FittedLengthMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Fallback ----
    UnknownError,
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => {
                write!(f, "Gradient optimization not implemented")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient dimension mismatch: expected {expected}, found {found}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Invalid gradient at index {index}: {value}: {reason}")
            }

            // ---- EstimationParams ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid cost function change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "No tolerances provided")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            OptError::InvalidMethodCode { code } => {
                write!(f, "Invalid method code {code}: valid codes are 0, 1, 2 and 3")
            }
            OptError::InvalidMethodName { name } => {
                write!(f, "Invalid method name '{name}'")
            }
            OptError::InvalidStepSize { step, reason } => {
                write!(f, "Invalid step size {step}: {reason}")
            }
            OptError::InvalidStartingPoint { index, value } => {
                write!(f, "Invalid starting point at index {index}: {value}, must be finite")
            }

            // ---- Cost function ----
            OptError::NonFiniteCost { value } => {
                write!(f, "Non-finite cost value: {value}")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Invalid estimated parameter at index {index}: {value}: {reason}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Missing estimated parameters (theta hat)")
            }

            // ---- Argmin ----
            OptError::InvalidParameter { text } => {
                write!(f, "Invalid parameter: {text}")
            }
            OptError::NotImplemented { text } => {
                write!(f, "Not implemented: {text}")
            }
            OptError::NotInitialized { text } => {
                write!(f, "Not initialized: {text}")
            }
            OptError::ConditionViolated { text } => {
                write!(f, "Condition violated: {text}")
            }
            OptError::CheckPointNotFound { text } => {
                write!(f, "Checkpoint not found: {text}")
            }
            OptError::PotentialBug { text } => {
                write!(f, "Potential bug: {text}")
            }
            OptError::ImpossibleError { text } => {
                write!(f, "Impossible error: {text}")
            }
            OptError::BackendError { text } => {
                write!(f, "Backend error: {text}")
            }

            // ---- Finite Diffs / Covariance ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(
                    f,
                    "Hessian dimension mismatch: expected ({expected}, {expected}), found {found:?}"
                )
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Invalid Hessian at ({row}, {col}): {value}, must be finite")
            }
            OptError::NotPositiveDefinite { dim } => {
                write!(f, "Observed information ({dim} x {dim}) is not positive definite")
            }

            // ---- Data ----
            OptError::EmptyDataset { rows, cols } => {
                write!(f, "Dataset is empty: {rows} rows, {cols} columns")
            }
            OptError::NonFiniteData { row, col, value } => {
                write!(f, "Non-finite data at ({row}, {col}): {value}")
            }
            OptError::ColumnNameMismatch { expected, found } => {
                write!(f, "Column name count mismatch: expected {expected}, found {found}")
            }
            OptError::ShapeMismatch { min_cols, found, reason } => {
                write!(f, "Dataset needs at least {min_cols} columns, found {found}: {reason}")
            }
            OptError::ParameterCountMismatch { expected, actual } => {
                write!(f, "Parameter count mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidOutcome { row, value } => {
                write!(f, "Invalid outcome at row {row}: {value}, must be 0 or 1")
            }
            OptError::NegativeCount { row, col, value } => {
                write!(f, "Negative count at ({row}, {col}): {value}")
            }
            OptError::UnknownInventoryFlag { name } => {
                write!(f, "Unknown capability flag '{name}'")
            }

            // ---- Constraints ----
            OptError::InvalidConstraint { index, reason } => {
                write!(f, "Constraint {index} is unusable: {reason}")
            }

            // ---- Models ----
            OptError::InvalidModelName { len } => {
                write!(f, "Invalid model name of length {len}: must be 1 to 100 characters")
            }
            OptError::DomainViolation { index, value, reason } => {
                write!(f, "Parameter {index} = {value} outside the model domain: {reason}")
            }
            OptError::DegenerateEstimate { reason } => {
                write!(f, "Degenerate estimate: {reason}")
            }
            OptError::FittedLengthMismatch { expected, found } => {
                write!(f, "Fitted values length mismatch: expected {expected}, found {found}")
            }

            // ---- Fallback ----
            OptError::UnknownError => {
                write!(f, "Unknown error")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(original_err: Error) -> Self {
        let original_err = match original_err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        match original_err.downcast() {
            Ok(argmin_err) => match argmin_err {
                ArgminError::InvalidParameter { text } => OptError::InvalidParameter { text },
                ArgminError::NotImplemented { text } => OptError::NotImplemented { text },
                ArgminError::NotInitialized { text } => OptError::NotInitialized { text },
                ArgminError::ConditionViolated { text } => OptError::ConditionViolated { text },
                ArgminError::CheckpointNotFound { text } => OptError::CheckPointNotFound { text },
                ArgminError::PotentialBug { text } => OptError::PotentialBug { text },
                ArgminError::ImpossibleError { text } => OptError::ImpossibleError { text },
                _ => OptError::UnknownError,
            },
            Err(err) => OptError::BackendError { text: err.to_string() },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Ensure an `OptError` that travelled through argmin's boxed error type
    // comes back as the same variant instead of a stringly backend error.
    //
    // Given
    // -----
    // - A `DomainViolation` converted into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - Converting back yields the identical `OptError`.
    fn from_argmin_error_recovers_original_opt_error() {
        // Arrange
        let original = OptError::DomainViolation { index: 0, value: -1.0, reason: "mean rank" };
        let boxed: Error = original.clone().into();

        // Act
        let recovered = OptError::from(boxed);

        // Assert
        assert_eq!(recovered, original);
    }

    #[test]
    // Purpose
    // -------
    // Verify that argmin's own error enum maps onto the matching wrapper.
    //
    // Given
    // -----
    // - `ArgminError::ConditionViolated` boxed as `argmin::core::Error`.
    //
    // Expect
    // ------
    // - `OptError::ConditionViolated` with the same text.
    fn from_argmin_error_maps_argmin_variants() {
        // Arrange
        let boxed: Error = ArgminError::ConditionViolated { text: "descent".to_string() }.into();

        // Act
        let mapped = OptError::from(boxed);

        // Assert
        assert_eq!(mapped, OptError::ConditionViolated { text: "descent".to_string() });
    }
}
