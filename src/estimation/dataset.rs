//! Dataset container shared by every model.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the dense observation matrix a
//! model is estimated on, together with optional column names used to label
//! parameters.
//!
//! Key behaviors
//! -------------
//! - [`Dataset::new`] enforces basic invariants (at least one row and one
//!   column, every cell finite).
//! - [`Dataset::with_names`] attaches one name per column.
//!
//! Invariants & assumptions
//! ------------------------
//! - Rows are observations, columns are variables.
//! - The matrix is read-only after construction; estimations borrow it.
//! - Model-specific layout rules (outcome column, rank columns) are checked
//!   by the models themselves, not here.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path, empty matrices, non-finite cells, and
//!   name-count mismatches.
use crate::optimization::errors::{OptError, OptResult};
use ndarray::{Array2, ArrayView1};

/// `Dataset` — validated observation matrix plus optional column names.
///
/// Fields
/// ------
/// - `matrix`: `Array2<f64>`
///   Observations by row, variables by column. Non-empty and finite.
/// - `names`: `Option<Vec<String>>`
///   One label per column when present.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    matrix: Array2<f64>,
    names: Option<Vec<String>>,
}

impl Dataset {
    /// Construct a validated [`Dataset`].
    ///
    /// Errors
    /// ------
    /// - `OptError::EmptyDataset { rows, cols }` when either dimension is 0.
    /// - `OptError::NonFiniteData { row, col, value }` for the first NaN or
    ///   ±∞ cell in row-major order.
    pub fn new(matrix: Array2<f64>) -> OptResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows == 0 || cols == 0 {
            return Err(OptError::EmptyDataset { rows, cols });
        }
        if let Some(((row, col), &value)) = matrix.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(OptError::NonFiniteData { row, col, value });
        }
        Ok(Self { matrix, names: None })
    }

    /// Attach column names.
    ///
    /// Errors
    /// ------
    /// - `OptError::ColumnNameMismatch` when `names.len() != ncols()`.
    pub fn with_names<S: Into<String>>(
        mut self, names: impl IntoIterator<Item = S>,
    ) -> OptResult<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != self.ncols() {
            return Err(OptError::ColumnNameMismatch { expected: self.ncols(), found: names.len() });
        }
        self.names = Some(names);
        Ok(self)
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn column(&self, col: usize) -> ArrayView1<'_, f64> {
        self.matrix.column(col)
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }
}
