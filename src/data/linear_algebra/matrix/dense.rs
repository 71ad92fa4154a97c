//! # Dense feature matrix
//!
//! Row-major storage of `f64` values. Dimensions are fixed at creation.
use std::slice::{Chunks, Iter};

use serde::{Deserialize, Serialize};

use crate::data::linear_algebra::matrix::ShapeError;

/// Uses a single row-major `Vec<f64>` as underlying data structure.
///
/// Rows correspond to entities (variables, rows of the LP), columns to features. A matrix with zero
/// rows is valid; it is what an empty problem produces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DenseMatrix {
    data: Vec<f64>,
    nr_rows: usize,
    nr_columns: usize,
}

impl DenseMatrix {
    /// Create a matrix of dimension `nr_rows` x `nr_columns` with every value equal to `value`.
    #[must_use]
    pub fn filled(nr_rows: usize, nr_columns: usize, value: f64) -> Self {
        Self {
            data: vec![value; nr_rows * nr_columns],
            nr_rows,
            nr_columns,
        }
    }

    /// Create a matrix of zero's of dimension `nr_rows` x `nr_columns`.
    #[must_use]
    pub fn zeros(nr_rows: usize, nr_columns: usize) -> Self {
        Self::filled(nr_rows, nr_columns, 0f64)
    }

    /// Create a `DenseMatrix` from row data.
    ///
    /// # Arguments
    ///
    /// * `nr_columns`: Width of the matrix, needed because `rows` might be empty.
    /// * `rows`: Values, one inner `Vec` per row.
    ///
    /// # Errors
    ///
    /// When a row doesn't have exactly `nr_columns` values.
    pub fn from_rows(nr_columns: usize, rows: Vec<Vec<f64>>) -> Result<Self, ShapeError> {
        let nr_rows = rows.len();
        let mut data = Vec::with_capacity(nr_rows * nr_columns);
        for row in rows {
            if row.len() != nr_columns {
                return Err(ShapeError::Length { dimension: 1, len: row.len(), expected: nr_columns });
            }
            data.extend(row);
        }

        Ok(Self { data, nr_rows, nr_columns })
    }

    /// Get the value at coordinate (`i`, `j`).
    #[must_use]
    pub fn get_value(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.nr_rows);
        debug_assert!(j < self.nr_columns);

        self.data[i * self.nr_columns + j]
    }

    /// Set the value at coordinate (`i`, `j`) to `value`.
    pub fn set_value(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i < self.nr_rows);
        debug_assert!(j < self.nr_columns);

        self.data[i * self.nr_columns + j] = value;
    }

    /// Get all values in row `i` of this matrix.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        debug_assert!(i < self.nr_rows);

        &self.data[i * self.nr_columns..(i + 1) * self.nr_columns]
    }

    /// Mutable access to all values in row `i` of this matrix.
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        debug_assert!(i < self.nr_rows);

        &mut self.data[i * self.nr_columns..(i + 1) * self.nr_columns]
    }

    /// Get all values in column `j` of this matrix.
    #[must_use]
    pub fn column(&self, j: usize) -> Vec<f64> {
        debug_assert!(j < self.nr_columns);

        self.data.iter().skip(j).step_by(self.nr_columns).copied().collect()
    }

    /// Divide all values in column `j` by `factor`.
    pub fn divide_column(&mut self, j: usize, factor: f64) {
        debug_assert!(j < self.nr_columns);

        for i in 0..self.nr_rows {
            self.data[i * self.nr_columns + j] /= factor;
        }
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> Chunks<'_, f64> {
        // `chunks` panics on a zero chunk size
        self.data.chunks(self.nr_columns.max(1))
    }

    /// All values, row after row.
    pub fn values(&self) -> Iter<'_, f64> {
        self.data.iter()
    }

    /// Get the number of rows in this matrix.
    #[must_use]
    pub fn nr_rows(&self) -> usize {
        self.nr_rows
    }

    /// Get the number of columns in this matrix.
    #[must_use]
    pub fn nr_columns(&self) -> usize {
        self.nr_columns
    }

    /// Get the number of values in this matrix.
    #[must_use]
    pub fn size(&self) -> usize {
        self.nr_rows * self.nr_columns
    }

    /// Whether all values are bit-for-bit equal.
    ///
    /// Unlike `==`, two `NaN` values with the same bit pattern compare equal.
    #[must_use]
    pub fn is_identical_to(&self, other: &Self) -> bool {
        self.nr_rows == other.nr_rows
            && self.nr_columns == other.nr_columns
            && self.data.iter().zip(&other.data).all(|(a, b)| a.to_bits() == b.to_bits())
    }
}
