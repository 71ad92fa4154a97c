//! # Sparse matrix in coordinate format
//!
//! A list of non-zero values, together with their coordinates. There is one index row for each
//! dimension of the matrix and one index column for each non-zero value, like Scipy's `coo_matrix`
//! or the sparse tensors of PyTorch.
use std::collections::HashSet;

use itertools::Itertools;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A `(values, indices, shape)` triple violating the `CooMatrix` invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// The number of index rows doesn't match the number of dimensions of the shape.
    #[error("{nr_index_rows} index rows for a shape of {nr_dimensions} dimensions")]
    Dimensions {
        /// Number of index rows provided.
        nr_index_rows: usize,
        /// Number of dimensions in the shape.
        nr_dimensions: usize,
    },
    /// A sequence of values has the wrong length.
    #[error("length {len} along dimension {dimension}, expected {expected}")]
    Length {
        /// Which dimension or index row was inspected.
        dimension: usize,
        /// Length encountered.
        len: usize,
        /// Length required.
        expected: usize,
    },
    /// An index exceeds the extent of its dimension.
    #[error("index {index} out of bounds for dimension {dimension} of extent {extent}")]
    OutOfBounds {
        /// Dimension of the index.
        dimension: usize,
        /// The index value.
        index: usize,
        /// Size of the dimension.
        extent: usize,
    },
    /// Two non-zero values share the same coordinate.
    #[error("duplicate coordinate {coordinate:?}")]
    Duplicate {
        /// The coordinate that appears more than once.
        coordinate: Vec<usize>,
    },
}

/// Sparse matrix in coordinate format.
///
/// The `k`'th non-zero value `values[k]` lives at coordinate
/// `(indices[0][k], indices[1][k], ...)`. There are as many index rows as `shape` has dimensions.
///
/// The order of the non-zero values is not specified, but extraction of the same solver state
/// produces the same order. Coordinates are unique.
///
/// Equality and cloning are value based. There is no densification; a consumer that needs a dense
/// view builds it from the three fields.
///
/// Deserialization checks the same invariants as `CooMatrix::new`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CooParts<T>")]
pub struct CooMatrix<T> {
    values: Vec<T>,
    indices: Vec<Vec<usize>>,
    shape: Vec<usize>,
}

/// Unchecked fields of a `CooMatrix`, as they are read.
#[derive(Deserialize)]
struct CooParts<T> {
    values: Vec<T>,
    indices: Vec<Vec<usize>>,
    shape: Vec<usize>,
}

impl<T> TryFrom<CooParts<T>> for CooMatrix<T> {
    type Error = ShapeError;

    fn try_from(CooParts { values, indices, shape }: CooParts<T>) -> Result<Self, Self::Error> {
        Self::new(values, indices, shape)
    }
}

impl<T> CooMatrix<T> {
    /// Create a new instance after checking consistency of the triple.
    ///
    /// # Arguments
    ///
    /// * `values`: The non-zero values.
    /// * `indices`: One row per dimension, each as long as `values`.
    /// * `shape`: Extent of the matrix in each dimension, as if it were dense.
    ///
    /// # Errors
    ///
    /// If the lengths disagree, an index is out of bounds or a coordinate appears twice.
    pub fn new(values: Vec<T>, indices: Vec<Vec<usize>>, shape: Vec<usize>) -> Result<Self, ShapeError> {
        if indices.len() != shape.len() {
            return Err(ShapeError::Dimensions {
                nr_index_rows: indices.len(),
                nr_dimensions: shape.len(),
            });
        }
        for (dimension, (row, &extent)) in indices.iter().zip(&shape).enumerate() {
            if row.len() != values.len() {
                return Err(ShapeError::Length { dimension, len: row.len(), expected: values.len() });
            }
            if let Some(&index) = row.iter().find(|&&index| index >= extent) {
                return Err(ShapeError::OutOfBounds { dimension, index, extent });
            }
        }

        let mut seen = HashSet::with_capacity(values.len());
        for k in 0..values.len() {
            let coordinate = indices.iter().map(|row| row[k]).collect_vec();
            if !seen.insert(coordinate.clone()) {
                return Err(ShapeError::Duplicate { coordinate });
            }
        }
        debug_assert!(values.len() <= shape.iter().product::<usize>());

        Ok(Self { values, indices, shape })
    }

    /// Number of non-zero values.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// The non-zero values.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// One row of indices per dimension.
    #[must_use]
    pub fn indices(&self) -> &[Vec<usize>] {
        &self.indices
    }

    /// The dimensions of the matrix, as if it were dense.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    #[must_use]
    pub fn nr_dimensions(&self) -> usize {
        self.shape.len()
    }

    /// Coordinate of the `k`'th non-zero value.
    #[must_use]
    pub fn coordinate(&self, k: usize) -> Vec<usize> {
        debug_assert!(k < self.nnz());

        self.indices.iter().map(|row| row[k]).collect()
    }

    /// Take the matrix apart.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Vec<Vec<usize>>, Vec<usize>) {
        (self.values, self.indices, self.shape)
    }

    /// Iterate over the `(row, column, value)` triplets of a two dimensional matrix.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        debug_assert_eq!(self.nr_dimensions(), 2);

        self.indices[0].iter()
            .zip(&self.indices[1])
            .zip(&self.values)
            .map(|((&i, &j), value)| (i, j, value))
    }

    /// Apply `f` to all values, keeping the coordinates.
    pub fn map_values(&mut self, mut f: impl FnMut(usize, &mut T)) {
        for (k, value) in self.values.iter_mut().enumerate() {
            f(k, value);
        }
    }
}

impl<T: Zero> CooMatrix<T> {
    /// Create a two dimensional matrix from `(row, column, value)` triplets.
    ///
    /// Zero values are not stored.
    ///
    /// # Errors
    ///
    /// If a coordinate is out of bounds or appears twice.
    pub fn from_triplets(
        triplets: impl IntoIterator<Item = (usize, usize, T)>,
        (nr_rows, nr_columns): (usize, usize),
    ) -> Result<Self, ShapeError> {
        let mut values = Vec::new();
        let mut rows = Vec::new();
        let mut columns = Vec::new();
        for (i, j, value) in triplets {
            if !value.is_zero() {
                values.push(value);
                rows.push(i);
                columns.push(j);
            }
        }

        Self::new(values, vec![rows, columns], vec![nr_rows, nr_columns])
    }
}
