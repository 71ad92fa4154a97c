//! # Errors of observation functions
//!
//! Undefined features are not errors, they take the `NOT_APPLICABLE` value. What remains is misuse
//! of an observation function and a model that can't answer or answers inconsistently.
use thiserror::Error;

use crate::data::linear_algebra::matrix::ShapeError;
use crate::data::model::ModelError;
use crate::data::model::index::IndexError;

/// Failure of a reset or an extraction.
///
/// No partial observation is returned alongside an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservationError {
    /// An extraction was requested before the first reset.
    #[error("{observation}: extraction requested before the first reset")]
    NotReset {
        /// Name of the observation function.
        observation: &'static str,
    },
    /// The model failed to answer a query.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The model reported entities that can't be indexed, or referenced an unknown entity.
    #[error(transparent)]
    Index(#[from] IndexError),
    /// The model reported a relation that can't be stored as a sparse matrix, like a variable that
    /// appears twice in a row.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
