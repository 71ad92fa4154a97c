//! # Shared parts of the bipartite graph observations
//!
//! Both bipartite observations represent a problem as a graph with variables on one side, rows or
//! constraints on the other, and an edge for every non-zero coefficient.
use enum_map::Enum;

use crate::algorithm::utilities::{euclidean_norm, is_equal, nonzero_or_one};
use crate::data::linear_algebra::matrix::CooMatrix;
use crate::data::model::{VariableId, VariableIndex, VariableType};
use crate::observation::ObservationError;

/// How a row `lhs <= a x <= rhs` is read as a single inequality `sign * a x <= sign * side`.
///
/// The right-hand side is used when it is finite, otherwise the left-hand side with the row
/// negated. A row with neither side has no bias.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Orientation {
    pub sign: f64,
    pub side: Option<f64>,
    /// Left-hand side of a ranged row, which the row isn't read against.
    pub other_side: Option<f64>,
}

impl Orientation {
    pub(crate) fn of(lhs: Option<f64>, rhs: Option<f64>) -> Self {
        match (lhs, rhs) {
            (lhs, Some(rhs)) => Self { sign: 1f64, side: Some(rhs), other_side: lhs },
            (Some(lhs), None) => Self { sign: -1f64, side: Some(lhs), other_side: None },
            (None, None) => Self { sign: 1f64, side: None, other_side: None },
        }
    }

    /// Oriented right-hand side once the constant term of the activity is moved over.
    pub(crate) fn bias(&self, constant: f64) -> f64 {
        self.side.map_or(f64::NAN, |side| self.sign * (side - constant))
    }

    /// Whether a row with this activity is at either of its finite sides.
    pub(crate) fn is_tight(&self, activity: f64) -> bool {
        [self.side, self.other_side].into_iter().flatten().any(|side| is_equal(activity, side))
    }
}

/// Norm of a row's coefficient vector, used to normalize; one for an empty row.
pub(crate) fn row_norm(coefficients: &[(VariableId, f64)]) -> f64 {
    nonzero_or_one(euclidean_norm(coefficients.iter().map(|&(_, value)| value)))
}

/// Norm of the objective, used to normalize; one for a zero objective.
pub(crate) fn objective_norm(objective: impl IntoIterator<Item = f64>) -> f64 {
    nonzero_or_one(euclidean_norm(objective))
}

/// Build the edges of the graph, one for each non-zero coefficient.
///
/// # Arguments
///
/// * `rows`: The rows in index order, each with the factor to multiply its coefficients by.
/// * `nr_rows`: Number of rows.
/// * `variable_index`: Index of the variables that the coefficients refer to.
///
/// # Return value
///
/// A matrix with a row for each row and a column for each variable.
///
/// # Errors
///
/// If a coefficient refers to an unknown variable, or a variable appears twice in a row.
pub(crate) fn edges<'a>(
    rows: impl IntoIterator<Item = (&'a [(VariableId, f64)], f64)>,
    nr_rows: usize,
    variable_index: &VariableIndex,
) -> Result<CooMatrix<f64>, ObservationError> {
    let mut triplets = Vec::new();
    for (i, (coefficients, factor)) in rows.into_iter().enumerate() {
        for &(variable, value) in coefficients {
            let j = variable_index.require(variable, "variable in row")?;
            triplets.push((i, j, factor * value));
        }
    }

    Ok(CooMatrix::from_triplets(triplets, (nr_rows, variable_index.len()))?)
}

/// One-hot encoding of the variable type, in the order binary, integer, implicit integer,
/// continuous.
pub(crate) fn type_flags(variable_type: VariableType) -> [f64; 4] {
    let mut flags = [0f64; 4];
    flags[variable_type.into_usize()] = 1f64;

    flags
}
