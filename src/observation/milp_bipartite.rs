//! # Bipartite graph of the MILP
//!
//! Like the node bipartite observation, but built from the linear constraints of the most recently
//! materialized problem rather than the LP of a node. This makes it usable during presolving, when
//! there is no LP yet.
//!
//! Nothing is cached: presolving may change the problem between any two extractions.
use enum_map::Enum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::utilities::{indicator, nonzero_or_one};
use crate::data::linear_algebra::matrix::{CooMatrix, DenseMatrix};
use crate::data::model::{ConstraintIndex, Model};
use crate::observation::{Episode, indexed_variables, ObservationError, ObservationFunction};
use crate::observation::bipartite::{edges, objective_norm, Orientation, row_norm, type_flags};

/// Columns of the variable feature matrix.
#[allow(missing_docs)]
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VariableFeature {
    Objective,
    IsTypeBinary,
    IsTypeInteger,
    IsTypeImplicitInteger,
    IsTypeContinuous,
    HasLowerBound,
    HasUpperBound,
    /// Zero when there is no lower bound.
    LowerBound,
    /// Zero when there is no upper bound.
    UpperBound,
}

/// Columns of the constraint feature matrix.
#[allow(missing_docs)]
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ConstraintFeature {
    Bias,
}

const TYPE_FLAGS: [VariableFeature; 4] = [
    VariableFeature::IsTypeBinary,
    VariableFeature::IsTypeInteger,
    VariableFeature::IsTypeImplicitInteger,
    VariableFeature::IsTypeContinuous,
];

/// Graph of the linear constraints of the MILP.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MilpBipartiteObservation {
    /// One row per variable, one column per `VariableFeature`.
    pub variable_features: DenseMatrix,
    /// One row per constraint, one column per `ConstraintFeature`.
    pub constraint_features: DenseMatrix,
    /// Coefficients, with shape (number of constraints, number of variables).
    pub edge_features: CooMatrix<f64>,
}

/// Extracts a `MilpBipartiteObservation`.
#[derive(Clone, Debug, Default)]
pub struct MilpBipartite {
    normalize: bool,
    episode: Episode<()>,
}

impl MilpBipartite {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `normalize`: Whether to rescale the features, which is recommended before feeding them
    /// to a gradient based model. Constraints are divided by their norm, the objective by its norm
    /// and each bound column by its largest absolute value.
    #[must_use]
    pub fn new(normalize: bool) -> Self {
        Self { normalize, episode: Episode::default() }
    }
}

impl ObservationFunction for MilpBipartite {
    type Observation = MilpBipartiteObservation;
    const NAME: &'static str = "milp_bipartite";

    fn reset<M: Model + ?Sized>(&mut self, _model: &M) -> Result<(), ObservationError> {
        self.episode.start(());
        Ok(())
    }

    fn extract<M: Model + ?Sized>(
        &mut self,
        model: &M,
        done: bool,
    ) -> Result<Self::Observation, ObservationError> {
        self.episode.ready(Self::NAME)?;

        let (variable_index, variables) = indexed_variables(model)?;
        let (_, constraints) = ConstraintIndex::order(model.constraints()?)?;

        let objective_factor = if self.normalize {
            objective_norm(variables.iter().map(|variable| variable.objective))
        } else {
            1f64
        };
        let mut variable_features = DenseMatrix::zeros(variables.len(), VariableFeature::LENGTH);
        for (i, variable) in variables.iter().enumerate() {
            let row = variable_features.row_mut(i);
            row[VariableFeature::Objective.into_usize()] = variable.objective / objective_factor;
            for (feature, flag) in TYPE_FLAGS.into_iter().zip(type_flags(variable.variable_type)) {
                row[feature.into_usize()] = flag;
            }
            row[VariableFeature::HasLowerBound.into_usize()] = indicator(variable.lower_bound.is_some());
            row[VariableFeature::HasUpperBound.into_usize()] = indicator(variable.upper_bound.is_some());
            row[VariableFeature::LowerBound.into_usize()] = variable.lower_bound.unwrap_or(0f64);
            row[VariableFeature::UpperBound.into_usize()] = variable.upper_bound.unwrap_or(0f64);
        }
        if self.normalize {
            for feature in [VariableFeature::LowerBound, VariableFeature::UpperBound] {
                let j = feature.into_usize();
                let largest = variable_features.column(j).into_iter()
                    .filter(|value| value.is_finite())
                    .fold(0f64, |largest, value| largest.max(value.abs()));
                variable_features.divide_column(j, nonzero_or_one(largest));
            }
        }

        let factors = constraints.iter()
            .map(|constraint| {
                let orientation = Orientation::of(constraint.lhs, constraint.rhs);
                let norm = if self.normalize { row_norm(&constraint.coefficients) } else { 1f64 };
                (orientation, norm)
            })
            .collect::<Vec<_>>();

        let mut constraint_features = DenseMatrix::zeros(constraints.len(), ConstraintFeature::LENGTH);
        for (i, (orientation, norm)) in factors.iter().enumerate() {
            constraint_features.set_value(i, ConstraintFeature::Bias.into_usize(), orientation.bias(0f64) / norm);
        }

        let edge_features = edges(
            constraints.iter()
                .zip(&factors)
                .map(|(constraint, (orientation, norm))| (&constraint.coefficients[..], orientation.sign / norm)),
            constraints.len(),
            &variable_index,
        )?;

        debug!(
            "{}: extracted {} variables, {} constraints, {} edges (done: {})",
            Self::NAME,
            variables.len(),
            constraints.len(),
            edge_features.nnz(),
            done,
        );
        Ok(MilpBipartiteObservation { variable_features, constraint_features, edge_features })
    }
}
