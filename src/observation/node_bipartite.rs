//! # Bipartite graph of the LP relaxation at a node
//!
//! Variables on one side, LP rows on the other and an edge for every non-zero coefficient. The
//! features are those of Gasse et al. (2019), "Exact combinatorial optimization with graph
//! convolutional neural networks".
//!
//! With caching enabled, the features that only depend on the structure of the problem (objective,
//! variable types, row sides and coefficients) are computed at the first extraction of an episode
//! and reused afterwards. That is only correct when no rows are added or removed during the
//! episode, like when cutting planes are disabled. When the variables or rows do change, the cache
//! is rebuilt and a warning is logged.
use enum_map::Enum;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::utilities::{fractional_part, indicator, is_equal};
use crate::data::linear_algebra::matrix::{CooMatrix, DenseMatrix};
use crate::data::model::{
    BasisStatus, Column, LpStatistics, Model, Row, RowId, RowIndex, Variable, VariableId,
    VariableIndex,
};
use crate::observation::{
    Episode, indexed_variables, NOT_APPLICABLE, ObservationError, ObservationFunction, unless_finished,
};
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
    NormedReducedCost,
    SolutionValue,
    SolutionFrac,
    IsSolutionAtLowerBound,
    IsSolutionAtUpperBound,
    ScaledAge,
    IncumbentValue,
    AverageIncumbentValue,
    IsBasisLower,
    IsBasisBasic,
    IsBasisUpper,
    IsBasisZero,
}

/// Columns of the row feature matrix.
#[allow(missing_docs)]
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RowFeature {
    Bias,
    ObjectiveCosineSimilarity,
    IsTight,
    DualSolutionValue,
    ScaledAge,
}

/// The variable type flags, in the order of `bipartite::type_flags`.
const TYPE_FLAGS: [VariableFeature; 4] = [
    VariableFeature::IsTypeBinary,
    VariableFeature::IsTypeInteger,
    VariableFeature::IsTypeImplicitInteger,
    VariableFeature::IsTypeContinuous,
];

/// Offset in the scaled age to dampen the values early in the search.
const AGE_OFFSET: f64 = 5f64;

/// Graph of the LP relaxation at the focus node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeBipartiteObservation {
    /// One row per variable, one column per `VariableFeature`.
    pub variable_features: DenseMatrix,
    /// One row per LP row, one column per `RowFeature`.
    pub row_features: DenseMatrix,
    /// Coefficients, with shape (number of rows, number of variables).
    pub edge_features: CooMatrix<f64>,
}

/// Extracts a `NodeBipartiteObservation`.
#[derive(Clone, Debug)]
pub struct NodeBipartite {
    cache: bool,
    /// Static features, once computed in this episode.
    episode: Episode<Option<StaticFeatures>>,
}

impl NodeBipartite {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `cache`: Whether to reuse the static features during an episode. Only valid when rows
    /// aren't added during the episode.
    #[must_use]
    pub fn new(cache: bool) -> Self {
        Self { cache, episode: Episode::default() }
    }
}

impl Default for NodeBipartite {
    fn default() -> Self {
        Self::new(false)
    }
}

impl ObservationFunction for NodeBipartite {
    /// `None` when the solve finished before the last extraction.
    type Observation = Option<NodeBipartiteObservation>;
    const NAME: &'static str = "node_bipartite";

    fn reset<M: Model + ?Sized>(&mut self, _model: &M) -> Result<(), ObservationError> {
        debug!("{}: reset (cache: {})", Self::NAME, self.cache);
        // The LP might not be solved yet, the cache is filled at the first extraction
        self.episode.start(None);

        Ok(())
    }

    fn extract<M: Model + ?Sized>(
        &mut self,
        model: &M,
        done: bool,
    ) -> Result<Self::Observation, ObservationError> {
        let cache = self.cache;
        let cached = self.episode.ready_mut(Self::NAME)?;
        let observation = unless_finished(Self::NAME, done, observe(model, cache.then_some(cached)))?;

        if let Some(observation) = &observation {
            debug!(
                "{}: extracted {} variables, {} rows, {} edges (done: {})",
                Self::NAME,
                observation.variable_features.nr_rows(),
                observation.row_features.nr_rows(),
                observation.edge_features.nnz(),
                done,
            );
        }
        Ok(observation)
    }
}

/// Build the observation, reusing the static features in `cached` when given.
fn observe<M: Model + ?Sized>(
    model: &M,
    cached: Option<&mut Option<StaticFeatures>>,
) -> Result<NodeBipartiteObservation, ObservationError> {
    let snapshot = Snapshot::query(model)?;
    let Some(cached) = cached else {
        return Ok(snapshot.complete(&StaticFeatures::compute(&snapshot)?));
    };

    let statics = match cached.take() {
        Some(statics) if statics.matches(&snapshot) => statics,
        Some(_) => {
            warn!(
                "{}: variables or rows changed during the episode, rebuilding the cache",
                NodeBipartite::NAME,
            );
            StaticFeatures::compute(&snapshot)?
        }
        None => StaticFeatures::compute(&snapshot)?,
    };
    let observation = snapshot.complete(&statics);
    *cached = Some(statics);

    Ok(observation)
}

/// Everything queried from the model for a single extraction, in index order.
struct Snapshot {
    variable_index: VariableIndex,
    variables: Vec<Variable>,
    row_index: RowIndex,
    rows: Vec<Row>,
    /// By variable index; variables that are not in the LP have no column.
    columns: Vec<Option<Column>>,
    statistics: LpStatistics,
    orientations: Vec<Orientation>,
    row_norms: Vec<f64>,
    objective_norm: f64,
}

impl Snapshot {
    fn query<M: Model + ?Sized>(model: &M) -> Result<Self, ObservationError> {
        let (variable_index, variables) = indexed_variables(model)?;
        let (row_index, rows) = RowIndex::order(model.lp_rows()?)?;

        let mut columns = vec![None; variables.len()];
        for column in model.lp_columns()? {
            let i = variable_index.require(column.variable, "variable of LP column")?;
            columns[i] = Some(column);
        }

        let orientations = rows.iter().map(|row| Orientation::of(row.lhs, row.rhs)).collect();
        let row_norms = rows.iter().map(|row| row_norm(&row.coefficients)).collect();
        let objective_norm = objective_norm(variables.iter().map(|variable| variable.objective));

        Ok(Self {
            variable_index,
            variables,
            row_index,
            rows,
            columns,
            statistics: model.lp_statistics()?,
            orientations,
            row_norms,
            objective_norm,
        })
    }

    fn scaled_age(&self, age: u64) -> f64 {
        age as f64 / (self.statistics.nr_lps as f64 + AGE_OFFSET)
    }

    /// Add the dynamic features to a copy of the static ones.
    fn complete(&self, statics: &StaticFeatures) -> NodeBipartiteObservation {
        let mut variable_features = statics.variable_features.clone();
        for (i, (variable, column)) in self.variables.iter().zip(&self.columns).enumerate() {
            let row = variable_features.row_mut(i);
            let mut set = |feature: VariableFeature, value: f64| row[feature.into_usize()] = value;

            set(VariableFeature::HasLowerBound, indicator(variable.lower_bound.is_some()));
            set(VariableFeature::HasUpperBound, indicator(variable.upper_bound.is_some()));

            // Without a column, the LP derived features keep the value they were created with
            let Some(column) = column else { continue; };
            let value = column.solution_value;
            set(VariableFeature::NormedReducedCost, column.reduced_cost / self.objective_norm);
            set(VariableFeature::SolutionValue, value);
            set(
                VariableFeature::SolutionFrac,
                if variable.variable_type.is_discrete() { fractional_part(value) } else { 0f64 },
            );
            set(
                VariableFeature::IsSolutionAtLowerBound,
                indicator(variable.lower_bound.is_some_and(|bound| is_equal(value, bound))),
            );
            set(
                VariableFeature::IsSolutionAtUpperBound,
                indicator(variable.upper_bound.is_some_and(|bound| is_equal(value, bound))),
            );
            set(VariableFeature::ScaledAge, self.scaled_age(column.age));
            set(VariableFeature::IncumbentValue, column.incumbent_value.unwrap_or(NOT_APPLICABLE));
            set(VariableFeature::AverageIncumbentValue, column.average_incumbent_value);
            for (status, feature) in [
                (BasisStatus::Lower, VariableFeature::IsBasisLower),
                (BasisStatus::Basic, VariableFeature::IsBasisBasic),
                (BasisStatus::Upper, VariableFeature::IsBasisUpper),
                (BasisStatus::Zero, VariableFeature::IsBasisZero),
            ] {
                set(feature, indicator(column.basis_status == status));
            }
        }

        let mut row_features = statics.row_features.clone();
        for (i, row) in self.rows.iter().enumerate() {
            let orientation = self.orientations[i];
            let features = row_features.row_mut(i);
            features[RowFeature::IsTight.into_usize()] = indicator(orientation.is_tight(row.activity));
            features[RowFeature::DualSolutionValue.into_usize()] =
                orientation.sign * row.dual_value / (self.row_norms[i] * self.objective_norm);
            features[RowFeature::ScaledAge.into_usize()] = self.scaled_age(row.age);
        }

        NodeBipartiteObservation {
            variable_features,
            row_features,
            edge_features: statics.edge_features.clone(),
        }
    }
}

/// Features that don't change as long as the variables and rows stay the same.
///
/// The matrices are full width; dynamic columns are `NOT_APPLICABLE` until filled.
#[derive(Clone, Debug)]
struct StaticFeatures {
    variable_ids: Vec<VariableId>,
    row_ids: Vec<RowId>,
    variable_features: DenseMatrix,
    row_features: DenseMatrix,
    edge_features: CooMatrix<f64>,
}

impl StaticFeatures {
    fn compute(snapshot: &Snapshot) -> Result<Self, ObservationError> {
        let nr_variables = snapshot.variables.len();
        let nr_rows = snapshot.rows.len();

        let mut variable_features = DenseMatrix::filled(nr_variables, VariableFeature::LENGTH, NOT_APPLICABLE);
        let mut objective = vec![0f64; nr_variables];
        for (i, variable) in snapshot.variables.iter().enumerate() {
            objective[i] = variable.objective;
            let row = variable_features.row_mut(i);
            row[VariableFeature::Objective.into_usize()] = variable.objective / snapshot.objective_norm;
            for (feature, flag) in TYPE_FLAGS.into_iter().zip(type_flags(variable.variable_type)) {
                row[feature.into_usize()] = flag;
            }
        }

        let mut row_features = DenseMatrix::filled(nr_rows, RowFeature::LENGTH, NOT_APPLICABLE);
        for (i, row) in snapshot.rows.iter().enumerate() {
            let orientation = snapshot.orientations[i];
            let norm = snapshot.row_norms[i];
            let features = row_features.row_mut(i);
            features[RowFeature::Bias.into_usize()] = orientation.bias(row.constant) / norm;
            features[RowFeature::ObjectiveCosineSimilarity.into_usize()] = orientation.sign
                * cosine_similarity(row, &objective, norm, snapshot.objective_norm, &snapshot.variable_index)?;
        }

        let edge_features = edges(
            snapshot.rows.iter()
                .zip(snapshot.orientations.iter().zip(&snapshot.row_norms))
                .map(|(row, (orientation, norm))| (&row.coefficients[..], orientation.sign / norm)),
            nr_rows,
            &snapshot.variable_index,
        )?;

        Ok(Self {
            variable_ids: snapshot.variable_index.ids().to_vec(),
            row_ids: snapshot.row_index.ids().to_vec(),
            variable_features,
            row_features,
            edge_features,
        })
    }

    /// Whether these features were computed for the same variables and rows.
    fn matches(&self, snapshot: &Snapshot) -> bool {
        self.variable_ids == snapshot.variable_index.ids() && self.row_ids == snapshot.row_index.ids()
    }
}

/// Cosine of the angle between a row and the objective, zero when either vanishes.
///
/// The norms are those that are used for normalization, which are one for a zero vector.
fn cosine_similarity(
    row: &Row,
    objective: &[f64],
    row_norm: f64,
    objective_norm: f64,
    variable_index: &VariableIndex,
) -> Result<f64, ObservationError> {
    let mut dot = 0f64;
    for &(variable, coefficient) in &row.coefficients {
        dot += coefficient * objective[variable_index.require(variable, "variable in row")?];
    }

    Ok(dot / (row_norm * objective_norm))
}
