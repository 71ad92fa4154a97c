//! # Instance features of Hutter et al. (2011)
//!
//! From "Algorithm runtime prediction: methods & evaluation". A single vector describing the whole
//! problem: its size, the degrees in the variable-constraint graph, the LP relaxation and the
//! distribution of the coefficients.
//!
//! The structure is read from the linear constraints of the most recent MILP, the LP features from
//! the current LP relaxation. Nothing is cached.
use enum_map::Enum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::algorithm::statistics::{quantile, Summary};
use crate::algorithm::utilities::{euclidean_norm, fractional_part, ratio};
use crate::data::model::{ConstraintIndex, Model, VariableType};
use crate::observation::{
    Episode, indexed_variables, NOT_APPLICABLE, ObservationError, ObservationFunction, unless_finished,
};
use crate::observation::bipartite::Orientation;

/// Entries of the feature vector.
#[allow(missing_docs)]
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Hutter2011Feature {
    NbVariables,
    NbConstraints,
    NbNonzeroCoefs,
    VariableNodeDegreeMean,
    VariableNodeDegreeMax,
    VariableNodeDegreeMin,
    VariableNodeDegreeStd,
    ConstraintNodeDegreeMean,
    ConstraintNodeDegreeMax,
    ConstraintNodeDegreeMin,
    ConstraintNodeDegreeStd,
    NodeDegreeMean,
    NodeDegreeMax,
    NodeDegreeMin,
    NodeDegreeStd,
    NodeDegree25q,
    NodeDegree75q,
    EdgeDensity,
    LpSlackMean,
    LpSlackMax,
    LpSlackL2,
    LpObjectiveValue,
    ObjectiveCoefMStd,
    ObjectiveCoefNStd,
    ObjectiveCoefSqrtnStd,
    ConstraintCoefMean,
    ConstraintCoefStd,
    ConstraintVarCoefMean,
    ConstraintVarCoefStd,
    DiscreteVarsSupportSizeMean,
    DiscreteVarsSupportSizeStd,
    RatioUnboundedDiscreteVars,
    RatioContinuousVars,
}

/// Features of a problem instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hutter2011Observation {
    /// One value per `Hutter2011Feature`, in declaration order.
    pub features: Vec<f64>,
}

impl Hutter2011Observation {
    /// Number of features.
    pub const NR_FEATURES: usize = Hutter2011Feature::LENGTH;

    /// Value of a single feature.
    #[must_use]
    pub fn feature(&self, feature: Hutter2011Feature) -> f64 {
        self.features[feature.into_usize()]
    }
}

/// Extracts a `Hutter2011Observation`.
#[derive(Clone, Debug, Default)]
pub struct Hutter2011 {
    episode: Episode<()>,
}

impl Hutter2011 {
    /// Create a new instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObservationFunction for Hutter2011 {
    /// `None` when the solve finished before the last extraction.
    type Observation = Option<Hutter2011Observation>;
    const NAME: &'static str = "hutter2011";

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
        let observation = unless_finished(Self::NAME, done, observe(model))?;
        debug!("{}: extracted (done: {})", Self::NAME, done);
        Ok(observation)
    }
}

fn observe<M: Model + ?Sized>(model: &M) -> Result<Hutter2011Observation, ObservationError> {
    use Hutter2011Feature::*;

    let (index, variables) = indexed_variables(model)?;
    let (_, constraints) = ConstraintIndex::order(model.constraints()?)?;
    let nr_variables = variables.len();
    let nr_constraints = constraints.len();

    let mut features = vec![NOT_APPLICABLE; Hutter2011Feature::LENGTH];
    let mut set = |feature: Hutter2011Feature, value: f64| features[feature.into_usize()] = value;

    // Variable-constraint graph
    let mut variable_degrees = vec![0f64; nr_variables];
    // Coefficients divided by the side of their constraint, per variable
    let mut variable_coefficients = vec![Vec::new(); nr_variables];
    let mut constraint_means = Vec::with_capacity(nr_constraints);
    for constraint in &constraints {
        let orientation = Orientation::of(constraint.lhs, constraint.rhs);
        let side = orientation.bias(0f64);
        let mut normalized = Vec::with_capacity(constraint.coefficients.len());
        for &(variable, value) in &constraint.coefficients {
            let j = index.require(variable, "variable in constraint")?;
            variable_degrees[j] += 1f64;
            if side.is_finite() && side != 0f64 {
                let value = orientation.sign * value / side;
                normalized.push(value);
                variable_coefficients[j].push(value);
            }
        }
        if !normalized.is_empty() {
            constraint_means.push(Summary::of(normalized).mean);
        }
    }
    let constraint_degrees = constraints.iter()
        .map(|constraint| constraint.coefficients.len() as f64)
        .collect::<Vec<_>>();
    let nr_nonzeros = constraint_degrees.iter().sum::<f64>();

    set(NbVariables, nr_variables as f64);
    set(NbConstraints, nr_constraints as f64);
    set(NbNonzeroCoefs, nr_nonzeros);

    let degrees = Summary::of(variable_degrees.iter().copied());
    set(VariableNodeDegreeMean, degrees.mean);
    set(VariableNodeDegreeMax, degrees.max);
    set(VariableNodeDegreeMin, degrees.min);
    set(VariableNodeDegreeStd, degrees.stddev);
    let degrees = Summary::of(constraint_degrees.iter().copied());
    set(ConstraintNodeDegreeMean, degrees.mean);
    set(ConstraintNodeDegreeMax, degrees.max);
    set(ConstraintNodeDegreeMin, degrees.min);
    set(ConstraintNodeDegreeStd, degrees.stddev);

    let mut all_degrees = variable_degrees.iter().chain(&constraint_degrees).copied().collect::<Vec<_>>();
    all_degrees.sort_unstable_by(f64::total_cmp);
    let degrees = Summary::of(all_degrees.iter().copied());
    set(NodeDegreeMean, degrees.mean);
    set(NodeDegreeMax, degrees.max);
    set(NodeDegreeMin, degrees.min);
    set(NodeDegreeStd, degrees.stddev);
    set(NodeDegree25q, quantile(&all_degrees, 0.25f64));
    set(NodeDegree75q, quantile(&all_degrees, 0.75f64));
    set(EdgeDensity, ratio(nr_nonzeros, (nr_variables * nr_constraints) as f64));

    // LP relaxation, slack of the discrete variables towards integrality
    let mut discrete = vec![false; nr_variables];
    for (j, variable) in variables.iter().enumerate() {
        discrete[j] = variable.variable_type.is_discrete();
    }
    let mut slacks = Vec::new();
    for column in model.lp_columns()? {
        let j = index.require(column.variable, "variable of LP column")?;
        if discrete[j] {
            let fraction = fractional_part(column.solution_value);
            slacks.push(fraction.min(1f64 - fraction));
        }
    }
    let summary = Summary::of(slacks.iter().copied());
    set(LpSlackMean, summary.mean);
    set(LpSlackMax, summary.max);
    set(LpSlackL2, euclidean_norm(slacks));
    set(LpObjectiveValue, model.lp_statistics()?.objective_value);

    // Objective, relative to the number of constraints and the degree of the variables
    let objective = variables.iter().map(|variable| variable.objective).collect::<Vec<_>>();
    set(ObjectiveCoefMStd, Summary::of(objective.iter().map(|&c| ratio(c, nr_constraints as f64))).stddev);
    let connected = || objective.iter()
        .zip(&variable_degrees)
        .filter(|&(_, &degree)| degree > 0f64);
    set(ObjectiveCoefNStd, Summary::of(connected().map(|(&c, &degree)| c / degree)).stddev);
    set(ObjectiveCoefSqrtnStd, Summary::of(connected().map(|(&c, &degree)| c / degree.sqrt())).stddev);

    let summary = Summary::of(constraint_means);
    set(ConstraintCoefMean, summary.mean);
    set(ConstraintCoefStd, summary.stddev);
    let summary = Summary::of(
        variable_coefficients.into_iter()
            .filter(|coefficients| !coefficients.is_empty())
            .map(|coefficients| Summary::of(coefficients).mean)
    );
    set(ConstraintVarCoefMean, summary.mean);
    set(ConstraintVarCoefStd, summary.stddev);

    // Domains of the discrete variables
    let (bounded, unbounded) = variables.iter()
        .filter(|variable| variable.variable_type.is_discrete())
        .fold((Vec::new(), 0usize), |(mut bounded, unbounded), variable| {
            match (variable.lower_bound, variable.upper_bound) {
                (Some(lower), Some(upper)) => {
                    bounded.push(upper - lower + 1f64);
                    (bounded, unbounded)
                }
                _ => (bounded, unbounded + 1),
            }
        });
    let nr_discrete = bounded.len() + unbounded;
    let summary = Summary::of(bounded);
    set(DiscreteVarsSupportSizeMean, summary.mean);
    set(DiscreteVarsSupportSizeStd, summary.stddev);
    set(RatioUnboundedDiscreteVars, ratio(unbounded as f64, nr_discrete as f64));
    let nr_continuous = variables.iter()
        .filter(|variable| variable.variable_type == VariableType::Continuous)
        .count();
    set(RatioContinuousVars, ratio(nr_continuous as f64, nr_variables as f64));

    Ok(Hutter2011Observation { features })
}
