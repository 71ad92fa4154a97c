//! # Knapsack problems
//!
//! Per variable descriptions of problems built from knapsack constraints `w x <= c` with positive
//! weights over binary variables. A variable that is part of several knapsack constraints is
//! described by the first of them; a variable in none gets zeros.
use log::debug;

use crate::data::model::{Constraint, ConstraintIndex, Model, Variable, VariableIndex, VariableType};
use crate::observation::{Episode, indexed_variables, ObservationError, ObservationFunction};

/// Extracts the capacity of the knapsack of each variable.
#[derive(Clone, Debug, Default)]
pub struct Capacity {
    episode: Episode<()>,
}

/// Extracts the weight of each variable in its knapsack.
#[derive(Clone, Debug, Default)]
pub struct Weight {
    episode: Episode<()>,
}

impl Capacity {
    /// Create a new instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Weight {
    /// Create a new instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObservationFunction for Capacity {
    type Observation = Vec<f64>;
    const NAME: &'static str = "capacity";

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
        debug!("{}: extracting (done: {})", Self::NAME, done);

        Ok(knapsacks(model)?.into_iter()
            .map(|knapsack| knapsack.map_or(0f64, |(capacity, _)| capacity))
            .collect())
    }
}

impl ObservationFunction for Weight {
    type Observation = Vec<f64>;
    const NAME: &'static str = "weight";

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
        debug!("{}: extracting (done: {})", Self::NAME, done);

        Ok(knapsacks(model)?.into_iter()
            .map(|knapsack| knapsack.map_or(0f64, |(_, weight)| weight))
            .collect())
    }
}

/// For each variable, the capacity of the first knapsack constraint it is part of and its weight in
/// that constraint.
fn knapsacks<M: Model + ?Sized>(model: &M) -> Result<Vec<Option<(f64, f64)>>, ObservationError> {
    let (index, variables) = indexed_variables(model)?;
    let (_, constraints) = ConstraintIndex::order(model.constraints()?)?;

    let mut knapsacks = vec![None; index.len()];
    for constraint in &constraints {
        let Some(capacity) = capacity(constraint, &index, &variables)? else { continue; };
        for &(variable, weight) in &constraint.coefficients {
            let knapsack = &mut knapsacks[index.require(variable, "variable in constraint")?];
            if knapsack.is_none() {
                *knapsack = Some((capacity, weight));
            }
        }
    }

    Ok(knapsacks)
}

/// The capacity of a constraint, if it is a knapsack constraint.
fn capacity(
    constraint: &Constraint,
    index: &VariableIndex,
    variables: &[Variable],
) -> Result<Option<f64>, ObservationError> {
    let (None, Some(capacity)) = (constraint.lhs, constraint.rhs) else { return Ok(None); };
    if constraint.coefficients.is_empty() {
        return Ok(None);
    }

    for &(variable, weight) in &constraint.coefficients {
        let j = index.require(variable, "variable in constraint")?;
        if weight <= 0f64 || variables[j].variable_type != VariableType::Binary {
            return Ok(None);
        }
    }

    Ok(Some(capacity))
}
