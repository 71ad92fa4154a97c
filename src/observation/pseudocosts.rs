//! # Pseudocosts
//!
//! Estimates of the strong branching score from the history of earlier branchings, which the solver
//! maintains anyway. Much cheaper than strong branching, but unreliable early in the search.
use log::debug;

use crate::algorithm::utilities::{fractional_part, product_score};
use crate::data::model::{BranchDirection, CandidateKind, Model};
use crate::observation::{
    Episode, indexed_variables, NOT_APPLICABLE, ObservationError, ObservationFunction, unless_finished,
};
use crate::observation::candidates::{indexed_candidates, not_applicable};

/// Extracts one pseudocost score per variable.
///
/// Only the LP candidates are scored, the pseudocost needs a fractional LP value. A variable that
/// was never branched on in some direction has an undefined score.
#[derive(Clone, Debug, Default)]
pub struct Pseudocosts {
    episode: Episode<()>,
}

impl Pseudocosts {
    /// Create a new instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Pseudocosts {
    fn scores<M: Model + ?Sized>(model: &M) -> Result<Vec<f64>, ObservationError> {
        let (index, _) = indexed_variables(model)?;
        let candidates = indexed_candidates(model, CandidateKind::Lp, &index)?;
        let mut values = vec![NOT_APPLICABLE; index.len()];
        for column in model.lp_columns()? {
            values[index.require(column.variable, "variable of LP column")?] = column.solution_value;
        }

        let mut scores = not_applicable(index.len());
        for (i, variable) in candidates {
            let history = model.branching_history(variable)?;
            let fraction = fractional_part(values[i]);
            let pseudocost = |direction: BranchDirection| history.pseudocost[direction].unwrap_or(NOT_APPLICABLE);

            scores[i] = product_score(
                pseudocost(BranchDirection::Down) * fraction,
                pseudocost(BranchDirection::Up) * (1f64 - fraction),
            );
        }

        Ok(scores)
    }
}

impl ObservationFunction for Pseudocosts {
    /// `None` when the solve finished before the last extraction.
    type Observation = Option<Vec<f64>>;
    const NAME: &'static str = "pseudocosts";

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

        let scores = unless_finished(Self::NAME, done, Self::scores(model))?;
        debug!("{}: extracted (done: {})", Self::NAME, done);
        Ok(scores)
    }
}
