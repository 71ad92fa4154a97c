//! # Strong branching scores
//!
//! The score of a candidate is the product of the improvements of the dual bound in both children.
//! Strong branching is the most reliable way to rank candidates, but it solves two LPs per
//! candidate and is expensive. The scores are typically used as expert labels for imitation
//! learning.
use log::{debug, trace};

use crate::algorithm::utilities::product_score;
use crate::data::model::{BranchDirection, CandidateKind, ChildBound, Model};
use crate::observation::{
    Episode, indexed_variables, ObservationError, ObservationFunction, unless_finished,
};
use crate::observation::candidates::{indexed_candidates, not_applicable};

/// Extracts one strong branching score per variable.
///
/// Variables that are not a candidate get `NOT_APPLICABLE`. The model is queried anew at every
/// extraction.
#[derive(Clone, Debug, Default)]
pub struct StrongBranchingScores {
    candidates: CandidateKind,
    episode: Episode<()>,
}

impl StrongBranchingScores {
    /// Create a new instance.
    ///
    /// # Arguments
    ///
    /// * `pseudo_candidates`: Whether to score the pseudo candidates instead of the LP candidates.
    #[must_use]
    pub fn new(pseudo_candidates: bool) -> Self {
        Self { candidates: CandidateKind::from_pseudo_flag(pseudo_candidates), episode: Episode::default() }
    }
}

impl StrongBranchingScores {
    fn scores<M: Model + ?Sized>(&self, model: &M) -> Result<Vec<f64>, ObservationError> {
        let (index, _) = indexed_variables(model)?;
        let candidates = indexed_candidates(model, self.candidates, &index)?;
        let lp_objective = model.lp_statistics()?.objective_value;

        let mut scores = not_applicable(index.len());
        for (i, variable) in candidates {
            let outcome = model.strong_branch(variable)?;
            let gain = |direction: BranchDirection| match outcome.children[direction] {
                ChildBound::Bound(bound) => (bound - lp_objective).max(0f64),
                ChildBound::Infeasible => f64::INFINITY,
            };
            scores[i] = product_score(gain(BranchDirection::Down), gain(BranchDirection::Up));
            trace!("{}: {:?} scores {}", Self::NAME, variable, scores[i]);
        }

        Ok(scores)
    }
}

impl ObservationFunction for StrongBranchingScores {
    /// `None` when the solve finished before the last extraction.
    type Observation = Option<Vec<f64>>;
    const NAME: &'static str = "strong_branching_scores";

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

        let scores = unless_finished(Self::NAME, done, self.scores(model))?;
        debug!("{}: scored {:?} candidates (done: {})", Self::NAME, self.candidates, done);
        Ok(scores)
    }
}
