//! # Focus node
//!
//! Identification and bounds of the node of the branch-and-bound tree that is being processed.
use serde::{Deserialize, Serialize};

use crate::data::model::{CandidateKind, Model};
use crate::observation::{Episode, ObservationError, ObservationFunction, unless_finished};

/// Snapshot of the focus node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FocusNodeObservation {
    /// Unique number of the node.
    pub number: u64,
    /// Depth in the tree, zero at the root.
    pub depth: u32,
    /// Dual bound of the node.
    pub lower_bound: f64,
    /// Estimate of the best solution in the subtree.
    pub estimate: f64,
    /// Constraints added locally at this node.
    pub nr_added_constraints: usize,
    /// Variables of the problem.
    pub nr_variables: usize,
    /// Fractional variables of the LP relaxation, zero without a solved LP.
    pub nr_lp_candidates: usize,
    /// Unfixed discrete variables.
    pub nr_pseudo_candidates: usize,
    /// Number of the parent, `None` at the root.
    pub parent_number: Option<u64>,
    /// Dual bound of the parent, `None` at the root.
    pub parent_lower_bound: Option<f64>,
}

/// Extracts a `FocusNodeObservation`.
///
/// At the end of an episode the solver might not have a focus node anymore; the final observation
/// is then `None`.
#[derive(Clone, Debug, Default)]
pub struct FocusNode {
    episode: Episode<()>,
}

impl FocusNode {
    /// Create a new instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObservationFunction for FocusNode {
    type Observation = Option<FocusNodeObservation>;
    const NAME: &'static str = "focus_node";

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
        unless_finished(Self::NAME, done, observe(model))
    }
}

fn observe<M: Model + ?Sized>(model: &M) -> Result<FocusNodeObservation, ObservationError> {
    let node = model.focus_node()?;
    // Without a solved LP there are no LP candidates
    let nr_lp_candidates = model.branch_candidates(CandidateKind::Lp)
        .map_or(0, |candidates| candidates.len());

    Ok(FocusNodeObservation {
        number: node.number,
        depth: node.depth,
        lower_bound: node.lower_bound,
        estimate: node.estimate,
        nr_added_constraints: node.nr_added_constraints,
        nr_variables: model.variables()?.len(),
        nr_lp_candidates,
        nr_pseudo_candidates: model.branch_candidates(CandidateKind::Pseudo)?.len(),
        parent_number: node.parent.map(|parent| parent.number),
        parent_lower_bound: node.parent.map(|parent| parent.lower_bound),
    })
}
