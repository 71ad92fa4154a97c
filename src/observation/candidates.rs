//! # Candidate selection
//!
//! Score-like observations are only defined for the variables that are eligible for branching.
//! Which variables those are depends on the policy an observation function was configured with.
use crate::data::model::{CandidateKind, Model, VariableId, VariableIndex};
use crate::observation::{NOT_APPLICABLE, ObservationError};

/// Whether a feature value is the undefined sentinel.
#[must_use]
pub fn is_not_applicable(value: f64) -> bool {
    value.is_nan()
}

/// A vector with one undefined value per variable.
pub(crate) fn not_applicable(nr_variables: usize) -> Vec<f64> {
    vec![NOT_APPLICABLE; nr_variables]
}

/// The candidates under a policy, together with their index, sorted by index.
///
/// # Errors
///
/// If the model can't list its candidates, or lists a variable that isn't part of the problem.
pub(crate) fn indexed_candidates<M: Model + ?Sized>(
    model: &M,
    kind: CandidateKind,
    index: &VariableIndex,
) -> Result<Vec<(usize, VariableId)>, ObservationError> {
    let mut candidates = model.branch_candidates(kind)?
        .into_iter()
        .map(|variable| Ok((index.require(variable, "candidate variable")?, variable)))
        .collect::<Result<Vec<_>, ObservationError>>()?;
    candidates.sort_unstable_by_key(|&(i, _)| i);

    Ok(candidates)
}
