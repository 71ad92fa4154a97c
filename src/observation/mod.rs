//! # Observation functions
//!
//! An observation function turns the state of a solver into numbers that a learning algorithm can
//! consume. It is driven by a control loop that, for every episode, calls `reset` once with the
//! freshly loaded model and then `extract` once per decision point.
//!
//! Variants that can tell which features stay fixed for the duration of an episode compute those on
//! reset and keep them in a cache owned by the instance. The cache lives exactly as long as the
//! episode: the next reset throws it away.
//!
//! Features that are undefined for an entity, like the strong branching score of a variable that
//! isn't a branching candidate, take the value `NOT_APPLICABLE`.
use log::debug;

use crate::data::model::{Model, Variable, VariableIndex};

pub use candidates::is_not_applicable;
pub use config::{AnyObservationFunction, Observation, ObservationConfig};
pub use error::ObservationError;
pub use focus_node::{FocusNode, FocusNodeObservation};
pub use hutter2011::{Hutter2011, Hutter2011Feature, Hutter2011Observation};
pub use khalil2016::{Khalil2016, Khalil2016Feature, Khalil2016Observation};
pub use knapsack::{Capacity, Weight};
pub use milp_bipartite::{MilpBipartite, MilpBipartiteObservation};
pub use node_bipartite::{NodeBipartite, NodeBipartiteObservation};
pub use nothing::Nothing;
pub use pseudocosts::Pseudocosts;
pub use strong_branching::StrongBranchingScores;

pub mod error;
pub mod config;
mod candidates;
mod bipartite;
pub mod nothing;
pub mod node_bipartite;
pub mod milp_bipartite;
pub mod strong_branching;
pub mod pseudocosts;
pub mod khalil2016;
pub mod hutter2011;
pub mod focus_node;
pub mod knapsack;

/// Value of a feature that is undefined.
///
/// This is a `NaN`: arithmetic involving it produces it again and it compares unequal to every
/// value, itself included. Use `is_not_applicable` to test for it.
pub const NOT_APPLICABLE: f64 = f64::NAN;

/// Extracts observations from a model, once per decision point of an episode.
///
/// Instances are used by a single control loop at a time; they are not meant for concurrent
/// extraction.
pub trait ObservationFunction {
    /// Type of the extracted observations.
    type Observation;
    /// Name of the observation function, used in logging and errors.
    const NAME: &'static str;

    /// Prepare for a new episode.
    ///
    /// Clears anything cached during a previous episode. Has to be called before the first
    /// extraction.
    ///
    /// # Errors
    ///
    /// When the model can't answer the queries needed to fill the cache. The instance then has to
    /// be reset again before extracting.
    fn reset<M: Model + ?Sized>(&mut self, model: &M) -> Result<(), ObservationError>;

    /// Extract a new observation.
    ///
    /// # Arguments
    ///
    /// * `model`: State of the solver at the current decision point.
    /// * `done`: Whether this is the last extraction of the episode. The observation is well
    /// formed either way, though it might not be meaningful on a solved problem.
    ///
    /// # Errors
    ///
    /// When called before `reset`, or when the model can't answer a query in its current state.
    fn extract<M: Model + ?Sized>(
        &mut self,
        model: &M,
        done: bool,
    ) -> Result<Self::Observation, ObservationError>;
}

/// Lifecycle of an observation function within an episode.
///
/// The data held in the `Ready` state is whatever the observation function caches for the episode.
#[derive(Clone, Debug)]
pub(crate) enum Episode<C> {
    Uninitialized,
    Ready(C),
}

impl<C> Default for Episode<C> {
    fn default() -> Self {
        Episode::Uninitialized
    }
}

impl<C> Episode<C> {
    /// Forget the current episode.
    pub(crate) fn clear(&mut self) {
        *self = Episode::Uninitialized;
    }

    /// Start a new episode with freshly computed data.
    pub(crate) fn start(&mut self, cache: C) {
        *self = Episode::Ready(cache);
    }

    /// The cached data, if an episode was started.
    pub(crate) fn ready(&self, observation: &'static str) -> Result<&C, ObservationError> {
        match self {
            Episode::Ready(cache) => Ok(cache),
            Episode::Uninitialized => Err(ObservationError::NotReset { observation }),
        }
    }

    pub(crate) fn ready_mut(&mut self, observation: &'static str) -> Result<&mut C, ObservationError> {
        match self {
            Episode::Ready(cache) => Ok(cache),
            Episode::Uninitialized => Err(ObservationError::NotReset { observation }),
        }
    }
}

/// Query the variables and put them in index order.
pub(crate) fn indexed_variables<M: Model + ?Sized>(
    model: &M,
) -> Result<(VariableIndex, Vec<Variable>), ObservationError> {
    Ok(VariableIndex::order(model.variables()?)?)
}

/// An observation, or none when the solver can't answer at the end of the episode.
///
/// Observation functions that read the LP relaxation or the focus node have nothing to describe
/// once the problem is solved. The last extraction of an episode then gives `None` instead of an
/// error; any other extraction still fails.
pub(crate) fn unless_finished<T>(
    name: &'static str,
    done: bool,
    observation: Result<T, ObservationError>,
) -> Result<Option<T>, ObservationError> {
    match observation {
        Ok(observation) => Ok(Some(observation)),
        Err(ObservationError::Model(error)) if done => {
            debug!("{}: no observation at the end of the episode ({})", name, error);
            Ok(None)
        }
        Err(error) => Err(error),
    }
}
