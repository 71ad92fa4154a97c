//! # Selecting an observation function at runtime
//!
//! A control loop that reads its setup from a file doesn't know statically which observation it
//! will extract. `ObservationConfig` names an observation function together with its options and
//! `AnyObservationFunction` dispatches to the function it names.
//!
//! ```json
//! {"kind": "node_bipartite", "cache": true}
//! ```
use serde::{Deserialize, Serialize};

use crate::data::model::Model;
use crate::observation::{
    Capacity, FocusNode, FocusNodeObservation, Hutter2011, Hutter2011Observation, Khalil2016,
    Khalil2016Observation, MilpBipartite, MilpBipartiteObservation, NodeBipartite,
    NodeBipartiteObservation, Nothing, ObservationError, ObservationFunction, Pseudocosts,
    StrongBranchingScores, Weight,
};

/// An observation function and its options.
///
/// Options that are left out are `false`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObservationConfig {
    /// See `Nothing`.
    #[default]
    Nothing,
    /// See `NodeBipartite`.
    NodeBipartite {
        /// Reuse the static features during an episode.
        #[serde(default)]
        cache: bool,
    },
    /// See `MilpBipartite`.
    MilpBipartite {
        /// Scale the features to unit norm.
        #[serde(default)]
        normalize: bool,
    },
    /// See `StrongBranchingScores`.
    StrongBranchingScores {
        /// Score the pseudo candidates instead of the LP candidates.
        #[serde(default)]
        pseudo_candidates: bool,
    },
    /// See `Pseudocosts`.
    Pseudocosts,
    /// See `Khalil2016`.
    Khalil2016 {
        /// Describe the pseudo candidates instead of the LP candidates.
        #[serde(default)]
        pseudo_candidates: bool,
    },
    /// See `Hutter2011`.
    Hutter2011,
    /// See `FocusNode`.
    FocusNode,
    /// See `Capacity`.
    Capacity,
    /// See `Weight`.
    Weight,
}

/// Any of the observation functions of this crate.
#[derive(Clone, Debug)]
pub enum AnyObservationFunction {
    /// Dispatches to `Nothing`.
    Nothing(Nothing),
    /// Dispatches to `NodeBipartite`.
    NodeBipartite(NodeBipartite),
    /// Dispatches to `MilpBipartite`.
    MilpBipartite(MilpBipartite),
    /// Dispatches to `StrongBranchingScores`.
    StrongBranchingScores(StrongBranchingScores),
    /// Dispatches to `Pseudocosts`.
    Pseudocosts(Pseudocosts),
    /// Dispatches to `Khalil2016`.
    Khalil2016(Khalil2016),
    /// Dispatches to `Hutter2011`.
    Hutter2011(Hutter2011),
    /// Dispatches to `FocusNode`.
    FocusNode(FocusNode),
    /// Dispatches to `Capacity`.
    Capacity(Capacity),
    /// Dispatches to `Weight`.
    Weight(Weight),
}

/// An observation extracted by an `AnyObservationFunction`.
///
/// The optional ones are `None` when the solve finished before the last extraction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Observation {
    /// Extracted by `Nothing`.
    Nothing,
    /// Extracted by `NodeBipartite`.
    NodeBipartite(Option<NodeBipartiteObservation>),
    /// Extracted by `MilpBipartite`.
    MilpBipartite(MilpBipartiteObservation),
    /// Extracted by `StrongBranchingScores`.
    StrongBranchingScores(Option<Vec<f64>>),
    /// Extracted by `Pseudocosts`.
    Pseudocosts(Option<Vec<f64>>),
    /// Extracted by `Khalil2016`.
    Khalil2016(Option<Khalil2016Observation>),
    /// Extracted by `Hutter2011`.
    Hutter2011(Option<Hutter2011Observation>),
    /// Extracted by `FocusNode`.
    FocusNode(Option<FocusNodeObservation>),
    /// Extracted by `Capacity`.
    Capacity(Vec<f64>),
    /// Extracted by `Weight`.
    Weight(Vec<f64>),
}

impl Observation {
    /// Number of rows describing variables, if the observation has one per variable.
    #[must_use]
    pub fn nr_variable_rows(&self) -> Option<usize> {
        match self {
            Observation::NodeBipartite(observation) => {
                observation.as_ref().map(|observation| observation.variable_features.nr_rows())
            }
            Observation::MilpBipartite(observation) => Some(observation.variable_features.nr_rows()),
            Observation::Khalil2016(observation) => {
                observation.as_ref().map(|observation| observation.features.nr_rows())
            }
            Observation::StrongBranchingScores(values) | Observation::Pseudocosts(values) => {
                values.as_ref().map(Vec::len)
            }
            Observation::Capacity(values) | Observation::Weight(values) => Some(values.len()),
            Observation::Nothing | Observation::Hutter2011(_) | Observation::FocusNode(_) => None,
        }
    }
}

impl From<ObservationConfig> for AnyObservationFunction {
    fn from(config: ObservationConfig) -> Self {
        match config {
            ObservationConfig::Nothing => Self::Nothing(Nothing::new()),
            ObservationConfig::NodeBipartite { cache } => {
                Self::NodeBipartite(NodeBipartite::new(cache))
            }
            ObservationConfig::MilpBipartite { normalize } => {
                Self::MilpBipartite(MilpBipartite::new(normalize))
            }
            ObservationConfig::StrongBranchingScores { pseudo_candidates } => {
                Self::StrongBranchingScores(StrongBranchingScores::new(pseudo_candidates))
            }
            ObservationConfig::Pseudocosts => Self::Pseudocosts(Pseudocosts::new()),
            ObservationConfig::Khalil2016 { pseudo_candidates } => {
                Self::Khalil2016(Khalil2016::new(pseudo_candidates))
            }
            ObservationConfig::Hutter2011 => Self::Hutter2011(Hutter2011::new()),
            ObservationConfig::FocusNode => Self::FocusNode(FocusNode::new()),
            ObservationConfig::Capacity => Self::Capacity(Capacity::new()),
            ObservationConfig::Weight => Self::Weight(Weight::new()),
        }
    }
}

impl Default for AnyObservationFunction {
    fn default() -> Self {
        ObservationConfig::default().into()
    }
}

impl AnyObservationFunction {
    /// Name of the observation function that is dispatched to.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nothing(_) => Nothing::NAME,
            Self::NodeBipartite(_) => NodeBipartite::NAME,
            Self::MilpBipartite(_) => MilpBipartite::NAME,
            Self::StrongBranchingScores(_) => StrongBranchingScores::NAME,
            Self::Pseudocosts(_) => Pseudocosts::NAME,
            Self::Khalil2016(_) => Khalil2016::NAME,
            Self::Hutter2011(_) => Hutter2011::NAME,
            Self::FocusNode(_) => FocusNode::NAME,
            Self::Capacity(_) => Capacity::NAME,
            Self::Weight(_) => Weight::NAME,
        }
    }
}

impl ObservationFunction for AnyObservationFunction {
    type Observation = Observation;
    const NAME: &'static str = "any";

    fn reset<M: Model + ?Sized>(&mut self, model: &M) -> Result<(), ObservationError> {
        match self {
            Self::Nothing(function) => function.reset(model),
            Self::NodeBipartite(function) => function.reset(model),
            Self::MilpBipartite(function) => function.reset(model),
            Self::StrongBranchingScores(function) => function.reset(model),
            Self::Pseudocosts(function) => function.reset(model),
            Self::Khalil2016(function) => function.reset(model),
            Self::Hutter2011(function) => function.reset(model),
            Self::FocusNode(function) => function.reset(model),
            Self::Capacity(function) => function.reset(model),
            Self::Weight(function) => function.reset(model),
        }
    }

    fn extract<M: Model + ?Sized>(
        &mut self,
        model: &M,
        done: bool,
    ) -> Result<Self::Observation, ObservationError> {
        Ok(match self {
            Self::Nothing(function) => {
                function.extract(model, done)?;
                Observation::Nothing
            }
            Self::NodeBipartite(function) => Observation::NodeBipartite(function.extract(model, done)?),
            Self::MilpBipartite(function) => Observation::MilpBipartite(function.extract(model, done)?),
            Self::StrongBranchingScores(function) => {
                Observation::StrongBranchingScores(function.extract(model, done)?)
            }
            Self::Pseudocosts(function) => Observation::Pseudocosts(function.extract(model, done)?),
            Self::Khalil2016(function) => Observation::Khalil2016(function.extract(model, done)?),
            Self::Hutter2011(function) => Observation::Hutter2011(function.extract(model, done)?),
            Self::FocusNode(function) => Observation::FocusNode(function.extract(model, done)?),
            Self::Capacity(function) => Observation::Capacity(function.extract(model, done)?),
            Self::Weight(function) => Observation::Weight(function.extract(model, done)?),
        })
    }
}
