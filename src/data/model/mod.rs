//! # Read access to a solver
//!
//! The observation functions of this crate never talk to a solver directly. Everything they need is
//! requested through the `Model` trait, which can be implemented on top of a solver binding or, as
//! in `memory`, on top of plain data.
use thiserror::Error;

pub use elements::{
    BasisStatus, BranchDirection, BranchingHistory, CandidateKind, ChildBound, Column, Constraint,
    ConstraintId, LpStatistics, NodeInfo, ParentNode, Row, RowId, StrongBranchOutcome, Variable,
    VariableId, VariableType,
};
pub use index::{ConstraintIndex, EntityIndex, RowIndex, VariableIndex};
pub use memory::{InMemoryModel, LpState};

pub mod elements;
pub mod index;
pub mod memory;

/// A query that the model could not answer in its current state.
///
/// For example, LP values are requested while the LP of the current node is not solved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("model query failed: {description}")]
pub struct ModelError {
    description: String,
}

impl ModelError {
    /// Wrap a text in a `ModelError`.
    ///
    /// # Arguments
    ///
    /// * `description`: A human-readable text meant for the end user.
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into() }
    }

    /// The human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Read-only view on the state of a branch-and-bound solver.
///
/// All queries describe the state at the moment of the call. Implementations may do work to answer
/// a query (like solving an LP for strong branching), but have to leave the solver in a state in
/// which it can be queried again.
pub trait Model {
    /// All variables of the problem.
    ///
    /// Local bounds are those of the node currently being processed.
    fn variables(&self) -> Result<Vec<Variable>, ModelError>;

    /// The columns of the current LP relaxation.
    ///
    /// Variables that are not part of the LP have no column.
    fn lp_columns(&self) -> Result<Vec<Column>, ModelError>;

    /// The rows of the current LP relaxation.
    fn lp_rows(&self) -> Result<Vec<Row>, ModelError>;

    /// Objective value and solve count of the current LP relaxation.
    fn lp_statistics(&self) -> Result<LpStatistics, ModelError>;

    /// The linear constraints of the most recently materialized MILP.
    ///
    /// During presolving, this is the problem as transformed up to now.
    fn constraints(&self) -> Result<Vec<Constraint>, ModelError>;

    /// The variables eligible for branching under the given policy.
    fn branch_candidates(&self, kind: CandidateKind) -> Result<Vec<VariableId>, ModelError>;

    /// Running branching statistics of a variable.
    fn branching_history(&self, variable: VariableId) -> Result<BranchingHistory, ModelError>;

    /// Solve the LP of both children of a branching on `variable`.
    fn strong_branch(&self, variable: VariableId) -> Result<StrongBranchOutcome, ModelError>;

    /// The node currently being processed.
    fn focus_node(&self) -> Result<NodeInfo, ModelError>;
}

