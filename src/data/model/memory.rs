//! # Solver state held in memory
//!
//! A `Model` backed by plain data. Used to test observation functions without a solver, and to
//! replay solver states that were recorded earlier.
use std::collections::HashMap;

use crate::data::model::{
    BranchingHistory, CandidateKind, Column, Constraint, LpStatistics, Model, ModelError, NodeInfo,
    Row, StrongBranchOutcome, Variable, VariableId,
};

/// Solver state at a single decision point.
///
/// Queries for data that is absent (no solved LP, no focus node, no strong branching result for a
/// variable) fail with a `ModelError`, like they would on a solver in the wrong state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InMemoryModel {
    /// Variables of the problem, in any order.
    pub variables: Vec<Variable>,
    /// Linear constraints of the MILP.
    pub constraints: Vec<Constraint>,
    /// The solved LP relaxation at the focus node, if any.
    pub lp: Option<LpState>,
    /// Variables with a fractional LP value.
    pub lp_candidates: Vec<VariableId>,
    /// Unfixed discrete variables.
    pub pseudo_candidates: Vec<VariableId>,
    /// Branching statistics; variables without an entry have never been branched on.
    pub histories: HashMap<VariableId, BranchingHistory>,
    /// Outcome of strong branching per variable; other variables fail to strong branch.
    pub strong_branching: HashMap<VariableId, StrongBranchOutcome>,
    /// `None` once the solver has no node to process.
    pub focus_node: Option<NodeInfo>,
}

/// A solved LP relaxation.
#[derive(Clone, Debug, PartialEq)]
pub struct LpState {
    /// One per variable in the LP.
    pub columns: Vec<Column>,
    /// Rows of the LP, in any order.
    pub rows: Vec<Row>,
    /// Objective value and solve count.
    pub statistics: LpStatistics,
}

impl InMemoryModel {
    /// Create a model without LP, candidates or branching statistics.
    #[must_use]
    pub fn new(variables: Vec<Variable>, constraints: Vec<Constraint>) -> Self {
        Self { variables, constraints, ..Self::default() }
    }

    fn lp(&self) -> Result<&LpState, ModelError> {
        self.lp.as_ref().ok_or_else(|| ModelError::new("the LP relaxation is not solved"))
    }
}

impl Model for InMemoryModel {
    fn variables(&self) -> Result<Vec<Variable>, ModelError> {
        Ok(self.variables.clone())
    }

    fn lp_columns(&self) -> Result<Vec<Column>, ModelError> {
        self.lp().map(|lp| lp.columns.clone())
    }

    fn lp_rows(&self) -> Result<Vec<Row>, ModelError> {
        self.lp().map(|lp| lp.rows.clone())
    }

    fn lp_statistics(&self) -> Result<LpStatistics, ModelError> {
        self.lp().map(|lp| lp.statistics)
    }

    fn constraints(&self) -> Result<Vec<Constraint>, ModelError> {
        Ok(self.constraints.clone())
    }

    fn branch_candidates(&self, kind: CandidateKind) -> Result<Vec<VariableId>, ModelError> {
        match kind {
            CandidateKind::Lp => self.lp().map(|_| self.lp_candidates.clone()),
            CandidateKind::Pseudo => Ok(self.pseudo_candidates.clone()),
        }
    }

    fn branching_history(&self, variable: VariableId) -> Result<BranchingHistory, ModelError> {
        Ok(self.histories.get(&variable).cloned().unwrap_or_default())
    }

    fn strong_branch(&self, variable: VariableId) -> Result<StrongBranchOutcome, ModelError> {
        self.lp()?;
        self.strong_branching.get(&variable)
            .cloned()
            .ok_or_else(|| ModelError::new(format!("no strong branching result for {:?}", variable)))
    }

    fn focus_node(&self) -> Result<NodeInfo, ModelError> {
        self.focus_node.clone().ok_or_else(|| ModelError::new("there is no focus node"))
    }
}
