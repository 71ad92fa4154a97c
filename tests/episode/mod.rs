//! # Recorded episodes
//!
//! A vertex cover problem on a triangle, recorded at the root, after branching on the first
//! variable and after the solver finished.
//!
//! ```text
//! min  z0 + z1 + z2
//! s.t. z0 + z1 >= 1
//!      z1 + z2 >= 1
//!      z0 + z2 >= 1
//!      z binary
//! ```
use std::cell::Cell;
use std::collections::HashMap;

use enum_map::enum_map;

use relp_observation::data::model::{
    BasisStatus, BranchDirection, BranchingHistory, CandidateKind, ChildBound, Column, Constraint,
    ConstraintId, InMemoryModel, LpState, LpStatistics, Model, ModelError, NodeInfo, ParentNode,
    Row, RowId, StrongBranchOutcome, Variable, VariableId, VariableType,
};

mod test;

pub const Z: [VariableId; 3] = [VariableId(5), VariableId(6), VariableId(7)];
const EDGES: [(usize, usize); 3] = [(0, 1), (1, 2), (0, 2)];

/// Solver states replayed one after the other.
pub struct Recording {
    states: Vec<InMemoryModel>,
    current: Cell<usize>,
}

impl Recording {
    pub fn new(states: Vec<InMemoryModel>) -> Self {
        Self { states, current: Cell::new(0) }
    }

    /// Move on to the next decision point, returns whether it is the last.
    pub fn advance(&self) -> bool {
        self.current.set(self.current.get() + 1);
        self.current.get() + 1 == self.states.len()
    }

    fn state(&self) -> &InMemoryModel {
        &self.states[self.current.get()]
    }
}

impl Model for Recording {
    fn variables(&self) -> Result<Vec<Variable>, ModelError> {
        self.state().variables()
    }

    fn lp_columns(&self) -> Result<Vec<Column>, ModelError> {
        self.state().lp_columns()
    }

    fn lp_rows(&self) -> Result<Vec<Row>, ModelError> {
        self.state().lp_rows()
    }

    fn lp_statistics(&self) -> Result<LpStatistics, ModelError> {
        self.state().lp_statistics()
    }

    fn constraints(&self) -> Result<Vec<Constraint>, ModelError> {
        self.state().constraints()
    }

    fn branch_candidates(&self, kind: CandidateKind) -> Result<Vec<VariableId>, ModelError> {
        self.state().branch_candidates(kind)
    }

    fn branching_history(&self, variable: VariableId) -> Result<BranchingHistory, ModelError> {
        self.state().branching_history(variable)
    }

    fn strong_branch(&self, variable: VariableId) -> Result<StrongBranchOutcome, ModelError> {
        self.state().strong_branch(variable)
    }

    fn focus_node(&self) -> Result<NodeInfo, ModelError> {
        self.state().focus_node()
    }
}

/// A model of which every query fails.
pub struct Unavailable;

impl Model for Unavailable {
    fn variables(&self) -> Result<Vec<Variable>, ModelError> {
        Err(ModelError::new("solver is busy"))
    }
    fn lp_columns(&self) -> Result<Vec<Column>, ModelError> {
        Err(ModelError::new("solver is busy"))
    }
    fn lp_rows(&self) -> Result<Vec<Row>, ModelError> {
        Err(ModelError::new("solver is busy"))
    }
    fn lp_statistics(&self) -> Result<LpStatistics, ModelError> {
        Err(ModelError::new("solver is busy"))
    }
    fn constraints(&self) -> Result<Vec<Constraint>, ModelError> {
        Err(ModelError::new("solver is busy"))
    }
    fn branch_candidates(&self, _kind: CandidateKind) -> Result<Vec<VariableId>, ModelError> {
        Err(ModelError::new("solver is busy"))
    }
    fn branching_history(&self, _variable: VariableId) -> Result<BranchingHistory, ModelError> {
        Err(ModelError::new("solver is busy"))
    }
    fn strong_branch(&self, _variable: VariableId) -> Result<StrongBranchOutcome, ModelError> {
        Err(ModelError::new("solver is busy"))
    }
    fn focus_node(&self) -> Result<NodeInfo, ModelError> {
        Err(ModelError::new("solver is busy"))
    }
}

pub fn variables(upper_bound_z0: f64) -> Vec<Variable> {
    (0..3).rev()
        .map(|j| Variable {
            id: Z[j],
            position: j,
            variable_type: VariableType::Binary,
            objective: 1f64,
            lower_bound: Some(0f64),
            upper_bound: Some(if j == 0 { upper_bound_z0 } else { 1f64 }),
        })
        .collect()
}

pub fn constraints() -> Vec<Constraint> {
    EDGES.iter()
        .enumerate()
        .map(|(i, &(j, k))| Constraint {
            id: ConstraintId(i),
            position: i,
            lhs: Some(1f64),
            rhs: None,
            coefficients: vec![(Z[j], 1f64), (Z[k], 1f64)],
        })
        .collect()
}

fn rows(solution: [f64; 3], dual: f64) -> Vec<Row> {
    EDGES.iter()
        .enumerate()
        .map(|(i, &(j, k))| Row {
            id: RowId(20 + i),
            position: i,
            lhs: Some(1f64),
            rhs: None,
            constant: 0f64,
            coefficients: vec![(Z[j], 1f64), (Z[k], 1f64)],
            activity: solution[j] + solution[k],
            dual_value: if solution[j] + solution[k] == 1f64 { dual } else { 0f64 },
            age: 0,
        })
        .collect()
}

fn columns(solution: [f64; 3]) -> Vec<Column> {
    (0..3)
        .map(|j| Column {
            variable: Z[j],
            solution_value: solution[j],
            reduced_cost: 0f64,
            basis_status: if solution[j] == 0f64 { BasisStatus::Lower } else { BasisStatus::Basic },
            age: 0,
            incumbent_value: Some(1f64),
            average_incumbent_value: 1f64,
        })
        .collect()
}

/// At the root, every variable is one half.
pub fn root() -> InMemoryModel {
    let solution = [0.5f64; 3];
    let outcome = StrongBranchOutcome {
        children: enum_map! {
            BranchDirection::Down => ChildBound::Bound(2f64),
            BranchDirection::Up => ChildBound::Bound(2f64),
        },
    };

    InMemoryModel {
        lp: Some(LpState {
            columns: columns(solution),
            rows: rows(solution, 0.5f64),
            statistics: LpStatistics { objective_value: 1.5f64, nr_lps: 1 },
        }),
        lp_candidates: Z.to_vec(),
        pseudo_candidates: Z.to_vec(),
        strong_branching: Z.iter().map(|&z| (z, outcome.clone())).collect(),
        focus_node: Some(NodeInfo {
            number: 1,
            depth: 0,
            lower_bound: 1.5f64,
            estimate: 2f64,
            nr_added_constraints: 0,
            parent: None,
        }),
        ..InMemoryModel::new(variables(1f64), constraints())
    }
}

/// After branching down on `z0`, the LP solution is integral.
pub fn down_child() -> InMemoryModel {
    let solution = [0f64, 1f64, 1f64];
    let mut histories = HashMap::new();
    histories.insert(Z[0], BranchingHistory {
        pseudocost: enum_map! {
            BranchDirection::Down => Some(1f64),
            BranchDirection::Up => None,
        },
        nr_branchings: enum_map! {
            BranchDirection::Down => 1,
            BranchDirection::Up => 0,
        },
        nr_cutoffs: enum_map! {
            BranchDirection::Down => 0f64,
            BranchDirection::Up => 0f64,
        },
    });

    InMemoryModel {
        lp: Some(LpState {
            columns: columns(solution),
            rows: rows(solution, 1f64),
            statistics: LpStatistics { objective_value: 2f64, nr_lps: 2 },
        }),
        lp_candidates: vec![],
        pseudo_candidates: vec![Z[1], Z[2]],
        histories,
        focus_node: Some(NodeInfo {
            number: 2,
            depth: 1,
            lower_bound: 2f64,
            estimate: 2f64,
            nr_added_constraints: 0,
            parent: Some(ParentNode { number: 1, lower_bound: 1.5f64 }),
        }),
        ..InMemoryModel::new(variables(0f64), constraints())
    }
}

/// The solver is done, there is neither an LP nor a focus node.
pub fn solved() -> InMemoryModel {
    InMemoryModel::new(variables(0f64), constraints())
}

pub fn recording() -> Recording {
    Recording::new(vec![root(), down_child(), solved()])
}
