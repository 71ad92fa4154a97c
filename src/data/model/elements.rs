//! # Building blocks of solver state
//!
//! Values returned by the queries of a `Model`. They are owned snapshots: nothing in here refers
//! back into solver memory, so they stay valid when the solver moves on.
use std::ops::Not;

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

/// Solver-internal handle of a variable.
///
/// Handles may be recycled by the solver and carry no ordering; use an `EntityIndex` to obtain a
/// position.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct VariableId(pub usize);

/// Solver-internal handle of a row of the LP relaxation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RowId(pub usize);

/// Solver-internal handle of a linear constraint of the MILP.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ConstraintId(pub usize);

/// Integrality type of a variable.
#[allow(missing_docs)]
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VariableType {
    Binary,
    Integer,
    /// Continuous in the formulation, but guaranteed to take an integer value in any feasible
    /// solution.
    ImplicitInteger,
    Continuous,
}

impl VariableType {
    /// Whether the variable is required to take an integer value.
    #[must_use]
    pub fn is_discrete(self) -> bool {
        !matches!(self, VariableType::Continuous)
    }
}

/// Status of a column in the current LP basis.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BasisStatus {
    /// Non-basic at its lower bound.
    Lower,
    /// In the basis.
    Basic,
    /// Non-basic at its upper bound.
    Upper,
    /// Non-basic free variable at zero.
    Zero,
}

/// Direction of a branching on a variable.
#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BranchDirection {
    /// The child with `x <= floor(value)`.
    Down,
    /// The child with `x >= ceil(value)`.
    Up,
}

impl Not for BranchDirection {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
        }
    }
}

/// Policy selecting the variables eligible for branching at the current node.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    /// Integer variables with a fractional value in the LP solution.
    #[default]
    Lp,
    /// All non-fixed integer variables.
    Pseudo,
}

impl CandidateKind {
    /// Translate the `pseudo_candidates` flag of the extractors.
    #[must_use]
    pub fn from_pseudo_flag(pseudo_candidates: bool) -> Self {
        if pseudo_candidates { CandidateKind::Pseudo } else { CandidateKind::Lp }
    }
}

/// A problem variable.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    /// Handle used by all other queries.
    pub id: VariableId,
    /// Position of the variable in the problem as it was loaded.
    ///
    /// Only the relative order is used, positions need not be contiguous.
    pub position: usize,
    /// Integrality type.
    pub variable_type: VariableType,
    /// Coefficient in the objective function.
    pub objective: f64,
    /// Lower bound at the current node, `None` if minus infinity.
    pub lower_bound: Option<f64>,
    /// Upper bound at the current node, `None` if infinity.
    pub upper_bound: Option<f64>,
}

impl Variable {
    /// Whether the bounds at the current node leave a single value.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        match (self.lower_bound, self.upper_bound) {
            (Some(lower), Some(upper)) => lower == upper,
            _ => false,
        }
    }
}

/// The column of a variable in the current LP relaxation.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// The variable this column represents.
    pub variable: VariableId,
    /// Value in the LP solution.
    pub solution_value: f64,
    /// Reduced cost in the current LP solution.
    pub reduced_cost: f64,
    /// Status in the current basis.
    pub basis_status: BasisStatus,
    /// Number of successive LP solves in which the column was non-basic at zero.
    pub age: u64,
    /// Value in the best known feasible solution, `None` without such a solution.
    pub incumbent_value: Option<f64>,
    /// Average value over the feasible solutions found so far.
    pub average_incumbent_value: f64,
}

/// A row of the current LP relaxation, `lhs <= a x + constant <= rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    /// Handle of the row.
    pub id: RowId,
    /// Position of the row in the LP, only the relative order is used.
    pub position: usize,
    /// Left-hand side, `None` if minus infinity.
    pub lhs: Option<f64>,
    /// Right-hand side, `None` if infinity.
    pub rhs: Option<f64>,
    /// Constant term of the row activity.
    pub constant: f64,
    /// Non-zero coefficients.
    pub coefficients: Vec<(VariableId, f64)>,
    /// Value of `a x + constant` in the LP solution.
    pub activity: f64,
    /// Value of the dual variable in the LP solution.
    pub dual_value: f64,
    /// Number of successive LP solves in which the row was not tight.
    pub age: u64,
}

/// A linear constraint `lhs <= a x <= rhs` of the most recent MILP.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    /// Handle of the constraint.
    pub id: ConstraintId,
    /// Position of the constraint in the problem, only the relative order is used.
    pub position: usize,
    /// Left-hand side, `None` if minus infinity.
    pub lhs: Option<f64>,
    /// Right-hand side, `None` if infinity.
    pub rhs: Option<f64>,
    /// Non-zero coefficients.
    pub coefficients: Vec<(VariableId, f64)>,
}

/// Global statistics of the current LP relaxation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LpStatistics {
    /// Objective value of the LP solution.
    pub objective_value: f64,
    /// Number of LPs solved so far in the episode.
    pub nr_lps: u64,
}

/// Running branching statistics of a variable, maintained by the solver.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BranchingHistory {
    /// Average objective gain per unit change, `None` before the first observation.
    pub pseudocost: EnumMap<BranchDirection, Option<f64>>,
    /// Number of branchings in each direction.
    pub nr_branchings: EnumMap<BranchDirection, u64>,
    /// Number of children that were cut off, possibly weighted by the solver.
    pub nr_cutoffs: EnumMap<BranchDirection, f64>,
}

/// Dual bound of one child created by strong branching.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ChildBound {
    /// The child LP was solved with this objective value.
    Bound(f64),
    /// The child LP is infeasible.
    Infeasible,
}

/// Result of strong branching on a single variable.
#[derive(Clone, Debug, PartialEq)]
pub struct StrongBranchOutcome {
    /// Bound of the child in each direction.
    pub children: EnumMap<BranchDirection, ChildBound>,
}

/// The node of the branch-and-bound tree currently being processed.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeInfo {
    /// Unique number of the node.
    pub number: u64,
    /// Depth in the tree, the root has depth zero.
    pub depth: u32,
    /// Dual bound of the node.
    pub lower_bound: f64,
    /// Estimate of the best solution in the subtree.
    pub estimate: f64,
    /// Number of constraints added to the node.
    pub nr_added_constraints: usize,
    /// The parent node, `None` at the root.
    pub parent: Option<ParentNode>,
}

/// Identification of the parent of a node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParentNode {
    /// Unique number of the parent.
    pub number: u64,
    /// Dual bound of the parent.
    pub lower_bound: f64,
}
