//! # Entity index mapping
//!
//! Solvers address variables and rows by handles that say nothing about order and may be recycled
//! between episodes. Consumers of observations need to line up feature rows with their own lists
//! (like the action set of a branching environment), so every feature row is emitted in the order
//! in which the entities appear in the problem as it was loaded.
//!
//! The index is rebuilt from a fresh query on every use within an episode and never carried over to
//! the next episode.
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

use crate::data::model::{Constraint, ConstraintId, Row, RowId, Variable, VariableId};

/// Bijection from the handles of a kind of entity to `0..n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityIndex<Id: Eq + Hash> {
    /// Handles, ordered by index.
    ids: Vec<Id>,
    /// Inverse of `ids`.
    index: HashMap<Id, usize>,
}

/// Index of the problem variables.
pub type VariableIndex = EntityIndex<VariableId>;
/// Index of the rows of the LP relaxation.
pub type RowIndex = EntityIndex<RowId>;
/// Index of the constraints of the MILP.
pub type ConstraintIndex = EntityIndex<ConstraintId>;

/// The model reported entities that can't be indexed consistently.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Two different entities claim the same position in the problem.
    #[error("two entities of kind {kind} at position {position}")]
    DuplicatePosition {
        /// Kind of entity, like "variable".
        kind: &'static str,
        /// The position that is claimed twice.
        position: usize,
    },
    /// The same handle was reported twice.
    #[error("handle {id} of kind {kind} appears twice")]
    DuplicateId {
        /// Kind of entity, like "variable".
        kind: &'static str,
        /// Debug representation of the handle.
        id: String,
    },
    /// A handle was referenced that is not part of the index.
    #[error("unknown handle {id} of kind {kind}")]
    Unknown {
        /// What the handle was used for.
        kind: &'static str,
        /// Debug representation of the handle.
        id: String,
    },
}

/// An entity with a position in the problem as it was loaded.
pub trait Positioned {
    /// Handle type of the entity.
    type Id: Copy + Eq + Hash + Debug;
    /// Name used in error messages.
    const KIND: &'static str;

    /// Solver handle of the entity.
    fn id(&self) -> Self::Id;
    /// Position in the problem; only the relative order is used.
    fn position(&self) -> usize;
}

impl Positioned for Variable {
    type Id = VariableId;
    const KIND: &'static str = "variable";

    fn id(&self) -> Self::Id {
        self.id
    }
    fn position(&self) -> usize {
        self.position
    }
}

impl Positioned for Row {
    type Id = RowId;
    const KIND: &'static str = "row";

    fn id(&self) -> Self::Id {
        self.id
    }
    fn position(&self) -> usize {
        self.position
    }
}

impl Positioned for Constraint {
    type Id = ConstraintId;
    const KIND: &'static str = "constraint";

    fn id(&self) -> Self::Id {
        self.id
    }
    fn position(&self) -> usize {
        self.position
    }
}

impl<Id: Copy + Eq + Hash + Debug> EntityIndex<Id> {
    /// Sort entities by their position and index them.
    ///
    /// # Arguments
    ///
    /// * `entities`: All entities of a kind, in any order.
    ///
    /// # Return value
    ///
    /// The index, together with the entities in index order.
    ///
    /// # Errors
    ///
    /// If two entities share a position or a handle.
    pub fn order<E: Positioned<Id = Id>>(mut entities: Vec<E>) -> Result<(Self, Vec<E>), IndexError> {
        entities.sort_unstable_by_key(|entity| entity.position());
        if let Some(pair) = entities.windows(2).find(|pair| pair[0].position() == pair[1].position()) {
            return Err(IndexError::DuplicatePosition { kind: E::KIND, position: pair[0].position() });
        }

        let ids = entities.iter().map(|entity| entity.id()).collect::<Vec<_>>();
        let mut index = HashMap::with_capacity(ids.len());
        for (i, &id) in ids.iter().enumerate() {
            if index.insert(id, i).is_some() {
                return Err(IndexError::DuplicateId { kind: E::KIND, id: format!("{:?}", id) });
            }
        }

        Ok((Self { ids, index }, entities))
    }

    /// Index of the entity with handle `id`, if it is known.
    #[must_use]
    pub fn get(&self, id: Id) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Index of the entity with handle `id`.
    ///
    /// # Errors
    ///
    /// If the handle is not known.
    pub fn require(&self, id: Id, kind: &'static str) -> Result<usize, IndexError> {
        self.get(id).ok_or_else(|| IndexError::Unknown { kind, id: format!("{:?}", id) })
    }

    /// Handles, ordered by index.
    #[must_use]
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// Number of indexed entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether there are no entities in the index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
