//! Predicates over states.

use super::StateVarTuple;

/// A disjunction of partial assignments.
///
/// A state satisfies the predicate if it matches at least one alternative.
/// A predicate with no alternatives is never satisfied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePredicate {
    alternatives: Vec<StateVarTuple>,
}

impl StatePredicate {
    /// Predicate satisfied by states matching `tuple`.
    pub fn all_of(tuple: StateVarTuple) -> Self {
        Self {
            alternatives: vec![tuple],
        }
    }

    /// Predicate satisfied by states matching any of `tuples`.
    pub fn any_of(tuples: impl IntoIterator<Item = StateVarTuple>) -> Self {
        Self {
            alternatives: tuples.into_iter().collect(),
        }
    }

    pub fn evaluate(&self, state: &StateVarTuple) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(state))
    }

    pub fn alternatives(&self) -> &[StateVarTuple] {
        &self.alternatives
    }
}
