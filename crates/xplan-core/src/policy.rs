//! Deterministic policies.

use std::collections::BTreeMap;

use crate::action::Action;
use crate::state::StateVarTuple;

/// An immutable mapping from states to the single action chosen in each.
///
/// States outside the policy are unreachable under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    decisions: BTreeMap<StateVarTuple, Action>,
}

impl Policy {
    /// Returns the action chosen in `state`.
    pub fn action(&self, state: &StateVarTuple) -> Option<&Action> {
        self.decisions.get(state)
    }

    pub fn contains(&self, state: &StateVarTuple) -> bool {
        self.decisions.contains_key(state)
    }

    pub fn decisions(&self) -> impl Iterator<Item = (&StateVarTuple, &Action)> {
        self.decisions.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

impl FromIterator<(StateVarTuple, Action)> for Policy {
    fn from_iter<I: IntoIterator<Item = (StateVarTuple, Action)>>(iter: I) -> Self {
        Self {
            decisions: iter.into_iter().collect(),
        }
    }
}
