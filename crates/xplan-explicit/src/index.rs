//! Dense numbering of factored states.

use std::collections::HashMap;

use xplan_core::StateVarTuple;

/// Bijection between state indices `0..n` and factored states.
#[derive(Debug, Clone, Default)]
pub struct StateIndex {
    states: Vec<StateVarTuple>,
    indices: HashMap<StateVarTuple, usize>,
}

impl StateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `state`, numbering it first if it is new.
    ///
    /// The flag is true when the state was inserted by this call.
    pub fn insert(&mut self, state: StateVarTuple) -> (usize, bool) {
        if let Some(&i) = self.indices.get(&state) {
            return (i, false);
        }
        let i = self.states.len();
        self.indices.insert(state.clone(), i);
        self.states.push(state);
        (i, true)
    }

    /// Binds `state` to index `i`, growing the index with placeholders as needed.
    pub(crate) fn insert_at(&mut self, i: usize, state: StateVarTuple) {
        if self.states.len() <= i {
            self.states.resize(i + 1, StateVarTuple::new());
        }
        self.indices.insert(state.clone(), i);
        self.states[i] = state;
    }

    pub fn index_of(&self, state: &StateVarTuple) -> Option<usize> {
        self.indices.get(state).copied()
    }

    pub fn state(&self, i: usize) -> Option<&StateVarTuple> {
        self.states.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &StateVarTuple)> {
        self.states.iter().enumerate()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
