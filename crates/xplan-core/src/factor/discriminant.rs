//! Discriminants: source-state cases that select a probabilistic effect.

use std::fmt;

use super::DiscriminantClass;
use crate::error::{ModelError, Result};
use crate::state::{StateVarDefinition, StateVarTuple, Value};

/// A partial source-state assignment over the variables of a [`DiscriminantClass`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Discriminant {
    class: DiscriminantClass,
    values: StateVarTuple,
}

impl Discriminant {
    /// Creates an empty discriminant of `class`.
    pub fn new(class: DiscriminantClass) -> Self {
        Self {
            class,
            values: StateVarTuple::new(),
        }
    }

    /// Builds the discriminant of `class` that holds in `state`.
    pub fn from_state(class: &DiscriminantClass, state: &StateVarTuple) -> Result<Self> {
        Ok(Self {
            values: state.project(class.iter())?,
            class: class.clone(),
        })
    }

    /// Assigns a variable of the class.
    ///
    /// Fails with `IncompatibleVar` if `var` is not part of the class.
    pub fn add(&mut self, var: &StateVarDefinition, value: impl Into<Value>) -> Result<()> {
        if !self.class.contains(var) {
            return Err(ModelError::IncompatibleVar {
                var: var.name().to_string(),
                class: self.class.to_string(),
            });
        }
        self.values.insert(var, value)
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, var: &StateVarDefinition, value: impl Into<Value>) -> Result<Self> {
        self.add(var, value)?;
        Ok(self)
    }

    #[inline]
    pub fn class(&self) -> &DiscriminantClass {
        &self.class
    }

    #[inline]
    pub fn values(&self) -> &StateVarTuple {
        &self.values
    }

    /// Returns true once every variable of the class is assigned.
    pub fn is_complete(&self) -> bool {
        self.values.len() == self.class.len()
    }

    /// Returns true if the discriminant holds in `state`.
    pub fn holds_in(&self, state: &StateVarTuple) -> bool {
        self.values.matches(state)
    }

    /// Joins two discriminants over the union of their classes.
    ///
    /// Returns `None` when they disagree on a shared variable, i.e. the two
    /// cases can never hold at the same time.
    pub fn join(&self, other: &Discriminant) -> Option<Discriminant> {
        let values = self.values.merge(&other.values)?;
        Some(Discriminant {
            class: self.class.union(&other.class),
            values,
        })
    }
}

impl fmt::Display for Discriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.values, f)
    }
}
