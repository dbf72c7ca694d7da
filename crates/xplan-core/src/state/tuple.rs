//! Partial and complete assignments of state variables.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use super::{StateVarDefinition, Value};
use crate::error::{ModelError, Result};

/// An assignment of values to state variables.
///
/// Variables absent from the tuple are "don't care". Two tuples are equal
/// iff their assignments are equal. Iteration order is deterministic.
///
/// # Example
///
/// ```
/// use xplan_core::state::{StateVarDefinition, StateVarTuple};
///
/// let loc = StateVarDefinition::new("rLoc", ["l1", "l2"]);
/// let charged = StateVarDefinition::boolean("charged");
///
/// let mut state = StateVarTuple::new();
/// state.insert(&loc, "l1").unwrap();
/// state.insert(&charged, true).unwrap();
///
/// let partial = StateVarTuple::new().with(&loc, "l1").unwrap();
/// assert!(partial.matches(&state));
/// assert_eq!(state.get(&loc).unwrap().to_string(), "l1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateVarTuple {
    values: BTreeMap<StateVarDefinition, Value>,
}

impl StateVarTuple {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `value` to `var`, replacing any previous value.
    ///
    /// Fails with `ValueOutOfDomain` if the value is not in the variable's domain.
    pub fn insert(&mut self, var: &StateVarDefinition, value: impl Into<Value>) -> Result<()> {
        let value = var.value(value)?;
        self.values.insert(var.clone(), value);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, var: &StateVarDefinition, value: impl Into<Value>) -> Result<Self> {
        self.insert(var, value)?;
        Ok(self)
    }

    /// Returns the value of `var`.
    pub fn get(&self, var: &StateVarDefinition) -> Result<&Value> {
        self.values
            .get(var)
            .ok_or_else(|| ModelError::VarNotFound(var.name().to_string()))
    }

    /// Returns the value of the variable named `name`.
    pub fn get_by_name(&self, name: &str) -> Result<&Value> {
        self.values
            .iter()
            .find(|(var, _)| var.name() == name)
            .map(|(_, value)| value)
            .ok_or_else(|| ModelError::VarNotFound(name.to_string()))
    }

    #[inline]
    pub fn contains(&self, var: &StateVarDefinition) -> bool {
        self.values.contains_key(var)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn vars(&self) -> impl Iterator<Item = &StateVarDefinition> {
        self.values.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, StateVarDefinition, Value> {
        self.values.iter()
    }

    /// Restricts the tuple to `vars`; every requested variable must be assigned.
    pub fn project<'a>(
        &self,
        vars: impl IntoIterator<Item = &'a StateVarDefinition>,
    ) -> Result<StateVarTuple> {
        let mut projected = BTreeMap::new();
        for var in vars {
            let value = self.get(var)?;
            projected.insert(var.clone(), value.clone());
        }
        Ok(StateVarTuple { values: projected })
    }

    /// Returns a copy of `self` with every assignment of `other` written over it.
    pub fn overlay(&self, other: &StateVarTuple) -> StateVarTuple {
        let mut values = self.values.clone();
        for (var, value) in &other.values {
            values.insert(var.clone(), value.clone());
        }
        StateVarTuple { values }
    }

    /// Returns true if both tuples agree on every variable they share.
    pub fn is_consistent_with(&self, other: &StateVarTuple) -> bool {
        self.values
            .iter()
            .all(|(var, value)| other.values.get(var).map_or(true, |v| v == value))
    }

    /// Unions two consistent tuples; `None` if they disagree on a shared variable.
    pub fn merge(&self, other: &StateVarTuple) -> Option<StateVarTuple> {
        if self.is_consistent_with(other) {
            Some(self.overlay(other))
        } else {
            None
        }
    }

    /// Returns true if every assignment of `self` also holds in `state`.
    pub fn matches(&self, state: &StateVarTuple) -> bool {
        self.values
            .iter()
            .all(|(var, value)| state.values.get(var) == Some(value))
    }
}

impl<'a> IntoIterator for &'a StateVarTuple {
    type Item = (&'a StateVarDefinition, &'a Value);
    type IntoIter = btree_map::Iter<'a, StateVarDefinition, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for StateVarTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (var, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", var.name(), value)?;
        }
        f.write_str("}")
    }
}
