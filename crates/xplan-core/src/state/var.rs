//! State variable definitions and the state space.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use super::{StateVarTuple, Value};
use crate::error::{ModelError, Result};

/// A named state variable with a finite domain.
///
/// Two definitions are equal iff both the name and the domain are equal.
/// Cloning is cheap; the name and domain are shared.
///
/// # Example
///
/// ```
/// use xplan_core::state::StateVarDefinition;
///
/// let loc = StateVarDefinition::new("rLoc", ["l1", "l2", "l3"]);
/// assert_eq!(loc.name(), "rLoc");
/// assert_eq!(loc.domain().len(), 3);
/// assert!(loc.value("l2").is_ok());
/// assert!(loc.value("l9").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateVarDefinition {
    name: Arc<str>,
    domain: Arc<[Value]>,
}

impl StateVarDefinition {
    /// Creates a definition; duplicate values are dropped, first occurrence wins.
    pub fn new<V: Into<Value>>(name: impl Into<Arc<str>>, values: impl IntoIterator<Item = V>) -> Self {
        let mut seen = BTreeSet::new();
        let domain: Vec<Value> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| seen.insert(v.clone()))
            .collect();
        Self {
            name: name.into(),
            domain: domain.into(),
        }
    }

    /// Creates a boolean variable with domain `{false, true}`.
    pub fn boolean(name: impl Into<Arc<str>>) -> Self {
        Self::new(name, [false, true])
    }

    /// Creates an integer variable with domain `lo..=hi`.
    pub fn range(name: impl Into<Arc<str>>, lo: i64, hi: i64) -> Self {
        Self::new(name, lo..=hi)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    /// Returns true if `value` is in the domain.
    pub fn contains(&self, value: &Value) -> bool {
        self.domain.contains(value)
    }

    /// Converts `value` and checks that it belongs to the domain.
    pub fn value(&self, value: impl Into<Value>) -> Result<Value> {
        let value = value.into();
        if self.contains(&value) {
            Ok(value)
        } else {
            Err(ModelError::ValueOutOfDomain {
                var: self.name.to_string(),
                value: value.to_string(),
            })
        }
    }

    /// Looks up the domain value whose textual form is `text`.
    pub fn parse_value(&self, text: &str) -> Result<Value> {
        self.domain
            .iter()
            .find(|v| v.to_string() == text)
            .cloned()
            .ok_or_else(|| ModelError::ValueOutOfDomain {
                var: self.name.to_string(),
                value: text.to_string(),
            })
    }
}

impl fmt::Debug for StateVarDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.name, self.domain)
    }
}

impl fmt::Display for StateVarDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The set of state variable definitions of a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSpace {
    vars: BTreeSet<StateVarDefinition>,
}

impl StateSpace {
    pub fn new(vars: impl IntoIterator<Item = StateVarDefinition>) -> Self {
        Self {
            vars: vars.into_iter().collect(),
        }
    }

    /// Adds a definition to the space.
    pub fn add(&mut self, var: StateVarDefinition) {
        self.vars.insert(var);
    }

    /// Resolves a definition by name.
    pub fn get(&self, name: &str) -> Result<&StateVarDefinition> {
        self.vars
            .iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| ModelError::VarNotFound(name.to_string()))
    }

    /// Returns true if exactly this definition (name and domain) is in the space.
    pub fn contains(&self, var: &StateVarDefinition) -> bool {
        self.vars.contains(var)
    }

    /// Fails with `VarNotFound` unless `var` resolves to a definition of this space.
    pub fn check_var(&self, var: &StateVarDefinition) -> Result<()> {
        if self.contains(var) {
            Ok(())
        } else {
            Err(ModelError::VarNotFound(var.name().to_string()))
        }
    }

    /// Fails unless `state` assigns every variable of the space and nothing else.
    pub fn check_complete(&self, state: &StateVarTuple) -> Result<()> {
        for var in &self.vars {
            if !state.contains(var) {
                return Err(ModelError::IncompleteState(var.name().to_string()));
            }
        }
        for var in state.vars() {
            self.check_var(var)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateVarDefinition> {
        self.vars.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<StateVarDefinition> for StateSpace {
    fn from_iter<I: IntoIterator<Item = StateVarDefinition>>(iter: I) -> Self {
        Self::new(iter)
    }
}
