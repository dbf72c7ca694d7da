//! Per-action applicability of source-variable values.

use std::collections::{BTreeMap, BTreeSet};

use crate::action::{Action, ActionDefinition};
use crate::error::{ModelError, Result};
use crate::state::{StateVarDefinition, StateVarTuple, Value};

type Restrictions = BTreeMap<StateVarDefinition, BTreeSet<Value>>;

/// Allowed source values, per action and per variable, for one action type.
///
/// A variable without an entry for an action is unrestricted: every value of
/// its domain is applicable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precondition {
    definition: ActionDefinition,
    restrictions: BTreeMap<Action, Restrictions>,
}

impl Precondition {
    pub fn builder(definition: ActionDefinition) -> PreconditionBuilder {
        PreconditionBuilder {
            precondition: Precondition {
                definition,
                restrictions: BTreeMap::new(),
            },
        }
    }

    /// Precondition that restricts nothing.
    pub fn unrestricted(definition: ActionDefinition) -> Self {
        Self::builder(definition).build()
    }

    #[inline]
    pub fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    /// Fails with `ActionNotFound` unless `action` belongs to this action type.
    pub fn check_action(&self, action: &Action) -> Result<()> {
        if self.definition.contains(action) {
            Ok(())
        } else {
            Err(ModelError::ActionNotFound(action.name().to_string()))
        }
    }

    /// Applicable values of `var` for `action`, in domain order.
    pub fn applicable_values(&self, action: &Action, var: &StateVarDefinition) -> Result<Vec<Value>> {
        self.check_action(action)?;
        let allowed = self.restrictions.get(action).and_then(|r| r.get(var));
        Ok(var
            .domain()
            .iter()
            .filter(|v| allowed.map_or(true, |set| set.contains(*v)))
            .cloned()
            .collect())
    }

    /// Variables restricted for `action`.
    pub fn restricted_vars(&self, action: &Action) -> Result<Vec<&StateVarDefinition>> {
        self.check_action(action)?;
        Ok(self
            .restrictions
            .get(action)
            .map(|r| r.keys().collect())
            .unwrap_or_default())
    }

    /// Returns true if `action` may be taken in `state`.
    ///
    /// Fails with `VarNotFound` if the state does not assign a restricted variable.
    pub fn is_applicable(&self, action: &Action, state: &StateVarTuple) -> Result<bool> {
        self.check_action(action)?;
        let Some(restrictions) = self.restrictions.get(action) else {
            return Ok(true);
        };
        for (var, allowed) in restrictions {
            if !allowed.contains(state.get(var)?) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Mutable construction phase of a [`Precondition`].
#[derive(Debug)]
pub struct PreconditionBuilder {
    precondition: Precondition,
}

impl PreconditionBuilder {
    /// Allows `values` of `var` for `action`; repeated calls union the allowed sets.
    pub fn allow<V: Into<Value>>(
        mut self,
        action: &Action,
        var: &StateVarDefinition,
        values: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.precondition.check_action(action)?;
        let mut checked = BTreeSet::new();
        for value in values {
            checked.insert(var.value(value)?);
        }
        self.precondition
            .restrictions
            .entry(action.clone())
            .or_default()
            .entry(var.clone())
            .or_default()
            .extend(checked);
        Ok(self)
    }

    pub fn build(self) -> Precondition {
        self.precondition
    }
}
