//! Actions, action types and the action space.
//!
//! An [`Action`] is identified by its name. Numeric attributes (distance,
//! duration, ...) ride along for QA functions but do not take part in
//! equality.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::error::{ModelError, Result};

#[cfg(test)]
mod tests;

/// A ground action.
///
/// # Example
///
/// ```
/// use xplan_core::action::Action;
///
/// let mv = Action::new("moveTo(l2)").with_attribute("distance", 3.5);
/// assert_eq!(mv.attribute("distance").unwrap(), 3.5);
/// assert!(mv.attribute("duration").is_err());
/// assert_eq!(mv, Action::new("moveTo(l2)"));
/// ```
#[derive(Clone)]
pub struct Action {
    name: Arc<str>,
    attributes: Arc<BTreeMap<String, f64>>,
}

impl Action {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            attributes: Arc::new(BTreeMap::new()),
        }
    }

    /// Adds (or replaces) a numeric attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        Arc::make_mut(&mut self.attributes).insert(name.into(), value);
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the named attribute.
    pub fn attribute(&self, name: &str) -> Result<f64> {
        self.attributes
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::AttributeNotFound {
                action: self.name.to_string(),
                attribute: name.to_string(),
            })
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, f64)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Action {}

impl Hash for Action {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Action {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Action {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action({})", self.name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An action type: a named group of actions sharing one operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionDefinition {
    name: Arc<str>,
    actions: Vec<Action>,
}

impl ActionDefinition {
    /// Creates an action type; actions are kept sorted and deduplicated.
    pub fn new(name: impl Into<Arc<str>>, actions: impl IntoIterator<Item = Action>) -> Self {
        let mut actions: Vec<Action> = actions.into_iter().collect();
        actions.sort();
        actions.dedup();
        Self {
            name: name.into(),
            actions,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn contains(&self, action: &Action) -> bool {
        self.actions.binary_search(action).is_ok()
    }

    /// Fails with `IncompatibleAction` unless `action` belongs to this type.
    pub fn check_action(&self, action: &Action) -> Result<()> {
        if self.contains(action) {
            Ok(())
        } else {
            Err(ModelError::IncompatibleAction {
                action: action.name().to_string(),
                definition: self.name.to_string(),
            })
        }
    }

    /// Resolves an action of this type by name.
    pub fn get(&self, name: &str) -> Result<&Action> {
        self.actions
            .iter()
            .find(|a| a.name() == name)
            .ok_or_else(|| ModelError::ActionNotFound(name.to_string()))
    }
}

/// All action types of a model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSpace {
    definitions: Vec<ActionDefinition>,
}

impl ActionSpace {
    pub fn new(definitions: impl IntoIterator<Item = ActionDefinition>) -> Self {
        Self {
            definitions: definitions.into_iter().collect(),
        }
    }

    pub fn add(&mut self, definition: ActionDefinition) {
        self.definitions.push(definition);
    }

    pub fn definitions(&self) -> &[ActionDefinition] {
        &self.definitions
    }

    /// Returns the action type that contains `action`.
    pub fn definition_of(&self, action: &Action) -> Result<&ActionDefinition> {
        self.definitions
            .iter()
            .find(|d| d.contains(action))
            .ok_or_else(|| ModelError::ActionDefinitionNotFound(action.name().to_string()))
    }

    /// Resolves an action by name across all action types.
    pub fn action(&self, name: &str) -> Result<&Action> {
        self.definitions
            .iter()
            .find_map(|d| d.get(name).ok())
            .ok_or_else(|| ModelError::ActionNotFound(name.to_string()))
    }

    /// All actions, ordered case-insensitively by name (ties broken by exact name).
    pub fn sorted_actions(&self) -> Vec<&Action> {
        let mut actions: Vec<&Action> = self.definitions.iter().flat_map(|d| d.actions()).collect();
        actions.sort_by(|a, b| compare_action_names(a.name(), b.name()));
        actions.dedup();
        actions
    }
}

/// Case-insensitive lexicographic order used for dense action indices.
pub fn compare_action_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
