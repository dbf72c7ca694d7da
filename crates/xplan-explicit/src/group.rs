//! Independently updatable variable groups.
//!
//! Each effect chain becomes one update group. Within a group, every action
//! type has at most one action description: when several of its effect
//! classes fall into the same chain, their descriptions are merged. A group
//! then compiles into guarded commands, one per applicable combination of
//! discriminant values.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use xplan_core::description::enumerate_discriminants;
use xplan_core::factor::DiscriminantClass;
use xplan_core::{
    Action, ActionDescription, ModelError, StateVarDefinition, StateVarTuple, TransitionFunction,
};

use crate::chain::{chain_effect_classes, EffectChain};
use crate::error::Result;

/// A guarded probabilistic update of one group's variables.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCommand {
    /// Source values of discriminant variables the update may change.
    pub changed_guard: StateVarTuple,
    /// Source values of discriminant variables the update leaves untouched.
    pub unchanged_guard: StateVarTuple,
    /// Distribution over the new values of the changed variables.
    pub outcomes: Vec<(StateVarTuple, f64)>,
}

impl GroupCommand {
    /// The full guard: all discriminant values.
    pub fn guard(&self) -> StateVarTuple {
        self.changed_guard.overlay(&self.unchanged_guard)
    }
}

/// Commands of one action within a group, keyed by guard.
#[derive(Debug, Clone)]
struct ActionCommands {
    guard_class: DiscriminantClass,
    rows: BTreeMap<StateVarTuple, GroupCommand>,
}

/// Variables of one effect chain and the updates every action type applies to them.
#[derive(Debug, Clone)]
pub struct UpdateGroup {
    vars: BTreeSet<StateVarDefinition>,
    descriptions: BTreeMap<String, ActionDescription>,
    commands: BTreeMap<Action, ActionCommands>,
}

impl UpdateGroup {
    fn from_chain(chain: &EffectChain, transitions: &TransitionFunction) -> Result<Self> {
        let mut descriptions = BTreeMap::new();
        for name in chain.action_types() {
            let pso = transitions.pso(name)?;
            let mut merged: Option<ActionDescription> = None;
            for class in chain.classes_of(name) {
                let description = pso.description(class)?;
                merged = Some(match merged {
                    None => description.clone(),
                    Some(acc) => acc.merge(description, pso.precondition())?,
                });
            }
            if let Some(description) = merged {
                descriptions.insert(name.to_string(), description);
            }
        }

        let mut commands = BTreeMap::new();
        for (name, description) in &descriptions {
            let pso = transitions.pso(name)?;
            for action in pso.definition().actions() {
                let mut rows = BTreeMap::new();
                let discriminants =
                    enumerate_discriminants(description.discriminant_class(), action, pso.precondition())?;
                for discriminant in discriminants {
                    let effect = description.probabilistic_effect(&discriminant, action)?;
                    let guard = discriminant.values();
                    let changed: Vec<&StateVarDefinition> = guard
                        .vars()
                        .filter(|v| description.effect_class().contains(v))
                        .collect();
                    let unchanged: Vec<&StateVarDefinition> = guard
                        .vars()
                        .filter(|v| !description.effect_class().contains(v))
                        .collect();
                    let outcomes = effect
                        .outcomes()
                        .filter(|(_, p)| *p > 0.0)
                        .map(|(e, p)| (e.values().clone(), p))
                        .collect();
                    rows.insert(
                        guard.clone(),
                        GroupCommand {
                            changed_guard: guard.project(changed)?,
                            unchanged_guard: guard.project(unchanged)?,
                            outcomes,
                        },
                    );
                }
                commands.insert(
                    action.clone(),
                    ActionCommands {
                        guard_class: description.discriminant_class().clone(),
                        rows,
                    },
                );
            }
        }

        Ok(Self {
            vars: chain.vars(),
            descriptions,
            commands,
        })
    }

    pub fn vars(&self) -> &BTreeSet<StateVarDefinition> {
        &self.vars
    }

    /// The (possibly merged) description of the named action type, if it touches this group.
    pub fn description(&self, action_type: &str) -> Option<&ActionDescription> {
        self.descriptions.get(action_type)
    }

    /// All commands of `action`, keyed by full guard.
    pub fn commands(&self, action: &Action) -> impl Iterator<Item = &GroupCommand> {
        self.commands
            .get(action)
            .into_iter()
            .flat_map(|commands| commands.rows.values())
    }

    /// Number of commands across all actions.
    pub fn num_commands(&self) -> usize {
        self.commands.values().map(|c| c.rows.len()).sum()
    }

    /// The command of `action` whose guard holds in `state`.
    ///
    /// `Ok(None)` if `action` does not touch this group. Fails with
    /// `DiscriminantNotFound` if the state's discriminant values are not
    /// admitted by the action's precondition.
    pub fn command_for(&self, action: &Action, state: &StateVarTuple) -> Result<Option<&GroupCommand>> {
        let Some(commands) = self.commands.get(action) else {
            return Ok(None);
        };
        let guard = state.project(commands.guard_class.iter())?;
        commands
            .rows
            .get(&guard)
            .map(Some)
            .ok_or_else(|| ModelError::DiscriminantNotFound(guard.to_string()).into())
    }
}

/// Builds one update group per effect chain of `transitions`.
pub fn update_groups(transitions: &TransitionFunction) -> Result<Vec<UpdateGroup>> {
    let chains = chain_effect_classes(transitions);
    let groups = chains
        .iter()
        .map(|chain| UpdateGroup::from_chain(chain, transitions))
        .collect::<Result<Vec<_>>>()?;
    debug!(
        event = "update_groups_built",
        groups = groups.len(),
        commands = groups.iter().map(UpdateGroup::num_commands).sum::<usize>(),
    );
    Ok(groups)
}
