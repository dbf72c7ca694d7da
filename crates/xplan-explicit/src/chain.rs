//! Effect-class chaining across action types.
//!
//! Effect classes of different action types that touch a common variable
//! cannot be updated independently. Chaining clusters them incrementally,
//! union-find style: every new effect class absorbs all existing chains it
//! overlaps, so chains introduced by different action types end up merged.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;
use xplan_core::factor::EffectClass;
use xplan_core::{StateVarDefinition, TransitionFunction};

/// A maximal set of effect classes linked by shared variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectChain {
    /// Effect class → names of the action types that own it.
    members: BTreeMap<EffectClass, BTreeSet<String>>,
}

impl EffectChain {
    fn single(class: EffectClass, owner: &str) -> Self {
        let mut members = BTreeMap::new();
        members.insert(class, BTreeSet::from([owner.to_string()]));
        Self { members }
    }

    fn overlaps(&self, class: &EffectClass) -> bool {
        self.members.keys().any(|c| c.overlaps(class))
    }

    fn absorb(&mut self, other: EffectChain) {
        for (class, owners) in other.members {
            self.members.entry(class).or_default().extend(owners);
        }
    }

    /// Union of the variables of all member classes.
    pub fn vars(&self) -> BTreeSet<StateVarDefinition> {
        self.members.keys().flat_map(|c| c.iter().cloned()).collect()
    }

    pub fn effect_classes(&self) -> impl Iterator<Item = &EffectClass> {
        self.members.keys()
    }

    /// Names of the action types with an effect class in this chain.
    pub fn action_types(&self) -> BTreeSet<&str> {
        self.members
            .values()
            .flat_map(|owners| owners.iter().map(String::as_str))
            .collect()
    }

    /// Member classes owned by the action type `name`.
    pub fn classes_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a EffectClass> + 'a {
        self.members
            .iter()
            .filter(move |(_, owners)| owners.contains(name))
            .map(|(class, _)| class)
    }
}

/// Clusters the effect classes of all PSOs into chains.
///
/// The resulting partition depends only on the set of PSOs, not on their
/// order; chains are returned sorted by their variables.
pub fn chain_effect_classes(transitions: &TransitionFunction) -> Vec<EffectChain> {
    let mut chains: Vec<EffectChain> = Vec::new();
    for pso in transitions {
        let owner = pso.definition().name();
        for class in pso.effect_classes() {
            let mut chain = EffectChain::single(class.clone(), owner);
            let (linked, rest): (Vec<_>, Vec<_>) =
                chains.into_iter().partition(|c| c.overlaps(class));
            for other in linked {
                chain.absorb(other);
            }
            trace!(
                event = "effect_class_chained",
                action_type = owner,
                class = %class,
                chain_size = chain.members.len(),
            );
            chains = rest;
            chains.push(chain);
        }
    }
    chains.sort_by_key(|c| c.vars());
    chains
}
