//! Factored probabilistic STRIPS operators.

use std::collections::{BTreeMap, BTreeSet};

use crate::action::{Action, ActionDefinition};
use crate::description::ActionDescription;
use crate::error::{ModelError, Result};
use crate::factor::{Discriminant, DiscriminantClass, EffectClass, Precondition};
use crate::state::{StateVarDefinition, StateVarTuple, Value};

/// One action type's precondition plus one action description per effect class.
///
/// Effect classes of a PSO are pairwise disjoint and every tabular
/// description covers all discriminants its precondition admits; both are
/// checked by [`FactoredPsoBuilder::build`].
#[derive(Debug, Clone)]
pub struct FactoredPso {
    precondition: Precondition,
    descriptions: BTreeMap<EffectClass, ActionDescription>,
}

impl FactoredPso {
    pub fn builder(precondition: Precondition) -> FactoredPsoBuilder {
        FactoredPsoBuilder {
            precondition,
            descriptions: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn definition(&self) -> &ActionDefinition {
        self.precondition.definition()
    }

    #[inline]
    pub fn precondition(&self) -> &Precondition {
        &self.precondition
    }

    pub fn effect_classes(&self) -> impl Iterator<Item = &EffectClass> {
        self.descriptions.keys()
    }

    pub fn descriptions(&self) -> impl Iterator<Item = &ActionDescription> {
        self.descriptions.values()
    }

    /// Returns the description of `class`.
    pub fn description(&self, class: &EffectClass) -> Result<&ActionDescription> {
        self.descriptions
            .get(class)
            .ok_or_else(|| ModelError::EffectClassNotFound(class.to_string()))
    }

    /// Returns the effect class that contains `var`.
    pub fn effect_class_of(&self, var: &StateVarDefinition) -> Result<&EffectClass> {
        self.descriptions
            .keys()
            .find(|c| c.contains(var))
            .ok_or_else(|| ModelError::EffectClassNotFound(var.name().to_string()))
    }

    /// Returns the discriminant class governing `var`.
    pub fn discriminant_class(&self, var: &StateVarDefinition) -> Result<&DiscriminantClass> {
        let class = self.effect_class_of(var)?;
        Ok(self.description(class)?.discriminant_class())
    }

    /// Variables this action type can change.
    pub fn affected_vars(&self) -> BTreeSet<&StateVarDefinition> {
        self.descriptions.keys().flat_map(|c| c.iter()).collect()
    }

    pub fn is_applicable(&self, action: &Action, state: &StateVarTuple) -> Result<bool> {
        self.precondition.is_applicable(action, state)
    }

    /// Values `var` may take after `action` under `discriminant`.
    pub fn possible_impact(
        &self,
        var: &StateVarDefinition,
        discriminant: &Discriminant,
        action: &Action,
    ) -> Result<BTreeSet<Value>> {
        let class = self.effect_class_of(var)?;
        self.description(class)?.possible_impact(var, discriminant, action)
    }

    /// Distribution over assignments of the affected variables after `action` in `state`.
    ///
    /// Effect classes are independent, so the distribution is the product of the
    /// per-class effects. Unaffected variables are not part of the returned tuples.
    pub fn outcomes(&self, action: &Action, state: &StateVarTuple) -> Result<Vec<(StateVarTuple, f64)>> {
        let mut outcomes = vec![(StateVarTuple::new(), 1.0)];
        for description in self.descriptions.values() {
            let discriminant = Discriminant::from_state(description.discriminant_class(), state)?;
            let effect = description.probabilistic_effect(&discriminant, action)?;
            let mut next = Vec::with_capacity(outcomes.len() * effect.len());
            for (partial, p) in &outcomes {
                for (e, q) in effect.outcomes() {
                    if q > 0.0 {
                        next.push((partial.overlay(e.values()), p * q));
                    }
                }
            }
            outcomes = next;
        }
        Ok(outcomes)
    }
}

/// Mutable construction phase of a [`FactoredPso`].
#[derive(Debug)]
pub struct FactoredPsoBuilder {
    precondition: Precondition,
    descriptions: BTreeMap<EffectClass, ActionDescription>,
}

impl FactoredPsoBuilder {
    /// Adds the description of one effect class.
    ///
    /// # Errors
    ///
    /// - `IncompatibleAction` if the description belongs to another action type
    /// - `OverlappingEffectClasses` if its effect class shares a variable with one already added
    pub fn with_description(mut self, description: ActionDescription) -> Result<Self> {
        let definition = self.precondition.definition();
        if description.definition() != definition {
            return Err(ModelError::IncompatibleAction {
                action: description.definition().name().to_string(),
                definition: definition.name().to_string(),
            });
        }
        for class in self.descriptions.keys() {
            if let Some(var) = class.first_shared(description.effect_class()) {
                return Err(ModelError::OverlappingEffectClasses {
                    definition: definition.name().to_string(),
                    var: var.name().to_string(),
                });
            }
        }
        self.descriptions
            .insert(description.effect_class().clone(), description);
        Ok(self)
    }

    /// Freezes the operator after checking every description is total.
    pub fn build(self) -> Result<FactoredPso> {
        for description in self.descriptions.values() {
            description.check_total(&self.precondition)?;
        }
        Ok(FactoredPso {
            precondition: self.precondition,
            descriptions: self.descriptions,
        })
    }
}
