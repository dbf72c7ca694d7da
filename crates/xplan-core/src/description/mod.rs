//! Action descriptions: discriminant → probabilistic effect mappings.
//!
//! One description covers one (action type, effect class) pair. Two
//! realizations live behind the same type:
//!
//! - **Tabular**: an explicit table filled through [`TabularDescriptionBuilder`].
//! - **Formula**: a [`TransitionFormula`] computes the effect on demand and
//!   discriminants are enumerated from the precondition.

mod enumerate;


use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

pub use enumerate::enumerate_discriminants;

use crate::action::{Action, ActionDefinition};
use crate::error::{ModelError, Result};
use crate::factor::{Discriminant, DiscriminantClass, EffectClass, Precondition, ProbabilisticEffect};
use crate::state::{StateVarDefinition, Value};

/// Computes the probabilistic effect of an action for a discriminant.
///
/// Implemented for any `Fn(&Discriminant, &Action) -> Result<ProbabilisticEffect>`.
pub trait TransitionFormula: Send + Sync {
    fn effect(&self, discriminant: &Discriminant, action: &Action) -> Result<ProbabilisticEffect>;
}

impl<F> TransitionFormula for F
where
    F: Fn(&Discriminant, &Action) -> Result<ProbabilisticEffect> + Send + Sync,
{
    fn effect(&self, discriminant: &Discriminant, action: &Action) -> Result<ProbabilisticEffect> {
        self(discriminant, action)
    }
}

type Table = BTreeMap<Action, BTreeMap<Discriminant, ProbabilisticEffect>>;

#[derive(Clone)]
enum DescriptionKind {
    Tabular(Table),
    Formula(Arc<dyn TransitionFormula>),
}

impl fmt::Debug for DescriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionKind::Tabular(table) => f
                .debug_struct("Tabular")
                .field("entries", &table.values().map(BTreeMap::len).sum::<usize>())
                .finish(),
            DescriptionKind::Formula(_) => f.write_str("Formula"),
        }
    }
}

/// The effect of one action type on one effect class.
#[derive(Debug, Clone)]
pub struct ActionDescription {
    definition: ActionDefinition,
    discriminant_class: DiscriminantClass,
    effect_class: EffectClass,
    kind: DescriptionKind,
}

impl ActionDescription {
    /// Starts a tabular description.
    pub fn tabular(
        definition: ActionDefinition,
        discriminant_class: DiscriminantClass,
        effect_class: EffectClass,
    ) -> TabularDescriptionBuilder {
        TabularDescriptionBuilder {
            description: ActionDescription {
                definition,
                discriminant_class,
                effect_class,
                kind: DescriptionKind::Tabular(BTreeMap::new()),
            },
        }
    }

    /// Creates a formula-based description.
    pub fn formula(
        definition: ActionDefinition,
        discriminant_class: DiscriminantClass,
        effect_class: EffectClass,
        formula: impl TransitionFormula + 'static,
    ) -> Self {
        Self {
            definition,
            discriminant_class,
            effect_class,
            kind: DescriptionKind::Formula(Arc::new(formula)),
        }
    }

    #[inline]
    pub fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    #[inline]
    pub fn discriminant_class(&self) -> &DiscriminantClass {
        &self.discriminant_class
    }

    #[inline]
    pub fn effect_class(&self) -> &EffectClass {
        &self.effect_class
    }

    pub fn is_tabular(&self) -> bool {
        matches!(self.kind, DescriptionKind::Tabular(_))
    }

    fn check_action(&self, action: &Action) -> Result<()> {
        if self.definition.contains(action) {
            Ok(())
        } else {
            Err(ModelError::ActionNotFound(action.name().to_string()))
        }
    }

    /// Returns the probabilistic effect of `action` under `discriminant`.
    pub fn probabilistic_effect(
        &self,
        discriminant: &Discriminant,
        action: &Action,
    ) -> Result<Cow<'_, ProbabilisticEffect>> {
        self.check_action(action)?;
        if discriminant.class() != &self.discriminant_class {
            return Err(ModelError::IncompatibleDiscriminantClass {
                expected: self.discriminant_class.to_string(),
                found: discriminant.class().to_string(),
            });
        }
        match &self.kind {
            DescriptionKind::Tabular(table) => table
                .get(action)
                .and_then(|rows| rows.get(discriminant))
                .map(Cow::Borrowed)
                .ok_or_else(|| ModelError::DiscriminantNotFound(discriminant.to_string())),
            DescriptionKind::Formula(formula) => {
                let effect = formula.effect(discriminant, action)?;
                if effect.class() != &self.effect_class {
                    return Err(ModelError::IncompatibleEffectClass {
                        expected: self.effect_class.to_string(),
                        found: effect.class().to_string(),
                    });
                }
                Ok(Cow::Owned(effect))
            }
        }
    }

    /// Every discriminant `action` can face under `precondition`.
    pub fn discriminants(&self, action: &Action, precondition: &Precondition) -> Result<Vec<Discriminant>> {
        self.check_action(action)?;
        enumerate_discriminants(&self.discriminant_class, action, precondition)
    }

    /// Values `var` may take after `action` under `discriminant`.
    pub fn possible_impact(
        &self,
        var: &StateVarDefinition,
        discriminant: &Discriminant,
        action: &Action,
    ) -> Result<BTreeSet<Value>> {
        self.probabilistic_effect(discriminant, action)?
            .possible_values(var)
    }

    /// Checks that every discriminant implied by `precondition` has an effect.
    pub fn check_total(&self, precondition: &Precondition) -> Result<()> {
        if let DescriptionKind::Tabular(_) = self.kind {
            for action in self.definition.actions() {
                for discriminant in self.discriminants(action, precondition)? {
                    self.probabilistic_effect(&discriminant, action)?;
                }
            }
        }
        Ok(())
    }

    /// Merges two descriptions of the same action type on different effect classes.
    ///
    /// The result is tabular over the union of both discriminant classes and
    /// both effect classes; each joined discriminant maps to the product of the
    /// two probabilistic effects.
    pub fn merge(&self, other: &ActionDescription, precondition: &Precondition) -> Result<ActionDescription> {
        if self.definition != other.definition {
            return Err(ModelError::IncompatibleAction {
                action: other.definition.name().to_string(),
                definition: self.definition.name().to_string(),
            });
        }
        if let Some(var) = self.effect_class.first_shared(&other.effect_class) {
            return Err(ModelError::OverlappingEffectClasses {
                definition: self.definition.name().to_string(),
                var: var.name().to_string(),
            });
        }

        let mut table = Table::new();
        for action in self.definition.actions() {
            let rows = table.entry(action.clone()).or_default();
            let left = self.discriminants(action, precondition)?;
            let right = other.discriminants(action, precondition)?;
            for d1 in &left {
                let e1 = self.probabilistic_effect(d1, action)?;
                for d2 in &right {
                    let Some(joined) = d1.join(d2) else {
                        continue;
                    };
                    let e2 = other.probabilistic_effect(d2, action)?;
                    rows.insert(joined, e1.join(&e2)?);
                }
            }
        }

        Ok(ActionDescription {
            definition: self.definition.clone(),
            discriminant_class: self.discriminant_class.union(&other.discriminant_class),
            effect_class: self.effect_class.union(&other.effect_class),
            kind: DescriptionKind::Tabular(table),
        })
    }
}

/// Mutable construction phase of a tabular [`ActionDescription`].
#[derive(Debug)]
pub struct TabularDescriptionBuilder {
    description: ActionDescription,
}

impl TabularDescriptionBuilder {
    /// Maps `discriminant` to `effect` for `action`.
    ///
    /// # Errors
    ///
    /// - `IncompatibleAction` if `action` is not of this action type
    /// - `IncompatibleDiscriminantClass` / `IncompatibleEffectClass` on class mismatch
    pub fn put(
        mut self,
        action: &Action,
        discriminant: Discriminant,
        effect: ProbabilisticEffect,
    ) -> Result<Self> {
        let description = &mut self.description;
        description.definition.check_action(action)?;
        if discriminant.class() != &description.discriminant_class {
            return Err(ModelError::IncompatibleDiscriminantClass {
                expected: description.discriminant_class.to_string(),
                found: discriminant.class().to_string(),
            });
        }
        if effect.class() != &description.effect_class {
            return Err(ModelError::IncompatibleEffectClass {
                expected: description.effect_class.to_string(),
                found: effect.class().to_string(),
            });
        }
        if let DescriptionKind::Tabular(table) = &mut description.kind {
            table
                .entry(action.clone())
                .or_default()
                .insert(discriminant, effect);
        }
        Ok(self)
    }

    /// Maps `discriminant` to `effect` for every action of the type.
    pub fn put_all(mut self, discriminant: Discriminant, effect: ProbabilisticEffect) -> Result<Self> {
        let actions = self.description.definition.actions().to_vec();
        for action in &actions {
            self = self.put(action, discriminant.clone(), effect.clone())?;
        }
        Ok(self)
    }

    pub fn build(self) -> ActionDescription {
        self.description
    }
}
