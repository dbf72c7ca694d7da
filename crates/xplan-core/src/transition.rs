//! The transition function of a factored model.

use crate::action::Action;
use crate::error::{ModelError, Result};
use crate::pso::FactoredPso;

/// The Factored PSOs of all action types of a model.
///
/// Immutable once built; at most one PSO per action type.
#[derive(Debug, Clone, Default)]
pub struct TransitionFunction {
    psos: Vec<FactoredPso>,
}

impl TransitionFunction {
    pub fn builder() -> TransitionFunctionBuilder {
        TransitionFunctionBuilder::default()
    }

    /// Returns the PSO of the action type containing `action`.
    pub fn pso_for(&self, action: &Action) -> Result<&FactoredPso> {
        self.psos
            .iter()
            .find(|pso| pso.definition().contains(action))
            .ok_or_else(|| ModelError::ActionDefinitionNotFound(action.name().to_string()))
    }

    /// Returns the PSO of the action type named `name`.
    pub fn pso(&self, name: &str) -> Result<&FactoredPso> {
        self.psos
            .iter()
            .find(|pso| pso.definition().name() == name)
            .ok_or_else(|| ModelError::ActionDefinitionNotFound(name.to_string()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FactoredPso> {
        self.psos.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.psos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.psos.is_empty()
    }
}

impl<'a> IntoIterator for &'a TransitionFunction {
    type Item = &'a FactoredPso;
    type IntoIter = std::slice::Iter<'a, FactoredPso>;

    fn into_iter(self) -> Self::IntoIter {
        self.psos.iter()
    }
}

#[derive(Debug, Default)]
pub struct TransitionFunctionBuilder {
    psos: Vec<FactoredPso>,
}

impl TransitionFunctionBuilder {
    /// Adds a PSO; fails with `DuplicateActionDefinition` if its action type is already present.
    pub fn with_pso(mut self, pso: FactoredPso) -> Result<Self> {
        let name = pso.definition().name();
        if self.psos.iter().any(|p| p.definition().name() == name) {
            return Err(ModelError::DuplicateActionDefinition(name.to_string()));
        }
        self.psos.push(pso);
        Ok(self)
    }

    pub fn build(self) -> TransitionFunction {
        TransitionFunction { psos: self.psos }
    }
}
