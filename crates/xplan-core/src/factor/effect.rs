//! Effects and probabilistic effects.

use std::collections::BTreeSet;
use std::fmt;

use smallvec::SmallVec;

use super::EffectClass;
use crate::error::{ModelError, Result};
use crate::state::{StateVarDefinition, StateVarTuple, Value};

/// Absolute tolerance on the sum of outcome probabilities.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// An assignment of destination values to the variables of an [`EffectClass`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Effect {
    class: EffectClass,
    values: StateVarTuple,
}

impl Effect {
    /// Creates an empty effect of `class`.
    pub fn new(class: EffectClass) -> Self {
        Self {
            class,
            values: StateVarTuple::new(),
        }
    }

    /// Assigns a variable of the class.
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
    pub fn class(&self) -> &EffectClass {
        &self.class
    }

    #[inline]
    pub fn values(&self) -> &StateVarTuple {
        &self.values
    }

    /// Returns the first variable of the class left unassigned.
    fn missing_var(&self) -> Option<&StateVarDefinition> {
        self.class.iter().find(|v| !self.values.contains(v))
    }

    fn join(&self, other: &Effect) -> Effect {
        Effect {
            class: self.class.union(&other.class),
            values: self.values.overlay(&other.values),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.values, f)
    }
}

/// A finite distribution over effects of one effect class.
///
/// Outcome probabilities are in [0, 1] and sum to 1 within
/// [`PROBABILITY_TOLERANCE`]; both are checked when the effect is built.
///
/// # Example
///
/// ```
/// use xplan_core::factor::{Effect, EffectClass, ProbabilisticEffect};
/// use xplan_core::state::StateVarDefinition;
///
/// let coin = StateVarDefinition::new("coin", ["heads", "tails"]);
/// let class = EffectClass::new([coin.clone()]);
///
/// let heads = Effect::new(class.clone()).with(&coin, "heads").unwrap();
/// let tails = Effect::new(class.clone()).with(&coin, "tails").unwrap();
///
/// let flip = ProbabilisticEffect::builder(class)
///     .with(heads.clone(), 0.5).unwrap()
///     .with(tails, 0.5).unwrap()
///     .build().unwrap();
///
/// assert_eq!(flip.len(), 2);
/// assert_eq!(flip.probability(&heads).unwrap(), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilisticEffect {
    class: EffectClass,
    outcomes: SmallVec<[(Effect, f64); 4]>,
}

impl ProbabilisticEffect {
    pub fn builder(class: EffectClass) -> ProbabilisticEffectBuilder {
        ProbabilisticEffectBuilder {
            class,
            outcomes: SmallVec::new(),
        }
    }

    /// A distribution with a single certain outcome.
    pub fn deterministic(effect: Effect) -> Result<Self> {
        Self::builder(effect.class().clone()).with(effect, 1.0)?.build()
    }

    #[inline]
    pub fn class(&self) -> &EffectClass {
        &self.class
    }

    /// Iterates outcomes in effect order.
    pub fn outcomes(&self) -> impl Iterator<Item = (&Effect, f64)> {
        self.outcomes.iter().map(|(e, p)| (e, *p))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Returns the probability of `effect`.
    pub fn probability(&self, effect: &Effect) -> Result<f64> {
        self.outcomes
            .iter()
            .find(|(e, _)| e == effect)
            .map(|(_, p)| *p)
            .ok_or_else(|| ModelError::EffectNotFound(effect.to_string()))
    }

    /// Values `var` may take under this distribution, ignoring zero-probability outcomes.
    pub fn possible_values(&self, var: &StateVarDefinition) -> Result<BTreeSet<Value>> {
        if !self.class.contains(var) {
            return Err(ModelError::IncompatibleVar {
                var: var.name().to_string(),
                class: self.class.to_string(),
            });
        }
        let mut values = BTreeSet::new();
        for (effect, p) in &self.outcomes {
            if *p > 0.0 {
                values.insert(effect.values().get(var)?.clone());
            }
        }
        Ok(values)
    }

    /// Product distribution over the union of two disjoint effect classes.
    pub fn join(&self, other: &ProbabilisticEffect) -> Result<ProbabilisticEffect> {
        if let Some(var) = self.class.first_shared(&other.class) {
            return Err(ModelError::IncompatibleEffectClass {
                expected: format!("class disjoint from {}", self.class),
                found: format!("{} sharing '{}'", other.class, var.name()),
            });
        }
        let mut outcomes = SmallVec::with_capacity(self.len() * other.len());
        for (e1, p1) in &self.outcomes {
            for (e2, p2) in &other.outcomes {
                outcomes.push((e1.join(e2), p1 * p2));
            }
        }
        let mut joined = ProbabilisticEffect {
            class: self.class.union(&other.class),
            outcomes,
        };
        joined.outcomes.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(joined)
    }
}

/// Incremental construction of a [`ProbabilisticEffect`].
#[derive(Debug)]
pub struct ProbabilisticEffectBuilder {
    class: EffectClass,
    outcomes: SmallVec<[(Effect, f64); 4]>,
}

impl ProbabilisticEffectBuilder {
    /// Adds an outcome; repeated effects accumulate probability.
    pub fn add(&mut self, effect: Effect, probability: f64) -> Result<()> {
        if effect.class() != &self.class {
            return Err(ModelError::IncompatibleEffectClass {
                expected: self.class.to_string(),
                found: effect.class().to_string(),
            });
        }
        if let Some(var) = effect.missing_var() {
            return Err(ModelError::VarNotFound(var.name().to_string()));
        }
        if !(0.0..=1.0).contains(&probability) {
            return Err(ModelError::InvalidProbability(probability));
        }
        match self.outcomes.iter_mut().find(|(e, _)| *e == effect) {
            Some((_, p)) => *p += probability,
            None => self.outcomes.push((effect, probability)),
        }
        Ok(())
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, effect: Effect, probability: f64) -> Result<Self> {
        self.add(effect, probability)?;
        Ok(self)
    }

    /// Checks that probabilities sum to 1 and freezes the distribution.
    pub fn build(mut self) -> Result<ProbabilisticEffect> {
        let sum: f64 = self.outcomes.iter().map(|(_, p)| p).sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ModelError::ProbabilitySum {
                context: format!("effect class {}", self.class),
                sum,
            });
        }
        self.outcomes.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(ProbabilisticEffect {
            class: self.class,
            outcomes: self.outcomes,
        })
    }
}
