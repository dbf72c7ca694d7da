//! Factored MDP model for xplan.
//!
//! Compact representation of states, actions and probabilistic transitions
//! that exploits conditional independence between state variables:
//!
//! - [`state`] - values, variable definitions, assignments and predicates
//! - [`action`] - actions, action types and the action space
//! - [`factor`] - discriminants, effects, effect classes and preconditions
//! - [`description`] - tabular and formula action descriptions
//! - [`pso`] / [`transition`] - factored PSOs and the transition function
//! - [`objective`] - QA functions, cost functions, constraints and penalties
//! - [`xmdp`] - model assembly
//! - [`policy`] - deterministic policies
//!
//! Model entities are immutable once built; construction goes through
//! builder types that validate on `build`.

pub mod action;
pub mod description;
pub mod error;
pub mod factor;
pub mod objective;
pub mod policy;
pub mod pso;
pub mod state;
pub mod transition;
pub mod xmdp;

#[cfg(test)]
mod model_tests;

pub use action::{Action, ActionDefinition, ActionSpace};
pub use description::{ActionDescription, TransitionFormula};
pub use error::{ModelError, Result};
pub use factor::{
    Discriminant, DiscriminantClass, Effect, EffectClass, Precondition, ProbabilisticEffect,
};
pub use objective::{
    AttributeConstraint, BoundType, CostCriterion, CostFunction, PenaltyFunction, QFunction,
    Transition,
};
pub use policy::Policy;
pub use pso::FactoredPso;
pub use state::{StatePredicate, StateSpace, StateVarDefinition, StateVarTuple, Value};
pub use transition::TransitionFunction;
pub use xmdp::Xmdp;
