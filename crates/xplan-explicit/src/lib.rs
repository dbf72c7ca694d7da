//! Explicit MDPs for xplan.
//!
//! Compiles a factored [`Xmdp`](xplan_core::Xmdp) down to the dense form the
//! policy optimizer consumes:
//!
//! - [`chain`] - effect-class chaining across action types
//! - [`group`] - update groups with merged action descriptions and guarded commands
//! - [`flatten`] - reachable-state enumeration into an [`ExplicitMdp`]
//! - [`mdp`] - the dense MDP itself
//! - [`index`] - state numbering
//! - [`reader`] - explicit tables produced by an external model checker

pub mod chain;
pub mod error;
pub mod flatten;
pub mod group;
pub mod index;
pub mod mdp;
pub mod reader;

#[cfg(test)]
mod mdp_tests;

pub use chain::{chain_effect_classes, EffectChain};
pub use error::{ExplicitError, Result};
pub use flatten::{flatten, flatten_for, ExplicitModel};
pub use group::{update_groups, GroupCommand, UpdateGroup};
pub use index::StateIndex;
pub use mdp::{CostType, ExplicitMdp, ExplicitMdpBuilder};
pub use reader::{read_states, ExplicitMdpReader};
