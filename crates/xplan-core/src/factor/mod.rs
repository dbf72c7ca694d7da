//! Factoring primitives: variable classes, discriminants, effects and preconditions.

mod class;
mod discriminant;
mod effect;
mod precondition;


pub use class::{DiscriminantClass, EffectClass};
pub use discriminant::Discriminant;
pub use effect::{Effect, ProbabilisticEffect, ProbabilisticEffectBuilder, PROBABILITY_TOLERANCE};
pub use precondition::{Precondition, PreconditionBuilder};
