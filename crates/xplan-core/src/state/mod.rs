//! State space primitives: values, variable definitions, assignments and predicates.

mod predicate;
mod tuple;
mod value;
mod var;


pub use predicate::StatePredicate;
pub use tuple::StateVarTuple;
pub use value::Value;
pub use var::{StateSpace, StateVarDefinition};
