//! Objectives: QA functions, cost functions, constraints and penalties.

mod constraint;
mod cost;
mod penalty;
mod qfunction;


pub use constraint::{AttributeConstraint, BoundType, ConstraintKind};
pub use cost::{AttributeCostFunction, CostCriterion, CostFunction};
pub use penalty::PenaltyFunction;
pub use qfunction::{AttributeQFunction, CountQFunction, FnQFunction, QFunction, Transition};
