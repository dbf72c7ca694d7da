//! xplan - explainable planning with constrained MDP policies
//!
//! Model a planning problem as a factored MDP, declare quality-attribute
//! (QA) constraints, and let the [`Planner`] flatten the model and compute
//! an optimal deterministic policy from occupation measures.
//!
//! # Example
//!
//! ```
//! use xplan::prelude::*;
//! use xplan_test::robot_model;
//!
//! let robot = robot_model();
//! let planner = Planner::new(robot.xmdp.clone(), PlannerConfig::default());
//!
//! let fastest = planner.optimal_policy().unwrap().into_planned().unwrap();
//! assert!((fastest.qa_value("collision").unwrap() - 0.4).abs() < 1e-6);
//!
//! let safe = AttributeConstraint::hard("collision", BoundType::Upper, 0.3);
//! let safer = planner.constrained_policy(&[safe]).unwrap().into_planned().unwrap();
//! assert!(safer.qa_value("collision").unwrap() <= 0.3 + 1e-6);
//! assert!(safer.objective() > fastest.objective());
//! ```

pub mod convert;
pub mod error;
pub mod planner;

#[cfg(feature = "console")]
pub mod console;


pub use convert::{explicit_reader, solver_settings};
pub use error::{PlannerError, Result};
pub use planner::{solve_explicit, PlannedPolicy, Planner, PlanningOutcome};

// Model types
pub use xplan_core::{
    Action, ActionDefinition, ActionDescription, ActionSpace, AttributeConstraint, BoundType,
    CostCriterion, CostFunction, FactoredPso, ModelError, PenaltyFunction, Policy, QFunction,
    StatePredicate, StateSpace, StateVarDefinition, StateVarTuple, TransitionFunction, Value,
    Xmdp,
};

// Configuration
pub use xplan_config::{ConfigError, ConstraintConfig, ExplicitConfig, PlannerConfig, SolverConfig};

// Explicit models and solvers
pub use xplan_explicit::{flatten, flatten_for, CostType, ExplicitMdp, ExplicitModel};
pub use xplan_solver::{CostConstraint, OptimalSolution, SolveOutcome, SolverSettings};

pub mod prelude {
    pub use super::{Planner, PlannedPolicy, PlanningOutcome};
    pub use super::{AttributeConstraint, BoundType, CostCriterion, PenaltyFunction, Policy};
    pub use super::{ConstraintConfig, PlannerConfig};
    pub use super::{StateVarTuple, Value, Xmdp};
}
