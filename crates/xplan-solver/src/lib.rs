//! Constrained policy optimization over explicit MDPs.
//!
//! Policies are computed from occupation measures: a linear program over
//! the expected number of times each action is taken in each state, with
//! binary selectors that keep the policy deterministic and linear
//! constraints on the expected value of QA cost functions.
//!
//! - [`lp`] - vendor-neutral LP/MIP models and the `minilp` backend
//! - [`occupation`] - occupation variables, selectors and policy extraction
//! - [`constraint`] - hard and soft cost constraints, piecewise-linear penalties
//! - [`SspSolver`] - total-cost (stochastic shortest path) criterion
//! - [`AverageCostSolver`] - long-run average-cost criterion
//!
//! # Example
//!
//! ```
//! use xplan_core::objective::BoundType;
//! use xplan_explicit::{CostType, ExplicitMdp};
//! use xplan_solver::{CostConstraint, SolveOutcome, SspSolver};
//!
//! // Two ways to the goal: "fast" costs 1 with risk 1, "slow" costs 3 with no risk.
//! let mut builder = ExplicitMdp::builder(2, ["fast", "slow"], CostType::TransitionCost, 2);
//! builder.set_transition_probability(0, "fast", 1, 1.0).unwrap();
//! builder.set_transition_probability(0, "slow", 1, 1.0).unwrap();
//! builder.set_transition_cost(0, 0, "fast", 1.0).unwrap();
//! builder.set_transition_cost(0, 0, "slow", 3.0).unwrap();
//! builder.set_transition_cost(1, 0, "fast", 1.0).unwrap();
//! builder.add_goal(1).unwrap();
//! let mdp = builder.build().unwrap();
//!
//! let mut solver = SspSolver::default();
//! let safe = solver
//!     .solve(&mdp, &[CostConstraint::hard(1, BoundType::Upper, 0.5)])
//!     .unwrap();
//! let SolveOutcome::Solved(solution) = safe else { panic!("feasible") };
//! assert_eq!(solution.choice(0), mdp.action_index("slow").ok());
//! ```

pub mod average;
pub mod bound;
pub mod constraint;
pub mod error;
pub mod evaluate;
pub mod lp;
pub mod occupation;
pub mod outcome;
pub mod settings;
pub mod ssp;
pub mod stats;
pub mod verify;

#[cfg(test)]
mod test_utils;

#[cfg(test)]
mod constraint_tests;
#[cfg(test)]
mod model_tests;

pub use average::AverageCostSolver;
pub use bound::occupation_upper_bound;
pub use constraint::{add_cost_constraints, CostConstraint};
pub use error::{Result, SolverError};
pub use evaluate::{occupancy_cost, occupancy_costs};
pub use lp::{LpBackend, LpModel, LpOutcome, LpStatus, MinilpBackend};
pub use outcome::{OptimalSolution, SolveOutcome};
pub use settings::SolverSettings;
pub use ssp::SspSolver;
pub use stats::SolveStats;
pub use verify::verify_solution;
