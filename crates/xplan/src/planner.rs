//! Planner entry point that hides flattening and solver wiring.

use std::time::Instant;

use tracing::{debug, info};
use xplan_config::PlannerConfig;
use xplan_core::{AttributeConstraint, CostCriterion, Policy, Xmdp};
use xplan_explicit::{flatten_for, ExplicitMdp, ExplicitModel};
use xplan_solver::{AverageCostSolver, CostConstraint, SolveOutcome, SspSolver};

use crate::convert::solver_settings;
use crate::error::Result;

/// Solves an explicit MDP under the configured cost criterion.
pub fn solve_explicit(
    mdp: &ExplicitMdp,
    constraints: &[CostConstraint],
    config: &PlannerConfig,
) -> Result<SolveOutcome> {
    config.validate()?;
    let settings = solver_settings(&config.solver);
    let outcome = match config.cost_criterion {
        CostCriterion::TotalCost => SspSolver::new(settings).solve(mdp, constraints)?,
        CostCriterion::AverageCost => AverageCostSolver::new(settings).solve(mdp, constraints)?,
    };
    Ok(outcome)
}

/// A policy together with its expected costs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPolicy {
    policy: Policy,
    objective: f64,
    qa_values: Vec<(String, f64)>,
}

impl PlannedPolicy {
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Expected value of the objective cost function, penalties included.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Expected value of each QA function, in XMDP order.
    pub fn qa_values(&self) -> &[(String, f64)] {
        &self.qa_values
    }

    pub fn qa_value(&self, name: &str) -> Option<f64> {
        self.qa_values
            .iter()
            .find(|(qa, _)| qa == name)
            .map(|(_, value)| *value)
    }
}

/// Result of a planning request.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanningOutcome {
    Solved(PlannedPolicy),
    /// No deterministic policy satisfies the constraints.
    NoSolution,
}

impl PlanningOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, PlanningOutcome::Solved(_))
    }

    pub fn planned(&self) -> Option<&PlannedPolicy> {
        match self {
            PlanningOutcome::Solved(planned) => Some(planned),
            PlanningOutcome::NoSolution => None,
        }
    }

    pub fn into_planned(self) -> Option<PlannedPolicy> {
        match self {
            PlanningOutcome::Solved(planned) => Some(planned),
            PlanningOutcome::NoSolution => None,
        }
    }
}

/// Computes policies for one XMDP under one configuration.
///
/// # Example
///
/// ```
/// use xplan::prelude::*;
/// use xplan_test::chain_model;
///
/// let chain = chain_model();
/// let planner = Planner::new(chain.xmdp.clone(), PlannerConfig::default());
///
/// let planned = planner.optimal_policy().unwrap().into_planned().unwrap();
/// assert_eq!(planned.policy().action(&chain.state("s0")), Some(&chain.a));
/// assert!((planned.qa_value("time").unwrap() - 2.0).abs() < 1e-6);
///
/// let tight = AttributeConstraint::hard("time", BoundType::Upper, 1.0);
/// assert_eq!(planner.constrained_policy(&[tight]).unwrap(), PlanningOutcome::NoSolution);
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    xmdp: Xmdp,
    config: PlannerConfig,
}

impl Planner {
    pub fn new(xmdp: Xmdp, config: PlannerConfig) -> Self {
        Self { xmdp, config }
    }

    pub fn xmdp(&self) -> &Xmdp {
        &self.xmdp
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Flattens the XMDP for the configured cost criterion.
    pub fn flatten(&self) -> Result<ExplicitModel> {
        Ok(flatten_for(&self.xmdp, self.config.cost_criterion)?)
    }

    /// Minimizes the objective without QA constraints.
    pub fn optimal_policy(&self) -> Result<PlanningOutcome> {
        self.constrained_policy(&[])
    }

    /// Solves under the constraints listed in the configuration.
    pub fn configured_policy(&self) -> Result<PlanningOutcome> {
        let constraints = self.config.attribute_constraints()?;
        self.constrained_policy(&constraints)
    }

    /// Minimizes the objective subject to `constraints`.
    ///
    /// # Errors
    ///
    /// [`ModelError::QFunctionNotFound`](xplan_core::ModelError::QFunctionNotFound)
    /// when a constraint names an unknown QA function, wrapped in the solver
    /// error; any flattening or solver failure.
    pub fn constrained_policy(&self, constraints: &[AttributeConstraint]) -> Result<PlanningOutcome> {
        let started = Instant::now();
        let resolved = constraints
            .iter()
            .map(|c| CostConstraint::from_attribute(c, &self.xmdp))
            .collect::<xplan_solver::Result<Vec<_>>>()?;
        debug!(event = "constraints_resolved", count = resolved.len());

        let model = self.flatten()?;
        let outcome = solve_explicit(model.mdp(), &resolved, &self.config)?;
        let Some(solution) = outcome.into_solution() else {
            info!(
                event = "plan_end",
                solved = false,
                elapsed_ms = started.elapsed().as_millis() as u64,
            );
            return Ok(PlanningOutcome::NoSolution);
        };

        let qa_values = self
            .xmdp
            .qfunctions()
            .iter()
            .enumerate()
            .map(|(q, qfunction)| {
                let value = solution.cost(q + 1).unwrap_or(0.0);
                (qfunction.name().to_string(), value)
            })
            .collect();
        let planned = PlannedPolicy {
            policy: model.policy_from_choices(solution.choices()),
            objective: solution.objective(),
            qa_values,
        };
        info!(
            event = "plan_end",
            solved = true,
            objective = planned.objective,
            decisions = planned.policy.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
        );
        Ok(PlanningOutcome::Solved(planned))
    }
}
