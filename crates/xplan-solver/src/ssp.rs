//! Total-cost (stochastic shortest path) policy optimization.
//!
//! Variables `x_ia` are expected occupations of non-goal states under the
//! policy, starting from the initial state. Constraints:
//!
//! - flow: `Σ_a x_ia = Σ_{j,a} x_ja · P(i | j, a)` for non-goal, non-initial `i`
//! - source: outflow minus inflow of the initial state is 1
//! - sink: total inflow into goal states is 1
//! - selectors: at most one action per state carries occupation
//! - cost constraints on QA cost functions
//!
//! The objective is `Σ x_ia · c_0(i, a)` plus soft-constraint penalties.

use std::time::Instant;

use tracing::{debug, info};
use xplan_explicit::ExplicitMdp;

use crate::bound::occupation_upper_bound;
use crate::constraint::{add_cost_constraints, CostConstraint};
use crate::error::{Result, SolverError};
use crate::evaluate::occupancy_costs;
use crate::lp::{LinearExpr, LpBackend, LpModel, LpOutcome, MinilpBackend, Relation, Sense};
use crate::occupation::{add_delta_constraints, extract_choices, OccupationVars};
use crate::outcome::{OptimalSolution, SolveOutcome};
use crate::settings::SolverSettings;
use crate::stats::SolveStats;
use crate::verify::verify_solution;

/// Adds the flow, source and sink constraints over `x`.
pub(crate) fn add_flow_constraints(model: &mut LpModel, mdp: &ExplicitMdp, x: &OccupationVars) {
    let inflows = x.inflows(mdp);
    let initial = mdp.initial_state();
    for (i, inflow) in inflows.iter().enumerate() {
        if mdp.is_goal(i) {
            continue;
        }
        let mut balance = x.outflow(i);
        balance.add_expr(inflow, -1.0);
        if i == initial {
            model.add_constraint("source", balance, Relation::Eq, 1.0);
        } else {
            model.add_constraint(format!("flow_{i}"), balance, Relation::Eq, 0.0);
        }
    }
    let mut sink = LinearExpr::new();
    for &g in mdp.goals() {
        sink.add_expr(&inflows[g], 1.0);
    }
    model.add_constraint("sink", sink, Relation::Eq, 1.0);
}

/// Occupation-measure solver for the total-cost criterion.
///
/// # Example
///
/// ```
/// use xplan_explicit::{CostType, ExplicitMdp};
/// use xplan_solver::SspSolver;
///
/// let mut builder = ExplicitMdp::builder(2, ["go"], CostType::TransitionCost, 1);
/// builder.set_transition_probability(0, "go", 1, 1.0).unwrap();
/// builder.set_transition_cost(0, 0, "go", 3.0).unwrap();
/// builder.add_goal(1).unwrap();
/// let mdp = builder.build().unwrap();
///
/// let mut solver = SspSolver::default();
/// let solution = solver.solve_unconstrained(&mdp).unwrap().into_solution().unwrap();
/// assert_eq!(solution.choice(0), Some(0));
/// assert!((solution.objective() - 3.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct SspSolver<B = MinilpBackend> {
    backend: B,
    settings: SolverSettings,
}

impl SspSolver<MinilpBackend> {
    pub fn new(settings: SolverSettings) -> Self {
        let backend = MinilpBackend::new(settings.branch_and_bound());
        Self { backend, settings }
    }
}

impl Default for SspSolver<MinilpBackend> {
    fn default() -> Self {
        Self::new(SolverSettings::default())
    }
}

impl<B: LpBackend> SspSolver<B> {
    pub fn with_backend(backend: B, settings: SolverSettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Statistics accumulated over every solve.
    pub fn stats(&self) -> &SolveStats {
        self.backend.stats()
    }

    /// Minimum expected total cost policy without cost constraints.
    pub fn solve_unconstrained(&mut self, mdp: &ExplicitMdp) -> Result<SolveOutcome> {
        self.solve(mdp, &[])
    }

    /// Minimum expected total cost policy subject to `constraints`.
    ///
    /// # Errors
    ///
    /// [`SolverError::MalformedInput`] for constraints on missing cost
    /// functions or an unbounded objective, [`SolverError::Inconsistent`] if
    /// the solution fails verification, and backend errors. An infeasible
    /// program yields [`SolveOutcome::NoSolution`].
    pub fn solve(&mut self, mdp: &ExplicitMdp, constraints: &[CostConstraint]) -> Result<SolveOutcome> {
        info!(
            event = "solve_start",
            criterion = "total_cost",
            states = mdp.num_states(),
            actions = mdp.num_actions(),
            constraints = constraints.len(),
        );
        let lp_solves = self.backend.stats().lp_solves;
        let started = Instant::now();

        let outcome = self.solve_program(mdp, constraints)?;

        match &outcome {
            SolveOutcome::Solved(solution) => info!(
                event = "solve_end",
                objective = solution.objective(),
                lp_solves = self.backend.stats().lp_solves - lp_solves,
                elapsed_ms = started.elapsed().as_millis() as u64,
            ),
            SolveOutcome::NoSolution => info!(
                event = "solve_end",
                result = "no_solution",
                lp_solves = self.backend.stats().lp_solves - lp_solves,
                elapsed_ms = started.elapsed().as_millis() as u64,
            ),
        }
        Ok(outcome)
    }

    fn solve_program(&mut self, mdp: &ExplicitMdp, constraints: &[CostConstraint]) -> Result<SolveOutcome> {
        let n = mdp.num_states();
        let m = mdp.num_actions();
        let initial = mdp.initial_state();
        if mdp.is_goal(initial) {
            debug!(event = "initial_state_is_goal", state = initial);
            return Ok(SolveOutcome::Solved(OptimalSolution::new(
                vec![None; n],
                0.0,
                vec![0.0; mdp.num_costs()],
                vec![vec![0.0; m]; n],
            )));
        }

        let Some(bound) = occupation_upper_bound(
            &mut self.backend,
            mdp,
            self.settings.occupation_bound_fallback,
        )?
        else {
            return Ok(SolveOutcome::NoSolution);
        };

        let mut model = LpModel::new(Sense::Minimize);
        let x = OccupationVars::add(&mut model, mdp, "x", |i| !mdp.is_goal(i));
        x.add_cost_objective(&mut model, mdp, 0)?;
        add_flow_constraints(&mut model, mdp, &x);
        let delta = add_delta_constraints(&mut model, &x, bound);
        add_cost_constraints(
            &mut model,
            mdp,
            &x,
            constraints,
            self.settings.strict_bound_margin,
        )?;
        debug!(
            event = "program_built",
            vars = model.num_vars(),
            constraints = model.num_constraints(),
            occupation_vars = x.len(),
        );

        let solution = match self.backend.solve(&model)? {
            LpOutcome::Optimal(solution) => solution,
            LpOutcome::Infeasible => {
                debug!(event = "program_infeasible");
                return Ok(SolveOutcome::NoSolution);
            }
            LpOutcome::Unbounded => {
                return Err(SolverError::MalformedInput(
                    "expected total cost is unbounded below".to_string(),
                ))
            }
        };

        let tolerance = self.settings.feasibility_tolerance;
        if self.settings.verify_solution {
            verify_solution(&model, &solution, &x, &delta, tolerance)?;
        }

        let occupations = x.values(&solution);
        let choices = extract_choices(&occupations, tolerance)?;
        let costs = occupancy_costs(mdp, &occupations)?;
        Ok(SolveOutcome::Solved(OptimalSolution::new(
            choices,
            solution.objective(),
            costs,
            occupations,
        )))
    }
}
