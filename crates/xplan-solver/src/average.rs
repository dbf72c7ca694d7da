//! Long-run average-cost policy optimization.
//!
//! Two variable sets separate recurrent from transient behaviour: `x_ia`
//! is the stationary frequency of `(i, a)` and `y_ia` the expected
//! transient occupation, both starting from the uniform distribution
//! `α_i = 1/n`:
//!
//! - `Σ_a x_ia = Σ_{j,a} x_ja · P(i | j, a)`
//! - `Σ_a x_ia + Σ_a y_ia - Σ_{j,a} y_ja · P(i | j, a) = α_i`
//!
//! Frequencies sum to 1, so selectors on `x` use the bound `X = 1`.

use std::time::Instant;

use tracing::{debug, info};
use xplan_explicit::ExplicitMdp;

use crate::constraint::{add_cost_constraints, CostConstraint};
use crate::error::{Result, SolverError};
use crate::evaluate::occupancy_costs;
use crate::lp::{LpBackend, LpModel, LpOutcome, MinilpBackend, Relation, Sense};
use crate::occupation::{add_delta_constraints, extract_choices, OccupationVars};
use crate::outcome::{OptimalSolution, SolveOutcome};
use crate::settings::SolverSettings;
use crate::stats::SolveStats;
use crate::verify::verify_solution;

/// Occupation-measure solver for the average-cost criterion.
///
/// Every state needs at least one applicable action, goal states included.
#[derive(Debug, Clone)]
pub struct AverageCostSolver<B = MinilpBackend> {
    backend: B,
    settings: SolverSettings,
}

impl AverageCostSolver<MinilpBackend> {
    pub fn new(settings: SolverSettings) -> Self {
        let backend = MinilpBackend::new(settings.branch_and_bound());
        Self { backend, settings }
    }
}

impl Default for AverageCostSolver<MinilpBackend> {
    fn default() -> Self {
        Self::new(SolverSettings::default())
    }
}

impl<B: LpBackend> AverageCostSolver<B> {
    pub fn with_backend(backend: B, settings: SolverSettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    pub fn stats(&self) -> &SolveStats {
        self.backend.stats()
    }

    pub fn solve_unconstrained(&mut self, mdp: &ExplicitMdp) -> Result<SolveOutcome> {
        self.solve(mdp, &[])
    }

    /// Minimum long-run average cost policy subject to `constraints`.
    ///
    /// Constraints bound long-run averages of QA costs. Reported costs are
    /// long-run averages as well.
    pub fn solve(&mut self, mdp: &ExplicitMdp, constraints: &[CostConstraint]) -> Result<SolveOutcome> {
        info!(
            event = "solve_start",
            criterion = "average_cost",
            states = mdp.num_states(),
            actions = mdp.num_actions(),
            constraints = constraints.len(),
        );
        let started = Instant::now();

        let n = mdp.num_states();
        if let Some(i) = (0..n).find(|&i| (0..mdp.num_actions()).all(|a| !mdp.is_action_applicable(i, a))) {
            return Err(SolverError::MalformedInput(format!(
                "state {i} has no applicable action"
            )));
        }
        let alpha = 1.0 / n as f64;

        let mut model = LpModel::new(Sense::Minimize);
        let x = OccupationVars::add(&mut model, mdp, "x", |_| true);
        let y = OccupationVars::add(&mut model, mdp, "y", |_| true);
        x.add_cost_objective(&mut model, mdp, 0)?;

        let x_inflows = x.inflows(mdp);
        let y_inflows = y.inflows(mdp);
        for i in 0..n {
            let mut recurrent = x.outflow(i);
            recurrent.add_expr(&x_inflows[i], -1.0);
            model.add_constraint(format!("balance_x_{i}"), recurrent, Relation::Eq, 0.0);

            let mut transient = x.outflow(i);
            transient.add_expr(&y.outflow(i), 1.0);
            transient.add_expr(&y_inflows[i], -1.0);
            model.add_constraint(format!("balance_y_{i}"), transient, Relation::Eq, alpha);
        }
        let delta = add_delta_constraints(&mut model, &x, 1.0);
        add_cost_constraints(
            &mut model,
            mdp,
            &x,
            constraints,
            self.settings.strict_bound_margin,
        )?;

        let solution = match self.backend.solve(&model)? {
            LpOutcome::Optimal(solution) => solution,
            LpOutcome::Infeasible => {
                debug!(event = "program_infeasible");
                info!(
                    event = "solve_end",
                    result = "no_solution",
                    elapsed_ms = started.elapsed().as_millis() as u64,
                );
                return Ok(SolveOutcome::NoSolution);
            }
            LpOutcome::Unbounded => {
                return Err(SolverError::MalformedInput(
                    "average cost is unbounded below".to_string(),
                ))
            }
        };

        let tolerance = self.settings.feasibility_tolerance;
        if self.settings.verify_solution {
            verify_solution(&model, &solution, &x, &delta, tolerance)?;
        }

        let frequencies = x.values(&solution);
        let transient = y.values(&solution);
        let recurrent_choices = extract_choices(&frequencies, tolerance)?;
        let choices: Vec<Option<usize>> = recurrent_choices
            .into_iter()
            .zip(&transient)
            .map(|(choice, row)| choice.or_else(|| row.iter().position(|y| *y > tolerance)))
            .collect();
        let costs = occupancy_costs(mdp, &frequencies)?;

        info!(
            event = "solve_end",
            objective = solution.objective(),
            recurrent_states = frequencies.iter().filter(|row| row.iter().sum::<f64>() > tolerance).count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
        );
        Ok(SolveOutcome::Solved(OptimalSolution::new(
            choices,
            solution.objective(),
            costs,
            frequencies,
        )))
    }
}
