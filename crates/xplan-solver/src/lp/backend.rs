//! [`LpBackend`] on top of the `minilp` simplex solver.
//!
//! Pure LPs are handed to minilp directly. Models with binary variables are
//! solved by branch-and-bound over minilp relaxations.

use minilp::{ComparisonOp, OptimizationDirection, Problem};
use tracing::{debug, trace, warn};

use super::branch::{BranchAndBoundConfig, BranchNode};
use super::{LpBackend, LpModel, LpOutcome, LpSolution, Relation, Sense, VarId, VarKind};
use crate::error::{Result, SolverError};
use crate::stats::SolveStats;

/// Objective improvement below which a node is not worth exploring.
const PRUNE_TOLERANCE: f64 = 1e-9;

/// Simplex LP and branch-and-bound MIP backend.
#[derive(Debug, Clone, Default)]
pub struct MinilpBackend {
    config: BranchAndBoundConfig,
    stats: SolveStats,
}

impl MinilpBackend {
    pub fn new(config: BranchAndBoundConfig) -> Self {
        Self {
            config,
            stats: SolveStats::default(),
        }
    }

    pub fn config(&self) -> &BranchAndBoundConfig {
        &self.config
    }

    /// Solves the relaxation of `model` with the bounds fixed at `node`.
    fn solve_relaxation(&mut self, model: &LpModel, node: &BranchNode) -> Result<LpOutcome> {
        self.stats.record_lp_solve();
        let direction = match model.sense() {
            Sense::Minimize => OptimizationDirection::Minimize,
            Sense::Maximize => OptimizationDirection::Maximize,
        };
        let mut problem = Problem::new(direction);
        let vars: Vec<_> = model
            .vars()
            .iter()
            .enumerate()
            .map(|(i, var)| {
                let bounds = node.var_bounds(model, VarId(i));
                problem.add_var(var.objective, bounds)
            })
            .collect();

        for constraint in model.constraints() {
            if constraint.expr.is_empty() {
                if constraint.relation.holds(0.0, constraint.rhs, 0.0) {
                    continue;
                }
                return Ok(LpOutcome::Infeasible);
            }
            let mut expr = minilp::LinearExpr::empty();
            for (var, coeff) in constraint.expr.terms() {
                expr.add(vars[var.index()], coeff);
            }
            let op = match constraint.relation {
                Relation::Le => ComparisonOp::Le,
                Relation::Eq => ComparisonOp::Eq,
                Relation::Ge => ComparisonOp::Ge,
            };
            problem.add_constraint(expr, op, constraint.rhs);
        }

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = vars.iter().map(|&v| solution[v]).collect();
                Ok(LpOutcome::Optimal(LpSolution::new(values, solution.objective())))
            }
            Err(minilp::Error::Infeasible) => Ok(LpOutcome::Infeasible),
            Err(minilp::Error::Unbounded) => Ok(LpOutcome::Unbounded),
        }
    }

    fn branch_and_bound(&mut self, model: &LpModel) -> Result<LpOutcome> {
        let sense = model.sense();
        let mut stack = vec![BranchNode::root()];
        let mut incumbent: Option<LpSolution> = None;
        let mut explored = 0u64;
        let mut limit_hit = None;

        while let Some(node) = stack.pop() {
            if let Some(limit) = self.config.node_limit {
                if explored >= limit {
                    limit_hit = Some(limit);
                    break;
                }
            }
            explored += 1;
            self.stats.record_node();

            let best = incumbent.as_ref().map(LpSolution::objective);
            if self.config.enable_pruning && node.can_prune(sense, best, PRUNE_TOLERANCE) {
                self.stats.record_pruned();
                continue;
            }

            let solution = match self.solve_relaxation(model, &node)? {
                LpOutcome::Optimal(solution) => solution,
                LpOutcome::Infeasible => continue,
                LpOutcome::Unbounded => return Ok(LpOutcome::Unbounded),
            };
            if let Some(best) = best {
                if self.config.enable_pruning && !sense.is_better(solution.objective(), best, PRUNE_TOLERANCE) {
                    self.stats.record_pruned();
                    continue;
                }
            }

            let branch_var = match self.config.first_fractional(model, solution.values()) {
                Some(var) => Some(var),
                None => {
                    let rounded = round_binaries(model, &solution);
                    let conflict = rounding_conflict(
                        model,
                        &node,
                        solution.values(),
                        rounded.values(),
                        self.config.feasibility_tolerance,
                    );
                    let improves = best.map_or(true, |best| {
                        sense.is_better(rounded.objective(), best, PRUNE_TOLERANCE)
                    });
                    if conflict.is_none() && improves {
                        trace!(
                            event = "incumbent_found",
                            depth = node.depth(),
                            objective = rounded.objective(),
                        );
                        self.stats.record_incumbent();
                        incumbent = Some(rounded);
                    }
                    conflict
                }
            };

            if let Some(var) = branch_var {
                trace!(
                    event = "node_branched",
                    depth = node.depth(),
                    var = %model.var(var).name,
                    value = solution.value(var),
                );
                stack.push(node.child(var, 0.0, solution.objective()));
                stack.push(node.child(var, 1.0, solution.objective()));
            }
        }

        match (incumbent, limit_hit) {
            (Some(solution), Some(limit)) => {
                warn!(
                    event = "node_limit_reached",
                    limit,
                    objective = solution.objective(),
                );
                Ok(LpOutcome::Optimal(solution))
            }
            (Some(solution), None) => Ok(LpOutcome::Optimal(solution)),
            (None, Some(limit)) => Err(SolverError::NodeLimitReached { limit }),
            (None, None) => Ok(LpOutcome::Infeasible),
        }
    }
}

/// Snaps binaries to 0 or 1 and recomputes the objective.
fn round_binaries(model: &LpModel, solution: &LpSolution) -> LpSolution {
    let values: Vec<f64> = model
        .vars()
        .iter()
        .zip(solution.values())
        .map(|(var, &value)| match var.kind {
            VarKind::Binary => value.round(),
            VarKind::Continuous => value,
        })
        .collect();
    let objective = model.objective_value(&values);
    LpSolution::new(values, objective)
}

/// A free binary moved by rounding that appears in a constraint the rounded
/// values violate.
///
/// A binary within integrality tolerance of 0 can still carry a large
/// coefficient, as the selector in `x - M·Δ <= 0` does.
fn rounding_conflict(
    model: &LpModel,
    node: &BranchNode,
    relaxed: &[f64],
    rounded: &[f64],
    tolerance: f64,
) -> Option<VarId> {
    model
        .constraints()
        .iter()
        .filter(|constraint| !constraint.is_satisfied(rounded, tolerance))
        .flat_map(|constraint| constraint.expr.terms())
        .map(|(var, _)| var)
        .find(|&var| {
            model.var(var).kind == VarKind::Binary
                && relaxed[var.index()] != rounded[var.index()]
                && !node.is_fixed(model, var)
        })
}

impl LpBackend for MinilpBackend {
    fn solve(&mut self, model: &LpModel) -> Result<LpOutcome> {
        self.stats.start();
        let outcome = if model.binaries().next().is_none() {
            self.solve_relaxation(model, &BranchNode::root())?
        } else {
            self.branch_and_bound(model)?
        };
        debug!(
            event = "lp_solved",
            vars = model.num_vars(),
            constraints = model.num_constraints(),
            status = ?outcome.status(),
            lp_solves = self.stats.lp_solves,
            nodes = self.stats.nodes_explored,
            elapsed_ms = self.stats.elapsed_ms(),
        );
        Ok(outcome)
    }

    fn stats(&self) -> &SolveStats {
        &self.stats
    }
}
