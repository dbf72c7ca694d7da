//! Vendor-neutral linear and mixed-integer programs.
//!
//! Solvers build an [`LpModel`] (variables with bounds and kinds, named
//! linear constraints, a linear objective) and hand it to an [`LpBackend`].
//! Any backend that can solve such models can be substituted.

mod backend;
mod branch;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use crate::error::Result;
use crate::stats::SolveStats;

pub use backend::MinilpBackend;
pub use branch::{BranchAndBoundConfig, BranchNode};

/// Handle on a variable of an [`LpModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Continuous,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Le,
    Eq,
    Ge,
}

impl Relation {
    /// Returns true if `lhs relation rhs` holds within `tolerance`.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Relation::Le => lhs <= rhs + tolerance,
            Relation::Eq => (lhs - rhs).abs() <= tolerance,
            Relation::Ge => lhs >= rhs - tolerance,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::Le => "<=",
            Relation::Eq => "=",
            Relation::Ge => ">=",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

impl Sense {
    /// Returns true if objective `a` is strictly better than `b` by more than `tolerance`.
    pub fn is_better(self, a: f64, b: f64, tolerance: f64) -> bool {
        match self {
            Sense::Minimize => a < b - tolerance,
            Sense::Maximize => a > b + tolerance,
        }
    }
}

/// A sparse linear expression `Σ coeff · var`, terms ordered by variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: BTreeMap<VarId, f64>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `coeff · var`; repeated variables accumulate.
    pub fn add(&mut self, var: VarId, coeff: f64) {
        *self.terms.entry(var).or_insert(0.0) += coeff;
    }

    pub fn with(mut self, var: VarId, coeff: f64) -> Self {
        self.add(var, coeff);
        self
    }

    /// Adds every term of `other` scaled by `factor`.
    pub fn add_expr(&mut self, other: &LinearExpr, factor: f64) {
        for (&var, &coeff) in &other.terms {
            self.add(var, coeff * factor);
        }
    }

    /// Terms with a non-zero coefficient.
    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms
            .iter()
            .map(|(&var, &coeff)| (var, coeff))
            .filter(|(_, c)| *c != 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.terms().next().is_none()
    }

    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms()
            .map(|(var, coeff)| coeff * values.get(var.0).copied().unwrap_or(0.0))
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LpVar {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: f64,
    pub objective: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LpConstraint {
    pub name: String,
    pub expr: LinearExpr,
    pub relation: Relation,
    pub rhs: f64,
}

impl LpConstraint {
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        self.relation.holds(self.expr.evaluate(values), self.rhs, tolerance)
    }
}

/// A linear program, mixed-integer when it has binary variables.
///
/// # Example
///
/// ```
/// use xplan_solver::lp::{LinearExpr, LpBackend, LpModel, MinilpBackend, Relation, Sense};
///
/// let mut model = LpModel::new(Sense::Maximize);
/// let x = model.add_continuous("x", 0.0, 4.0, 1.0);
/// let y = model.add_binary("y", 2.0);
/// model.add_constraint("cap", LinearExpr::new().with(x, 1.0).with(y, 3.0), Relation::Le, 5.0);
///
/// let solution = MinilpBackend::default().solve(&model).unwrap().solution().cloned().unwrap();
/// assert!((solution.objective() - 4.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LpModel {
    sense: Sense,
    vars: Vec<LpVar>,
    constraints: Vec<LpConstraint>,
}

impl LpModel {
    pub fn new(sense: Sense) -> Self {
        Self {
            sense,
            vars: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn add_var(
        &mut self,
        name: impl Into<String>,
        kind: VarKind,
        lower: f64,
        upper: f64,
        objective: f64,
    ) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(LpVar {
            name: name.into(),
            kind,
            lower,
            upper,
            objective,
        });
        id
    }

    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64, objective: f64) -> VarId {
        self.add_var(name, VarKind::Continuous, lower, upper, objective)
    }

    pub fn add_binary(&mut self, name: impl Into<String>, objective: f64) -> VarId {
        self.add_var(name, VarKind::Binary, 0.0, 1.0, objective)
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, expr: LinearExpr, relation: Relation, rhs: f64) {
        self.constraints.push(LpConstraint {
            name: name.into(),
            expr,
            relation,
            rhs,
        });
    }

    /// Adds `coeff` to the objective coefficient of `var`.
    pub fn add_objective(&mut self, var: VarId, coeff: f64) {
        self.vars[var.0].objective += coeff;
    }

    #[inline]
    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn var(&self, id: VarId) -> &LpVar {
        &self.vars[id.0]
    }

    pub fn vars(&self) -> &[LpVar] {
        &self.vars
    }

    pub fn constraints(&self) -> &[LpConstraint] {
        &self.constraints
    }

    pub fn constraint(&self, name: &str) -> Option<&LpConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    #[inline]
    pub fn num_vars(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn binaries(&self) -> impl Iterator<Item = VarId> + '_ {
        self.vars
            .iter()
            .enumerate()
            .filter(|(_, v)| v.kind == VarKind::Binary)
            .map(|(i, _)| VarId(i))
    }

    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.vars
            .iter()
            .zip(values)
            .map(|(var, value)| var.objective * value)
            .sum()
    }

    /// Names of the constraints violated by `values` beyond `tolerance`.
    pub fn violated_constraints(&self, values: &[f64], tolerance: f64) -> Vec<&str> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(values, tolerance))
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Variable values and objective of an optimal solution.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    values: Vec<f64>,
    objective: f64,
}

impl LpSolution {
    pub fn new(values: Vec<f64>, objective: f64) -> Self {
        Self { values, objective }
    }

    #[inline]
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.0]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }
}

impl Index<VarId> for LpSolution {
    type Output = f64;

    fn index(&self, var: VarId) -> &f64 {
        &self.values[var.0]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LpStatus {
    Optimal,
    Infeasible,
    Unbounded,
}

/// Result of solving an [`LpModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum LpOutcome {
    Optimal(LpSolution),
    Infeasible,
    Unbounded,
}

impl LpOutcome {
    pub fn status(&self) -> LpStatus {
        match self {
            LpOutcome::Optimal(_) => LpStatus::Optimal,
            LpOutcome::Infeasible => LpStatus::Infeasible,
            LpOutcome::Unbounded => LpStatus::Unbounded,
        }
    }

    /// Number of solutions reported: 1 if optimal, 0 otherwise.
    pub fn solution_count(&self) -> usize {
        usize::from(matches!(self, LpOutcome::Optimal(_)))
    }

    pub fn solution(&self) -> Option<&LpSolution> {
        match self {
            LpOutcome::Optimal(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn into_solution(self) -> Option<LpSolution> {
        match self {
            LpOutcome::Optimal(solution) => Some(solution),
            _ => None,
        }
    }
}

/// The LP/MIP solving capability.
///
/// Implementations must honour variable kinds: binary variables take values
/// in `{0, 1}` in any reported solution.
pub trait LpBackend {
    fn solve(&mut self, model: &LpModel) -> Result<LpOutcome>;

    /// Statistics accumulated over every solve of this backend.
    fn stats(&self) -> &SolveStats;
}
