//! Occupation-measure primitives shared by all formulations.
//!
//! An [`OccupationVars`] holds one continuous variable per (state, action)
//! pair that takes part in a program; a [`DeltaVars`] holds the matching
//! binary selectors that force at most one action per state.

use tracing::debug;
use xplan_explicit::ExplicitMdp;

use crate::error::{Result, SolverError};
use crate::lp::{LinearExpr, LpModel, LpSolution, Relation, VarId};

/// Occupation variables `x_ia`, indexed by state then action.
#[derive(Debug, Clone)]
pub struct OccupationVars {
    name: String,
    vars: Vec<Vec<Option<VarId>>>,
}

impl OccupationVars {
    /// Adds `{name}_{i}_{a}` in `[0, ∞)` for every state accepted by
    /// `include` and every action applicable in it.
    pub fn add(
        model: &mut LpModel,
        mdp: &ExplicitMdp,
        name: &str,
        include: impl Fn(usize) -> bool,
    ) -> Self {
        let vars = (0..mdp.num_states())
            .map(|i| {
                (0..mdp.num_actions())
                    .map(|a| {
                        (include(i) && mdp.is_action_applicable(i, a))
                            .then(|| model.add_continuous(format!("{name}_{i}_{a}"), 0.0, f64::INFINITY, 0.0))
                    })
                    .collect()
            })
            .collect();
        Self {
            name: name.to_string(),
            vars,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn var(&self, i: usize, a: usize) -> Option<VarId> {
        self.vars.get(i)?.get(a).copied().flatten()
    }

    #[inline]
    pub fn num_states(&self) -> usize {
        self.vars.len()
    }

    /// Returns true if some action has an occupation variable in `i`.
    pub fn has_state(&self, i: usize) -> bool {
        self.vars.get(i).is_some_and(|row| row.iter().any(Option::is_some))
    }

    /// `(i, a, x_ia)` for every variable.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, VarId)> + '_ {
        self.vars.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(a, var)| var.map(|var| (i, a, var)))
        })
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// `Σ_a x_ia`.
    pub fn outflow(&self, i: usize) -> LinearExpr {
        let mut expr = LinearExpr::new();
        if let Some(row) = self.vars.get(i) {
            for var in row.iter().flatten() {
                expr.add(*var, 1.0);
            }
        }
        expr
    }

    /// `Σ_{j,a} x_ja · P(i | j, a)` for every state `i`.
    pub fn inflows(&self, mdp: &ExplicitMdp) -> Vec<LinearExpr> {
        let mut inflows = vec![LinearExpr::new(); mdp.num_states()];
        for (j, a, var) in self.iter() {
            for (i, p) in mdp.successors(j, a) {
                inflows[i].add(var, p);
            }
        }
        inflows
    }

    /// `Σ_{i,a} x_ia · c_k(i, a)`.
    pub fn weighted_cost(&self, mdp: &ExplicitMdp, k: usize) -> Result<LinearExpr> {
        let mut expr = LinearExpr::new();
        for (i, a, var) in self.iter() {
            expr.add(var, mdp.step_cost(k, i, a)?);
        }
        Ok(expr)
    }

    /// Adds `c_k(i, a)` to the objective coefficient of each `x_ia`.
    pub fn add_cost_objective(&self, model: &mut LpModel, mdp: &ExplicitMdp, k: usize) -> Result<()> {
        for (i, a, var) in self.iter() {
            model.add_objective(var, mdp.step_cost(k, i, a)?);
        }
        Ok(())
    }

    /// Dense `[state][action]` occupation values, zero where no variable exists.
    pub fn values(&self, solution: &LpSolution) -> Vec<Vec<f64>> {
        self.vars
            .iter()
            .map(|row| {
                row.iter()
                    .map(|var| var.map_or(0.0, |var| solution[var].max(0.0)))
                    .collect()
            })
            .collect()
    }
}

/// Binary selectors `Δ_ia`, one per occupation variable.
#[derive(Debug, Clone)]
pub struct DeltaVars {
    vars: Vec<Vec<Option<VarId>>>,
}

impl DeltaVars {
    #[inline]
    pub fn var(&self, i: usize, a: usize) -> Option<VarId> {
        self.vars.get(i)?.get(a).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, VarId)> + '_ {
        self.vars.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(a, var)| var.map(|var| (i, a, var)))
        })
    }

    /// Dense `[state][action]` selector values.
    pub fn values(&self, solution: &LpSolution) -> Vec<Vec<f64>> {
        self.vars
            .iter()
            .map(|row| row.iter().map(|var| var.map_or(0.0, |var| solution[var])).collect())
            .collect()
    }
}

/// Adds `Δ_ia` for every `x_ia` together with the determinism constraints
/// `Σ_a Δ_ia <= 1` and `x_ia - bound · Δ_ia <= 0`.
pub fn add_delta_constraints(model: &mut LpModel, x: &OccupationVars, bound: f64) -> DeltaVars {
    let vars: Vec<Vec<Option<VarId>>> = x
        .vars
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(a, var)| var.map(|_| model.add_binary(format!("delta_{i}_{a}"), 0.0)))
                .collect()
        })
        .collect();

    let mut count = 0;
    for (i, row) in vars.iter().enumerate() {
        let mut sum = LinearExpr::new();
        for (a, delta) in row.iter().enumerate() {
            let (Some(delta), Some(occupation)) = (*delta, x.var(i, a)) else {
                continue;
            };
            sum.add(delta, 1.0);
            model.add_constraint(
                format!("x_delta_{i}_{a}"),
                LinearExpr::new().with(occupation, 1.0).with(delta, -bound),
                Relation::Le,
                0.0,
            );
            count += 1;
        }
        if !sum.is_empty() {
            model.add_constraint(format!("delta_sum_{i}"), sum, Relation::Le, 1.0);
        }
    }
    debug!(event = "delta_constraints_added", selectors = count, bound);
    DeltaVars { vars }
}

/// The action with positive occupation in each state, if any.
///
/// # Errors
///
/// [`SolverError::Inconsistent`] when more than one action of a state
/// exceeds `tolerance`.
pub fn extract_choices(occupations: &[Vec<f64>], tolerance: f64) -> Result<Vec<Option<usize>>> {
    occupations
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let positive: Vec<usize> = row
                .iter()
                .enumerate()
                .filter(|(_, x)| **x > tolerance)
                .map(|(a, _)| a)
                .collect();
            match positive[..] {
                [] => Ok(None),
                [a] => Ok(Some(a)),
                _ => Err(SolverError::Inconsistent(format!(
                    "state {i} has positive occupation on actions {positive:?}"
                ))),
            }
        })
        .collect()
}
