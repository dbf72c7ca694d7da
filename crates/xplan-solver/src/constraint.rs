//! Cost constraints over occupation measures.
//!
//! A hard constraint bounds `Σ x_ia · c_k(i, a)` directly. A soft constraint
//! bounds it by the soft bound plus a violation variable `v`, itself bounded
//! by the gap to the hard bound, and charges a penalty for `v` in the
//! objective. Non-linear penalties use a piecewise-linear encoding with one
//! binary selector per segment.

use tracing::debug;
use xplan_core::objective::{AttributeConstraint, BoundType, ConstraintKind, PenaltyFunction};
use xplan_core::Xmdp;
use xplan_explicit::ExplicitMdp;

use crate::error::{Result, SolverError};
use crate::lp::{LinearExpr, LpModel, Relation, VarId};
use crate::occupation::OccupationVars;

/// A constraint on the occupancy cost of explicit cost function `k`.
///
/// # Example
///
/// ```
/// use xplan_core::objective::{BoundType, PenaltyFunction};
/// use xplan_solver::CostConstraint;
///
/// let hard = CostConstraint::hard(1, BoundType::Upper, 0.3);
/// assert_eq!(hard.cost_index(), 1);
///
/// let soft = CostConstraint::soft(2, BoundType::Upper, 0.1, 0.5, PenaltyFunction::linear(10.0)).unwrap();
/// assert!(soft.is_soft());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CostConstraint {
    cost_index: usize,
    bound_type: BoundType,
    kind: ConstraintKind,
}

impl CostConstraint {
    pub fn hard(cost_index: usize, bound_type: BoundType, bound: f64) -> Self {
        Self {
            cost_index,
            bound_type,
            kind: ConstraintKind::Hard { bound },
        }
    }

    /// Creates a soft constraint; see [`AttributeConstraint::soft`] for the bound ordering.
    pub fn soft(
        cost_index: usize,
        bound_type: BoundType,
        soft_bound: f64,
        hard_bound: f64,
        penalty: PenaltyFunction,
    ) -> Result<Self> {
        let checked = AttributeConstraint::soft("", bound_type, soft_bound, hard_bound, penalty)?;
        Ok(Self {
            cost_index,
            bound_type,
            kind: *checked.kind(),
        })
    }

    /// Resolves the QA function of `constraint` to its explicit cost index.
    ///
    /// QA functions occupy cost indices `1..` in XMDP order; index 0 is the
    /// objective.
    pub fn from_attribute(constraint: &AttributeConstraint, xmdp: &Xmdp) -> Result<Self> {
        let k = xmdp.qfunction_index(constraint.qfunction())? + 1;
        Ok(Self {
            cost_index: k,
            bound_type: constraint.bound_type(),
            kind: *constraint.kind(),
        })
    }

    #[inline]
    pub fn cost_index(&self) -> usize {
        self.cost_index
    }

    #[inline]
    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn is_soft(&self) -> bool {
        matches!(self.kind, ConstraintKind::Soft { .. })
    }

    /// The non-strict relation and bound the constraint must respect.
    ///
    /// For soft constraints this is the hard bound.
    pub fn hard_limit(&self, margin: f64) -> (Relation, f64) {
        let bound = match self.kind {
            ConstraintKind::Hard { bound } => bound,
            ConstraintKind::Soft { hard_bound, .. } => hard_bound,
        };
        (self.relation(), self.bound_type.non_strict(bound, margin))
    }

    fn relation(&self) -> Relation {
        if self.bound_type.is_upper() {
            Relation::Le
        } else {
            Relation::Ge
        }
    }

    fn check(&self, mdp: &ExplicitMdp) -> Result<()> {
        if self.cost_index == 0 || self.cost_index >= mdp.num_costs() {
            return Err(SolverError::MalformedInput(format!(
                "constraint on cost function {} of an MDP with cost functions 1..{}",
                self.cost_index,
                mdp.num_costs()
            )));
        }
        Ok(())
    }
}

/// Variables added for one soft constraint.
#[derive(Debug, Clone)]
pub struct SoftConstraintVars {
    pub cost_index: usize,
    /// Violation of the soft bound.
    pub violation: VarId,
    /// Convex-combination weights and segment selectors of a piecewise-linear penalty.
    pub segments: Option<(Vec<VarId>, Vec<VarId>)>,
}

/// Adds `constraints` on `x` to `model`, with penalty terms for soft ones.
pub fn add_cost_constraints(
    model: &mut LpModel,
    mdp: &ExplicitMdp,
    x: &OccupationVars,
    constraints: &[CostConstraint],
    strict_margin: f64,
) -> Result<Vec<SoftConstraintVars>> {
    let mut soft = Vec::new();
    for constraint in constraints {
        constraint.check(mdp)?;
        let k = constraint.cost_index;
        let occupancy_cost = x.weighted_cost(mdp, k)?;
        let relation = constraint.relation();

        match constraint.kind {
            ConstraintKind::Hard { bound } => {
                let bound = constraint.bound_type.non_strict(bound, strict_margin);
                model.add_constraint(format!("cost{k}_hard"), occupancy_cost, relation, bound);
                debug!(event = "hard_constraint_added", cost = k, relation = %relation, bound);
            }
            ConstraintKind::Soft {
                soft_bound,
                hard_bound,
                penalty,
            } => {
                let soft_bound = constraint.bound_type.non_strict(soft_bound, strict_margin);
                let hard_bound = constraint.bound_type.non_strict(hard_bound, strict_margin);
                let max_violation = (hard_bound - soft_bound).abs();
                let violation = model.add_continuous(format!("cost{k}_violation"), 0.0, max_violation, 0.0);

                // upper: Σ x·c_k - v <= soft; lower: Σ x·c_k + v >= soft
                let sign = if constraint.bound_type.is_upper() { -1.0 } else { 1.0 };
                let mut expr = occupancy_cost;
                expr.add(violation, sign);
                model.add_constraint(format!("cost{k}_soft"), expr, relation, soft_bound);

                let segments = if penalty.is_nonlinear() {
                    Some(add_piecewise_penalty(model, k, violation, max_violation, &penalty))
                } else {
                    model.add_objective(violation, penalty.scaling_const());
                    None
                };
                debug!(
                    event = "soft_constraint_added",
                    cost = k,
                    relation = %relation,
                    soft_bound,
                    hard_bound,
                    samples = penalty.num_samples(),
                );
                soft.push(SoftConstraintVars {
                    cost_index: k,
                    violation,
                    segments,
                });
            }
        }
    }
    Ok(soft)
}

/// Evenly spaced violation samples `v_i = max_violation / (m - 1) · i`.
pub fn penalty_samples(max_violation: f64, m: usize) -> Vec<f64> {
    let step = max_violation / (m.max(2) - 1) as f64;
    (0..m).map(|i| step * i as f64).collect()
}

/// Lambda encoding of `k_p · penalty(v)` over `m` samples.
///
/// Weights `α_i ∈ [0, 1]` carry the sampled penalties in the objective and
/// reconstruct `v = Σ α_i v_i`. Selectors `h_j` pick one segment; only the
/// two weights adjacent to the selected segment may be positive.
fn add_piecewise_penalty(
    model: &mut LpModel,
    k: usize,
    violation: VarId,
    max_violation: f64,
    penalty: &PenaltyFunction,
) -> (Vec<VarId>, Vec<VarId>) {
    let m = penalty.num_samples();
    let samples = penalty_samples(max_violation, m);
    let kp = penalty.scaling_const();

    let alphas: Vec<VarId> = samples
        .iter()
        .enumerate()
        .map(|(i, &v)| model.add_continuous(format!("cost{k}_alpha_{i}"), 0.0, 1.0, kp * penalty.penalty(v)))
        .collect();
    let selectors: Vec<VarId> = (0..m - 1)
        .map(|j| model.add_binary(format!("cost{k}_segment_{j}"), 0.0))
        .collect();

    let mut one_segment = LinearExpr::new();
    for &h in &selectors {
        one_segment.add(h, 1.0);
    }
    model.add_constraint(format!("cost{k}_segment_sum"), one_segment, Relation::Eq, 1.0);

    for (i, &alpha) in alphas.iter().enumerate() {
        let mut adjacent = LinearExpr::new().with(alpha, 1.0);
        if i > 0 {
            adjacent.add(selectors[i - 1], -1.0);
        }
        if let Some(&h) = selectors.get(i) {
            adjacent.add(h, -1.0);
        }
        model.add_constraint(format!("cost{k}_alpha_{i}_adjacent"), adjacent, Relation::Le, 0.0);
    }

    let mut convex = LinearExpr::new();
    let mut reconstruct = LinearExpr::new().with(violation, -1.0);
    for (&alpha, &v) in alphas.iter().zip(&samples) {
        convex.add(alpha, 1.0);
        reconstruct.add(alpha, v);
    }
    model.add_constraint(format!("cost{k}_alpha_sum"), convex, Relation::Eq, 1.0);
    model.add_constraint(format!("cost{k}_violation_value"), reconstruct, Relation::Eq, 0.0);

    (alphas, selectors)
}
