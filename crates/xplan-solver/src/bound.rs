//! Upper bound on occupation measures.

use tracing::{debug, warn};
use xplan_explicit::ExplicitMdp;

use crate::error::Result;
use crate::lp::{LpBackend, LpModel, LpOutcome, Sense};
use crate::occupation::OccupationVars;
use crate::ssp::add_flow_constraints;

/// Maximum total occupation `Σ x_ia` over the SSP flow constraints.
///
/// Any single occupation of a proper policy is at most this value, which
/// makes it a valid big-M for the selector constraints. Returns `None` when
/// the flow constraints are infeasible, i.e. no policy reaches the goal with
/// probability 1. An unbounded program (improper cycles) falls back to
/// `fallback`.
pub fn occupation_upper_bound<B: LpBackend>(
    backend: &mut B,
    mdp: &ExplicitMdp,
    fallback: f64,
) -> Result<Option<f64>> {
    let mut model = LpModel::new(Sense::Maximize);
    let x = OccupationVars::add(&mut model, mdp, "x", |i| !mdp.is_goal(i));
    for (_, _, var) in x.iter() {
        model.add_objective(var, 1.0);
    }
    add_flow_constraints(&mut model, mdp, &x);

    match backend.solve(&model)? {
        LpOutcome::Optimal(solution) => {
            debug!(event = "occupation_bound", bound = solution.objective());
            Ok(Some(solution.objective()))
        }
        LpOutcome::Unbounded => {
            warn!(event = "occupation_bound_fallback", fallback);
            Ok(Some(fallback))
        }
        LpOutcome::Infeasible => {
            debug!(event = "no_proper_policy");
            Ok(None)
        }
    }
}
