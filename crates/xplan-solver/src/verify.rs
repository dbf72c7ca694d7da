//! Consistency checks of solved occupation programs.

use tracing::debug;

use crate::error::{Result, SolverError};
use crate::lp::{LpModel, LpSolution};
use crate::occupation::{DeltaVars, OccupationVars};

/// Checks `solution` against the program it solves.
///
/// Every named constraint (flow, source, sink, selector and cost
/// constraints) must hold within `tolerance`. Every positive occupation
/// must have its selector set, and at most one action per state may carry
/// positive occupation.
///
/// # Errors
///
/// [`SolverError::Inconsistent`] naming the first kind of violation found.
pub fn verify_solution(
    model: &LpModel,
    solution: &LpSolution,
    x: &OccupationVars,
    delta: &DeltaVars,
    tolerance: f64,
) -> Result<()> {
    let violated = model.violated_constraints(solution.values(), tolerance);
    if !violated.is_empty() {
        return Err(SolverError::Inconsistent(format!(
            "violated constraints: {}",
            violated.join(", ")
        )));
    }

    let mut positive = vec![0usize; x.num_states()];
    for (i, a, var) in x.iter() {
        if solution[var] <= tolerance {
            continue;
        }
        positive[i] += 1;
        let selected = delta.var(i, a).map(|d| solution[d]).unwrap_or(0.0);
        if selected < 1.0 - tolerance {
            return Err(SolverError::Inconsistent(format!(
                "{}_{i}_{a} = {} but its selector is {selected}",
                x.name(),
                solution[var]
            )));
        }
    }

    if let Some((i, count)) = positive.iter().enumerate().find(|(_, c)| **c > 1) {
        return Err(SolverError::Inconsistent(format!(
            "state {i} has {count} actions with positive occupation"
        )));
    }

    debug!(event = "solution_verified", constraints = model.num_constraints(), tolerance);
    Ok(())
}
