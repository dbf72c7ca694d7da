//! Expected costs of occupation measures.

use xplan_explicit::ExplicitMdp;

use crate::error::Result;

/// `Σ_{i,a} x_ia · c_k(i, a)` over dense `[state][action]` occupations.
///
/// For total-cost occupations this is the expected total cost of cost
/// function `k`; for average-cost occupations it is the long-run average.
pub fn occupancy_cost(mdp: &ExplicitMdp, k: usize, occupations: &[Vec<f64>]) -> Result<f64> {
    let mut total = 0.0;
    for (i, row) in occupations.iter().enumerate() {
        for (a, &x) in row.iter().enumerate() {
            if x != 0.0 {
                total += x * mdp.step_cost(k, i, a)?;
            }
        }
    }
    Ok(total)
}

/// [`occupancy_cost`] of every cost function of `mdp`.
pub fn occupancy_costs(mdp: &ExplicitMdp, occupations: &[Vec<f64>]) -> Result<Vec<f64>> {
    (0..mdp.num_costs())
        .map(|k| occupancy_cost(mdp, k, occupations))
        .collect()
}
