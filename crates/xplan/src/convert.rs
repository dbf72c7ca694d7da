//! Configuration records to solver and reader types.

use xplan_config::{ExplicitConfig, SolverConfig};
use xplan_explicit::{CostType, ExplicitMdpReader};
use xplan_solver::SolverSettings;

/// Solver settings carrying the configured tolerances and limits.
pub fn solver_settings(config: &SolverConfig) -> SolverSettings {
    SolverSettings::default()
        .with_feasibility_tolerance(config.feasibility_tolerance)
        .with_integrality_tolerance(config.integrality_tolerance)
        .with_node_limit(config.node_limit)
        .with_occupation_bound_fallback(config.occupation_bound_fallback)
        .with_verify_solution(config.verify_solution)
        .with_strict_bound_margin(config.strict_bound_margin)
}

/// Reader for explicit model tables using the configured state labels.
pub fn explicit_reader(config: &ExplicitConfig, cost_type: CostType) -> ExplicitMdpReader {
    ExplicitMdpReader::new(cost_type).with_labels(config.init_label.clone(), config.goal_label.clone())
}
