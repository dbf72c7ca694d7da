//! Errors surfaced by the planner.

use thiserror::Error;
use xplan_config::ConfigError;
use xplan_core::ModelError;
use xplan_explicit::ExplicitError;
use xplan_solver::SolverError;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Explicit(#[from] ExplicitError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
