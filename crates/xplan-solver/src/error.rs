//! Error types for the policy optimizer.

use thiserror::Error;
use xplan_core::ModelError;
use xplan_explicit::ExplicitError;

/// Errors raised while building or solving occupation-measure programs.
///
/// An infeasible program is not an error; solvers report it as
/// [`SolveOutcome::NoSolution`](crate::SolveOutcome::NoSolution).
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("LP backend error: {0}")]
    Backend(String),

    #[error("branch-and-bound node limit of {limit} reached without an integral solution")]
    NodeLimitReached { limit: u64 },

    #[error("solution failed verification: {0}")]
    Inconsistent(String),

    #[error(transparent)]
    Explicit(#[from] ExplicitError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;
