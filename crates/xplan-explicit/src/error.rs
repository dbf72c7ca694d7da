//! Error types for explicit MDPs.

use thiserror::Error;
use xplan_core::ModelError;

/// Errors raised while building, flattening or reading explicit MDPs.
///
/// Index and cost-kind mismatches are programming errors: arrays handed to
/// an explicit MDP must agree with its declared state and action counts.
#[derive(Debug, Error)]
pub enum ExplicitError {
    #[error("state index {index} out of range for {num_states} states")]
    StateOutOfRange { index: usize, num_states: usize },

    #[error("action index {index} out of range for {num_actions} actions")]
    ActionOutOfRange { index: usize, num_actions: usize },

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("cost function index {index} out of range for {num_costs} cost functions")]
    CostIndexOutOfRange { index: usize, num_costs: usize },

    #[error("cost type mismatch: model has {actual} costs, {requested} costs requested")]
    CostTypeMismatch {
        actual: &'static str,
        requested: &'static str,
    },

    #[error("transition probabilities of state {state}, action '{action}' sum to {sum}")]
    RowSum { state: usize, action: String, sum: f64 },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Result type alias for explicit MDP operations.
pub type Result<T> = std::result::Result<T, ExplicitError>;
