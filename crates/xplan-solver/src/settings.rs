//! Solver settings.

use crate::lp::BranchAndBoundConfig;

/// Numeric and search settings shared by all occupation-measure solvers.
///
/// # Example
///
/// ```
/// use xplan_solver::SolverSettings;
///
/// let settings = SolverSettings::default()
///     .with_node_limit(None)
///     .with_verify_solution(false);
/// assert_eq!(settings.node_limit, None);
/// assert_eq!(settings.feasibility_tolerance, 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SolverSettings {
    /// Tolerance on constraint satisfaction and on positive occupation.
    pub feasibility_tolerance: f64,
    /// Distance from 0 or 1 within which a binary counts as integral.
    pub integrality_tolerance: f64,
    /// Maximum branch-and-bound nodes (None = unlimited).
    pub node_limit: Option<u64>,
    /// Occupation bound used when the bounding program is unbounded.
    pub occupation_bound_fallback: f64,
    /// Whether to verify every solution against the program it solves.
    pub verify_solution: bool,
    /// Margin that turns strict bounds into non-strict ones.
    pub strict_bound_margin: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            feasibility_tolerance: 1e-6,
            integrality_tolerance: 1e-6,
            node_limit: Some(10_000),
            occupation_bound_fallback: 1e4,
            verify_solution: true,
            strict_bound_margin: 1e-4,
        }
    }
}

impl SolverSettings {
    pub fn with_feasibility_tolerance(mut self, tolerance: f64) -> Self {
        self.feasibility_tolerance = tolerance;
        self
    }

    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }

    pub fn with_node_limit(mut self, limit: Option<u64>) -> Self {
        self.node_limit = limit;
        self
    }

    pub fn with_occupation_bound_fallback(mut self, bound: f64) -> Self {
        self.occupation_bound_fallback = bound;
        self
    }

    pub fn with_verify_solution(mut self, verify: bool) -> Self {
        self.verify_solution = verify;
        self
    }

    pub fn with_strict_bound_margin(mut self, margin: f64) -> Self {
        self.strict_bound_margin = margin;
        self
    }

    /// Branch-and-bound configuration derived from these settings.
    pub fn branch_and_bound(&self) -> BranchAndBoundConfig {
        BranchAndBoundConfig {
            node_limit: self.node_limit,
            integrality_tolerance: self.integrality_tolerance,
            feasibility_tolerance: self.feasibility_tolerance,
            enable_pruning: true,
        }
    }
}
