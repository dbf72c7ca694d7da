//! Configuration system for xplan.
//!
//! Load planner configuration from TOML or YAML to choose the cost
//! criterion, tune the optimizer and declare QA constraints without code
//! changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use xplan_config::{ConstraintConfig, PlannerConfig};
//! use xplan_core::CostCriterion;
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     cost_criterion = "total_cost"
//!
//!     [solver]
//!     node_limit = 500
//!
//!     [[constraints]]
//!     type = "hard"
//!     qfunction = "collision"
//!     bound_type = "upper"
//!     bound = 0.3
//!
//!     [[constraints]]
//!     type = "soft"
//!     qfunction = "travel_time"
//!     bound_type = "upper"
//!     soft_bound = 3.0
//!     hard_bound = 5.0
//!     [constraints.penalty]
//!     type = "quadratic"
//!     scaling = 2.0
//!     samples = 5
//! "#).unwrap();
//!
//! assert_eq!(config.cost_criterion, CostCriterion::TotalCost);
//! assert_eq!(config.solver.node_limit, Some(500));
//! assert_eq!(config.constraints.len(), 2);
//! assert_eq!(config.constraints[1].qfunction(), "travel_time");
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use xplan_config::PlannerConfig;
//!
//! let config = PlannerConfig::load("planner.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use xplan_core::objective::{AttributeConstraint, BoundType, PenaltyFunction};
use xplan_core::CostCriterion;

#[cfg(test)]
mod tests;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main planner configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Total cost until the goal, or long-run average cost.
    #[serde(default)]
    pub cost_criterion: CostCriterion,

    /// Optimizer settings.
    #[serde(default)]
    pub solver: SolverConfig,

    /// Explicit-model reader settings.
    #[serde(default)]
    pub explicit: ExplicitConfig,

    /// Constraints on QA functions applied by default.
    #[serde(default)]
    pub constraints: Vec<ConstraintConfig>,
}

impl PlannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the cost criterion.
    pub fn with_cost_criterion(mut self, criterion: CostCriterion) -> Self {
        self.cost_criterion = criterion;
        self
    }

    /// Replaces the optimizer settings.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the branch-and-bound node limit.
    pub fn with_node_limit(mut self, limit: Option<u64>) -> Self {
        self.solver.node_limit = limit;
        self
    }

    /// Sets the labels of initial and goal states in explicit models.
    pub fn with_labels(mut self, init_label: impl Into<String>, goal_label: impl Into<String>) -> Self {
        self.explicit.init_label = init_label.into();
        self.explicit.goal_label = goal_label.into();
        self
    }

    /// Adds a constraint configuration.
    pub fn with_constraint(mut self, constraint: ConstraintConfig) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Checks numeric settings and constraint bounds.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver.validate()?;
        for constraint in &self.constraints {
            constraint.to_attribute_constraint()?;
        }
        Ok(())
    }

    /// The configured constraints as core constraints.
    pub fn attribute_constraints(&self) -> Result<Vec<AttributeConstraint>, ConfigError> {
        self.constraints
            .iter()
            .map(ConstraintConfig::to_attribute_constraint)
            .collect()
    }
}

/// Occupation-measure optimizer configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Tolerance on constraint satisfaction and positive occupation.
    pub feasibility_tolerance: f64,

    /// Distance from 0 or 1 within which a binary counts as integral.
    pub integrality_tolerance: f64,

    /// Maximum branch-and-bound nodes (None = unlimited).
    pub node_limit: Option<u64>,

    /// Occupation bound used when the bounding program is unbounded.
    pub occupation_bound_fallback: f64,

    /// Whether to verify solutions against their program.
    pub verify_solution: bool,

    /// Margin that turns strict bounds into non-strict ones.
    pub strict_bound_margin: f64,
}

impl Default for SolverConfig {
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

impl SolverConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("feasibility_tolerance", self.feasibility_tolerance),
            ("integrality_tolerance", self.integrality_tolerance),
            ("occupation_bound_fallback", self.occupation_bound_fallback),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        if self.integrality_tolerance >= 0.5 {
            return Err(ConfigError::Invalid(format!(
                "integrality_tolerance must be below 0.5, got {}",
                self.integrality_tolerance
            )));
        }
        if !(self.strict_bound_margin.is_finite() && self.strict_bound_margin >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "strict_bound_margin must be non-negative, got {}",
                self.strict_bound_margin
            )));
        }
        Ok(())
    }
}

/// Explicit-model reader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ExplicitConfig {
    /// Label of the initial state.
    pub init_label: String,

    /// Label of goal states.
    pub goal_label: String,
}

impl Default for ExplicitConfig {
    fn default() -> Self {
        Self {
            init_label: "init".to_string(),
            goal_label: "goal".to_string(),
        }
    }
}

/// Constraint on the expected value of a QA function.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintConfig {
    /// The bound may not be violated.
    Hard {
        qfunction: String,
        bound_type: BoundType,
        bound: f64,
    },

    /// Violating the soft bound is penalized; the hard bound may not be violated.
    Soft {
        qfunction: String,
        bound_type: BoundType,
        soft_bound: f64,
        hard_bound: f64,
        penalty: PenaltyFunction,
    },
}

impl ConstraintConfig {
    /// Name of the constrained QA function.
    pub fn qfunction(&self) -> &str {
        match self {
            ConstraintConfig::Hard { qfunction, .. } | ConstraintConfig::Soft { qfunction, .. } => qfunction,
        }
    }

    /// Builds the core constraint.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] for non-finite bounds, misordered soft and
    /// hard bounds, and invalid penalties.
    pub fn to_attribute_constraint(&self) -> Result<AttributeConstraint, ConfigError> {
        match self {
            ConstraintConfig::Hard {
                qfunction,
                bound_type,
                bound,
            } => {
                if !bound.is_finite() {
                    return Err(ConfigError::Invalid(format!(
                        "bound of constraint on '{qfunction}' must be finite"
                    )));
                }
                Ok(AttributeConstraint::hard(qfunction.clone(), *bound_type, *bound))
            }
            ConstraintConfig::Soft {
                qfunction,
                bound_type,
                soft_bound,
                hard_bound,
                penalty,
            } => AttributeConstraint::soft(qfunction.clone(), *bound_type, *soft_bound, *hard_bound, *penalty)
                .map_err(|e| ConfigError::Invalid(format!("constraint on '{qfunction}': {e}"))),
        }
    }
}
