//! Cost functions over QA functions.

use std::sync::Arc;

use super::{QFunction, Transition};
use crate::error::Result;

/// How costs accumulate over an execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum CostCriterion {
    /// Expected total cost until a goal state is reached.
    #[default]
    TotalCost,
    /// Expected long-run average cost per step.
    AverageCost,
}

/// Linear cost of one QA: `a + b * q`.
#[derive(Debug, Clone)]
pub struct AttributeCostFunction {
    qfunction: Arc<dyn QFunction>,
    a: f64,
    b: f64,
}

impl AttributeCostFunction {
    pub fn new(qfunction: Arc<dyn QFunction>, a: f64, b: f64) -> Self {
        Self { qfunction, a, b }
    }

    pub fn qfunction(&self) -> &Arc<dyn QFunction> {
        &self.qfunction
    }

    pub fn cost(&self, transition: &Transition<'_>) -> Result<f64> {
        Ok(self.a + self.b * self.qfunction.value(transition)?)
    }

    /// QA value whose cost is `cost`.
    pub fn inverse(&self, cost: f64) -> f64 {
        (cost - self.a) / self.b
    }
}

/// Additive multi-attribute cost: a constant step cost plus scaled attribute costs.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use xplan_core::action::Action;
/// use xplan_core::objective::{AttributeCostFunction, AttributeQFunction, CostFunction, Transition};
/// use xplan_core::state::StateVarTuple;
///
/// let time = Arc::new(AttributeQFunction::new("time", "duration"));
/// let cost = CostFunction::new("cost")
///     .with_step_cost(1.0)
///     .with_term(AttributeCostFunction::new(time, 0.0, 1.0), 0.5);
///
/// let go = Action::new("go").with_attribute("duration", 4.0);
/// let s = StateVarTuple::new();
/// assert_eq!(cost.cost(&Transition::new(&go, &s, &s)).unwrap(), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct CostFunction {
    name: String,
    step_cost: f64,
    terms: Vec<(AttributeCostFunction, f64)>,
}

impl CostFunction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            step_cost: 0.0,
            terms: Vec::new(),
        }
    }

    /// Cost charged on every transition regardless of QA values.
    pub fn with_step_cost(mut self, step_cost: f64) -> Self {
        self.step_cost = step_cost;
        self
    }

    /// Adds an attribute cost with its scaling constant.
    pub fn with_term(mut self, cost: AttributeCostFunction, scaling: f64) -> Self {
        self.terms.push((cost, scaling));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn terms(&self) -> &[(AttributeCostFunction, f64)] {
        &self.terms
    }

    pub fn cost(&self, transition: &Transition<'_>) -> Result<f64> {
        let mut total = self.step_cost;
        for (term, scaling) in &self.terms {
            total += scaling * term.cost(transition)?;
        }
        Ok(total)
    }
}
