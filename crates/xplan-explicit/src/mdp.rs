//! Dense explicit MDP.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;
use xplan_core::action::compare_action_names;
use xplan_core::factor::PROBABILITY_TOLERANCE;

use crate::error::{ExplicitError, Result};

/// How costs are indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostType {
    /// `c_k(i, a)`: cost of taking action `a` in state `i`.
    TransitionCost,
    /// `c_k(i)`: cost of being in state `i`.
    StateCost,
}

impl CostType {
    fn label(self) -> &'static str {
        match self {
            CostType::TransitionCost => "transition",
            CostType::StateCost => "state",
        }
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An MDP with states `0..n` and actions `0..m`.
///
/// Actions are indexed in case-insensitive lexicographic order of their
/// names. `P[i][a][j]` is stored densely. Cost function 0 is the objective;
/// cost functions `k >= 1` are QA costs usable as constraints.
///
/// # Example
///
/// ```
/// use xplan_explicit::{CostType, ExplicitMdp};
///
/// let mut builder = ExplicitMdp::builder(2, ["stay", "Go"], CostType::TransitionCost, 1);
/// builder.set_transition_probability(0, "Go", 1, 1.0).unwrap();
/// builder.set_transition_cost(0, 0, "Go", 1.0).unwrap();
/// builder.add_goal(1).unwrap();
/// let mdp = builder.build().unwrap();
///
/// assert_eq!(mdp.action_index("Go").unwrap(), 0);
/// assert!(mdp.is_action_applicable(0, 0));
/// assert!(!mdp.is_action_applicable(0, 1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitMdp {
    num_states: usize,
    actions: Vec<String>,
    cost_type: CostType,
    num_costs: usize,
    probabilities: Vec<f64>,
    costs: Vec<Vec<f64>>,
    initial_state: usize,
    goals: BTreeSet<usize>,
}

impl ExplicitMdp {
    /// Starts an MDP with `num_costs` cost functions (at least the objective).
    pub fn builder<S: Into<String>>(
        num_states: usize,
        action_names: impl IntoIterator<Item = S>,
        cost_type: CostType,
        num_costs: usize,
    ) -> ExplicitMdpBuilder {
        let mut actions: Vec<String> = action_names.into_iter().map(Into::into).collect();
        actions.sort_by(|a, b| compare_action_names(a, b));
        actions.dedup();
        let num_actions = actions.len();
        let num_costs = num_costs.max(1);
        let cost_len = match cost_type {
            CostType::TransitionCost => num_states * num_actions,
            CostType::StateCost => num_states,
        };
        ExplicitMdpBuilder {
            mdp: ExplicitMdp {
                num_states,
                actions,
                cost_type,
                num_costs,
                probabilities: vec![0.0; num_states * num_actions * num_states],
                costs: vec![vec![0.0; cost_len]; num_costs],
                initial_state: 0,
                goals: BTreeSet::new(),
            },
        }
    }

    #[inline]
    pub fn num_states(&self) -> usize {
        self.num_states
    }

    #[inline]
    pub fn num_actions(&self) -> usize {
        self.actions.len()
    }

    /// Number of cost functions, objective included.
    #[inline]
    pub fn num_costs(&self) -> usize {
        self.num_costs
    }

    #[inline]
    pub fn cost_type(&self) -> CostType {
        self.cost_type
    }

    pub fn action_names(&self) -> &[String] {
        &self.actions
    }

    pub fn action_name(&self, a: usize) -> Option<&str> {
        self.actions.get(a).map(String::as_str)
    }

    pub fn action_index(&self, name: &str) -> Result<usize> {
        self.actions
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| ExplicitError::UnknownAction(name.to_string()))
    }

    #[inline]
    pub fn initial_state(&self) -> usize {
        self.initial_state
    }

    pub fn goals(&self) -> &BTreeSet<usize> {
        &self.goals
    }

    #[inline]
    pub fn is_goal(&self, i: usize) -> bool {
        self.goals.contains(&i)
    }

    #[inline]
    fn offset(&self, i: usize, a: usize) -> usize {
        (i * self.actions.len() + a) * self.num_states
    }

    /// `P(j | i, a)`; out-of-range indices have probability 0.
    #[inline]
    pub fn transition_probability(&self, i: usize, a: usize, j: usize) -> f64 {
        if i >= self.num_states || a >= self.actions.len() || j >= self.num_states {
            return 0.0;
        }
        self.probabilities[self.offset(i, a) + j]
    }

    /// The row `P(· | i, a)`.
    pub fn row(&self, i: usize, a: usize) -> &[f64] {
        if i >= self.num_states || a >= self.actions.len() {
            return &[];
        }
        let start = self.offset(i, a);
        &self.probabilities[start..start + self.num_states]
    }

    /// Successors of `(i, a)` with positive probability.
    pub fn successors(&self, i: usize, a: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.row(i, a)
            .iter()
            .enumerate()
            .filter(|(_, p)| **p > 0.0)
            .map(|(j, p)| (j, *p))
    }

    /// Action `a` is applicable in `i` iff `P(· | i, a)` has mass.
    #[inline]
    pub fn is_action_applicable(&self, i: usize, a: usize) -> bool {
        self.row(i, a).iter().any(|p| *p > 0.0)
    }

    fn check_cost(&self, k: usize, expected: CostType) -> Result<()> {
        if k >= self.num_costs {
            return Err(ExplicitError::CostIndexOutOfRange {
                index: k,
                num_costs: self.num_costs,
            });
        }
        if self.cost_type != expected {
            return Err(ExplicitError::CostTypeMismatch {
                actual: self.cost_type.label(),
                requested: expected.label(),
            });
        }
        Ok(())
    }

    fn check_state(&self, i: usize) -> Result<()> {
        if i < self.num_states {
            Ok(())
        } else {
            Err(ExplicitError::StateOutOfRange {
                index: i,
                num_states: self.num_states,
            })
        }
    }

    fn check_action(&self, a: usize) -> Result<()> {
        if a < self.actions.len() {
            Ok(())
        } else {
            Err(ExplicitError::ActionOutOfRange {
                index: a,
                num_actions: self.actions.len(),
            })
        }
    }

    /// `c_k(i, a)` of a transition-cost MDP.
    pub fn transition_cost(&self, k: usize, i: usize, a: usize) -> Result<f64> {
        self.check_cost(k, CostType::TransitionCost)?;
        self.check_state(i)?;
        self.check_action(a)?;
        Ok(self.costs[k][i * self.actions.len() + a])
    }

    /// `c_k(i)` of a state-cost MDP.
    pub fn state_cost(&self, k: usize, i: usize) -> Result<f64> {
        self.check_cost(k, CostType::StateCost)?;
        self.check_state(i)?;
        Ok(self.costs[k][i])
    }

    /// Cost of taking `a` in `i` under cost function `k`, whichever the cost type.
    pub fn step_cost(&self, k: usize, i: usize, a: usize) -> Result<f64> {
        match self.cost_type {
            CostType::TransitionCost => self.transition_cost(k, i, a),
            CostType::StateCost => {
                self.check_action(a)?;
                self.state_cost(k, i)
            }
        }
    }
}

/// Mutable construction phase of an [`ExplicitMdp`].
#[derive(Debug)]
pub struct ExplicitMdpBuilder {
    mdp: ExplicitMdp,
}

impl ExplicitMdpBuilder {
    pub fn action_index(&self, name: &str) -> Result<usize> {
        self.mdp.action_index(name)
    }

    /// Sets `P(j | i, action)`.
    pub fn set_transition_probability(&mut self, i: usize, action: &str, j: usize, p: f64) -> Result<()> {
        let a = self.mdp.action_index(action)?;
        self.set_probability(i, a, j, p)
    }

    /// Sets `P(j | i, a)` by action index.
    pub fn set_probability(&mut self, i: usize, a: usize, j: usize, p: f64) -> Result<()> {
        self.mdp.check_state(i)?;
        self.mdp.check_state(j)?;
        self.mdp.check_action(a)?;
        let offset = self.mdp.offset(i, a);
        self.mdp.probabilities[offset + j] = p;
        Ok(())
    }

    /// Sets `c_k(i, action)`.
    pub fn set_transition_cost(&mut self, k: usize, i: usize, action: &str, cost: f64) -> Result<()> {
        let a = self.mdp.action_index(action)?;
        self.set_cost(k, i, a, cost)
    }

    /// Sets `c_k(i, a)` by action index.
    pub fn set_cost(&mut self, k: usize, i: usize, a: usize, cost: f64) -> Result<()> {
        self.mdp.check_cost(k, CostType::TransitionCost)?;
        self.mdp.check_state(i)?;
        self.mdp.check_action(a)?;
        let m = self.mdp.actions.len();
        self.mdp.costs[k][i * m + a] = cost;
        Ok(())
    }

    /// Sets `c_k(i)`.
    pub fn set_state_cost(&mut self, k: usize, i: usize, cost: f64) -> Result<()> {
        self.mdp.check_cost(k, CostType::StateCost)?;
        self.mdp.check_state(i)?;
        self.mdp.costs[k][i] = cost;
        Ok(())
    }

    pub fn set_initial_state(&mut self, i: usize) -> Result<()> {
        self.mdp.check_state(i)?;
        self.mdp.initial_state = i;
        Ok(())
    }

    pub fn add_goal(&mut self, i: usize) -> Result<()> {
        self.mdp.check_state(i)?;
        self.mdp.goals.insert(i);
        Ok(())
    }

    /// Checks that every non-empty row is a distribution and freezes the MDP.
    pub fn build(self) -> Result<ExplicitMdp> {
        let mdp = self.mdp;
        for i in 0..mdp.num_states {
            for a in 0..mdp.actions.len() {
                let sum: f64 = mdp.row(i, a).iter().sum();
                if sum != 0.0 && (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
                    return Err(ExplicitError::RowSum {
                        state: i,
                        action: mdp.actions[a].clone(),
                        sum,
                    });
                }
            }
        }
        if mdp.num_states > 0 {
            mdp.check_state(mdp.initial_state)?;
        }
        debug!(
            event = "explicit_mdp_built",
            states = mdp.num_states,
            actions = mdp.actions.len(),
            cost_type = %mdp.cost_type,
            goals = mdp.goals.len(),
        );
        Ok(mdp)
    }
}
