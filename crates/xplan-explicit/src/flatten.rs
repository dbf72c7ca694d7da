//! Flattening of a factored XMDP into an explicit MDP.

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;

use tracing::{info, trace};
use xplan_core::objective::{CostCriterion, Transition};
use xplan_core::{Action, Policy, StateVarTuple, Xmdp};

use crate::error::Result;
use crate::group::{update_groups, UpdateGroup};
use crate::index::StateIndex;
use crate::mdp::{CostType, ExplicitMdp};

/// An explicit MDP together with the factored meaning of its indices.
#[derive(Debug, Clone)]
pub struct ExplicitModel {
    mdp: ExplicitMdp,
    states: StateIndex,
    actions: Vec<Action>,
}

impl ExplicitModel {
    pub fn new(mdp: ExplicitMdp, states: StateIndex, actions: Vec<Action>) -> Self {
        Self { mdp, states, actions }
    }

    pub fn mdp(&self) -> &ExplicitMdp {
        &self.mdp
    }

    pub fn states(&self) -> &StateIndex {
        &self.states
    }

    /// Actions in explicit index order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn action(&self, a: usize) -> Option<&Action> {
        self.actions.get(a)
    }

    /// Converts a per-state choice of action indices into a factored policy.
    ///
    /// States without a choice are left out of the policy.
    pub fn policy_from_choices(&self, choices: &[Option<usize>]) -> Policy {
        choices
            .iter()
            .enumerate()
            .filter_map(|(i, choice)| {
                let a = (*choice)?;
                let state = self.states.state(i)?;
                let action = self.actions.get(a)?;
                Some((state.clone(), action.clone()))
            })
            .collect()
    }
}

/// Distribution over full successor states of `action` in `state`.
fn successors(
    groups: &[UpdateGroup],
    action: &Action,
    state: &StateVarTuple,
) -> Result<BTreeMap<StateVarTuple, f64>> {
    let mut partial = vec![(state.clone(), 1.0)];
    for group in groups {
        let Some(command) = group.command_for(action, state)? else {
            continue;
        };
        let mut next = Vec::with_capacity(partial.len() * command.outcomes.len());
        for (dest, p) in &partial {
            for (update, q) in &command.outcomes {
                next.push((dest.overlay(update), p * q));
            }
        }
        partial = next;
    }
    let mut merged = BTreeMap::new();
    for (dest, p) in partial {
        *merged.entry(dest).or_insert(0.0) += p;
    }
    Ok(merged)
}

struct Row {
    src: usize,
    action: usize,
    dests: Vec<(usize, f64)>,
    costs: Vec<f64>,
}

/// Enumerates the states reachable from the initial state and builds the
/// dense MDP over them, for the total-cost criterion.
///
/// Goal states are absorbing. Cost function 0 is the XMDP's cost function;
/// cost function `k >= 1` is the `k`-th QA function, each stored as the
/// expected cost `Σ_j P(j | i, a) · cost(i, a, j)`.
///
/// # Errors
///
/// Model errors raised while evaluating descriptions, preconditions or QA
/// functions.
pub fn flatten(xmdp: &Xmdp) -> Result<ExplicitModel> {
    flatten_for(xmdp, CostCriterion::TotalCost)
}

/// Like [`flatten`], choosing goal handling by cost criterion.
///
/// Under [`CostCriterion::AverageCost`] goal states are expanded like any
/// other state, since the long-run formulation needs an action everywhere.
pub fn flatten_for(xmdp: &Xmdp, criterion: CostCriterion) -> Result<ExplicitModel> {
    let started = Instant::now();
    info!(
        event = "flatten_start",
        vars = xmdp.state_space().len(),
        action_types = xmdp.transitions().len(),
        qfunctions = xmdp.qfunctions().len(),
        criterion = ?criterion,
    );
    let absorbing_goals = criterion == CostCriterion::TotalCost;

    let groups = update_groups(xmdp.transitions())?;
    let actions: Vec<Action> = xmdp
        .action_space()
        .sorted_actions()
        .into_iter()
        .cloned()
        .collect();
    let num_costs = 1 + xmdp.qfunctions().len();

    let mut states = StateIndex::new();
    let mut rows = Vec::new();
    let mut queue = VecDeque::new();
    let (initial, _) = states.insert(xmdp.initial_state().clone());
    queue.push_back(initial);

    while let Some(i) = queue.pop_front() {
        let Some(state) = states.state(i).cloned() else {
            continue;
        };
        if absorbing_goals && xmdp.goal().evaluate(&state) {
            trace!(event = "goal_reached", state = %state);
            continue;
        }
        for (a, action) in actions.iter().enumerate() {
            let pso = xmdp.transitions().pso_for(action)?;
            if !pso.is_applicable(action, &state)? {
                continue;
            }
            let mut dests = Vec::new();
            let mut costs = vec![0.0; num_costs];
            for (dest, p) in successors(&groups, action, &state)? {
                let transition = Transition::new(action, &state, &dest);
                costs[0] += p * xmdp.cost_function().cost(&transition)?;
                for (k, qfunction) in xmdp.qfunctions().iter().enumerate() {
                    costs[k + 1] += p * qfunction.value(&transition)?;
                }
                let (j, fresh) = states.insert(dest);
                if fresh {
                    queue.push_back(j);
                }
                dests.push((j, p));
            }
            trace!(
                event = "state_expanded",
                state = i,
                action = action.name(),
                successors = dests.len(),
            );
            rows.push(Row {
                src: i,
                action: a,
                dests,
                costs,
            });
        }
    }

    let mut builder = ExplicitMdp::builder(
        states.len(),
        actions.iter().map(|a| a.name().to_string()),
        CostType::TransitionCost,
        num_costs,
    );
    builder.set_initial_state(initial)?;
    for (i, state) in states.iter() {
        if xmdp.goal().evaluate(state) {
            builder.add_goal(i)?;
        }
    }
    for row in &rows {
        for &(j, p) in &row.dests {
            builder.set_probability(row.src, row.action, j, p)?;
        }
        for (k, &cost) in row.costs.iter().enumerate() {
            builder.set_cost(k, row.src, row.action, cost)?;
        }
    }
    let mdp = builder.build()?;

    info!(
        event = "flatten_end",
        states = mdp.num_states(),
        actions = mdp.num_actions(),
        transitions = rows.iter().map(|r| r.dests.len()).sum::<usize>(),
        elapsed_ms = started.elapsed().as_millis() as u64,
    );
    Ok(ExplicitModel::new(mdp, states, actions))
}
