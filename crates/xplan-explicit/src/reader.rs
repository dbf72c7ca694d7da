//! Reader for a model checker's explicit-model text tables.
//!
//! Supported tables:
//!
//! - transitions: header `states choices transitions`, then one row per
//!   choice: `src p:dest p:dest ... action`
//! - transition rewards: header, then `src choice dest reward`
//! - state rewards: header, then `state reward`
//! - labels: header `0="init" 1="goal" ...`, then `state: id id ...`
//! - states: header `(v1,v2,...)`, then `index:(x1,x2,...)`
//!
//! Choices are numbered per source state in row order.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use tracing::debug;
use xplan_core::{StateSpace, StateVarTuple};

use crate::error::{ExplicitError, Result};
use crate::index::StateIndex;
use crate::mdp::{CostType, ExplicitMdp};

fn parse_error(line: usize, message: impl Into<String>) -> ExplicitError {
    ExplicitError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_num<T: std::str::FromStr>(token: &str, line: usize, what: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| parse_error(line, format!("invalid {what} '{token}'")))
}

/// Non-empty lines with 1-based line numbers.
fn lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

struct Choice {
    src: usize,
    action: String,
    dests: Vec<(usize, f64)>,
}

struct Transitions {
    num_states: usize,
    choices: Vec<Choice>,
}

fn parse_transitions(text: &str) -> Result<Transitions> {
    let mut rows = lines(text);
    let (header_line, header) = rows.next().ok_or_else(|| parse_error(1, "missing header"))?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    let &[states, choices, transitions] = &fields[..] else {
        return Err(parse_error(header_line, "expected 'states choices transitions'"));
    };
    let num_states: usize = parse_num(states, header_line, "state count")?;
    let num_choices: usize = parse_num(choices, header_line, "choice count")?;
    let num_transitions: usize = parse_num(transitions, header_line, "transition count")?;

    let mut parsed = Vec::with_capacity(num_choices);
    for (line, row) in rows {
        let tokens: Vec<&str> = row.split_whitespace().collect();
        let [src, targets @ .., action] = &tokens[..] else {
            return Err(parse_error(line, "expected 'src p:dest ... action'"));
        };
        if targets.is_empty() {
            return Err(parse_error(line, "choice without successors"));
        }
        let src: usize = parse_num(src, line, "state")?;
        let mut dests = Vec::with_capacity(targets.len());
        for target in targets {
            let (p, dest) = target
                .split_once(':')
                .ok_or_else(|| parse_error(line, format!("expected 'p:dest', found '{target}'")))?;
            dests.push((parse_num(dest, line, "state")?, parse_num(p, line, "probability")?));
        }
        parsed.push(Choice {
            src,
            action: (*action).to_string(),
            dests,
        });
    }

    let found: usize = parsed.iter().map(|c| c.dests.len()).sum();
    if parsed.len() != num_choices || found != num_transitions {
        return Err(parse_error(
            header_line,
            format!(
                "header declares {num_choices} choices and {num_transitions} transitions, found {} and {found}",
                parsed.len()
            ),
        ));
    }
    Ok(Transitions {
        num_states,
        choices: parsed,
    })
}

/// Label ids of the initial and goal labels, and the states carrying each id.
fn parse_labels(text: &str) -> Result<(BTreeMap<String, usize>, BTreeMap<usize, BTreeSet<usize>>)> {
    let mut rows = lines(text);
    let (header_line, header) = rows.next().ok_or_else(|| parse_error(1, "missing header"))?;
    let mut names = BTreeMap::new();
    for token in header.split_whitespace() {
        let (id, name) = token
            .split_once('=')
            .ok_or_else(|| parse_error(header_line, format!("expected 'id=\"label\"', found '{token}'")))?;
        names.insert(
            name.trim_matches('"').to_string(),
            parse_num(id, header_line, "label id")?,
        );
    }

    let mut states: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
    for (line, row) in rows {
        let (state, ids) = row
            .split_once(':')
            .ok_or_else(|| parse_error(line, "expected 'state: ids'"))?;
        let state: usize = parse_num(state.trim(), line, "state")?;
        for id in ids.split_whitespace() {
            states
                .entry(parse_num(id, line, "label id")?)
                .or_default()
                .insert(state);
        }
    }
    Ok((names, states))
}

/// Builds [`ExplicitMdp`]s from a model checker's explicit tables.
#[derive(Debug, Clone)]
pub struct ExplicitMdpReader {
    cost_type: CostType,
    init_label: String,
    goal_label: String,
}

impl Default for ExplicitMdpReader {
    fn default() -> Self {
        Self::new(CostType::TransitionCost)
    }
}

impl ExplicitMdpReader {
    pub fn new(cost_type: CostType) -> Self {
        Self {
            cost_type,
            init_label: "init".to_string(),
            goal_label: "goal".to_string(),
        }
    }

    pub fn with_labels(mut self, init_label: impl Into<String>, goal_label: impl Into<String>) -> Self {
        self.init_label = init_label.into();
        self.goal_label = goal_label.into();
        self
    }

    /// Parses the tables into an MDP.
    ///
    /// `costs[0]` is the objective, `costs[k]` for `k >= 1` the QA costs.
    /// Transition-cost models read transition-reward tables, accumulated
    /// into expected costs `Σ_j P(j | i, a) · r(i, a, j)`; state-cost models
    /// read state-reward tables.
    pub fn read(&self, transitions: &str, costs: &[&str], labels: &str) -> Result<ExplicitMdp> {
        let parsed = parse_transitions(transitions)?;
        let names: BTreeSet<&str> = parsed.choices.iter().map(|c| c.action.as_str()).collect();
        let mut builder =
            ExplicitMdp::builder(parsed.num_states, names, self.cost_type, costs.len());

        let mut choice_counts: BTreeMap<usize, usize> = BTreeMap::new();
        let mut choice_actions: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        let mut probabilities: BTreeMap<(usize, usize, usize), f64> = BTreeMap::new();
        for choice in &parsed.choices {
            let a = builder.action_index(&choice.action)?;
            let c = choice_counts.entry(choice.src).or_insert(0);
            choice_actions.insert((choice.src, *c), a);
            *c += 1;
            for &(j, p) in &choice.dests {
                builder.set_probability(choice.src, a, j, p)?;
                probabilities.insert((choice.src, a, j), p);
            }
        }

        for (k, table) in costs.iter().enumerate() {
            match self.cost_type {
                CostType::TransitionCost => {
                    let mut expected: BTreeMap<(usize, usize), f64> = BTreeMap::new();
                    for (line, row) in lines(table).skip(1) {
                        let tokens: Vec<&str> = row.split_whitespace().collect();
                        let &[src, choice, dest, reward] = &tokens[..] else {
                            return Err(parse_error(line, "expected 'src choice dest reward'"));
                        };
                        let src: usize = parse_num(src, line, "state")?;
                        let choice: usize = parse_num(choice, line, "choice")?;
                        let dest: usize = parse_num(dest, line, "state")?;
                        let reward: f64 = parse_num(reward, line, "reward")?;
                        let a = *choice_actions
                            .get(&(src, choice))
                            .ok_or_else(|| parse_error(line, format!("unknown choice {choice} of state {src}")))?;
                        let p = *probabilities.get(&(src, a, dest)).ok_or_else(|| {
                            parse_error(line, format!("state {dest} is not a successor of choice {choice} of state {src}"))
                        })?;
                        *expected.entry((src, a)).or_insert(0.0) += p * reward;
                    }
                    for ((i, a), cost) in expected {
                        builder.set_cost(k, i, a, cost)?;
                    }
                }
                CostType::StateCost => {
                    for (line, row) in lines(table).skip(1) {
                        let tokens: Vec<&str> = row.split_whitespace().collect();
                        let &[state, reward] = &tokens[..] else {
                            return Err(parse_error(line, "expected 'state reward'"));
                        };
                        let state: usize = parse_num(state, line, "state")?;
                        builder.set_state_cost(k, state, parse_num(reward, line, "reward")?)?;
                    }
                }
            }
        }

        let (label_ids, labelled) = parse_labels(labels)?;
        let states_with = |label: &str| -> Result<BTreeSet<usize>> {
            let id = label_ids
                .get(label)
                .ok_or_else(|| parse_error(1, format!("missing label '{label}'")))?;
            Ok(labelled.get(id).cloned().unwrap_or_default())
        };
        let initial_states = states_with(&self.init_label)?;
        let (1, Some(&initial)) = (initial_states.len(), initial_states.first()) else {
            return Err(parse_error(
                1,
                format!(
                    "expected exactly one state labelled '{}', found {}",
                    self.init_label,
                    initial_states.len()
                ),
            ));
        };
        builder.set_initial_state(initial)?;
        for goal in states_with(&self.goal_label)? {
            builder.add_goal(goal)?;
        }

        let mdp = builder.build()?;
        debug!(
            event = "explicit_mdp_read",
            states = mdp.num_states(),
            actions = mdp.num_actions(),
            costs = mdp.num_costs(),
        );
        Ok(mdp)
    }

    /// Reads the tables from files; see [`ExplicitMdpReader::read`].
    pub fn read_files(
        &self,
        transitions: impl AsRef<Path>,
        costs: &[impl AsRef<Path>],
        labels: impl AsRef<Path>,
    ) -> Result<ExplicitMdp> {
        let transitions = fs::read_to_string(transitions)?;
        let costs = costs
            .iter()
            .map(fs::read_to_string)
            .collect::<std::io::Result<Vec<_>>>()?;
        let labels = fs::read_to_string(labels)?;
        let costs: Vec<&str> = costs.iter().map(String::as_str).collect();
        self.read(&transitions, &costs, &labels)
    }
}

/// Parses a states table into an index over factored states.
///
/// Column names and values are resolved against `space`.
pub fn read_states(text: &str, space: &StateSpace) -> Result<StateIndex> {
    let mut rows = lines(text);
    let (header_line, header) = rows.next().ok_or_else(|| parse_error(1, "missing header"))?;
    let columns = header
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .map(|name| space.get(name.trim()).cloned())
        .collect::<xplan_core::Result<Vec<_>>>()
        .map_err(|e| parse_error(header_line, e.to_string()))?;

    let mut index = StateIndex::new();
    for (line, row) in rows {
        let (i, values) = row
            .split_once(':')
            .ok_or_else(|| parse_error(line, "expected 'index:(values)'"))?;
        let i: usize = parse_num(i.trim(), line, "state")?;
        let values: Vec<&str> = values
            .trim()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .split(',')
            .map(str::trim)
            .collect();
        if values.len() != columns.len() {
            return Err(parse_error(
                line,
                format!("expected {} values, found {}", columns.len(), values.len()),
            ));
        }
        let mut state = StateVarTuple::new();
        for (var, text) in columns.iter().zip(values) {
            state.insert(var, var.parse_value(text)?)?;
        }
        index.insert_at(i, state);
    }
    Ok(index)
}
