//! Model assembly: the explainable MDP handed to flattening.

use std::sync::Arc;

use crate::action::ActionSpace;
use crate::error::{ModelError, Result};
use crate::objective::{CostFunction, QFunction};
use crate::state::{StatePredicate, StateSpace, StateVarTuple};
use crate::transition::TransitionFunction;

/// A factored MDP with its objective cost function and QA functions.
///
/// Built with [`XmdpBuilder`], which checks that every variable and action
/// referenced by the transition function resolves against the state and
/// action spaces.
#[derive(Debug, Clone)]
pub struct Xmdp {
    state_space: StateSpace,
    action_space: ActionSpace,
    initial_state: StateVarTuple,
    goal: StatePredicate,
    transitions: TransitionFunction,
    cost_function: CostFunction,
    qfunctions: Vec<Arc<dyn QFunction>>,
}

impl Xmdp {
    pub fn builder() -> XmdpBuilder {
        XmdpBuilder::default()
    }

    pub fn state_space(&self) -> &StateSpace {
        &self.state_space
    }

    pub fn action_space(&self) -> &ActionSpace {
        &self.action_space
    }

    pub fn initial_state(&self) -> &StateVarTuple {
        &self.initial_state
    }

    pub fn goal(&self) -> &StatePredicate {
        &self.goal
    }

    pub fn transitions(&self) -> &TransitionFunction {
        &self.transitions
    }

    pub fn cost_function(&self) -> &CostFunction {
        &self.cost_function
    }

    /// QA functions in registration order.
    pub fn qfunctions(&self) -> &[Arc<dyn QFunction>] {
        &self.qfunctions
    }

    /// Position of the named QA function among [`qfunctions`](Self::qfunctions).
    pub fn qfunction_index(&self, name: &str) -> Result<usize> {
        self.qfunctions
            .iter()
            .position(|q| q.name() == name)
            .ok_or_else(|| ModelError::QFunctionNotFound(name.to_string()))
    }

    /// Returns a copy of the model with a different objective cost function.
    pub fn with_cost_function(&self, cost_function: CostFunction) -> Xmdp {
        Xmdp {
            cost_function,
            ..self.clone()
        }
    }
}

#[derive(Debug, Default)]
pub struct XmdpBuilder {
    state_space: StateSpace,
    action_space: ActionSpace,
    initial_state: Option<StateVarTuple>,
    goal: StatePredicate,
    transitions: TransitionFunction,
    cost_function: Option<CostFunction>,
    qfunctions: Vec<Arc<dyn QFunction>>,
}

impl XmdpBuilder {
    pub fn with_state_space(mut self, state_space: StateSpace) -> Self {
        self.state_space = state_space;
        self
    }

    pub fn with_action_space(mut self, action_space: ActionSpace) -> Self {
        self.action_space = action_space;
        self
    }

    pub fn with_initial_state(mut self, state: StateVarTuple) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn with_goal(mut self, goal: StatePredicate) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_transitions(mut self, transitions: TransitionFunction) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn with_cost_function(mut self, cost_function: CostFunction) -> Self {
        self.cost_function = Some(cost_function);
        self
    }

    pub fn with_qfunction(mut self, qfunction: Arc<dyn QFunction>) -> Self {
        self.qfunctions.push(qfunction);
        self
    }

    /// Validates references and freezes the model.
    ///
    /// # Errors
    ///
    /// - `IncompleteState` / `VarNotFound` if the initial state does not match the state space
    /// - `VarNotFound` if a goal, precondition, discriminant or effect variable is not in the state space
    /// - `ActionDefinitionNotFound` if an action type lacks a PSO or a PSO's type is not in the action space
    pub fn build(self) -> Result<Xmdp> {
        let initial_state = self
            .initial_state
            .ok_or_else(|| ModelError::IncompleteState("initial state".to_string()))?;
        self.state_space.check_complete(&initial_state)?;

        for alternative in self.goal.alternatives() {
            for var in alternative.vars() {
                self.state_space.check_var(var)?;
            }
        }

        for definition in self.action_space.definitions() {
            let pso = self.transitions.pso(definition.name())?;
            if pso.definition() != definition {
                return Err(ModelError::ActionDefinitionNotFound(definition.name().to_string()));
            }
        }
        for pso in &self.transitions {
            if !self.action_space.definitions().contains(pso.definition()) {
                return Err(ModelError::ActionDefinitionNotFound(
                    pso.definition().name().to_string(),
                ));
            }
            for description in pso.descriptions() {
                for var in description
                    .effect_class()
                    .iter()
                    .chain(description.discriminant_class().iter())
                {
                    self.state_space.check_var(var)?;
                }
            }
            for action in pso.definition().actions() {
                for var in pso.precondition().restricted_vars(action)? {
                    self.state_space.check_var(var)?;
                }
            }
        }

        let cost_function = self
            .cost_function
            .unwrap_or_else(|| CostFunction::new("cost").with_step_cost(1.0));

        Ok(Xmdp {
            state_space: self.state_space,
            action_space: self.action_space,
            initial_state,
            goal: self.goal,
            transitions: self.transitions,
            cost_function,
            qfunctions: self.qfunctions,
        })
    }
}
