//! Three-state deterministic chain.
//!
//! `pos` ranges over `s0`, `s1`, `goal`. Action `a` (type `stepA`) moves
//! `s0` to `s1`, action `b` (type `stepB`) moves `s1` to `goal`. Every step
//! costs 1 and takes one unit of the `time` QA.

use std::sync::Arc;

use xplan_core::factor::{Discriminant, DiscriminantClass, Effect, EffectClass, Precondition, ProbabilisticEffect};
use xplan_core::objective::AttributeQFunction;
use xplan_core::{
    Action, ActionDefinition, ActionDescription, ActionSpace, FactoredPso, Result, StatePredicate,
    StateSpace, StateVarDefinition, StateVarTuple, TransitionFunction, Xmdp,
};

/// The chain model and handles on its parts.
#[derive(Debug, Clone)]
pub struct ChainModel {
    pub pos: StateVarDefinition,
    pub a: Action,
    pub b: Action,
    pub xmdp: Xmdp,
}

impl ChainModel {
    /// The state with `pos` set to `value`.
    pub fn state(&self, value: &str) -> StateVarTuple {
        StateVarTuple::new()
            .with(&self.pos, value)
            .expect("chain positions are in the domain")
    }
}

fn step(
    pos: &StateVarDefinition,
    name: &str,
    action: &Action,
    from: &str,
    to: &str,
) -> Result<FactoredPso> {
    let definition = ActionDefinition::new(name, [action.clone()]);
    let dclass = DiscriminantClass::new([pos.clone()]);
    let eclass = EffectClass::new([pos.clone()]);
    let precondition = Precondition::builder(definition.clone())
        .allow(action, pos, [from])?
        .build();
    let description = ActionDescription::tabular(definition, dclass.clone(), eclass.clone())
        .put(
            action,
            Discriminant::new(dclass).with(pos, from)?,
            ProbabilisticEffect::deterministic(Effect::new(eclass).with(pos, to)?)?,
        )?
        .build();
    FactoredPso::builder(precondition)
        .with_description(description)?
        .build()
}

fn build() -> Result<ChainModel> {
    let pos = StateVarDefinition::new("pos", ["s0", "s1", "goal"]);
    let a = Action::new("a").with_attribute("duration", 1.0);
    let b = Action::new("b").with_attribute("duration", 1.0);

    let transitions = TransitionFunction::builder()
        .with_pso(step(&pos, "stepA", &a, "s0", "s1")?)?
        .with_pso(step(&pos, "stepB", &b, "s1", "goal")?)?
        .build();

    let xmdp = Xmdp::builder()
        .with_state_space(StateSpace::new([pos.clone()]))
        .with_action_space(ActionSpace::new([
            ActionDefinition::new("stepA", [a.clone()]),
            ActionDefinition::new("stepB", [b.clone()]),
        ]))
        .with_initial_state(StateVarTuple::new().with(&pos, "s0")?)
        .with_goal(StatePredicate::all_of(StateVarTuple::new().with(&pos, "goal")?))
        .with_transitions(transitions)
        .with_qfunction(Arc::new(AttributeQFunction::new("time", "duration")))
        .build()?;

    Ok(ChainModel { pos, a, b, xmdp })
}

/// Builds the chain model.
pub fn chain_model() -> ChainModel {
    build().expect("chain fixture is well-formed")
}
