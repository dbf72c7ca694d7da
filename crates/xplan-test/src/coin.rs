//! A single fair coin flip, described by formula.

use xplan_core::factor::{Discriminant, DiscriminantClass, Effect, EffectClass, Precondition, ProbabilisticEffect};
use xplan_core::{
    Action, ActionDefinition, ActionDescription, ActionSpace, FactoredPso, Result, StatePredicate,
    StateSpace, StateVarDefinition, StateVarTuple, TransitionFunction, Xmdp,
};

/// `coin` starts at `none`; `flip` lands `heads` or `tails` with equal probability.
#[derive(Debug, Clone)]
pub struct CoinModel {
    pub coin: StateVarDefinition,
    pub flip: Action,
    pub xmdp: Xmdp,
}

/// The effect of one fair flip on `coin`.
pub fn fair_flip(coin: &StateVarDefinition) -> Result<ProbabilisticEffect> {
    let eclass = EffectClass::new([coin.clone()]);
    ProbabilisticEffect::builder(eclass.clone())
        .with(Effect::new(eclass.clone()).with(coin, "heads")?, 0.5)?
        .with(Effect::new(eclass).with(coin, "tails")?, 0.5)?
        .build()
}

fn build() -> Result<CoinModel> {
    let coin = StateVarDefinition::new("coin", ["none", "heads", "tails"]);
    let flip = Action::new("flip");
    let definition = ActionDefinition::new("flip", [flip.clone()]);

    let formula_coin = coin.clone();
    let description = ActionDescription::formula(
        definition.clone(),
        DiscriminantClass::default(),
        EffectClass::new([coin.clone()]),
        move |_: &Discriminant, _: &Action| fair_flip(&formula_coin),
    );
    let precondition = Precondition::builder(definition.clone())
        .allow(&flip, &coin, ["none"])?
        .build();
    let pso = FactoredPso::builder(precondition)
        .with_description(description)?
        .build()?;

    let xmdp = Xmdp::builder()
        .with_state_space(StateSpace::new([coin.clone()]))
        .with_action_space(ActionSpace::new([definition]))
        .with_initial_state(StateVarTuple::new().with(&coin, "none")?)
        .with_goal(StatePredicate::any_of([
            StateVarTuple::new().with(&coin, "heads")?,
            StateVarTuple::new().with(&coin, "tails")?,
        ]))
        .with_transitions(TransitionFunction::builder().with_pso(pso)?.build())
        .build()?;

    Ok(CoinModel { coin, flip, xmdp })
}

/// Builds the coin-flip model.
pub fn coin_model() -> CoinModel {
    build().expect("coin fixture is well-formed")
}
