//! Tests for operator, transition-function and model assembly.

use std::sync::Arc;

use crate::action::{Action, ActionDefinition, ActionSpace};
use crate::description::ActionDescription;
use crate::error::ModelError;
use crate::factor::{Discriminant, DiscriminantClass, Effect, EffectClass, Precondition, ProbabilisticEffect};
use crate::objective::AttributeQFunction;
use crate::pso::FactoredPso;
use crate::state::{StatePredicate, StateSpace, StateVarDefinition, StateVarTuple};
use crate::transition::TransitionFunction;
use crate::xmdp::Xmdp;

struct Robot {
    loc: StateVarDefinition,
    lit: StateVarDefinition,
    go: Action,
    definition: ActionDefinition,
}

fn robot() -> Robot {
    let go = Action::new("go").with_attribute("duration", 2.0);
    Robot {
        loc: StateVarDefinition::new("loc", ["a", "b"]),
        lit: StateVarDefinition::boolean("lit"),
        definition: ActionDefinition::new("go", [go.clone()]),
        go,
    }
}

fn move_description(r: &Robot) -> ActionDescription {
    let dclass = DiscriminantClass::new([r.loc.clone()]);
    let eclass = EffectClass::new([r.loc.clone()]);
    let mut builder = ActionDescription::tabular(r.definition.clone(), dclass.clone(), eclass.clone());
    for (from, to) in [("a", "b"), ("b", "a")] {
        let d = Discriminant::new(dclass.clone()).with(&r.loc, from).unwrap();
        let e = Effect::new(eclass.clone()).with(&r.loc, to).unwrap();
        builder = builder
            .put(&r.go, d, ProbabilisticEffect::deterministic(e).unwrap())
            .unwrap();
    }
    builder.build()
}

fn light_description(r: &Robot) -> ActionDescription {
    let eclass = EffectClass::new([r.lit.clone()]);
    let flicker = ProbabilisticEffect::builder(eclass.clone())
        .with(Effect::new(eclass.clone()).with(&r.lit, true).unwrap(), 0.25)
        .unwrap()
        .with(Effect::new(eclass.clone()).with(&r.lit, false).unwrap(), 0.75)
        .unwrap()
        .build()
        .unwrap();
    ActionDescription::tabular(r.definition.clone(), DiscriminantClass::default(), eclass)
        .put_all(Discriminant::new(DiscriminantClass::default()), flicker)
        .unwrap()
        .build()
}

fn pso(r: &Robot) -> FactoredPso {
    FactoredPso::builder(Precondition::unrestricted(r.definition.clone()))
        .with_description(move_description(r))
        .unwrap()
        .with_description(light_description(r))
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn test_pso_rejects_overlapping_effect_classes() {
    let r = robot();
    let err = FactoredPso::builder(Precondition::unrestricted(r.definition.clone()))
        .with_description(move_description(&r))
        .unwrap()
        .with_description(move_description(&r))
        .unwrap_err();
    assert!(matches!(err, ModelError::OverlappingEffectClasses { .. }));
}

#[test]
fn test_pso_rejects_partial_table() {
    let r = robot();
    let dclass = DiscriminantClass::new([r.loc.clone()]);
    let eclass = EffectClass::new([r.loc.clone()]);
    let d = Discriminant::new(dclass.clone()).with(&r.loc, "a").unwrap();
    let e = Effect::new(eclass.clone()).with(&r.loc, "b").unwrap();
    let partial = ActionDescription::tabular(r.definition.clone(), dclass, eclass)
        .put(&r.go, d, ProbabilisticEffect::deterministic(e).unwrap())
        .unwrap()
        .build();

    let err = FactoredPso::builder(Precondition::unrestricted(r.definition.clone()))
        .with_description(partial)
        .unwrap()
        .build()
        .unwrap_err();
    assert!(matches!(err, ModelError::DiscriminantNotFound(_)));
}

#[test]
fn test_pso_outcomes_are_product_of_effect_classes() {
    let r = robot();
    let pso = pso(&r);
    let state = StateVarTuple::new()
        .with(&r.loc, "a")
        .unwrap()
        .with(&r.lit, false)
        .unwrap();

    let outcomes = pso.outcomes(&r.go, &state).unwrap();
    assert_eq!(outcomes.len(), 2);
    let total: f64 = outcomes.iter().map(|(_, p)| p).sum();
    assert!((total - 1.0).abs() < 1e-9);
    for (next, _) in &outcomes {
        assert_eq!(next.get(&r.loc).unwrap().to_string(), "b");
    }

    assert_eq!(pso.affected_vars().len(), 2);
    assert_eq!(pso.discriminant_class(&r.lit).unwrap(), &DiscriminantClass::default());
    let other = StateVarDefinition::boolean("other");
    assert!(matches!(
        pso.effect_class_of(&other),
        Err(ModelError::EffectClassNotFound(_))
    ));
}

#[test]
fn test_transition_function_lookup() {
    let r = robot();
    let tf = TransitionFunction::builder().with_pso(pso(&r)).unwrap().build();
    assert_eq!(tf.pso_for(&r.go).unwrap().definition().name(), "go");
    assert!(matches!(
        tf.pso_for(&Action::new("fly")),
        Err(ModelError::ActionDefinitionNotFound(_))
    ));

    let err = TransitionFunction::builder()
        .with_pso(pso(&r))
        .unwrap()
        .with_pso(pso(&r))
        .unwrap_err();
    assert_eq!(err, ModelError::DuplicateActionDefinition("go".to_string()));
}

fn initial(r: &Robot) -> StateVarTuple {
    StateVarTuple::new()
        .with(&r.loc, "a")
        .unwrap()
        .with(&r.lit, false)
        .unwrap()
}

#[test]
fn test_xmdp_build() {
    let r = robot();
    let goal = StatePredicate::all_of(StateVarTuple::new().with(&r.loc, "b").unwrap());
    let xmdp = Xmdp::builder()
        .with_state_space(StateSpace::new([r.loc.clone(), r.lit.clone()]))
        .with_action_space(ActionSpace::new([r.definition.clone()]))
        .with_initial_state(initial(&r))
        .with_goal(goal)
        .with_transitions(TransitionFunction::builder().with_pso(pso(&r)).unwrap().build())
        .with_qfunction(Arc::new(AttributeQFunction::new("time", "duration")))
        .build()
        .unwrap();

    assert_eq!(xmdp.qfunction_index("time").unwrap(), 0);
    assert!(matches!(
        xmdp.qfunction_index("energy"),
        Err(ModelError::QFunctionNotFound(_))
    ));
    assert_eq!(xmdp.cost_function().name(), "cost");
}

#[test]
fn test_xmdp_rejects_unknown_var() {
    let r = robot();
    let err = Xmdp::builder()
        .with_state_space(StateSpace::new([r.loc.clone()]))
        .with_action_space(ActionSpace::new([r.definition.clone()]))
        .with_initial_state(StateVarTuple::new().with(&r.loc, "a").unwrap())
        .with_transitions(TransitionFunction::builder().with_pso(pso(&r)).unwrap().build())
        .build()
        .unwrap_err();
    assert_eq!(err, ModelError::VarNotFound("lit".to_string()));
}

#[test]
fn test_xmdp_rejects_action_type_without_pso() {
    let r = robot();
    let fly = ActionDefinition::new("fly", [Action::new("fly")]);
    let err = Xmdp::builder()
        .with_state_space(StateSpace::new([r.loc.clone(), r.lit.clone()]))
        .with_action_space(ActionSpace::new([r.definition.clone(), fly]))
        .with_initial_state(initial(&r))
        .with_transitions(TransitionFunction::builder().with_pso(pso(&r)).unwrap().build())
        .build()
        .unwrap_err();
    assert_eq!(err, ModelError::ActionDefinitionNotFound("fly".to_string()));
}
