//! Tests for the dense explicit MDP.

use super::error::ExplicitError;
use super::mdp::*;

fn two_state() -> ExplicitMdpBuilder {
    ExplicitMdp::builder(2, ["stay", "Go", "apply"], CostType::TransitionCost, 2)
}

#[test]
fn test_actions_sorted_case_insensitively() {
    let mdp = two_state().build().unwrap();
    assert_eq!(mdp.action_names(), ["apply", "Go", "stay"]);
    assert_eq!(mdp.action_index("Go").unwrap(), 1);
    assert!(matches!(mdp.action_index("go"), Err(ExplicitError::UnknownAction(_))));
}

#[test]
fn test_rows_must_be_distributions() {
    let mut builder = two_state();
    builder.set_transition_probability(0, "Go", 1, 0.6).unwrap();
    builder.set_transition_probability(0, "Go", 0, 0.3).unwrap();
    let err = builder.build().unwrap_err();
    assert!(matches!(err, ExplicitError::RowSum { state: 0, .. }));
}

#[test]
fn test_empty_rows_are_inapplicable() {
    let mut builder = two_state();
    builder.set_transition_probability(0, "Go", 1, 1.0).unwrap();
    builder.set_transition_probability(1, "stay", 1, 1.0).unwrap();
    let mdp = builder.build().unwrap();

    let go = mdp.action_index("Go").unwrap();
    let stay = mdp.action_index("stay").unwrap();
    assert!(mdp.is_action_applicable(0, go));
    assert!(!mdp.is_action_applicable(0, stay));
    assert!(mdp.is_action_applicable(1, stay));
    assert_eq!(mdp.successors(0, go).collect::<Vec<_>>(), vec![(1, 1.0)]);
    assert_eq!(mdp.transition_probability(5, go, 0), 0.0);
}

#[test]
fn test_index_checks() {
    let mut builder = two_state();
    assert!(matches!(
        builder.set_probability(2, 0, 0, 1.0),
        Err(ExplicitError::StateOutOfRange { index: 2, num_states: 2 })
    ));
    assert!(matches!(
        builder.set_probability(0, 3, 0, 1.0),
        Err(ExplicitError::ActionOutOfRange { index: 3, num_actions: 3 })
    ));
    assert!(matches!(
        builder.set_cost(2, 0, 0, 1.0),
        Err(ExplicitError::CostIndexOutOfRange { index: 2, num_costs: 2 })
    ));
}

#[test]
fn test_transition_and_state_costs() {
    let mut builder = two_state();
    builder.set_transition_cost(1, 0, "Go", 4.0).unwrap();
    assert!(matches!(
        builder.set_state_cost(0, 0, 1.0),
        Err(ExplicitError::CostTypeMismatch { .. })
    ));
    let mdp = builder.build().unwrap();
    let go = mdp.action_index("Go").unwrap();
    assert_eq!(mdp.transition_cost(1, 0, go).unwrap(), 4.0);
    assert_eq!(mdp.step_cost(1, 0, go).unwrap(), 4.0);
    assert_eq!(mdp.transition_cost(0, 0, go).unwrap(), 0.0);
    assert!(mdp.state_cost(0, 0).is_err());

    let mut builder = ExplicitMdp::builder(2, ["go"], CostType::StateCost, 1);
    builder.set_state_cost(0, 1, 3.0).unwrap();
    let mdp = builder.build().unwrap();
    assert_eq!(mdp.state_cost(0, 1).unwrap(), 3.0);
    assert_eq!(mdp.step_cost(0, 1, 0).unwrap(), 3.0);
    assert!(mdp.transition_cost(0, 1, 0).is_err());
}

#[test]
fn test_initial_state_and_goals() {
    let mut builder = two_state();
    builder.set_initial_state(1).unwrap();
    builder.add_goal(0).unwrap();
    assert!(builder.add_goal(7).is_err());
    let mdp = builder.build().unwrap();
    assert_eq!(mdp.initial_state(), 1);
    assert!(mdp.is_goal(0));
    assert!(!mdp.is_goal(1));
}

#[test]
fn test_at_least_one_cost_function() {
    let mdp = ExplicitMdp::builder(1, ["a"], CostType::TransitionCost, 0)
        .build()
        .unwrap();
    assert_eq!(mdp.num_costs(), 1);
    assert_eq!(mdp.cost_type(), CostType::TransitionCost);
}
