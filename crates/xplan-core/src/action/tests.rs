//! Tests for actions and action spaces.

use super::*;

#[test]
fn test_action_identity_ignores_attributes() {
    let a = Action::new("fly").with_attribute("energy", 2.0);
    let b = Action::new("fly");
    assert_eq!(a, b);
    assert_eq!(a.attribute("energy").unwrap(), 2.0);
}

#[test]
fn test_definition_check_action() {
    let def = ActionDefinition::new("move", [Action::new("moveL1"), Action::new("moveL2")]);
    assert!(def.check_action(&Action::new("moveL1")).is_ok());
    let err = def.check_action(&Action::new("charge")).unwrap_err();
    assert!(matches!(err, ModelError::IncompatibleAction { .. }));
}

#[test]
fn test_action_space_lookup() {
    let space = ActionSpace::new([
        ActionDefinition::new("move", [Action::new("moveL1")]),
        ActionDefinition::new("charge", [Action::new("charge")]),
    ]);
    assert_eq!(space.definition_of(&Action::new("charge")).unwrap().name(), "charge");
    assert_eq!(
        space.action("teleport").unwrap_err(),
        ModelError::ActionNotFound("teleport".to_string())
    );
}

#[test]
fn test_sorted_actions_case_insensitive() {
    let space = ActionSpace::new([
        ActionDefinition::new("t1", [Action::new("b"), Action::new("C")]),
        ActionDefinition::new("t2", [Action::new("a"), Action::new("B")]),
    ]);
    let names: Vec<&str> = space.sorted_actions().iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["a", "B", "b", "C"]);
}
