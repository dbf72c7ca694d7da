//! Tests for planner configuration.

use xplan_core::objective::ConstraintKind;

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        cost_criterion = "average_cost"

        [solver]
        feasibility_tolerance = 1e-7
        node_limit = 200
        verify_solution = false

        [explicit]
        init_label = "start"

        [[constraints]]
        type = "hard"
        qfunction = "collision"
        bound_type = "strict_upper"
        bound = 0.3

        [[constraints]]
        type = "soft"
        qfunction = "travel_time"
        bound_type = "upper"
        soft_bound = 3.0
        hard_bound = 5.0
        [constraints.penalty]
        type = "exponential"
        scaling = 1.5
        rate = 0.5
        samples = 4
    "#;

    let config = PlannerConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.cost_criterion, CostCriterion::AverageCost);
    assert_eq!(config.solver.feasibility_tolerance, 1e-7);
    assert_eq!(config.solver.node_limit, Some(200));
    assert!(!config.solver.verify_solution);
    // unset fields keep their defaults
    assert_eq!(config.solver.integrality_tolerance, 1e-6);
    assert_eq!(config.explicit.init_label, "start");
    assert_eq!(config.explicit.goal_label, "goal");

    assert_eq!(
        config.constraints[0],
        ConstraintConfig::Hard {
            qfunction: "collision".to_string(),
            bound_type: BoundType::StrictUpper,
            bound: 0.3,
        }
    );
    assert_eq!(
        config.constraints[1],
        ConstraintConfig::Soft {
            qfunction: "travel_time".to_string(),
            bound_type: BoundType::Upper,
            soft_bound: 3.0,
            hard_bound: 5.0,
            penalty: PenaltyFunction::exponential(1.5, 0.5, 4),
        }
    );
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        cost_criterion: total_cost
        solver:
          node_limit: 50
        constraints:
          - type: hard
            qfunction: time
            bound_type: lower
            bound: 2.0
          - type: soft
            qfunction: collision
            bound_type: upper
            soft_bound: 0.1
            hard_bound: 0.5
            penalty:
              type: linear
              scaling: 10.0
    "#;

    let config = PlannerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.cost_criterion, CostCriterion::TotalCost);
    assert_eq!(config.solver.node_limit, Some(50));
    assert_eq!(config.constraints.len(), 2);
    assert_eq!(config.constraints[0].qfunction(), "time");
    assert_eq!(config.constraints[1].qfunction(), "collision");
}

#[test]
fn test_empty_config_is_default() {
    let config = PlannerConfig::from_toml_str("").unwrap();
    assert_eq!(config.cost_criterion, CostCriterion::TotalCost);
    assert_eq!(config.solver, SolverConfig::default());
    assert_eq!(config.explicit, ExplicitConfig::default());
    assert!(config.constraints.is_empty());
    config.validate().unwrap();
}

#[test]
fn test_builder() {
    let config = PlannerConfig::new()
        .with_cost_criterion(CostCriterion::AverageCost)
        .with_node_limit(None)
        .with_labels("s0", "done")
        .with_constraint(ConstraintConfig::Hard {
            qfunction: "time".to_string(),
            bound_type: BoundType::Upper,
            bound: 2.0,
        });

    assert_eq!(config.cost_criterion, CostCriterion::AverageCost);
    assert_eq!(config.solver.node_limit, None);
    assert_eq!(config.explicit.init_label, "s0");
    assert_eq!(config.explicit.goal_label, "done");
    assert_eq!(config.constraints.len(), 1);
}

#[test]
fn test_attribute_constraints() {
    let config = PlannerConfig::new()
        .with_constraint(ConstraintConfig::Hard {
            qfunction: "time".to_string(),
            bound_type: BoundType::Upper,
            bound: 2.0,
        })
        .with_constraint(ConstraintConfig::Soft {
            qfunction: "collision".to_string(),
            bound_type: BoundType::Upper,
            soft_bound: 0.1,
            hard_bound: 0.5,
            penalty: PenaltyFunction::quadratic(10.0, 5),
        });

    let constraints = config.attribute_constraints().unwrap();
    assert_eq!(constraints[0], AttributeConstraint::hard("time", BoundType::Upper, 2.0));
    assert!(constraints[1].is_soft());
    match constraints[1].kind() {
        ConstraintKind::Soft {
            soft_bound,
            hard_bound,
            penalty,
        } => {
            assert_eq!(*soft_bound, 0.1);
            assert_eq!(*hard_bound, 0.5);
            assert_eq!(*penalty, PenaltyFunction::quadratic(10.0, 5));
        }
        other => panic!("expected a soft constraint, got {other:?}"),
    }
}

#[test]
fn test_misordered_soft_bounds_are_invalid() {
    let config = PlannerConfig::new().with_constraint(ConstraintConfig::Soft {
        qfunction: "collision".to_string(),
        bound_type: BoundType::Upper,
        soft_bound: 0.5,
        hard_bound: 0.1,
        penalty: PenaltyFunction::linear(1.0),
    });

    let err = config.validate().unwrap_err();
    match err {
        ConfigError::Invalid(message) => assert!(message.contains("collision")),
        other => panic!("expected invalid configuration, got {other:?}"),
    }
}

#[test]
fn test_non_finite_hard_bound_is_invalid() {
    let constraint = ConstraintConfig::Hard {
        qfunction: "time".to_string(),
        bound_type: BoundType::Upper,
        bound: f64::INFINITY,
    };
    assert!(matches!(
        constraint.to_attribute_constraint(),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_invalid_solver_settings() {
    let negative = PlannerConfig::new().with_solver(SolverConfig {
        feasibility_tolerance: -1.0,
        ..SolverConfig::default()
    });
    assert!(matches!(negative.validate(), Err(ConfigError::Invalid(_))));

    let coarse = PlannerConfig::new().with_solver(SolverConfig {
        integrality_tolerance: 0.5,
        ..SolverConfig::default()
    });
    assert!(matches!(coarse.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_unknown_constraint_type() {
    let toml = r#"
        [[constraints]]
        type = "chance"
        qfunction = "time"
    "#;
    assert!(matches!(
        PlannerConfig::from_toml_str(toml),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn test_missing_file() {
    let err = PlannerConfig::load("/nonexistent/planner.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
