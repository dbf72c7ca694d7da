use xplan_core::objective::{AttributeConstraint, BoundType, PenaltyFunction};
use xplan_core::ModelError;

use super::constraint::*;
use super::error::SolverError;
use super::lp::{LpBackend, LpModel, MinilpBackend, Sense};
use super::occupation::{add_delta_constraints, OccupationVars};
use super::ssp::{add_flow_constraints, SspSolver};
use super::test_utils::*;

fn solve_fork(fast_risk: f64, constraint: CostConstraint) -> (Option<usize>, f64) {
    let mdp = fork_mdp(fast_risk);
    let solution = SspSolver::default()
        .solve(&mdp, &[constraint])
        .unwrap()
        .into_solution()
        .unwrap();
    (solution.choice(0), solution.objective())
}

#[test]
fn test_linear_soft_constraint_pays_penalty() {
    let cheap = CostConstraint::soft(1, BoundType::Upper, 0.0, 1.0, PenaltyFunction::linear(1.0)).unwrap();
    let (choice, objective) = solve_fork(1.0, cheap);
    assert_eq!(choice, Some(0));
    assert_close(objective, 2.0);
}

#[test]
fn test_linear_soft_constraint_avoids_penalty() {
    let steep = CostConstraint::soft(1, BoundType::Upper, 0.0, 1.0, PenaltyFunction::linear(5.0)).unwrap();
    let (choice, objective) = solve_fork(1.0, steep);
    assert_eq!(choice, Some(1));
    assert_close(objective, 3.0);
}

#[test]
fn test_soft_constraint_hard_bound_is_hard() {
    // fast has risk 1.5 > hard bound 1
    let constraint = CostConstraint::soft(1, BoundType::Upper, 0.0, 1.0, PenaltyFunction::linear(0.0)).unwrap();
    let (choice, objective) = solve_fork(1.5, constraint);
    assert_eq!(choice, Some(1));
    assert_close(objective, 3.0);
}

#[test]
fn test_two_sample_penalty_matches_linear() {
    let linear = CostConstraint::soft(1, BoundType::Upper, 0.0, 1.0, PenaltyFunction::linear(2.0)).unwrap();
    let quadratic =
        CostConstraint::soft(1, BoundType::Upper, 0.0, 1.0, PenaltyFunction::quadratic(2.0, 2)).unwrap();

    let (linear_choice, linear_objective) = solve_fork(0.5, linear);
    let (pwl_choice, pwl_objective) = solve_fork(0.5, quadratic);
    assert_eq!(linear_choice, Some(0));
    assert_eq!(pwl_choice, linear_choice);
    assert_close(linear_objective, 2.0);
    assert_close(pwl_objective, linear_objective);
}

#[test]
fn test_quadratic_penalty_at_sample() {
    // samples 0, 0.5, 1, 1.5, 2; v = 0.5 costs 2 * 0.25
    let quadratic =
        CostConstraint::soft(1, BoundType::Upper, 0.0, 2.0, PenaltyFunction::quadratic(2.0, 5)).unwrap();
    let (choice, objective) = solve_fork(0.5, quadratic);
    assert_eq!(choice, Some(0));
    assert_close(objective, 1.5);
}

#[test]
fn test_piecewise_encoding_reconstructs_violation() {
    let mdp = fork_mdp(0.75);
    let mut model = LpModel::new(Sense::Minimize);
    let x = OccupationVars::add(&mut model, &mdp, "x", |i| !mdp.is_goal(i));
    x.add_cost_objective(&mut model, &mdp, 0).unwrap();
    add_flow_constraints(&mut model, &mdp, &x);
    add_delta_constraints(&mut model, &x, 1.0);
    let soft = add_cost_constraints(
        &mut model,
        &mdp,
        &x,
        &[CostConstraint::soft(1, BoundType::Upper, 0.0, 1.0, PenaltyFunction::quadratic(1.0, 3)).unwrap()],
        1e-4,
    )
    .unwrap();

    assert_eq!(soft.len(), 1);
    let (alphas, selectors) = soft[0].segments.clone().unwrap();
    assert_eq!(alphas.len(), 3);
    assert_eq!(selectors.len(), 2);
    assert!(model.constraint("cost1_soft").is_some());
    assert!(model.constraint("cost1_segment_sum").is_some());
    assert!(model.constraint("cost1_alpha_sum").is_some());

    let solution = MinilpBackend::default().solve(&model).unwrap().into_solution().unwrap();
    let v = solution[soft[0].violation];
    assert_close(v, 0.75);

    let samples = penalty_samples(1.0, 3);
    let reconstructed: f64 = alphas.iter().zip(&samples).map(|(&a, s)| solution[a] * s).sum();
    assert_close(reconstructed, v);

    // only the selected segment's end points carry weight
    let selected: Vec<usize> = selectors
        .iter()
        .enumerate()
        .filter(|(_, &h)| solution[h] > 0.5)
        .map(|(j, _)| j)
        .collect();
    assert_eq!(selected, vec![1]);
    assert_close(solution[alphas[0]], 0.0);
    assert_close(solution[alphas[1]] + solution[alphas[2]], 1.0);
    // 0.5 * 0.25 + 0.5 * 1
    assert_close(solution.objective(), 1.0 + 0.625);
}

#[test]
fn test_lower_soft_constraint() {
    let mdp = retry_mdp();
    let mut solver = SspSolver::default();

    let mild = CostConstraint::soft(1, BoundType::Lower, 1.0, 0.0, PenaltyFunction::linear(1.0)).unwrap();
    let solution = solver.solve(&mdp, &[mild]).unwrap().into_solution().unwrap();
    assert_eq!(solution.choice(0), mdp.action_index("try").ok());
    assert_close(solution.objective(), 3.0);

    let strong = CostConstraint::soft(1, BoundType::Lower, 1.0, 0.0, PenaltyFunction::linear(3.0)).unwrap();
    let solution = solver.solve(&mdp, &[strong]).unwrap().into_solution().unwrap();
    assert_eq!(solution.choice(0), mdp.action_index("give_up").ok());
    assert_close(solution.objective(), 4.0);
}

#[test]
fn test_penalty_samples() {
    assert_eq!(penalty_samples(1.0, 2), vec![0.0, 1.0]);
    assert_eq!(penalty_samples(2.0, 5), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    assert_eq!(penalty_samples(0.0, 3), vec![0.0, 0.0, 0.0]);
}

#[test]
fn test_soft_constraint_validation() {
    let err = CostConstraint::soft(1, BoundType::Upper, 1.0, 0.5, PenaltyFunction::linear(1.0)).unwrap_err();
    assert!(matches!(err, SolverError::Model(ModelError::InvalidBound(_))));

    let err = CostConstraint::soft(1, BoundType::Upper, 0.0, 1.0, PenaltyFunction::quadratic(1.0, 1)).unwrap_err();
    assert!(matches!(err, SolverError::Model(ModelError::InvalidPenalty(_))));
}

#[test]
fn test_hard_limit() {
    let hard = CostConstraint::hard(1, BoundType::StrictLower, 2.0);
    let (relation, bound) = hard.hard_limit(0.1);
    assert_eq!(relation, super::lp::Relation::Ge);
    assert_close(bound, 2.1);

    let soft = CostConstraint::soft(1, BoundType::Upper, 0.1, 0.5, PenaltyFunction::linear(1.0)).unwrap();
    assert_eq!(soft.hard_limit(0.1), (super::lp::Relation::Le, 0.5));
}

#[test]
fn test_from_attribute_resolves_qfunction() {
    let robot = xplan_test::robot_model();
    let collision = AttributeConstraint::hard("collision", BoundType::Upper, 0.3);
    let constraint = CostConstraint::from_attribute(&collision, &robot.xmdp).unwrap();
    assert_eq!(constraint.cost_index(), 2);
    assert_eq!(constraint.bound_type(), BoundType::Upper);
    assert!(!constraint.is_soft());

    let unknown = AttributeConstraint::hard("fuel", BoundType::Upper, 1.0);
    let err = CostConstraint::from_attribute(&unknown, &robot.xmdp).unwrap_err();
    assert!(matches!(err, SolverError::Model(ModelError::QFunctionNotFound(_))));
}
