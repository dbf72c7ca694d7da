//! End-to-end solves of flattened factored models.

use xplan_core::objective::{AttributeConstraint, BoundType, PenaltyFunction};
use xplan_explicit::flatten;
use xplan_test::{chain_model, coin_model, robot_model};

use super::constraint::CostConstraint;
use super::outcome::SolveOutcome;
use super::ssp::SspSolver;
use super::test_utils::{assert_close, init_tracing};

fn robot_solve(constraints: &[AttributeConstraint]) -> SolveOutcome {
    init_tracing();
    let robot = robot_model();
    let model = flatten(&robot.xmdp).unwrap();
    let constraints: Vec<CostConstraint> = constraints
        .iter()
        .map(|c| CostConstraint::from_attribute(c, &robot.xmdp).unwrap())
        .collect();
    SspSolver::default().solve(model.mdp(), &constraints).unwrap()
}

#[test]
fn test_chain_policy() {
    let chain = chain_model();
    let model = flatten(&chain.xmdp).unwrap();
    let solution = SspSolver::default()
        .solve_unconstrained(model.mdp())
        .unwrap()
        .into_solution()
        .unwrap();

    let policy = model.policy_from_choices(solution.choices());
    assert_eq!(policy.len(), 2);
    assert_eq!(policy.action(&chain.state("s0")), Some(&chain.a));
    assert_eq!(policy.action(&chain.state("s1")), Some(&chain.b));
    assert_eq!(policy.action(&chain.state("goal")), None);
    assert_close(solution.objective(), 2.0);
}

#[test]
fn test_chain_time_bound() {
    let chain = chain_model();
    let model = flatten(&chain.xmdp).unwrap();
    let mut solver = SspSolver::default();

    let met = AttributeConstraint::hard("time", BoundType::Upper, 2.0);
    let met = CostConstraint::from_attribute(&met, &chain.xmdp).unwrap();
    let solution = solver.solve(model.mdp(), &[met]).unwrap().into_solution().unwrap();
    assert_close(solution.cost(1).unwrap(), 2.0);

    let missed = AttributeConstraint::hard("time", BoundType::Upper, 1.0);
    let missed = CostConstraint::from_attribute(&missed, &chain.xmdp).unwrap();
    assert_eq!(solver.solve(model.mdp(), &[missed]).unwrap(), SolveOutcome::NoSolution);
}

#[test]
fn test_coin_flip_policy() {
    let coin = coin_model();
    let model = flatten(&coin.xmdp).unwrap();
    let solution = SspSolver::default()
        .solve_unconstrained(model.mdp())
        .unwrap()
        .into_solution()
        .unwrap();

    let policy = model.policy_from_choices(solution.choices());
    assert_eq!(policy.len(), 1);
    assert_eq!(policy.action(model.states().state(model.mdp().initial_state()).unwrap()), Some(&coin.flip));
}

#[test]
fn test_robot_unconstrained_goes_full_speed() {
    let robot = robot_model();
    let solution = robot_solve(&[]).into_solution().unwrap();

    // travel time, then collisions
    assert_close(solution.objective(), 2.0);
    assert_close(solution.cost(1).unwrap(), 2.0);
    assert_close(solution.cost(2).unwrap(), 0.4);

    let model = flatten(&robot.xmdp).unwrap();
    let policy = model.policy_from_choices(solution.choices());
    assert_eq!(
        policy.action(&robot.state("l1", "half", false)),
        Some(&robot.set_speed_full)
    );
    assert_eq!(
        policy.action(&robot.state("l1", "full", false)),
        Some(&robot.move_to_l2)
    );
}

#[test]
fn test_robot_collision_bound() {
    let robot = robot_model();
    let bound = AttributeConstraint::hard("collision", BoundType::Upper, 0.3);
    let solution = robot_solve(&[bound]).into_solution().unwrap();

    assert_close(solution.objective(), 2.5);
    assert_close(solution.cost(2).unwrap(), 0.2);

    let model = flatten(&robot.xmdp).unwrap();
    let policy = model.policy_from_choices(solution.choices());
    assert_eq!(
        policy.action(&robot.state("l1", "full", false)),
        Some(&robot.move_to_l3)
    );
}

#[test]
fn test_robot_tight_collision_bound() {
    let robot = robot_model();
    let bound = AttributeConstraint::hard("collision", BoundType::Upper, 0.1);
    let solution = robot_solve(&[bound]).into_solution().unwrap();

    assert_close(solution.objective(), 4.0);
    assert_close(solution.cost(2).unwrap(), 0.0);

    let model = flatten(&robot.xmdp).unwrap();
    let policy = model.policy_from_choices(solution.choices());
    assert_eq!(
        policy.action(&robot.state("l1", "half", false)),
        Some(&robot.move_to_l2)
    );
}

#[test]
fn test_robot_impossible_bound() {
    let bound = AttributeConstraint::hard("travel_time", BoundType::Upper, 1.0);
    assert_eq!(robot_solve(&[bound]), SolveOutcome::NoSolution);
}

#[test]
fn test_robot_soft_collision_bound() {
    let steep = AttributeConstraint::soft(
        "collision",
        BoundType::Upper,
        0.1,
        0.5,
        PenaltyFunction::linear(10.0),
    )
    .unwrap();
    let solution = robot_solve(&[steep]).into_solution().unwrap();
    assert_close(solution.objective(), 3.5);
    assert_close(solution.cost(1).unwrap(), 2.5);

    let mild = AttributeConstraint::soft(
        "collision",
        BoundType::Upper,
        0.1,
        0.5,
        PenaltyFunction::linear(1.0),
    )
    .unwrap();
    let solution = robot_solve(&[mild]).into_solution().unwrap();
    assert_close(solution.objective(), 2.3);
    assert_close(solution.cost(1).unwrap(), 2.0);
}

#[test]
fn test_robot_policy_is_deterministic() {
    let robot = robot_model();
    let bound = AttributeConstraint::hard("collision", BoundType::Upper, 0.3);
    let solution = robot_solve(&[bound]).into_solution().unwrap();
    for row in solution.occupations() {
        assert!(row.iter().filter(|x| **x > 1e-6).count() <= 1);
    }
    let reachable = flatten(&robot.xmdp).unwrap();
    for (i, row) in solution.occupations().iter().enumerate() {
        let positive = row.iter().any(|x| *x > 1e-6);
        assert_eq!(positive, solution.choice(i).is_some());
        if positive {
            assert!(!reachable.mdp().is_goal(i));
        }
    }
}
