use super::*;
use crate::error::SolverError;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_linear_expr_merges_terms() {
    let mut model = LpModel::new(Sense::Minimize);
    let x = model.add_continuous("x", 0.0, 1.0, 0.0);
    let y = model.add_continuous("y", 0.0, 1.0, 0.0);

    let mut expr = LinearExpr::new().with(x, 1.0).with(y, 2.0).with(x, 3.0);
    expr.add(y, -2.0);

    let terms: Vec<_> = expr.terms().collect();
    assert_eq!(terms, vec![(x, 4.0)]);
    assert_close(expr.evaluate(&[0.5, 1.0]), 2.0);
}

#[test]
fn test_empty_expr() {
    let mut model = LpModel::new(Sense::Minimize);
    let x = model.add_continuous("x", 0.0, 1.0, 0.0);
    let expr = LinearExpr::new().with(x, 1.0).with(x, -1.0);
    assert!(expr.is_empty());
    assert!(LinearExpr::new().is_empty());
}

#[test]
fn test_relation_holds() {
    assert!(Relation::Le.holds(1.0, 1.0, 0.0));
    assert!(Relation::Le.holds(1.0 + 1e-7, 1.0, 1e-6));
    assert!(!Relation::Le.holds(1.1, 1.0, 1e-6));
    assert!(Relation::Ge.holds(0.9999999, 1.0, 1e-6));
    assert!(!Relation::Eq.holds(0.9, 1.0, 1e-6));
}

#[test]
fn test_solve_lp() {
    // max 3x + 2y  s.t.  x + y <= 4, x + 3y <= 6, x <= 3
    let mut model = LpModel::new(Sense::Maximize);
    let x = model.add_continuous("x", 0.0, 3.0, 3.0);
    let y = model.add_continuous("y", 0.0, f64::INFINITY, 2.0);
    model.add_constraint("c1", LinearExpr::new().with(x, 1.0).with(y, 1.0), Relation::Le, 4.0);
    model.add_constraint("c2", LinearExpr::new().with(x, 1.0).with(y, 3.0), Relation::Le, 6.0);

    let mut backend = MinilpBackend::default();
    let outcome = backend.solve(&model).unwrap();

    assert_eq!(outcome.status(), LpStatus::Optimal);
    assert_eq!(outcome.solution_count(), 1);
    let solution = outcome.solution().unwrap();
    assert_close(solution[x], 3.0);
    assert_close(solution[y], 1.0);
    assert_close(solution.objective(), 11.0);
    assert!(model.violated_constraints(solution.values(), 1e-6).is_empty());
    assert_eq!(backend.stats().lp_solves, 1);
    assert_eq!(backend.stats().nodes_explored, 0);
}

#[test]
fn test_infeasible_lp() {
    let mut model = LpModel::new(Sense::Minimize);
    let x = model.add_continuous("x", 0.0, 1.0, 1.0);
    model.add_constraint("too_big", LinearExpr::new().with(x, 1.0), Relation::Ge, 2.0);

    let outcome = MinilpBackend::default().solve(&model).unwrap();
    assert_eq!(outcome, LpOutcome::Infeasible);
    assert_eq!(outcome.solution_count(), 0);
}

#[test]
fn test_unbounded_lp() {
    let mut model = LpModel::new(Sense::Maximize);
    let x = model.add_continuous("x", 0.0, f64::INFINITY, 1.0);
    model.add_constraint("floor", LinearExpr::new().with(x, 1.0), Relation::Ge, 1.0);

    let outcome = MinilpBackend::default().solve(&model).unwrap();
    assert_eq!(outcome.status(), LpStatus::Unbounded);
}

#[test]
fn test_violated_empty_constraint_is_infeasible() {
    let mut model = LpModel::new(Sense::Minimize);
    model.add_continuous("x", 0.0, 1.0, 1.0);
    model.add_constraint("empty_ok", LinearExpr::new(), Relation::Le, 0.0);
    assert_eq!(
        MinilpBackend::default().solve(&model).unwrap().status(),
        LpStatus::Optimal
    );

    model.add_constraint("empty_bad", LinearExpr::new(), Relation::Eq, 1.0);
    assert_eq!(
        MinilpBackend::default().solve(&model).unwrap(),
        LpOutcome::Infeasible
    );
}

#[test]
fn test_dense_expression_accumulates() {
    let mut model = LpModel::new(Sense::Minimize);
    let vars: Vec<VarId> = (0..2_000)
        .map(|i| model.add_continuous(format!("x{i}"), 0.0, 1.0, 0.0))
        .collect();
    let mut row = LinearExpr::new();
    for &var in vars.iter().rev() {
        row.add(var, 1.0);
    }
    let mut total = LinearExpr::new();
    total.add_expr(&row, 2.0);
    total.add_expr(&row, -0.5);

    let terms: Vec<_> = total.terms().collect();
    assert_eq!(terms.len(), 2_000);
    assert_eq!(terms[0], (vars[0], 1.5));
    assert_eq!(terms[1_999], (vars[1_999], 1.5));
}

#[test]
fn test_rounded_selector_with_large_coefficient() {
    // min x  s.t.  x >= 1,  x - 1e7·d <= 0,  d binary
    let mut model = LpModel::new(Sense::Minimize);
    let x = model.add_continuous("x", 0.0, f64::INFINITY, 1.0);
    let d = model.add_binary("d", 0.0);
    model.add_constraint("demand", LinearExpr::new().with(x, 1.0), Relation::Ge, 1.0);
    model.add_constraint(
        "link",
        LinearExpr::new().with(x, 1.0).with(d, -1e7),
        Relation::Le,
        0.0,
    );

    let solution = MinilpBackend::default().solve(&model).unwrap().into_solution().unwrap();
    assert_eq!(solution[d], 1.0);
    assert_close(solution[x], 1.0);
    assert!(model.violated_constraints(solution.values(), 1e-6).is_empty());
}

/// 0/1 knapsack: values 10, 13, 7; weights 3, 4, 2; capacity 6.
fn knapsack() -> (LpModel, Vec<VarId>) {
    let mut model = LpModel::new(Sense::Maximize);
    let items: Vec<VarId> = [10.0, 13.0, 7.0]
        .iter()
        .enumerate()
        .map(|(i, &value)| model.add_binary(format!("item{i}"), value))
        .collect();
    let mut weight = LinearExpr::new();
    for (&item, w) in items.iter().zip([3.0, 4.0, 2.0]) {
        weight.add(item, w);
    }
    model.add_constraint("capacity", weight, Relation::Le, 6.0);
    (model, items)
}

#[test]
fn test_branch_and_bound_knapsack() {
    let (model, items) = knapsack();
    let mut backend = MinilpBackend::default();
    let solution = backend.solve(&model).unwrap().into_solution().unwrap();

    assert_close(solution.objective(), 20.0);
    assert_eq!(solution[items[0]], 0.0);
    assert_eq!(solution[items[1]], 1.0);
    assert_eq!(solution[items[2]], 1.0);
    assert!(backend.stats().nodes_explored > 1);
    assert!(backend.stats().incumbent_updates >= 1);
}

#[test]
fn test_branch_and_bound_without_pruning() {
    let (model, _) = knapsack();
    let config = BranchAndBoundConfig {
        enable_pruning: false,
        ..BranchAndBoundConfig::default()
    };
    let mut backend = MinilpBackend::new(config);
    let solution = backend.solve(&model).unwrap().into_solution().unwrap();

    assert_close(solution.objective(), 20.0);
    assert_eq!(backend.stats().nodes_pruned, 0);
}

#[test]
fn test_infeasible_mip() {
    // x + y = 1.5 has no 0/1 solution
    let mut model = LpModel::new(Sense::Minimize);
    let x = model.add_binary("x", 1.0);
    let y = model.add_binary("y", 1.0);
    model.add_constraint("half", LinearExpr::new().with(x, 1.0).with(y, 1.0), Relation::Eq, 1.5);

    assert_eq!(
        MinilpBackend::default().solve(&model).unwrap(),
        LpOutcome::Infeasible
    );
}

#[test]
fn test_node_limit_without_incumbent() {
    let mut model = LpModel::new(Sense::Minimize);
    let x = model.add_binary("x", 1.0);
    let y = model.add_binary("y", 1.0);
    model.add_constraint("half", LinearExpr::new().with(x, 1.0).with(y, 1.0), Relation::Eq, 1.5);

    let config = BranchAndBoundConfig {
        node_limit: Some(1),
        ..BranchAndBoundConfig::default()
    };
    let err = MinilpBackend::new(config).solve(&model).unwrap_err();
    assert!(matches!(err, SolverError::NodeLimitReached { limit: 1 }));
}

#[test]
fn test_is_integral() {
    let config = BranchAndBoundConfig::default();
    assert!(config.is_integral(0.0));
    assert!(config.is_integral(1.0 - 1e-9));
    assert!(config.is_integral(1e-7));
    assert!(!config.is_integral(0.5));
    assert!(!config.is_integral(1e-3));
}

#[test]
fn test_branch_node() {
    let mut model = LpModel::new(Sense::Minimize);
    let x = model.add_binary("x", 1.0);
    let y = model.add_continuous("y", -1.0, 2.0, 0.0);

    let root = BranchNode::root();
    assert_eq!(root.depth(), 0);
    assert_eq!(root.bound(), None);
    assert_eq!(root.var_bounds(&model, x), (0.0, 1.0));
    assert_eq!(root.var_bounds(&model, y), (-1.0, 2.0));

    let child = root.child(x, 1.0, 3.0);
    assert_eq!(child.depth(), 1);
    assert_eq!(child.fixings(), &[(x, 1.0)]);
    assert_eq!(child.var_bounds(&model, x), (1.0, 1.0));

    assert!(!root.can_prune(Sense::Minimize, Some(2.0), 1e-9));
    assert!(child.can_prune(Sense::Minimize, Some(2.0), 1e-9));
    assert!(child.can_prune(Sense::Minimize, Some(3.0), 1e-9));
    assert!(!child.can_prune(Sense::Minimize, Some(4.0), 1e-9));
    assert!(!child.can_prune(Sense::Minimize, None, 1e-9));
    assert!(child.can_prune(Sense::Maximize, Some(4.0), 1e-9));
}

#[test]
fn test_first_fractional() {
    let mut model = LpModel::new(Sense::Minimize);
    let _c = model.add_continuous("c", 0.0, 1.0, 0.0);
    let a = model.add_binary("a", 0.0);
    let b = model.add_binary("b", 0.0);
    let config = BranchAndBoundConfig::default();

    assert_eq!(config.first_fractional(&model, &[0.5, 1.0, 0.0]), None);
    assert_eq!(config.first_fractional(&model, &[0.5, 0.3, 0.7]), Some(a));
    assert_eq!(config.first_fractional(&model, &[0.5, 0.0, 0.7]), Some(b));
}
