//! Test utilities for xplan-solver
//!
//! Hand-built explicit MDPs with known optimal policies.

use xplan_explicit::{CostType, ExplicitMdp};

/// Installs a test subscriber; filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

/// `s0 -a-> s1 -b-> goal`, cost 1 per step under both cost functions.
///
/// Actions: `a` = 0, `b` = 1. Cost 1 is a "time" QA cost.
pub fn chain_mdp() -> ExplicitMdp {
    let mut builder = ExplicitMdp::builder(3, ["a", "b"], CostType::TransitionCost, 2);
    builder.set_transition_probability(0, "a", 1, 1.0).unwrap();
    builder.set_transition_probability(1, "b", 2, 1.0).unwrap();
    for k in 0..2 {
        builder.set_transition_cost(k, 0, "a", 1.0).unwrap();
        builder.set_transition_cost(k, 1, "b", 1.0).unwrap();
    }
    builder.set_initial_state(0).unwrap();
    builder.add_goal(2).unwrap();
    builder.build().unwrap()
}

/// One decision between `fast` (cost 1, risk `fast_risk`) and `slow`
/// (cost 3, risk 0), both reaching the goal.
///
/// Actions: `fast` = 0, `slow` = 1. Cost 1 is the risk.
pub fn fork_mdp(fast_risk: f64) -> ExplicitMdp {
    let mut builder = ExplicitMdp::builder(2, ["fast", "slow"], CostType::TransitionCost, 2);
    builder.set_transition_probability(0, "fast", 1, 1.0).unwrap();
    builder.set_transition_probability(0, "slow", 1, 1.0).unwrap();
    builder.set_transition_cost(0, 0, "fast", 1.0).unwrap();
    builder.set_transition_cost(0, 0, "slow", 3.0).unwrap();
    builder.set_transition_cost(1, 0, "fast", fast_risk).unwrap();
    builder.add_goal(1).unwrap();
    builder.build().unwrap()
}

/// Retry loop: `try` reaches the goal with probability 0.5 and stays
/// otherwise (cost 1 per attempt); `give_up` goes to a failure goal at cost 4.
///
/// States: 0 start, 1 success, 2 failure. Actions: `give_up` = 0, `try` = 1.
pub fn retry_mdp() -> ExplicitMdp {
    let mut builder = ExplicitMdp::builder(3, ["try", "give_up"], CostType::TransitionCost, 2);
    builder.set_transition_probability(0, "try", 0, 0.5).unwrap();
    builder.set_transition_probability(0, "try", 1, 0.5).unwrap();
    builder.set_transition_probability(0, "give_up", 2, 1.0).unwrap();
    builder.set_transition_cost(0, 0, "try", 1.0).unwrap();
    builder.set_transition_cost(0, 0, "give_up", 4.0).unwrap();
    builder.set_transition_cost(1, 0, "give_up", 1.0).unwrap();
    builder.add_goal(1).unwrap();
    builder.add_goal(2).unwrap();
    builder.build().unwrap()
}

/// `s0 -go-> s1` where `s1` is a dead end and the goal `s2` is unreachable.
pub fn dead_end_mdp() -> ExplicitMdp {
    let mut builder = ExplicitMdp::builder(3, ["go"], CostType::TransitionCost, 1);
    builder.set_transition_probability(0, "go", 1, 1.0).unwrap();
    builder.set_transition_cost(0, 0, "go", 1.0).unwrap();
    builder.add_goal(2).unwrap();
    builder.build().unwrap()
}

/// Recurrent two-state cycle for the average-cost criterion.
///
/// In state 0, `fast` (cost 1, wear 1) or `slow` (cost 3, wear 0) lead to
/// state 1; `back` returns to state 0 at no cost.
/// Actions: `back` = 0, `fast` = 1, `slow` = 2. Cost 1 is wear.
pub fn cycle_mdp() -> ExplicitMdp {
    let mut builder = ExplicitMdp::builder(2, ["fast", "slow", "back"], CostType::TransitionCost, 2);
    builder.set_transition_probability(0, "fast", 1, 1.0).unwrap();
    builder.set_transition_probability(0, "slow", 1, 1.0).unwrap();
    builder.set_transition_probability(1, "back", 0, 1.0).unwrap();
    builder.set_transition_cost(0, 0, "fast", 1.0).unwrap();
    builder.set_transition_cost(0, 0, "slow", 3.0).unwrap();
    builder.set_transition_cost(1, 0, "fast", 1.0).unwrap();
    builder.build().unwrap()
}

/// Transient state 0 enters the absorbing loop of state 1.
///
/// Actions: `enter` = 0 (cost 5), `loop` = 1 (cost 1).
pub fn transient_mdp() -> ExplicitMdp {
    let mut builder = ExplicitMdp::builder(2, ["enter", "loop"], CostType::TransitionCost, 1);
    builder.set_transition_probability(0, "enter", 1, 1.0).unwrap();
    builder.set_transition_probability(1, "loop", 1, 1.0).unwrap();
    builder.set_transition_cost(0, 0, "enter", 5.0).unwrap();
    builder.set_transition_cost(0, 1, "loop", 1.0).unwrap();
    builder.build().unwrap()
}

/// `fast` reaches the goal at cost 1; `slow` costs 1 per step and leaves
/// its self-loop with probability 1e-7, so the occupation bound is about 1e7.
///
/// Actions: `fast` = 0, `slow` = 1.
pub fn near_absorbing_mdp() -> ExplicitMdp {
    let mut builder = ExplicitMdp::builder(2, ["fast", "slow"], CostType::TransitionCost, 1);
    builder.set_transition_probability(0, "fast", 1, 1.0).unwrap();
    builder.set_transition_probability(0, "slow", 0, 1.0 - 1e-7).unwrap();
    builder.set_transition_probability(0, "slow", 1, 1e-7).unwrap();
    builder.set_transition_cost(0, 0, "fast", 1.0).unwrap();
    builder.set_transition_cost(0, 0, "slow", 1.0).unwrap();
    builder.add_goal(1).unwrap();
    builder.build().unwrap()
}

/// `go` reaches the goal at cost 1; `stay` is a free self-loop, so total
/// occupation has no finite maximum.
///
/// Actions: `go` = 0, `stay` = 1.
pub fn loiter_mdp() -> ExplicitMdp {
    let mut builder = ExplicitMdp::builder(2, ["go", "stay"], CostType::TransitionCost, 1);
    builder.set_transition_probability(0, "go", 1, 1.0).unwrap();
    builder.set_transition_probability(0, "stay", 0, 1.0).unwrap();
    builder.set_transition_cost(0, 0, "go", 1.0).unwrap();
    builder.add_goal(1).unwrap();
    builder.build().unwrap()
}
