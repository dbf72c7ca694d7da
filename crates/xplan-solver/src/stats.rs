//! Solve statistics.

use std::time::{Duration, Instant};

/// Counters for LP solves and branch-and-bound search.
///
/// # Example
///
/// ```
/// use xplan_solver::stats::SolveStats;
///
/// let mut stats = SolveStats::default();
/// stats.start();
/// stats.record_lp_solve();
/// stats.record_node();
/// stats.record_node();
/// stats.record_pruned();
///
/// assert_eq!(stats.lp_solves, 1);
/// assert_eq!(stats.nodes_explored, 2);
/// assert_eq!(stats.prune_rate(), 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SolveStats {
    start_time: Option<Instant>,
    /// LP relaxations solved.
    pub lp_solves: u64,
    /// Branch-and-bound nodes taken off the stack.
    pub nodes_explored: u64,
    /// Nodes discarded by bound.
    pub nodes_pruned: u64,
    /// Times a better integral solution was found.
    pub incumbent_updates: u64,
}

impl SolveStats {
    /// Marks the start of solving; counters are kept.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Elapsed time since [`start`](Self::start), zero if never started.
    pub fn elapsed(&self) -> Duration {
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    pub fn record_lp_solve(&mut self) {
        self.lp_solves += 1;
    }

    pub fn record_node(&mut self) {
        self.nodes_explored += 1;
    }

    pub fn record_pruned(&mut self) {
        self.nodes_pruned += 1;
    }

    pub fn record_incumbent(&mut self) {
        self.incumbent_updates += 1;
    }

    /// Pruned nodes over explored nodes.
    pub fn prune_rate(&self) -> f64 {
        if self.nodes_explored == 0 {
            0.0
        } else {
            self.nodes_pruned as f64 / self.nodes_explored as f64
        }
    }
}
