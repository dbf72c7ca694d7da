//! Branch-and-bound search over binary variables.
//!
//! Each node fixes a subset of the binaries and carries the relaxation
//! objective of its parent as an optimistic bound. Nodes are explored
//! depth first, taking the `1` branch before the `0` branch.

use super::{LpModel, Sense, VarId};

/// Configuration for branch-and-bound.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchAndBoundConfig {
    /// Maximum number of nodes to explore (None = unlimited).
    pub node_limit: Option<u64>,
    /// Distance from 0 or 1 within which a binary counts as integral.
    pub integrality_tolerance: f64,
    /// Constraint slack allowed when rounded binaries are checked.
    pub feasibility_tolerance: f64,
    /// Whether to discard nodes whose bound cannot beat the incumbent.
    pub enable_pruning: bool,
}

impl Default for BranchAndBoundConfig {
    fn default() -> Self {
        Self {
            node_limit: Some(10_000),
            integrality_tolerance: 1e-6,
            feasibility_tolerance: 1e-6,
            enable_pruning: true,
        }
    }
}

impl BranchAndBoundConfig {
    /// Returns true if `value` is within tolerance of 0 or 1.
    pub fn is_integral(&self, value: f64) -> bool {
        value <= self.integrality_tolerance || value >= 1.0 - self.integrality_tolerance
    }

    /// The first binary of `model` whose value in `values` is fractional.
    pub fn first_fractional(&self, model: &LpModel, values: &[f64]) -> Option<VarId> {
        model
            .binaries()
            .find(|var| !self.is_integral(values[var.index()]))
    }
}

/// A node in the branch-and-bound tree.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchNode {
    depth: usize,
    fixings: Vec<(VarId, f64)>,
    bound: Option<f64>,
}

impl BranchNode {
    /// The root node: nothing fixed, no bound.
    pub fn root() -> Self {
        Self {
            depth: 0,
            fixings: Vec::new(),
            bound: None,
        }
    }

    /// A child fixing `var` to `value`, bounded by the parent's relaxation.
    pub fn child(&self, var: VarId, value: f64, bound: f64) -> Self {
        let mut fixings = self.fixings.clone();
        fixings.push((var, value));
        Self {
            depth: self.depth + 1,
            fixings,
            bound: Some(bound),
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn fixings(&self) -> &[(VarId, f64)] {
        &self.fixings
    }

    #[inline]
    pub fn bound(&self) -> Option<f64> {
        self.bound
    }

    /// Bounds of `var` at this node.
    pub fn var_bounds(&self, model: &LpModel, var: VarId) -> (f64, f64) {
        self.fixings
            .iter()
            .rev()
            .find(|(v, _)| *v == var)
            .map(|&(_, value)| (value, value))
            .unwrap_or_else(|| {
                let v = model.var(var);
                (v.lower, v.upper)
            })
    }

    /// Returns true if this node fixes `var`, or its model bounds do.
    pub fn is_fixed(&self, model: &LpModel, var: VarId) -> bool {
        let (lower, upper) = self.var_bounds(model, var);
        lower == upper
    }

    /// Returns true if this node cannot improve on `incumbent`.
    pub fn can_prune(&self, sense: Sense, incumbent: Option<f64>, tolerance: f64) -> bool {
        match (self.bound, incumbent) {
            (Some(bound), Some(best)) => !sense.is_better(bound, best, tolerance),
            _ => false,
        }
    }
}
