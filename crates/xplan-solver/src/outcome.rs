//! Solver results.

/// An optimal deterministic policy over explicit indices.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimalSolution {
    choices: Vec<Option<usize>>,
    objective: f64,
    costs: Vec<f64>,
    occupations: Vec<Vec<f64>>,
}

impl OptimalSolution {
    pub fn new(choices: Vec<Option<usize>>, objective: f64, costs: Vec<f64>, occupations: Vec<Vec<f64>>) -> Self {
        Self {
            choices,
            objective,
            costs,
            occupations,
        }
    }

    /// Chosen action per state; `None` for states the policy never visits.
    pub fn choices(&self) -> &[Option<usize>] {
        &self.choices
    }

    pub fn choice(&self, i: usize) -> Option<usize> {
        self.choices.get(i).copied().flatten()
    }

    /// Optimal objective value, including soft-constraint penalties.
    #[inline]
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Occupancy cost of every cost function, objective first.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    pub fn cost(&self, k: usize) -> Option<f64> {
        self.costs.get(k).copied()
    }

    /// Occupation measure `x_ia`.
    pub fn occupation(&self, i: usize, a: usize) -> f64 {
        self.occupations
            .get(i)
            .and_then(|row| row.get(a))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn occupations(&self) -> &[Vec<f64>] {
        &self.occupations
    }
}

/// Outcome of a policy solve. Infeasibility is an outcome, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Solved(OptimalSolution),
    NoSolution,
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }

    pub fn solution(&self) -> Option<&OptimalSolution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::NoSolution => None,
        }
    }

    pub fn into_solution(self) -> Option<OptimalSolution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            SolveOutcome::NoSolution => None,
        }
    }
}
