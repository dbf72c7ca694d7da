//! Penalty functions for soft constraint violations.

use crate::error::{ModelError, Result};

/// Penalty charged for violating a soft bound by `v`.
///
/// Linear penalties enter the objective directly as `k_p * v`. Non-linear
/// penalties are sampled at `num_samples` evenly spaced violations and
/// approximated piecewise-linearly by the optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum PenaltyFunction {
    /// `k_p * v`
    Linear { scaling: f64 },
    /// `k_p * v^2`
    Quadratic { scaling: f64, samples: usize },
    /// `k_p * (exp(rate * v) - 1)`
    Exponential { scaling: f64, rate: f64, samples: usize },
}

impl PenaltyFunction {
    pub fn linear(scaling: f64) -> Self {
        PenaltyFunction::Linear { scaling }
    }

    pub fn quadratic(scaling: f64, samples: usize) -> Self {
        PenaltyFunction::Quadratic { scaling, samples }
    }

    pub fn exponential(scaling: f64, rate: f64, samples: usize) -> Self {
        PenaltyFunction::Exponential {
            scaling,
            rate,
            samples,
        }
    }

    #[inline]
    pub fn is_nonlinear(&self) -> bool {
        !matches!(self, PenaltyFunction::Linear { .. })
    }

    /// Number of samples of the piecewise-linear approximation.
    ///
    /// A linear penalty is exact with its two end points.
    pub fn num_samples(&self) -> usize {
        match *self {
            PenaltyFunction::Linear { .. } => 2,
            PenaltyFunction::Quadratic { samples, .. } => samples,
            PenaltyFunction::Exponential { samples, .. } => samples,
        }
    }

    /// Unscaled penalty of violation `v`.
    pub fn penalty(&self, v: f64) -> f64 {
        match *self {
            PenaltyFunction::Linear { .. } => v,
            PenaltyFunction::Quadratic { .. } => v * v,
            PenaltyFunction::Exponential { rate, .. } => (rate * v).exp() - 1.0,
        }
    }

    /// The scaling constant `k_p`.
    pub fn scaling_const(&self) -> f64 {
        match *self {
            PenaltyFunction::Linear { scaling }
            | PenaltyFunction::Quadratic { scaling, .. }
            | PenaltyFunction::Exponential { scaling, .. } => scaling,
        }
    }

    /// Checks the scaling constant is finite and non-negative and that at least two samples are taken.
    pub fn validate(&self) -> Result<()> {
        let scaling = self.scaling_const();
        if !scaling.is_finite() || scaling < 0.0 {
            return Err(ModelError::InvalidPenalty(format!(
                "scaling constant must be finite and non-negative, got {}",
                scaling
            )));
        }
        if self.num_samples() < 2 {
            return Err(ModelError::InvalidPenalty(format!(
                "at least 2 samples required, got {}",
                self.num_samples()
            )));
        }
        if let PenaltyFunction::Exponential { rate, .. } = *self {
            if !rate.is_finite() {
                return Err(ModelError::InvalidPenalty(format!("rate must be finite, got {}", rate)));
            }
        }
        Ok(())
    }
}
