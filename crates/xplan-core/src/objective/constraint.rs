//! Constraints on the expected value of QA functions.

use super::PenaltyFunction;
use crate::error::{ModelError, Result};

/// Direction of a constraint bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BoundType {
    Upper,
    Lower,
    StrictUpper,
    StrictLower,
}

impl BoundType {
    #[inline]
    pub fn is_upper(self) -> bool {
        matches!(self, BoundType::Upper | BoundType::StrictUpper)
    }

    #[inline]
    pub fn is_strict(self) -> bool {
        matches!(self, BoundType::StrictUpper | BoundType::StrictLower)
    }

    /// Non-strict bound equivalent to `bound`, tightened by `margin` when strict.
    pub fn non_strict(self, bound: f64, margin: f64) -> f64 {
        match self {
            BoundType::Upper | BoundType::Lower => bound,
            BoundType::StrictUpper => bound - margin,
            BoundType::StrictLower => bound + margin,
        }
    }
}

/// Hard or soft.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintKind {
    /// The expected QA value must respect `bound`.
    Hard { bound: f64 },
    /// Violating `soft_bound` is penalized; `hard_bound` may never be violated.
    Soft {
        soft_bound: f64,
        hard_bound: f64,
        penalty: PenaltyFunction,
    },
}

/// A bound on the expected value of a named QA function.
///
/// # Example
///
/// ```
/// use xplan_core::objective::{AttributeConstraint, BoundType, PenaltyFunction};
///
/// let hard = AttributeConstraint::hard("time", BoundType::Upper, 20.0);
/// assert!(!hard.is_soft());
///
/// let soft = AttributeConstraint::soft(
///     "collision", BoundType::Upper, 0.1, 0.5, PenaltyFunction::quadratic(10.0, 5),
/// ).unwrap();
/// assert!(soft.is_soft());
///
/// // A hard bound tighter than the soft bound is rejected.
/// assert!(AttributeConstraint::soft(
///     "collision", BoundType::Upper, 0.5, 0.1, PenaltyFunction::linear(1.0),
/// ).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeConstraint {
    qfunction: String,
    bound_type: BoundType,
    kind: ConstraintKind,
}

impl AttributeConstraint {
    pub fn hard(qfunction: impl Into<String>, bound_type: BoundType, bound: f64) -> Self {
        Self {
            qfunction: qfunction.into(),
            bound_type,
            kind: ConstraintKind::Hard { bound },
        }
    }

    /// Creates a soft constraint.
    ///
    /// The hard bound must be at least as loose as the soft bound: for upper
    /// bounds `soft_bound <= hard_bound`, for lower bounds `soft_bound >= hard_bound`.
    pub fn soft(
        qfunction: impl Into<String>,
        bound_type: BoundType,
        soft_bound: f64,
        hard_bound: f64,
        penalty: PenaltyFunction,
    ) -> Result<Self> {
        penalty.validate()?;
        let ordered = if bound_type.is_upper() {
            soft_bound <= hard_bound
        } else {
            soft_bound >= hard_bound
        };
        if !ordered {
            return Err(ModelError::InvalidBound(format!(
                "soft bound {} is looser than hard bound {}",
                soft_bound, hard_bound
            )));
        }
        Ok(Self {
            qfunction: qfunction.into(),
            bound_type,
            kind: ConstraintKind::Soft {
                soft_bound,
                hard_bound,
                penalty,
            },
        })
    }

    pub fn qfunction(&self) -> &str {
        &self.qfunction
    }

    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    pub fn is_soft(&self) -> bool {
        matches!(self.kind, ConstraintKind::Soft { .. })
    }
}
