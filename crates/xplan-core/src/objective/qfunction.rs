//! QA functions: per-transition quality metrics.

use std::fmt;

use crate::action::Action;
use crate::error::Result;
use crate::state::{StatePredicate, StateVarTuple};

/// A single transition `src --action--> dest`.
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub action: &'a Action,
    pub src: &'a StateVarTuple,
    pub dest: &'a StateVarTuple,
}

impl<'a> Transition<'a> {
    pub fn new(action: &'a Action, src: &'a StateVarTuple, dest: &'a StateVarTuple) -> Self {
        Self { action, src, dest }
    }
}

/// A named quality attribute evaluated on transitions.
pub trait QFunction: Send + Sync {
    fn name(&self) -> &str;

    fn value(&self, transition: &Transition<'_>) -> Result<f64>;
}

impl fmt::Debug for dyn QFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QFunction({})", self.name())
    }
}

/// QA value read from a numeric attribute of the action.
#[derive(Debug, Clone)]
pub struct AttributeQFunction {
    name: String,
    attribute: String,
}

impl AttributeQFunction {
    pub fn new(name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attribute: attribute.into(),
        }
    }
}

impl QFunction for AttributeQFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, transition: &Transition<'_>) -> Result<f64> {
        transition.action.attribute(&self.attribute)
    }
}

/// Counts transitions whose destination satisfies an event predicate.
#[derive(Debug, Clone)]
pub struct CountQFunction {
    name: String,
    event: StatePredicate,
}

impl CountQFunction {
    pub fn new(name: impl Into<String>, event: StatePredicate) -> Self {
        Self {
            name: name.into(),
            event,
        }
    }
}

impl QFunction for CountQFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, transition: &Transition<'_>) -> Result<f64> {
        Ok(if self.event.evaluate(transition.dest) {
            1.0
        } else {
            0.0
        })
    }
}

/// QA function backed by a closure.
pub struct FnQFunction<F> {
    name: String,
    f: F,
}

impl<F> FnQFunction<F>
where
    F: Fn(&Transition<'_>) -> Result<f64> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> QFunction for FnQFunction<F>
where
    F: Fn(&Transition<'_>) -> Result<f64> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, transition: &Transition<'_>) -> Result<f64> {
        (self.f)(transition)
    }
}
