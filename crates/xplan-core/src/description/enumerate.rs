//! Discriminant enumeration from preconditions.

use crate::action::Action;
use crate::error::Result;
use crate::factor::{Discriminant, DiscriminantClass, Precondition};
use crate::state::StateVarDefinition;

/// Enumerates every discriminant of `class` that `action` can face.
///
/// Each combination of applicable values (per `precondition`) of the class
/// variables appears exactly once, so the result has
/// `∏ |applicable values of v|` entries. An empty class yields the single
/// empty discriminant.
///
/// # Errors
///
/// `ActionNotFound` if `action` is not part of the precondition's action type.
pub fn enumerate_discriminants(
    class: &DiscriminantClass,
    action: &Action,
    precondition: &Precondition,
) -> Result<Vec<Discriminant>> {
    precondition.check_action(action)?;
    let vars: Vec<&StateVarDefinition> = class.iter().collect();
    let mut discriminants = extend(class, &vars, action, precondition)?;
    discriminants.sort();
    Ok(discriminants)
}

fn extend(
    class: &DiscriminantClass,
    vars: &[&StateVarDefinition],
    action: &Action,
    precondition: &Precondition,
) -> Result<Vec<Discriminant>> {
    let Some((var, rest)) = vars.split_first() else {
        return Ok(vec![Discriminant::new(class.clone())]);
    };

    let partials = extend(class, rest, action, precondition)?;
    let values = precondition.applicable_values(action, var)?;
    let mut out = Vec::with_capacity(partials.len() * values.len());
    for value in &values {
        for partial in &partials {
            let mut discriminant = partial.clone();
            discriminant.add(var, value.clone())?;
            out.push(discriminant);
        }
    }
    Ok(out)
}
