//! Variable classes: the sets of variables discriminants and effects range over.

use std::collections::BTreeSet;
use std::fmt;

use crate::state::StateVarDefinition;

macro_rules! var_class {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            vars: BTreeSet<StateVarDefinition>,
        }

        impl $name {
            pub fn new(vars: impl IntoIterator<Item = StateVarDefinition>) -> Self {
                Self {
                    vars: vars.into_iter().collect(),
                }
            }

            /// Adds a variable to the class.
            pub fn add(&mut self, var: StateVarDefinition) {
                self.vars.insert(var);
            }

            #[inline]
            pub fn contains(&self, var: &StateVarDefinition) -> bool {
                self.vars.contains(var)
            }

            pub fn iter(&self) -> impl Iterator<Item = &StateVarDefinition> {
                self.vars.iter()
            }

            #[inline]
            pub fn len(&self) -> usize {
                self.vars.len()
            }

            #[inline]
            pub fn is_empty(&self) -> bool {
                self.vars.is_empty()
            }

            /// Returns true if both classes share at least one variable.
            pub fn overlaps(&self, other: &Self) -> bool {
                self.vars.iter().any(|v| other.vars.contains(v))
            }

            /// Returns the first variable both classes contain.
            pub fn first_shared<'a>(&'a self, other: &Self) -> Option<&'a StateVarDefinition> {
                self.vars.iter().find(|v| other.vars.contains(*v))
            }

            /// Returns the union of both classes.
            pub fn union(&self, other: &Self) -> Self {
                Self {
                    vars: self.vars.union(&other.vars).cloned().collect(),
                }
            }

            pub(crate) fn vars(&self) -> &BTreeSet<StateVarDefinition> {
                &self.vars
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", stringify!($name), self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("[")?;
                for (i, var) in self.vars.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(var.name())?;
                }
                f.write_str("]")
            }
        }

        impl FromIterator<StateVarDefinition> for $name {
            fn from_iter<I: IntoIterator<Item = StateVarDefinition>>(iter: I) -> Self {
                Self::new(iter)
            }
        }
    };
}

var_class!(
    /// Variables whose source values select the case governing an effect.
    DiscriminantClass
);

var_class!(
    /// Variables an action type changes together, independently of its other effect classes.
    EffectClass
);
