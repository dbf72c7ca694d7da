//! Error types for factored model assembly.

use thiserror::Error;

/// Errors raised while assembling or querying a factored model.
///
/// Not-found and incompatibility variants are model-author errors and
/// propagate to the top of model assembly. Malformed-model variants are
/// detected when a builder is finalized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A state variable is not defined in the context it was looked up in.
    #[error("state variable not found: {0}")]
    VarNotFound(String),

    /// An action is not part of the queried action definition.
    #[error("action not found: {0}")]
    ActionNotFound(String),

    /// No action definition contains the given action.
    #[error("action definition not found for action: {0}")]
    ActionDefinitionNotFound(String),

    /// An action description has no entry for the given discriminant.
    #[error("discriminant not found: {0}")]
    DiscriminantNotFound(String),

    /// No effect class of an operator contains the given variable or class.
    #[error("effect class not found: {0}")]
    EffectClassNotFound(String),

    /// A probabilistic effect has no outcome equal to the given effect.
    #[error("effect not found: {0}")]
    EffectNotFound(String),

    /// An action has no attribute with the given name.
    #[error("attribute '{attribute}' not found on action '{action}'")]
    AttributeNotFound { action: String, attribute: String },

    /// No QA function with the given name is registered.
    #[error("QA function not found: {0}")]
    QFunctionNotFound(String),

    /// A variable was assigned in a discriminant or effect whose class does not contain it.
    #[error("variable '{var}' is incompatible with class {class}")]
    IncompatibleVar { var: String, class: String },

    /// A discriminant was inserted under a description with a different discriminant class.
    #[error("incompatible discriminant class: expected {expected}, found {found}")]
    IncompatibleDiscriminantClass { expected: String, found: String },

    /// An effect was inserted under a description with a different effect class.
    #[error("incompatible effect class: expected {expected}, found {found}")]
    IncompatibleEffectClass { expected: String, found: String },

    /// An action was used with a description or operator of another action type.
    #[error("action '{action}' is incompatible with action type '{definition}'")]
    IncompatibleAction { action: String, definition: String },

    /// A value is not in the domain of the variable it was assigned to.
    #[error("value '{value}' is not in the domain of '{var}'")]
    ValueOutOfDomain { var: String, value: String },

    /// A probability lies outside [0, 1].
    #[error("invalid probability {0}")]
    InvalidProbability(f64),

    /// The outcomes of a probabilistic effect do not sum to 1.
    #[error("probabilities of {context} sum to {sum}, expected 1")]
    ProbabilitySum { context: String, sum: f64 },

    /// Two effect classes of one operator share a variable.
    #[error("effect classes of '{definition}' overlap on '{var}'")]
    OverlappingEffectClasses { definition: String, var: String },

    /// An action type appears twice in a transition function.
    #[error("duplicate action definition: {0}")]
    DuplicateActionDefinition(String),

    /// A state does not assign every variable of the state space.
    #[error("state is missing variable '{0}'")]
    IncompleteState(String),

    /// A penalty function is configured with unusable parameters.
    #[error("invalid penalty function: {0}")]
    InvalidPenalty(String),

    /// A constraint bound is unusable (e.g. a hard bound looser than its soft bound).
    #[error("invalid bound: {0}")]
    InvalidBound(String),
}

/// Result type alias for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
