use thiserror::Error;

/// Errors from folding a token stream into a [`Config`](super::Config).
///
/// Every variant names the directive at fault so the message can be shown
/// to the person who typed the query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("directive {kind} may only be given once")]
    DuplicateDirective { kind: String },

    #[error("unexpected directive {kind} ('{text}')")]
    UnexpectedDirective { kind: String, text: String },

    #[error("required directive {kind} is missing")]
    MissingDirective { kind: String },

    #[error("{kind}: value {value} outside allowed range [{min}, {max}]")]
    OutOfRange {
        kind: String,
        value: String,
        min: f64,
        max: f64,
    },

    #[error("{kind}: unknown value '{value}', expected one of {{{}}}", expected.join(", "))]
    NotOneOf {
        kind: String,
        value: String,
        expected: Vec<String>,
    },

    #[error("{kind}: {reason}")]
    Invalid { kind: String, reason: String },

    #[error("at least one filter clause is required")]
    NoClauses,
}

/// Errors in a rule set declaration, raised once when the call site builds it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("directive {kind} declared more than once")]
    DuplicateDeclaration { kind: String },

    #[error("default for directive {kind} is invalid: {reason}")]
    InvalidDefault { kind: String, reason: String },

    #[error("multi-valued directive {kind} cannot have a default")]
    DefaultOnMulti { kind: String },
}
