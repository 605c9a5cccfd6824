use thiserror::Error;

/// Errors produced while tokenizing a query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// No grammar pattern matches at `position` (a byte offset).
    #[error("unrecognized input '{fragment}' at position {position}")]
    Unrecognized { position: usize, fragment: String },

    /// A pattern matched but its value transform rejected the text.
    #[error("invalid {kind} '{text}': {reason}")]
    InvalidValue {
        kind: String,
        text: String,
        reason: String,
    },

    #[error("input is {len} characters long, at most {max} are allowed")]
    InputTooLong { len: usize, max: usize },
}

/// Errors building a [`Grammar`](super::Grammar).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("invalid pattern for {kind} '{pattern}': {reason}")]
    InvalidPattern {
        kind: String,
        pattern: String,
        reason: String,
    },

    /// The scan would never advance past an empty match.
    #[error("pattern for {kind} '{pattern}' matches the empty string")]
    EmptyMatch { kind: String, pattern: String },
}
