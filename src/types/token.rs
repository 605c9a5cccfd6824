use std::fmt;
use std::hash::Hash;

use super::value::TypedValue;

/// A grammar's closed set of token kinds.
///
/// Implemented for any small `Copy` enum with a `Display` impl; the display
/// form is what error messages name (e.g. `ATK`).
pub trait Kind: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

impl<T> Kind for T where T: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static {}

/// One lexeme recognized by the tokenizer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<K> {
    pub kind: K,
    pub value: TypedValue,
    /// The exact input text the token was matched from.
    pub raw: String,
    /// Byte offset of `raw` in the tokenized input.
    pub position: usize,
}

impl<K: Kind> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) @{}", self.kind, self.value, self.position)
    }
}
