use thiserror::Error;

use crate::lex::{GrammarError, LexError};
use crate::types::{BuildError, CompileError};

/// Unified error type covering tokenizing, building and grammar setup.
///
/// Returned by convenience methods like [`RuleSet::parse()`](crate::RuleSet::parse)
/// and the built-in grammars. The message is meant to be shown verbatim to
/// whoever typed the query.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
