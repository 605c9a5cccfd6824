//! A small directive language: tokenize a query with an ordered regex
//! grammar, fold the tokens into a validated [`Config`], then evaluate it as
//! a filter over candidates or as a numeric score.

mod build;
mod error;
mod evaluate;
pub mod grammars;
pub mod lex;
mod snapshot;
mod types;

pub use build::build;
pub use error::QueryError;
pub use lex::{tokenize, transform, Grammar, GrammarBuilder, GrammarError, LexError, Limits, Transform};
pub use snapshot::Snapshot;
pub use types::{
    Arity, BuildError, CategoryOutcome, CompileError, Config, Constraint, Directive,
    DirectiveBuilder, EvaluationReport, Finisher, Kind, Matcher, Pattern, RuleSet, RuleSetBuilder,
    Scorer, Token, TypedValue, UnknownPolicy,
};
