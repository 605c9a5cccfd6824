mod config;
mod directive;
mod error;
mod evaluation_report;
mod ruleset;
mod token;
mod value;

pub(crate) use config::Slot;
pub use config::Config;
pub use directive::{Arity, Constraint, Directive, Finisher, Matcher, Scorer};
pub(crate) use directive::Role;
pub use error::{BuildError, CompileError};
pub use evaluation_report::{CategoryOutcome, EvaluationReport};
pub use ruleset::{DirectiveBuilder, RuleSet, RuleSetBuilder, UnknownPolicy};
pub use token::{Kind, Token};
pub use value::{Pattern, TypedValue};
