use std::collections::{HashMap, HashSet};
use std::fmt;

use super::config::Config;
use super::directive::{Arity, Constraint, Directive, Finisher, Matcher, Role, Scorer};
use super::error::{BuildError, CompileError};
use super::evaluation_report::EvaluationReport;
use super::token::{Kind, Token};
use super::value::TypedValue;
use crate::lex::Grammar;

/// What to do with a token whose kind has no declared directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownPolicy {
    /// Fail the build with [`BuildError::UnexpectedDirective`].
    #[default]
    Reject,
    /// Drop the token silently.
    Ignore,
}

/// Builder for constructing a [`RuleSet`].
///
/// Directives are declared via closures and compiled into an immutable,
/// thread-safe rule set. `C` is the candidate entity type boolean clauses
/// are matched against; numeric grammars leave it as `()`.
///
/// # Example
///
/// ```
/// use std::fmt;
/// use cogquery::{GrammarBuilder, RuleSetBuilder, transform};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Tok { Name, Min }
///
/// impl fmt::Display for Tok {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}", match self { Tok::Name => "NAME", Tok::Min => "MIN" })
///     }
/// }
///
/// struct Item { name: &'static str, level: i64 }
///
/// let grammar = GrammarBuilder::new()
///     .token(Tok::Min, r"min\((\d+)\)", transform::int(1))
///     .token(Tok::Name, r"\w+", transform::matched())
///     .build()
///     .unwrap();
///
/// let rules = RuleSetBuilder::<Tok, Item>::new()
///     .multi(Tok::Name, |d| d.matches(|v, item| v.as_text() == Some(item.name)))
///     .single(Tok::Min, |d| d.range(1, 99).matches(|v, item| v.as_int() <= Some(item.level)))
///     .compile()
///     .unwrap();
///
/// let config = rules.parse("sword shield min(10)", &grammar).unwrap();
/// assert!(rules.evaluate(&config, &Item { name: "shield", level: 12 }));
/// assert!(!rules.evaluate(&config, &Item { name: "shield", level: 3 }));
/// ```
pub struct RuleSetBuilder<K, C: ?Sized = ()> {
    directives: Vec<Directive<K, C>>,
    unknown: UnknownPolicy,
    require_clause: bool,
    finish: Finisher<K>,
}

/// Intermediate builder passed to the directive declaration closure.
pub struct DirectiveBuilder<K, C: ?Sized> {
    directive: Directive<K, C>,
}

fn identity<K>(base: f64, _clauses: usize, _config: &Config<K>) -> f64 {
    base
}

impl<K: Kind, C: ?Sized> Default for RuleSetBuilder<K, C> {
    fn default() -> Self {
        Self {
            directives: Vec::new(),
            unknown: UnknownPolicy::Reject,
            require_clause: true,
            finish: identity::<K>,
        }
    }
}

impl<K: Kind, C: ?Sized> RuleSetBuilder<K, C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a directive that may appear at most once.
    #[must_use]
    pub fn single(
        self,
        kind: K,
        f: impl FnOnce(DirectiveBuilder<K, C>) -> DirectiveBuilder<K, C>,
    ) -> Self {
        self.declare(kind, Arity::Single, f)
    }

    /// Declare a directive whose occurrences accumulate, in order, as clauses.
    #[must_use]
    pub fn multi(
        self,
        kind: K,
        f: impl FnOnce(DirectiveBuilder<K, C>) -> DirectiveBuilder<K, C>,
    ) -> Self {
        self.declare(kind, Arity::Multi, f)
    }

    fn declare(
        mut self,
        kind: K,
        arity: Arity,
        f: impl FnOnce(DirectiveBuilder<K, C>) -> DirectiveBuilder<K, C>,
    ) -> Self {
        let builder = f(DirectiveBuilder {
            directive: Directive::new(kind, arity),
        });
        self.directives.push(builder.directive);
        self
    }

    /// Drop tokens whose kind has no declared directive instead of failing.
    #[must_use]
    pub fn ignore_unknown(mut self) -> Self {
        self.unknown = UnknownPolicy::Ignore;
        self
    }

    /// Whether a query with no clauses is rejected. Defaults to `true`.
    #[must_use]
    pub fn require_clause(mut self, required: bool) -> Self {
        self.require_clause = required;
        self
    }

    /// Set the function that turns summed base terms into the final score.
    #[must_use]
    pub fn finish(mut self, finish: Finisher<K>) -> Self {
        self.finish = finish;
        self
    }

    /// Compile the declarations into an immutable `RuleSet`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if a directive is declared twice or has an
    /// unusable default.
    pub fn compile(self) -> Result<RuleSet<K, C>, CompileError> {
        let mut seen = HashSet::new();
        for directive in &self.directives {
            if !seen.insert(directive.kind) {
                return Err(CompileError::DuplicateDeclaration {
                    kind: directive.kind.to_string(),
                });
            }
            if let Some(default) = &directive.default {
                if directive.arity == Arity::Multi {
                    return Err(CompileError::DefaultOnMulti {
                        kind: directive.kind.to_string(),
                    });
                }
                directive
                    .validate(default)
                    .map_err(|e| CompileError::InvalidDefault {
                        kind: directive.kind.to_string(),
                        reason: e.to_string(),
                    })?;
            }
        }

        let slots = self
            .directives
            .iter()
            .enumerate()
            .map(|(i, d)| (d.kind, i))
            .collect();

        Ok(RuleSet {
            directives: self.directives,
            slots,
            unknown: self.unknown,
            require_clause: self.require_clause,
            finish: self.finish,
        })
    }
}

impl<K: Kind, C: ?Sized> DirectiveBuilder<K, C> {
    /// Value used when a single-valued directive is absent.
    #[must_use]
    pub fn default(mut self, value: impl Into<TypedValue>) -> Self {
        self.directive.default = Some(value.into());
        self
    }

    /// Fail the build if the directive is absent and has no default.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.directive.required = true;
        self
    }

    /// Constrain a numeric value to `[min, max]`, inclusive.
    #[must_use]
    pub fn range(mut self, min: impl Into<f64>, max: impl Into<f64>) -> Self {
        self.directive.constraints.push(Constraint::Range {
            min: min.into(),
            max: max.into(),
        });
        self
    }

    /// Constrain every string in the value to a fixed vocabulary.
    #[must_use]
    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.directive.constraints.push(Constraint::OneOf(allowed));
        self
    }

    #[must_use]
    pub fn check(mut self, check: fn(&TypedValue) -> Result<(), String>) -> Self {
        self.directive.constraints.push(Constraint::Check(check));
        self
    }

    /// Make each occurrence a filter clause, matched against candidates with `matcher`.
    #[must_use]
    pub fn matches(mut self, matcher: Matcher<C>) -> Self {
        self.directive.role = Role::Filter(matcher);
        self
    }

    /// Make each occurrence a score clause contributing `scorer`'s base term.
    #[must_use]
    pub fn scores(mut self, scorer: Scorer<K>) -> Self {
        self.directive.role = Role::Score(scorer);
        self
    }
}

/// A compiled, immutable rule set. Thread-safe and designed to live in a
/// `static` or behind `Arc`.
pub struct RuleSet<K, C: ?Sized = ()> {
    pub(crate) directives: Vec<Directive<K, C>>,
    /// Directive kind to its index in `directives`.
    pub(crate) slots: HashMap<K, usize>,
    pub(crate) unknown: UnknownPolicy,
    pub(crate) require_clause: bool,
    pub(crate) finish: Finisher<K>,
}

impl<K: Kind, C: ?Sized> RuleSet<K, C> {
    /// Fold a token stream into a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if a directive repeats, fails validation, or no
    /// clause was given. No partially built config is ever returned.
    pub fn build(&self, tokens: impl IntoIterator<Item = Token<K>>) -> Result<Config<K>, BuildError> {
        crate::build::build(tokens, self)
    }

    /// Tokenize `input` with `grammar` and build the result.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`](crate::QueryError) on lexical or build failure.
    pub fn parse(&self, input: &str, grammar: &Grammar<K>) -> Result<Config<K>, crate::QueryError> {
        let tokens = crate::lex::tokenize(input, grammar)?;
        Ok(self.build(tokens)?)
    }

    /// Decide whether `candidate` satisfies `config`.
    ///
    /// Every clause category present must match (AND); within a category at
    /// least one clause must match (OR).
    #[must_use]
    pub fn evaluate(&self, config: &Config<K>, candidate: &C) -> bool {
        crate::evaluate::evaluate(self, config, candidate)
    }

    /// Evaluate with per-category diagnostics.
    pub fn evaluate_detailed(&self, config: &Config<K>, candidate: &C) -> EvaluationReport {
        crate::evaluate::evaluate_detailed(self, config, candidate)
    }

    /// Keep the candidates that satisfy `config`, preserving order.
    pub fn filter<'c, I>(&self, config: &Config<K>, candidates: I) -> Vec<&'c C>
    where
        I: IntoIterator<Item = &'c C>,
        C: 'c,
    {
        candidates
            .into_iter()
            .filter(|c| self.evaluate(config, c))
            .collect()
    }

    /// Compute the numeric score of `config`: base terms summed in
    /// declaration then input order, then passed through the finisher.
    #[must_use]
    pub fn compute(&self, config: &Config<K>) -> f64 {
        crate::evaluate::compute(self, config)
    }

    /// The declared directives, in declaration order.
    #[must_use]
    pub fn directives(&self) -> &[Directive<K, C>] {
        &self.directives
    }

    pub(crate) fn directive(&self, kind: K) -> Option<&Directive<K, C>> {
        self.slots.get(&kind).map(|&i| &self.directives[i])
    }
}

impl<K: Kind, C: ?Sized> fmt::Debug for RuleSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("directives", &self.directives)
            .field("unknown", &self.unknown)
            .field("require_clause", &self.require_clause)
            .finish_non_exhaustive()
    }
}

impl<K: Kind, C: ?Sized> fmt::Display for RuleSet<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses = self.directives.iter().filter(|d| d.is_clause()).count();
        write!(
            f,
            "RuleSet({} directives, {} clause kinds)",
            self.directives.len(),
            clauses,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum K {
        Atk,
        Row,
    }

    impl fmt::Display for K {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                K::Atk => write!(f, "ATK"),
                K::Row => write!(f, "ROW"),
            }
        }
    }

    #[test]
    fn builder_collects_directives() {
        let builder = RuleSetBuilder::<K>::new()
            .single(K::Atk, |d| d.default(1_i64).range(1, 100))
            .multi(K::Row, |d| d.range(3, 30).scores(|v, _| v.as_float().unwrap_or(0.0)));

        assert_eq!(builder.directives.len(), 2);
        assert_eq!(builder.directives[0].kind, K::Atk);
        assert_eq!(builder.directives[0].arity, Arity::Single);
        assert!(!builder.directives[0].is_clause());
        assert_eq!(builder.directives[1].arity, Arity::Multi);
        assert!(builder.directives[1].is_clause());
    }

    #[test]
    fn compile_rejects_duplicate_declaration() {
        let result = RuleSetBuilder::<K>::new()
            .single(K::Atk, |d| d)
            .multi(K::Atk, |d| d)
            .compile();
        assert!(matches!(
            result,
            Err(CompileError::DuplicateDeclaration { kind }) if kind == "ATK"
        ));
    }

    #[test]
    fn compile_rejects_default_outside_range() {
        let result = RuleSetBuilder::<K>::new()
            .single(K::Atk, |d| d.default(0_i64).range(1, 100))
            .compile();
        assert!(matches!(result, Err(CompileError::InvalidDefault { .. })));
    }

    #[test]
    fn compile_rejects_default_on_multi() {
        let result = RuleSetBuilder::<K>::new()
            .multi(K::Row, |d| d.default(6_i64))
            .compile();
        assert!(matches!(result, Err(CompileError::DefaultOnMulti { .. })));
    }

    #[test]
    fn display_counts() {
        let rules = RuleSetBuilder::<K>::new()
            .single(K::Atk, |d| d)
            .multi(K::Row, |d| d.scores(|_, _| 1.0))
            .compile()
            .unwrap();
        assert_eq!(rules.to_string(), "RuleSet(2 directives, 1 clause kinds)");
    }
}
