use std::fmt;

use regex::{Captures, Regex, RegexBuilder};

use super::error::GrammarError;
use super::transform::Transform;
use crate::types::Kind;

/// Resource limits applied while tokenizing with a grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Longest accepted input, in characters.
    pub max_input_len: usize,
    /// Compiled-program budget, in bytes, for grammar patterns and for
    /// user-supplied regexes produced by [`transform::pattern`](super::transform::pattern).
    pub regex_size_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_len: 2000,
            regex_size_limit: 1 << 20,
        }
    }
}

pub(crate) struct Entry<K> {
    /// `None` marks a skip pattern.
    pub(crate) kind: Option<K>,
    pub(crate) regex: Regex,
    pub(crate) transform: Option<Transform>,
}

impl<K: Kind> Entry<K> {
    /// Match anchored at the start of `rest`. Empty matches never count;
    /// `build` rejects patterns that match the empty input, but an assertion
    /// such as `\b` can still match empty in context.
    pub(crate) fn captures<'h>(&self, rest: &'h str) -> Option<Captures<'h>> {
        self.regex
            .captures(rest)
            .filter(|caps| caps.get(0).is_some_and(|m| !m.is_empty()))
    }
}

/// An ordered list of token patterns.
///
/// Patterns are tried in declaration order and the first one that matches
/// at the scan position wins, even when a later pattern would match more
/// text. Declare specific patterns (`rows(N)`) before the general ones they
/// share a prefix with (`row`). Whitespace is always skipped.
pub struct Grammar<K> {
    pub(crate) entries: Vec<Entry<K>>,
    pub(crate) limits: Limits,
}

impl<K: Kind> Grammar<K> {
    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Token kinds in the order their patterns are tried. Skip patterns are omitted.
    pub fn kinds(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().filter_map(|e| e.kind)
    }
}

impl<K: Kind> fmt::Debug for Grammar<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns: Vec<String> = self
            .entries
            .iter()
            .map(|e| match e.kind {
                Some(kind) => format!("{kind} {}", e.regex.as_str()),
                None => format!("skip {}", e.regex.as_str()),
            })
            .collect();
        f.debug_struct("Grammar")
            .field("patterns", &patterns)
            .field("limits", &self.limits)
            .finish()
    }
}

/// Builder for a [`Grammar`].
pub struct GrammarBuilder<K> {
    entries: Vec<(Option<K>, String, Option<Transform>)>,
    limits: Limits,
}

impl<K: Kind> Default for GrammarBuilder<K> {
    fn default() -> Self {
        Self {
            entries: vec![(None, r"\s+".to_owned(), None)],
            limits: Limits::default(),
        }
    }
}

impl<K: Kind> GrammarBuilder<K> {
    /// A builder with only the whitespace skip pattern.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token pattern. `transform` turns the match into the token's value.
    #[must_use]
    pub fn token(mut self, kind: K, pattern: &str, transform: Transform) -> Self {
        self.entries
            .push((Some(kind), pattern.to_owned(), Some(transform)));
        self
    }

    /// Append a pattern whose matches are consumed without producing a token.
    #[must_use]
    pub fn skip(mut self, pattern: &str) -> Self {
        self.entries.push((None, pattern.to_owned(), None));
        self
    }

    #[must_use]
    pub fn max_input_len(mut self, chars: usize) -> Self {
        self.limits.max_input_len = chars;
        self
    }

    #[must_use]
    pub fn regex_size_limit(mut self, bytes: usize) -> Self {
        self.limits.regex_size_limit = bytes;
        self
    }

    /// Compile every pattern, anchored at the scan position.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError::InvalidPattern`] if a pattern does not compile
    /// and [`GrammarError::EmptyMatch`] if it matches the empty string.
    pub fn build(self) -> Result<Grammar<K>, GrammarError> {
        let limits = self.limits;
        let entries = self
            .entries
            .into_iter()
            .map(|(kind, pattern, transform)| -> Result<Entry<K>, GrammarError> {
                let name = kind.map_or_else(|| "skip".to_owned(), |k| k.to_string());
                let regex = RegexBuilder::new(&format!("^(?:{pattern})"))
                    .size_limit(limits.regex_size_limit)
                    .build()
                    .map_err(|e| GrammarError::InvalidPattern {
                        kind: name.clone(),
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    })?;
                if regex.is_match("") {
                    return Err(GrammarError::EmptyMatch {
                        kind: name,
                        pattern,
                    });
                }
                Ok(Entry {
                    kind,
                    regex,
                    transform,
                })
            })
            .collect::<Result<Vec<_>, GrammarError>>()?;

        Ok(Grammar { entries, limits })
    }
}
