//! Message moderation: named blacklist and whitelist entries, each a query
//! over the message text.
//!
//! ```text
//! :has_link: /disc(or)?d\.gg/      special matcher AND regex
//! "free nitro" "steam gift"        either phrase
//! scam                             whole word
//! ```
//!
//! A message is flagged when some blacklist entry matches it and no
//! whitelist entry does.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::lex::transform::{self, compile_pattern};
use crate::lex::{Grammar, GrammarBuilder, GrammarError, Limits, Transform};
use crate::types::{CompileError, Config, RuleSet, RuleSetBuilder, TypedValue};
use crate::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Moderation {
    Special,
    Regex,
    Phrase,
    Word,
}

impl fmt::Display for Moderation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Moderation::Special => "SPECIAL",
            Moderation::Regex => "REGEX",
            Moderation::Phrase => "PHRASE",
            Moderation::Word => "WORD",
        };
        write!(f, "{name}")
    }
}

// -- Special matchers -------------------------------------------------------

/// Built-in message checks, written `:name:` in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Special {
    StartsWithCode,
    AllCaps,
    HasLink,
    HasMention,
}

/// Letters a message needs before [`Special::AllCaps`] can fire.
pub const ALL_CAPS_MIN_LETTERS: usize = 5;

const SPECIALS: &[(&str, Special)] = &[
    ("starts_with_code", Special::StartsWithCode),
    ("all_caps", Special::AllCaps),
    ("has_link", Special::HasLink),
    ("has_mention", Special::HasMention),
];

impl Special {
    /// Look up a matcher by its query name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        SPECIALS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, s)| s)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        SPECIALS
            .iter()
            .find(|(_, s)| *s == self)
            .map_or("", |&(n, _)| n)
    }

    #[must_use]
    pub fn matches(self, text: &str) -> bool {
        match self {
            Special::StartsWithCode => text.trim_start().starts_with("```"),
            Special::AllCaps => {
                let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
                letters.len() >= ALL_CAPS_MIN_LETTERS && letters.iter().all(|c| c.is_uppercase())
            }
            Special::HasLink => text.contains("http://") || text.contains("https://"),
            Special::HasMention => text.contains("<@"),
        }
    }
}

impl fmt::Display for Special {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}:", self.name())
    }
}

// -- Grammar and rules ------------------------------------------------------

/// `/.../` with `\/` standing for a literal slash.
fn regex_literal() -> Transform {
    Box::new(|caps: &Captures<'_>, limits: &Limits| {
        let source = caps
            .get(1)
            .map(|m| m.as_str().replace(r"\/", "/"))
            .ok_or_else(|| "missing pattern".to_owned())?;
        compile_pattern(&source, limits)
    })
}

static GRAMMAR: Lazy<Result<Grammar<Moderation>, GrammarError>> = Lazy::new(|| {
    GrammarBuilder::new()
        .token(Moderation::Special, r":(\w+):", transform::text(1))
        .token(Moderation::Regex, r"/((?:[^/\\]|\\.)+)/", regex_literal())
        .token(Moderation::Phrase, r#""([^"]*)""#, transform::text(1))
        .token(Moderation::Word, r"\w+", transform::matched())
        .build()
});

static RULES: Lazy<Result<RuleSet<Moderation, str>, CompileError>> = Lazy::new(|| {
    RuleSetBuilder::<Moderation, str>::new()
        .multi(Moderation::Special, |d| d.check(known_special).matches(special_matches))
        .multi(Moderation::Regex, |d| d.matches(regex_matches))
        .multi(Moderation::Phrase, |d| d.check(non_empty).matches(phrase_matches))
        .multi(Moderation::Word, |d| d.matches(word_matches))
        .compile()
});

/// The moderation grammar, built on first use.
///
/// # Errors
///
/// Returns [`GrammarError`] if the built-in patterns fail to compile.
pub fn grammar() -> Result<&'static Grammar<Moderation>, GrammarError> {
    GRAMMAR.as_ref().map_err(Clone::clone)
}

/// The moderation rule set, built on first use.
///
/// # Errors
///
/// Returns [`CompileError`] if the built-in declarations are inconsistent.
pub fn rules() -> Result<&'static RuleSet<Moderation, str>, CompileError> {
    RULES.as_ref().map_err(Clone::clone)
}

/// Parse one moderation entry.
///
/// # Errors
///
/// Returns [`QueryError`] for unknown `:name:` matchers, invalid or oversized
/// regexes, empty phrases and entries with no clause at all.
pub fn parse(input: &str) -> Result<Config<Moderation>, QueryError> {
    rules()?.parse(input, grammar()?)
}

fn non_empty(value: &TypedValue) -> Result<(), String> {
    match value.as_text() {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err("phrase must not be empty".to_owned()),
    }
}

fn known_special(value: &TypedValue) -> Result<(), String> {
    match value.as_text() {
        Some(name) if Special::from_name(name).is_some() => Ok(()),
        _ => {
            let names: Vec<&str> = SPECIALS.iter().map(|&(n, _)| n).collect();
            Err(format!(
                "unknown matcher '{value}', expected one of: {}",
                names.join(", ")
            ))
        }
    }
}

fn special_matches(value: &TypedValue, text: &str) -> bool {
    value
        .as_text()
        .and_then(Special::from_name)
        .is_some_and(|s| s.matches(text))
}

fn regex_matches(value: &TypedValue, text: &str) -> bool {
    value.as_pattern().is_some_and(|p| p.is_match(text))
}

fn phrase_matches(value: &TypedValue, text: &str) -> bool {
    value
        .as_text()
        .is_some_and(|p| text.to_lowercase().contains(&p.to_lowercase()))
}

/// Same word definition as the grammar's `Word` token.
static WORD: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"\w+"));

fn word_matches(value: &TypedValue, text: &str) -> bool {
    let (Some(word), Ok(words)) = (value.as_text().map(str::to_lowercase), WORD.as_ref()) else {
        return false;
    };
    words
        .find_iter(text)
        .any(|w| w.as_str().to_lowercase() == word)
}

// -- Settings ---------------------------------------------------------------

/// Named blacklist and whitelist entries as stored per server.
///
/// Entries are validated when added. Settings loaded from elsewhere are
/// validated again by [`compile()`](Self::compile).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModerationSettings {
    pub blacklist: BTreeMap<String, String>,
    pub whitelist: BTreeMap<String, String>,
}

impl ModerationSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a blacklist entry.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if `query` does not parse; the settings are
    /// left unchanged.
    pub fn add_blacklist(
        &mut self,
        name: impl Into<String>,
        query: impl Into<String>,
    ) -> Result<(), QueryError> {
        let query = query.into();
        parse(&query)?;
        self.blacklist.insert(name.into(), query);
        Ok(())
    }

    /// Add or replace a whitelist entry.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if `query` does not parse; the settings are
    /// left unchanged.
    pub fn add_whitelist(
        &mut self,
        name: impl Into<String>,
        query: impl Into<String>,
    ) -> Result<(), QueryError> {
        let query = query.into();
        parse(&query)?;
        self.whitelist.insert(name.into(), query);
        Ok(())
    }

    pub fn remove_blacklist(&mut self, name: &str) -> Option<String> {
        self.blacklist.remove(name)
    }

    pub fn remove_whitelist(&mut self, name: &str) -> Option<String> {
        self.whitelist.remove(name)
    }

    /// Parse every entry into a [`Moderator`].
    ///
    /// # Errors
    ///
    /// Returns the first [`QueryError`] found, in name order, blacklist first.
    pub fn compile(&self) -> Result<Moderator, QueryError> {
        let moderator = Moderator {
            rules: rules()?,
            blacklist: compile_entries(&self.blacklist)?,
            whitelist: compile_entries(&self.whitelist)?,
        };
        debug!(
            blacklist = moderator.blacklist.len(),
            whitelist = moderator.whitelist.len(),
            "compiled moderation settings"
        );
        Ok(moderator)
    }
}

fn compile_entries(
    entries: &BTreeMap<String, String>,
) -> Result<Vec<(String, Config<Moderation>)>, QueryError> {
    entries
        .iter()
        .map(|(name, query)| Ok((name.clone(), parse(query)?)))
        .collect()
}

/// Compiled settings, ready to check messages against.
///
/// Cheap to share: wrap it in a [`Snapshot`](crate::Snapshot) and swap in a
/// new one when the settings change.
#[derive(Debug, Clone)]
pub struct Moderator {
    rules: &'static RuleSet<Moderation, str>,
    blacklist: Vec<(String, Config<Moderation>)>,
    whitelist: Vec<(String, Config<Moderation>)>,
}

impl Moderator {
    /// The name of the first blacklist entry (in name order) matching
    /// `text`, or `None` if nothing matches or a whitelist entry does.
    #[must_use]
    pub fn check(&self, text: &str) -> Option<&str> {
        let (name, _) = self
            .blacklist
            .iter()
            .find(|(_, config)| self.rules.evaluate(config, text))?;
        if self
            .whitelist
            .iter()
            .any(|(_, config)| self.rules.evaluate(config, text))
        {
            return None;
        }
        Some(name.as_str())
    }

    #[must_use]
    pub fn is_flagged(&self, text: &str) -> bool {
        self.check(text).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blacklist.len() + self.whitelist.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
