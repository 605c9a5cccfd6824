//! Monster search, e.g. `type(dragon, healer) attr(fire) gorgon min_atk(1000)`.
//!
//! Every directive is a filter. Repeating one widens the search (OR), using
//! different ones narrows it (AND). A bare word is a name fragment.

use std::fmt;

use once_cell::sync::Lazy;

use crate::lex::{transform, Grammar, GrammarBuilder, GrammarError};
use crate::types::{CompileError, Config, RuleSet, RuleSetBuilder, TypedValue};
use crate::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Search {
    Name,
    Type,
    Attr,
    Rarity,
    MinAtk,
}

impl fmt::Display for Search {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Search::Name => "NAME",
            Search::Type => "TYPE",
            Search::Attr => "ATTR",
            Search::Rarity => "RARITY",
            Search::MinAtk => "MIN_ATK",
        };
        write!(f, "{name}")
    }
}

pub const TYPES: &[&str] = &[
    "balanced", "physical", "healer", "dragon", "god", "attacker", "devil", "machine", "awoken",
    "enhance", "evo", "redeemable",
];

pub const ATTRIBUTES: &[&str] = &["fire", "water", "wood", "light", "dark", "none"];

/// A searchable game-data record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    pub id: u32,
    pub name: String,
    pub types: Vec<String>,
    pub attribute: String,
    pub sub_attribute: Option<String>,
    pub rarity: i64,
    pub atk: i64,
}

/// Argument text up to the closing parenthesis. Quoted items may contain `)`.
const ARGS: &str = r#"((?:"(?:[^"\\]|\\.)*"|[^)"])*)"#;

static GRAMMAR: Lazy<Result<Grammar<Search>, GrammarError>> = Lazy::new(|| {
    // The bare-word pattern is the catch-all and must stay last.
    GrammarBuilder::new()
        .token(Search::Name, &format!(r"(?i)name\({ARGS}\)"), transform::list(1))
        .token(Search::Type, &format!(r"(?i)type\({ARGS}\)"), transform::list(1))
        .token(Search::Attr, &format!(r"(?i)attr\({ARGS}\)"), transform::list(1))
        .token(Search::Rarity, r"(?i)rarity\((\d+)\)", transform::int(1))
        .token(Search::MinAtk, r"(?i)min_atk\((\d+)\)", transform::int(1))
        .token(Search::Name, r#"[^\s()",]+"#, transform::list(0))
        .build()
});

static RULES: Lazy<Result<RuleSet<Search, Monster>, CompileError>> = Lazy::new(|| {
    RuleSetBuilder::<Search, Monster>::new()
        .multi(Search::Name, |d| d.matches(name_matches))
        .multi(Search::Type, |d| d.one_of(TYPES).matches(type_matches))
        .multi(Search::Attr, |d| d.one_of(ATTRIBUTES).matches(attr_matches))
        .multi(Search::Rarity, |d| d.range(1, 10).matches(rarity_matches))
        .single(Search::MinAtk, |d| d.range(0, 1_000_000).matches(min_atk_matches))
        .compile()
});

/// The search grammar, built on first use.
///
/// # Errors
///
/// Returns [`GrammarError`] if the built-in patterns fail to compile.
pub fn grammar() -> Result<&'static Grammar<Search>, GrammarError> {
    GRAMMAR.as_ref().map_err(Clone::clone)
}

/// The search rule set, built on first use.
///
/// # Errors
///
/// Returns [`CompileError`] if the built-in declarations are inconsistent.
pub fn rules() -> Result<&'static RuleSet<Search, Monster>, CompileError> {
    RULES.as_ref().map_err(Clone::clone)
}

/// Parse a search query into a validated [`Config`].
///
/// # Errors
///
/// Returns [`QueryError`] on lexical or validation failure, or if the query
/// has no filter at all.
pub fn parse(input: &str) -> Result<Config<Search>, QueryError> {
    rules()?.parse(input, grammar()?)
}

/// Every monster matching `input`, in collection order.
///
/// # Errors
///
/// Returns [`QueryError`] if the query does not parse.
pub fn search<'m>(input: &str, monsters: &'m [Monster]) -> Result<Vec<&'m Monster>, QueryError> {
    let config = parse(input)?;
    Ok(rules()?.filter(&config, monsters))
}

fn name_matches(value: &TypedValue, monster: &Monster) -> bool {
    let name = monster.name.to_lowercase();
    value.strings().any(|n| name.contains(&n.to_lowercase()))
}

fn type_matches(value: &TypedValue, monster: &Monster) -> bool {
    value
        .strings()
        .any(|t| monster.types.iter().any(|mt| mt.eq_ignore_ascii_case(t)))
}

fn attr_matches(value: &TypedValue, monster: &Monster) -> bool {
    value.strings().any(|a| {
        monster.attribute.eq_ignore_ascii_case(a)
            || monster
                .sub_attribute
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(a))
    })
}

fn rarity_matches(value: &TypedValue, monster: &Monster) -> bool {
    value.as_int() == Some(monster.rarity)
}

fn min_atk_matches(value: &TypedValue, monster: &Monster) -> bool {
    value.as_int().is_some_and(|min| monster.atk >= min)
}
