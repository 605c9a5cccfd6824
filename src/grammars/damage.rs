//! Damage estimates for a match-three combo, e.g.
//! `atk(100) rows(1) row row(8) tpa orb(5) combo(2)`.
//!
//! | directive  | arity  | default | range       | meaning                              |
//! |------------|--------|---------|-------------|--------------------------------------|
//! | `rows(N)`  | single | 0       | 0..=100     | row-enhance awakenings               |
//! | `tpas(N)`  | single | 0       | 0..=100     | two-pronged-attack awakenings        |
//! | `atk(N)`   | single | 1       | 1..=1000000 | attack stat                          |
//! | `mult(F)`  | single | 1       | 0..=1000    | flat multiplier                      |
//! | `combo(N)` | single | 0       | 0..=100     | extra combos not listed as clauses   |
//! | `tpa`      | multi  |         |             | a four-orb match                     |
//! | `row[(N)]` | multi  | 6 orbs  | 3..=30      | a full-row match                     |
//! | `orb(N)`   | multi  |         | 3..=30      | any other match of N orbs            |

use std::fmt;

use once_cell::sync::Lazy;

use crate::lex::{transform, Grammar, GrammarBuilder, GrammarError};
use crate::types::{CompileError, Config, RuleSet, RuleSetBuilder, TypedValue};
use crate::QueryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Damage {
    Rows,
    Tpas,
    Atk,
    Mult,
    Combo,
    Tpa,
    Row,
    Orb,
}

impl fmt::Display for Damage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Damage::Rows => "ROWS",
            Damage::Tpas => "TPAS",
            Damage::Atk => "ATK",
            Damage::Mult => "MULT",
            Damage::Combo => "COMBO",
            Damage::Tpa => "TPA",
            Damage::Row => "ROW",
            Damage::Orb => "ORB",
        };
        write!(f, "{name}")
    }
}

/// Orbs in a full row of the standard 6x5 board.
pub const ROW_ORBS: i64 = 6;

static GRAMMAR: Lazy<Result<Grammar<Damage>, GrammarError>> = Lazy::new(|| {
    // `rows`/`tpas` must precede `row`/`tpa`: first match wins.
    GrammarBuilder::new()
        .token(Damage::Rows, r"(?i)rows\((\d+)\)", transform::int(1))
        .token(Damage::Tpas, r"(?i)tpas\((\d+)\)", transform::int(1))
        .token(Damage::Atk, r"(?i)atk\((\d+)\)", transform::int(1))
        .token(Damage::Mult, r"(?i)mult\((\d+(?:\.\d+)?)\)", transform::float_or(1, 1.0))
        .token(Damage::Combo, r"(?i)combo\((\d+)\)", transform::int(1))
        .token(Damage::Tpa, r"(?i)tpa", transform::int_or(1, 4))
        .token(Damage::Row, r"(?i)row(?:\((\d+)\))?", transform::int_or(1, ROW_ORBS))
        .token(Damage::Orb, r"(?i)orb\((\d+)\)", transform::int(1))
        .build()
});

static RULES: Lazy<Result<RuleSet<Damage>, CompileError>> = Lazy::new(|| {
    RuleSetBuilder::new()
        .single(Damage::Rows, |d| d.default(0_i64).range(0, 100))
        .single(Damage::Tpas, |d| d.default(0_i64).range(0, 100))
        .single(Damage::Atk, |d| d.default(1_i64).range(1, 1_000_000))
        .single(Damage::Mult, |d| d.default(1.0).range(0, 1000))
        .single(Damage::Combo, |d| d.default(0_i64).range(0, 100))
        .multi(Damage::Row, |d| d.range(3, 30).scores(match_base))
        .multi(Damage::Tpa, |d| d.scores(tpa_base))
        .multi(Damage::Orb, |d| d.range(3, 30).scores(match_base))
        .finish(finish)
        .compile()
});

/// The damage grammar, built on first use.
///
/// # Errors
///
/// Returns [`GrammarError`] if the built-in patterns fail to compile.
pub fn grammar() -> Result<&'static Grammar<Damage>, GrammarError> {
    GRAMMAR.as_ref().map_err(Clone::clone)
}

/// The damage rule set, built on first use.
///
/// # Errors
///
/// Returns [`CompileError`] if the built-in declarations are inconsistent.
pub fn rules() -> Result<&'static RuleSet<Damage>, CompileError> {
    RULES.as_ref().map_err(Clone::clone)
}

/// Parse a damage query into a validated [`Config`].
///
/// # Errors
///
/// Returns [`QueryError`] on lexical or validation failure, including a
/// query with no `row`, `tpa` or `orb` clause.
pub fn parse(input: &str) -> Result<Config<Damage>, QueryError> {
    rules()?.parse(input, grammar()?)
}

/// Estimate the damage of a combo, truncated to a whole number.
///
/// # Errors
///
/// Returns [`QueryError`] if the query does not parse.
#[allow(clippy::cast_possible_truncation)]
pub fn estimate(input: &str) -> Result<i64, QueryError> {
    let config = parse(input)?;
    Ok(rules()?.compute(&config).trunc() as i64)
}

#[allow(clippy::cast_precision_loss)]
fn atk(config: &Config<Damage>) -> f64 {
    config.int(Damage::Atk).unwrap_or(1) as f64
}

/// `atk * (1 + (orbs - 3) * 0.25)`
#[allow(clippy::cast_precision_loss)]
fn match_base(value: &TypedValue, config: &Config<Damage>) -> f64 {
    let orbs = value.as_int().unwrap_or(3);
    atk(config) * (1.0 + (orbs - 3) as f64 * 0.25)
}

/// A four-orb match, boosted by `1.5` per two-pronged-attack awakening.
#[allow(clippy::cast_possible_truncation)]
fn tpa_base(value: &TypedValue, config: &Config<Damage>) -> f64 {
    let tpas = config.int(Damage::Tpas).unwrap_or(0);
    match_base(value, config) * 1.5_f64.powi(tpas as i32)
}

/// `base * combo_mult * row_mult * mult`, in that order.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn finish(base: f64, clauses: usize, config: &Config<Damage>) -> f64 {
    let combos = clauses as i64 + config.int(Damage::Combo).unwrap_or(0);
    let combo_mult = 1.0 + (combos - 1) as f64 * 0.25;

    let rows = config.int(Damage::Rows).unwrap_or(0) as f64;
    let row_count = config.values(Damage::Row).len() as f64;
    let row_mult = 1.0 + rows / 10.0 * row_count;

    let mult = config.float(Damage::Mult).unwrap_or(1.0);

    base * combo_mult * row_mult * mult
}
