use std::fmt;

use cogquery::grammars::{damage, search};
use cogquery::{
    build, BuildError, CompileError, GrammarBuilder, LexError, QueryError, RuleSetBuilder, Token,
    TypedValue,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum K {
    Limit,
    Mode,
    Hit,
    Stray,
}

impl fmt::Display for K {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{self:?}").to_uppercase())
    }
}

fn tok(kind: K, value: impl Into<TypedValue>) -> Token<K> {
    Token {
        kind,
        value: value.into(),
        raw: String::new(),
        position: 0,
    }
}

#[test]
fn duplicate_declaration_rejected() {
    let result = RuleSetBuilder::<K>::new()
        .single(K::Limit, |d| d)
        .multi(K::Limit, |d| d)
        .compile();
    assert_eq!(
        result.unwrap_err(),
        CompileError::DuplicateDeclaration { kind: "LIMIT".into() }
    );
}

#[test]
fn default_outside_range_rejected_at_compile() {
    let result = RuleSetBuilder::<K>::new()
        .single(K::Limit, |d| d.default(500_i64).range(0, 100))
        .compile();
    assert!(matches!(result, Err(CompileError::InvalidDefault { .. })));
}

#[test]
fn default_on_multi_rejected() {
    let result = RuleSetBuilder::<K>::new()
        .multi(K::Hit, |d| d.default(1_i64))
        .compile();
    assert!(matches!(result, Err(CompileError::DefaultOnMulti { .. })));
}

#[test]
fn required_directive_must_be_present() {
    let rules = RuleSetBuilder::<K>::new()
        .single(K::Mode, |d| d.required())
        .require_clause(false)
        .compile()
        .unwrap();
    assert_eq!(
        build(Vec::new(), &rules),
        Err(BuildError::MissingDirective { kind: "MODE".into() })
    );
    assert!(build(vec![tok(K::Mode, "fast")], &rules).is_ok());
}

#[test]
fn required_with_default_is_satisfied() {
    let rules = RuleSetBuilder::<K>::new()
        .single(K::Mode, |d| d.required().default("slow"))
        .require_clause(false)
        .compile()
        .unwrap();
    let config = build(Vec::new(), &rules).unwrap();
    assert_eq!(config.text(K::Mode), Some("slow"));
    assert!(!config.is_set(K::Mode));
}

#[test]
fn defaults_never_count_as_clauses() {
    let rules = RuleSetBuilder::<K>::new()
        .single(K::Limit, |d| d.default(10_i64))
        .multi(K::Hit, |d| d.scores(|_, _| 1.0))
        .compile()
        .unwrap();
    assert_eq!(build(Vec::new(), &rules), Err(BuildError::NoClauses));
}

#[test]
fn clause_check_can_be_disabled() {
    let rules = RuleSetBuilder::<K>::new()
        .multi(K::Hit, |d| d.scores(|_, _| 1.0))
        .require_clause(false)
        .compile()
        .unwrap();
    let config = build(Vec::new(), &rules).unwrap();
    assert_eq!(config.clause_count(), 0);
    assert_eq!(rules.compute(&config), 0.0);
}

#[test]
fn unknown_kind_rejected_by_default() {
    let rules = RuleSetBuilder::<K>::new()
        .multi(K::Hit, |d| d.scores(|_, _| 1.0))
        .compile()
        .unwrap();
    let result = build(vec![tok(K::Hit, 1_i64), tok(K::Stray, "x")], &rules);
    assert!(matches!(
        result,
        Err(BuildError::UnexpectedDirective { ref kind, .. }) if kind == "STRAY"
    ));
}

#[test]
fn unknown_kind_dropped_when_ignored() {
    let rules = RuleSetBuilder::<K>::new()
        .multi(K::Hit, |d| d.scores(|_, _| 1.0))
        .ignore_unknown()
        .compile()
        .unwrap();
    let config = build(vec![tok(K::Hit, 1_i64), tok(K::Stray, "x")], &rules).unwrap();
    assert!(!config.is_set(K::Stray));
    assert_eq!(config.clause_count(), 1);
}

#[test]
fn range_bounds_are_inclusive() {
    let rules = RuleSetBuilder::<K>::new()
        .single(K::Limit, |d| d.range(1, 5))
        .require_clause(false)
        .compile()
        .unwrap();
    assert!(build(vec![tok(K::Limit, 1_i64)], &rules).is_ok());
    assert!(build(vec![tok(K::Limit, 5_i64)], &rules).is_ok());
    assert!(build(vec![tok(K::Limit, 0_i64)], &rules).is_err());
    assert!(build(vec![tok(K::Limit, 5.5)], &rules).is_err());
}

#[test]
fn custom_check_reason_is_reported() {
    let rules = RuleSetBuilder::<K>::new()
        .single(K::Mode, |d| {
            d.check(|v| match v.as_text() {
                Some(s) if s.len() <= 4 => Ok(()),
                _ => Err("too long".to_owned()),
            })
        })
        .require_clause(false)
        .compile()
        .unwrap();
    let err = build(vec![tok(K::Mode, "verbose")], &rules).unwrap_err();
    assert_eq!(err.to_string(), "MODE: too long");
}

#[test]
fn first_failure_wins_and_nothing_is_built() {
    // Duplicate comes before the range violation in the stream.
    assert!(matches!(
        damage::parse("atk(1) atk(2) orb(99)"),
        Err(QueryError::Build(BuildError::DuplicateDirective { .. }))
    ));
}

#[test]
fn whitespace_only_query_has_no_clauses() {
    assert_eq!(
        damage::parse(" \t\n"),
        Err(QueryError::Build(BuildError::NoClauses))
    );
}

#[test]
fn overlong_query_rejected_before_scanning() {
    let query = "row ".repeat(600);
    assert!(matches!(
        damage::parse(&query),
        Err(QueryError::Lex(LexError::InputTooLong { len: 2400, max: 2000 }))
    ));
}

#[test]
fn max_input_len_is_configurable() {
    let grammar = GrammarBuilder::new()
        .token(K::Hit, r"hit", cogquery::transform::int_or(1, 1))
        .max_input_len(3)
        .build()
        .unwrap();
    assert!(cogquery::tokenize("hit", &grammar).is_ok());
    assert!(cogquery::tokenize("hit ", &grammar).is_err());
}

#[test]
fn search_over_empty_collection() {
    assert!(search::search("gorgon", &[]).unwrap().is_empty());
}

#[test]
fn detailed_report_explains_a_miss() {
    let monster = search::Monster {
        id: 1,
        name: "Tyrra".into(),
        types: vec!["dragon".into()],
        attribute: "fire".into(),
        sub_attribute: None,
        rarity: 3,
        atk: 800,
    };
    let rules = search::rules().unwrap();
    let config = search::parse("type(dragon) name(gorgon)").unwrap();
    let report = rules.evaluate_detailed(&config, &monster);
    assert!(!report.matched());
    assert_eq!(report.failed(), vec!["NAME"]);
}
