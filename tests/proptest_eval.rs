
use std::collections::BTreeSet;

use cogquery::grammars::{damage, moderation, search};
use proptest::prelude::*;
use strategies::{arb_clause, arb_clauses, arb_roster, join, Clause};

fn ids(query: &str, roster: &[search::Monster]) -> BTreeSet<u32> {
    search::search(query, roster)
        .unwrap()
        .into_iter()
        .map(|m| m.id)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        max_global_rejects: 4096,
        ..ProptestConfig::default()
    })]

    /// Tokenizing and building never panic, whatever the input.
    #[test]
    fn parse_never_panics(input in "\\PC{0,64}") {
        let _ = damage::parse(&input);
        let _ = search::parse(&input);
        let _ = moderation::parse(&input);
    }

    /// Query-shaped noise never panics either.
    #[test]
    fn parse_never_panics_on_directive_soup(input in "([a-z_]{1,8}(\\([0-9a-z, \"]{0,12}\\))? ?){0,8}") {
        let _ = damage::estimate(&input);
        let _ = search::parse(&input);
        let _ = moderation::parse(&input);
    }

    /// Another clause in a category already present widens the result.
    #[test]
    fn or_within_category(
        clauses in arb_clauses(),
        pick in any::<prop::sample::Index>(),
        extra in arb_clause(),
        roster in arb_roster(),
    ) {
        let existing = pick.get(&clauses).category;
        prop_assume!(extra.category == existing);

        let before = ids(&join(&clauses), &roster);
        let mut widened = clauses.clone();
        widened.push(extra);
        let after = ids(&join(&widened), &roster);

        prop_assert!(before.is_subset(&after), "{before:?} not within {after:?}");
    }

    /// A clause in a new category narrows the result.
    #[test]
    fn and_across_categories(
        mut clauses in arb_clauses(),
        extra in arb_clause(),
        roster in arb_roster(),
    ) {
        clauses.retain(|c| c.category != extra.category);
        prop_assume!(!clauses.is_empty());

        let before = ids(&join(&clauses), &roster);
        let mut narrowed = clauses.clone();
        narrowed.push(extra);
        let after = ids(&join(&narrowed), &roster);

        prop_assert!(after.is_subset(&before), "{after:?} not within {before:?}");
    }

    /// `filter`, `evaluate` and `evaluate_detailed` agree on every candidate.
    #[test]
    fn evaluators_agree(clauses in arb_clauses(), roster in arb_roster()) {
        let rules = search::rules().unwrap();
        let config = search::parse(&join(&clauses)).unwrap();

        let filtered: Vec<u32> = rules.filter(&config, &roster).iter().map(|m| m.id).collect();
        let evaluated: Vec<u32> = roster
            .iter()
            .filter(|m| rules.evaluate(&config, m))
            .map(|m| m.id)
            .collect();
        prop_assert_eq!(&filtered, &evaluated);

        for m in &roster {
            prop_assert_eq!(
                rules.evaluate(&config, m),
                rules.evaluate_detailed(&config, m).matched()
            );
        }
    }

    /// Clause order does not change which monsters match.
    #[test]
    fn clause_order_is_irrelevant(clauses in arb_clauses(), roster in arb_roster()) {
        let mut reversed: Vec<Clause> = clauses.clone();
        reversed.reverse();
        prop_assert_eq!(ids(&join(&clauses), &roster), ids(&join(&reversed), &roster));
    }
}
