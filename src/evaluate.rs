use std::time::Instant;

use crate::types::{CategoryOutcome, Config, EvaluationReport, Kind, Matcher, Role, RuleSet, Slot};

pub(crate) fn evaluate<K: Kind, C: ?Sized>(
    rules: &RuleSet<K, C>,
    config: &Config<K>,
    candidate: &C,
) -> bool {
    config.slots().iter().all(|slot| match matcher(rules, slot) {
        Some(m) => slot.values.iter().any(|v| m(v, candidate)),
        None => true,
    })
}

pub(crate) fn evaluate_detailed<K: Kind, C: ?Sized>(
    rules: &RuleSet<K, C>,
    config: &Config<K>,
    candidate: &C,
) -> EvaluationReport {
    let start = Instant::now();

    let categories = config
        .slots()
        .iter()
        .filter_map(|slot| {
            let m = matcher(rules, slot)?;
            let hit = slot.values.iter().position(|v| m(v, candidate));
            Some(CategoryOutcome::new(
                slot.kind.to_string(),
                slot.values.len(),
                hit,
            ))
        })
        .collect();

    EvaluationReport::new(categories, start.elapsed())
}

pub(crate) fn compute<K: Kind, C: ?Sized>(rules: &RuleSet<K, C>, config: &Config<K>) -> f64 {
    let mut base = 0.0;
    let mut clauses = 0_usize;

    for slot in config.slots().iter().filter(|s| !s.defaulted) {
        let Some(directive) = rules.directive(slot.kind) else {
            continue;
        };
        if let Role::Score(score) = directive.role {
            for value in &slot.values {
                base += score(value, config);
                clauses += 1;
            }
        }
    }

    (rules.finish)(base, clauses, config)
}

/// The matcher of a filter category holding typed clauses. Empty and
/// defaulted slots constrain nothing.
fn matcher<K: Kind, C: ?Sized>(rules: &RuleSet<K, C>, slot: &Slot<K>) -> Option<Matcher<C>> {
    if slot.defaulted || slot.values.is_empty() {
        return None;
    }
    match rules.directive(slot.kind)?.role {
        Role::Filter(m) => Some(m),
        Role::Setting | Role::Score(_) => None,
    }
}
