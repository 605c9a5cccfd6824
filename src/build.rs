use tracing::{debug, trace};

use crate::types::{Arity, BuildError, Config, Kind, RuleSet, Slot, Token, TypedValue, UnknownPolicy};

/// Fold a token stream into a validated [`Config`] using `rules`.
///
/// Single-valued directives may appear once; multi-valued directives
/// accumulate their clauses in input order. Defaults are applied after
/// folding, then every value is validated. The build is all-or-nothing.
///
/// # Errors
///
/// Returns [`BuildError`] on a repeated single-valued directive, an
/// undeclared token kind (unless the rule set ignores them), a missing
/// required directive, a constraint violation, or a query with no clauses.
pub fn build<K: Kind, C: ?Sized>(
    tokens: impl IntoIterator<Item = Token<K>>,
    rules: &RuleSet<K, C>,
) -> Result<Config<K>, BuildError> {
    let folded = fold(tokens, rules)?;
    let config = resolve(folded, rules)?;

    if rules.require_clause && config.clause_count() == 0 {
        debug!("rejected query without clauses");
        return Err(BuildError::NoClauses);
    }

    debug!(clauses = config.clause_count(), "built config");
    Ok(config)
}

fn fold<K: Kind, C: ?Sized>(
    tokens: impl IntoIterator<Item = Token<K>>,
    rules: &RuleSet<K, C>,
) -> Result<Vec<Vec<TypedValue>>, BuildError> {
    let mut values: Vec<Vec<TypedValue>> = vec![Vec::new(); rules.directives.len()];

    for token in tokens {
        let Some(&idx) = rules.slots.get(&token.kind) else {
            match rules.unknown {
                UnknownPolicy::Ignore => {
                    trace!(kind = %token.kind, raw = %token.raw, "ignored undeclared token");
                    continue;
                }
                UnknownPolicy::Reject => {
                    return Err(BuildError::UnexpectedDirective {
                        kind: token.kind.to_string(),
                        text: token.raw,
                    });
                }
            }
        };

        let directive = &rules.directives[idx];
        if directive.arity == Arity::Single && !values[idx].is_empty() {
            return Err(BuildError::DuplicateDirective {
                kind: directive.kind.to_string(),
            });
        }
        values[idx].push(token.value);
    }

    Ok(values)
}

fn resolve<K: Kind, C: ?Sized>(
    folded: Vec<Vec<TypedValue>>,
    rules: &RuleSet<K, C>,
) -> Result<Config<K>, BuildError> {
    let mut slots = Vec::with_capacity(folded.len());

    for (directive, mut values) in rules.directives.iter().zip(folded) {
        let mut defaulted = false;
        if values.is_empty() {
            if let Some(default) = &directive.default {
                values.push(default.clone());
                defaulted = true;
            } else if directive.required {
                return Err(BuildError::MissingDirective {
                    kind: directive.kind.to_string(),
                });
            }
        }

        for value in &values {
            directive.validate(value)?;
        }

        slots.push(Slot {
            kind: directive.kind,
            values,
            clause: directive.is_clause(),
            defaulted,
        });
    }

    Ok(Config::new(slots))
}
