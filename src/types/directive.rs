use std::fmt;

use super::config::Config;
use super::error::BuildError;
use super::token::Kind;
use super::value::TypedValue;

/// Boolean matcher for one clause against a candidate entity.
pub type Matcher<C> = fn(&TypedValue, &C) -> bool;

/// Additive base term contributed by one clause in numeric mode.
pub type Scorer<K> = fn(&TypedValue, &Config<K>) -> f64;

/// Combines the summed base terms into the final score.
/// Receives `(base_sum, clause_count, config)`.
pub type Finisher<K> = fn(f64, usize, &Config<K>) -> f64;

/// Whether a directive may appear once or accumulates a list of clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    Multi,
}

/// A value constraint checked after all tokens have been folded.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Numeric value must lie in `[min, max]`.
    Range { min: f64, max: f64 },
    /// Every string in the value must be one of these (ASCII case-insensitive).
    OneOf(&'static [&'static str]),
    /// Arbitrary check; the error string becomes the reason shown to the user.
    Check(fn(&TypedValue) -> Result<(), String>),
}

/// What a directive contributes to evaluation.
pub(crate) enum Role<K, C: ?Sized> {
    /// Only read by matchers, scorers or the finisher.
    Setting,
    Filter(Matcher<C>),
    Score(Scorer<K>),
}

/// A declared directive: arity, default, constraints and evaluation role.
pub struct Directive<K, C: ?Sized> {
    pub(crate) kind: K,
    pub(crate) arity: Arity,
    pub(crate) default: Option<TypedValue>,
    pub(crate) required: bool,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) role: Role<K, C>,
}

impl<K: Kind, C: ?Sized> Directive<K, C> {
    pub(crate) fn new(kind: K, arity: Arity) -> Self {
        Self {
            kind,
            arity,
            default: None,
            required: false,
            constraints: Vec::new(),
            role: Role::Setting,
        }
    }

    /// True for directives whose occurrences count as filter or score clauses.
    #[must_use]
    pub fn is_clause(&self) -> bool {
        !matches!(self.role, Role::Setting)
    }

    #[must_use]
    pub fn kind(&self) -> K {
        self.kind
    }

    #[must_use]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub(crate) fn validate(&self, value: &TypedValue) -> Result<(), BuildError> {
        self.constraints
            .iter()
            .try_for_each(|c| check_constraint(self.kind, c, value))
    }
}

fn check_constraint<K: Kind>(
    kind: K,
    constraint: &Constraint,
    value: &TypedValue,
) -> Result<(), BuildError> {
    match constraint {
        Constraint::Range { min, max } => {
            let n = value.as_float().ok_or_else(|| BuildError::Invalid {
                kind: kind.to_string(),
                reason: format!("expected a number, got '{value}'"),
            })?;
            if n < *min || n > *max || n.is_nan() {
                return Err(BuildError::OutOfRange {
                    kind: kind.to_string(),
                    value: value.to_string(),
                    min: *min,
                    max: *max,
                });
            }
            Ok(())
        }
        Constraint::OneOf(allowed) => {
            if matches!(value, TypedValue::Int(_) | TypedValue::Float(_)) {
                return Err(BuildError::Invalid {
                    kind: kind.to_string(),
                    reason: format!("expected a name, got '{value}'"),
                });
            }
            match value
                .strings()
                .find(|s| !allowed.iter().any(|a| a.eq_ignore_ascii_case(s)))
            {
                Some(unknown) => Err(BuildError::NotOneOf {
                    kind: kind.to_string(),
                    value: unknown.to_owned(),
                    expected: allowed.iter().map(|&a| a.to_owned()).collect(),
                }),
                None => Ok(()),
            }
        }
        Constraint::Check(check) => check(value).map_err(|reason| BuildError::Invalid {
            kind: kind.to_string(),
            reason,
        }),
    }
}

impl<K: Kind, C: ?Sized> fmt::Debug for Directive<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self.role {
            Role::Setting => "setting",
            Role::Filter(_) => "filter",
            Role::Score(_) => "score",
        };
        f.debug_struct("Directive")
            .field("kind", &self.kind)
            .field("arity", &self.arity)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("constraints", &self.constraints)
            .field("role", &role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct Orb;

    impl fmt::Display for Orb {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "ORB")
        }
    }

    fn with(constraint: Constraint) -> Directive<Orb, ()> {
        let mut d = Directive::new(Orb, Arity::Multi);
        d.constraints.push(constraint);
        d
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let d = with(Constraint::Range { min: 3.0, max: 30.0 });
        assert!(d.validate(&TypedValue::Int(3)).is_ok());
        assert!(d.validate(&TypedValue::Int(30)).is_ok());
        assert!(matches!(
            d.validate(&TypedValue::Int(2)),
            Err(BuildError::OutOfRange { .. })
        ));
        assert!(matches!(
            d.validate(&TypedValue::Int(31)),
            Err(BuildError::OutOfRange { .. })
        ));
    }

    #[test]
    fn range_rejects_nan_and_text() {
        let d = with(Constraint::Range { min: 0.0, max: 1.0 });
        assert!(d.validate(&TypedValue::Float(f64::NAN)).is_err());
        assert!(matches!(
            d.validate(&TypedValue::Text("x".into())),
            Err(BuildError::Invalid { .. })
        ));
    }

    #[test]
    fn one_of_is_case_insensitive_and_checks_every_element() {
        let d = with(Constraint::OneOf(&["fire", "water"]));
        assert!(d.validate(&TypedValue::Text("FIRE".into())).is_ok());
        assert!(d
            .validate(&TypedValue::List(vec!["fire".into(), "water".into()]))
            .is_ok());
        match d.validate(&TypedValue::List(vec!["fire".into(), "cyan".into()])) {
            Err(BuildError::NotOneOf { value, .. }) => assert_eq!(value, "cyan"),
            other => panic!("expected NotOneOf, got {other:?}"),
        }
    }

    #[test]
    fn check_reason_is_reported() {
        let d = with(Constraint::Check(|v| {
            if v.as_text().is_some_and(str::is_empty) {
                Err("must not be empty".into())
            } else {
                Ok(())
            }
        }));
        assert!(d.validate(&TypedValue::Text("a".into())).is_ok());
        assert_eq!(
            d.validate(&TypedValue::Text(String::new())),
            Err(BuildError::Invalid {
                kind: "ORB".into(),
                reason: "must not be empty".into(),
            })
        );
    }
}
