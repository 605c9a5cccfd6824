use super::token::Kind;
use super::value::TypedValue;

/// A fully validated query, produced by [`RuleSet::build()`](super::RuleSet::build).
///
/// One slot per declared directive, in declaration order. Single-valued
/// directives hold at most one value; multi-valued directives hold their
/// clauses in the order they were typed.
#[derive(Debug, Clone, PartialEq)]
pub struct Config<K> {
    slots: Vec<Slot<K>>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Slot<K> {
    pub(crate) kind: K,
    pub(crate) values: Vec<TypedValue>,
    pub(crate) clause: bool,
    pub(crate) defaulted: bool,
}

impl<K: Kind> Config<K> {
    pub(crate) fn new(slots: Vec<Slot<K>>) -> Self {
        Self { slots }
    }

    pub(crate) fn slots(&self) -> &[Slot<K>] {
        &self.slots
    }

    fn slot(&self, kind: K) -> Option<&Slot<K>> {
        self.slots.iter().find(|s| s.kind == kind)
    }

    /// The first value of a directive, including an applied default.
    #[must_use]
    pub fn get(&self, kind: K) -> Option<&TypedValue> {
        self.slot(kind)?.values.first()
    }

    /// All values of a directive in input order. Empty if never given.
    #[must_use]
    pub fn values(&self, kind: K) -> &[TypedValue] {
        self.slot(kind).map(|s| s.values.as_slice()).unwrap_or(&[])
    }

    #[must_use]
    pub fn int(&self, kind: K) -> Option<i64> {
        self.get(kind)?.as_int()
    }

    #[must_use]
    pub fn float(&self, kind: K) -> Option<f64> {
        self.get(kind)?.as_float()
    }

    #[must_use]
    pub fn text(&self, kind: K) -> Option<&str> {
        self.get(kind)?.as_text()
    }

    /// True if the directive appeared in the input (defaults do not count).
    #[must_use]
    pub fn is_set(&self, kind: K) -> bool {
        self.slot(kind)
            .is_some_and(|s| !s.defaulted && !s.values.is_empty())
    }

    /// Number of filter/score clauses typed by the user.
    #[must_use]
    pub fn clause_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.clause && !s.defaulted)
            .map(|s| s.values.len())
            .sum()
    }

    /// Kinds of the clause categories that hold at least one typed clause.
    pub fn categories(&self) -> impl Iterator<Item = K> + '_ {
        self.slots
            .iter()
            .filter(|s| s.clause && !s.defaulted && !s.values.is_empty())
            .map(|s| s.kind)
    }
}
