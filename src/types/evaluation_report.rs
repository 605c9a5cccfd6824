use std::fmt;
use std::time::Duration;

/// Outcome of one clause category during a detailed evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOutcome {
    kind: String,
    clauses: usize,
    matched_clause: Option<usize>,
}

impl CategoryOutcome {
    pub(crate) fn new(kind: String, clauses: usize, matched_clause: Option<usize>) -> Self {
        Self {
            kind,
            clauses,
            matched_clause,
        }
    }

    /// Display name of the directive kind.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Number of clauses in the category.
    #[must_use]
    pub fn clauses(&self) -> usize {
        self.clauses
    }

    /// Index of the first clause that matched, if any.
    #[must_use]
    pub fn matched_clause(&self) -> Option<usize> {
        self.matched_clause
    }

    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched_clause.is_some()
    }
}

/// Detailed evaluation report returned by
/// [`RuleSet::evaluate_detailed()`](super::ruleset::RuleSet::evaluate_detailed).
///
/// Unlike [`RuleSet::evaluate()`](super::ruleset::RuleSet::evaluate), every
/// category is checked even after one fails, so the report shows the full
/// picture of why a candidate was or was not selected.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    categories: Vec<CategoryOutcome>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(categories: Vec<CategoryOutcome>, duration: Duration) -> Self {
        Self {
            categories,
            duration,
        }
    }

    /// The verdict, same as [`RuleSet::evaluate()`](super::ruleset::RuleSet::evaluate).
    #[must_use]
    pub fn matched(&self) -> bool {
        self.categories.iter().all(CategoryOutcome::matched)
    }

    /// Per-category outcomes in directive declaration order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryOutcome] {
        &self.categories
    }

    /// Names of the categories no clause matched.
    #[must_use]
    pub fn failed(&self) -> Vec<&str> {
        self.categories
            .iter()
            .filter(|c| !c.matched())
            .map(CategoryOutcome::kind)
            .collect()
    }

    /// Wall-clock duration of the evaluation.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matched: {}", self.matched())?;
        let parts: Vec<String> = self
            .categories
            .iter()
            .map(|c| match c.matched_clause {
                Some(i) => format!("{} #{}/{}", c.kind, i + 1, c.clauses),
                None => format!("{} none/{}", c.kind, c.clauses),
            })
            .collect();
        write!(f, ", categories: [{}]", parts.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
