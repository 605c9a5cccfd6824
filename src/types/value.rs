use std::fmt;

use regex::{Regex, RegexBuilder};

/// The value carried by a token, produced by the grammar's value transform.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// A 64-bit signed integer, e.g. the `8` in `row(8)`.
    Int(i64),
    /// A 64-bit floating-point number, e.g. the `1.5` in `mult(1.5)`.
    Float(f64),
    /// A single string argument.
    Text(String),
    /// A comma-separated argument list, e.g. `type(dragon, healer)`.
    List(Vec<String>),
    /// A compiled regular expression, validated when the token was produced.
    Pattern(Pattern),
}

impl TypedValue {
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers widen to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            TypedValue::Int(v) => Some(*v as f64),
            TypedValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TypedValue::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            TypedValue::List(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            TypedValue::Pattern(p) => Some(p),
            _ => None,
        }
    }

    /// Every string the value holds: one for `Text`, each element for `List`.
    /// Numbers and patterns yield nothing.
    pub fn strings(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            TypedValue::Text(v) => std::slice::from_ref(v),
            TypedValue::List(v) => v,
            _ => &[],
        };
        slice.iter().map(String::as_str)
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        TypedValue::Int(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        TypedValue::Float(v)
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        TypedValue::Text(v.to_owned())
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        TypedValue::Text(v)
    }
}

impl From<Vec<String>> for TypedValue {
    fn from(v: Vec<String>) -> Self {
        TypedValue::List(v)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Int(v) => write!(f, "{v}"),
            TypedValue::Float(v) => write!(f, "{v}"),
            TypedValue::Text(v) => write!(f, "{v}"),
            TypedValue::List(v) => write!(f, "{}", v.join(", ")),
            TypedValue::Pattern(p) => write!(f, "/{}/", p.as_str()),
        }
    }
}

/// A regular expression compiled under a size limit.
///
/// The `regex` crate guarantees linear-time matching, so the only budget
/// that needs enforcing is the size of the compiled program. Two patterns
/// are equal when their source text is equal.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile `source`, rejecting patterns whose compiled form exceeds `size_limit` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if the pattern is malformed or too large.
    pub fn new(source: &str, size_limit: usize) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source)
            .size_limit(size_limit)
            .dfa_size_limit(size_limit)
            .build()?;
        Ok(Self { regex })
    }

    #[must_use]
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}
