//! Value transforms: turn a pattern match into a token's [`TypedValue`].
//!
//! Each constructor takes the capture group to read. Group `0` is the whole
//! match. Custom transforms are plain boxed closures with the same shape.

use regex::Captures;

use super::args::parse_list;
use super::grammar::Limits;
use crate::types::{Pattern, TypedValue};

/// A value transform. An `Err` becomes [`LexError::InvalidValue`](super::LexError::InvalidValue).
pub type Transform = Box<dyn Fn(&Captures<'_>, &Limits) -> Result<TypedValue, String> + Send + Sync>;

fn group<'h>(caps: &Captures<'h>, index: usize) -> Option<&'h str> {
    caps.get(index).map(|m| m.as_str())
}

/// The whole matched text, as [`TypedValue::Text`].
#[must_use]
pub fn matched() -> Transform {
    text(0)
}

#[must_use]
pub fn text(index: usize) -> Transform {
    Box::new(move |caps: &Captures<'_>, _: &Limits| {
        group(caps, index)
            .map(TypedValue::from)
            .ok_or_else(|| "missing argument".to_owned())
    })
}

/// A required integer argument.
#[must_use]
pub fn int(index: usize) -> Transform {
    Box::new(move |caps: &Captures<'_>, _: &Limits| match group(caps, index) {
        Some(s) => parse_int(s),
        None => Err("missing number".to_owned()),
    })
}

/// An optional integer argument, `default` when the group did not participate.
#[must_use]
pub fn int_or(index: usize, default: i64) -> Transform {
    Box::new(move |caps: &Captures<'_>, _: &Limits| match group(caps, index) {
        Some(s) => parse_int(s),
        None => Ok(TypedValue::Int(default)),
    })
}

/// An optional float argument. Integer text is accepted and stored as a float.
#[must_use]
pub fn float_or(index: usize, default: f64) -> Transform {
    Box::new(move |caps: &Captures<'_>, _: &Limits| match group(caps, index) {
        Some(s) => s
            .trim()
            .parse::<f64>()
            .map(TypedValue::Float)
            .map_err(|e| e.to_string()),
        None => Ok(TypedValue::Float(default)),
    })
}

/// A comma-separated argument list: `a, "b c", d`.
#[must_use]
pub fn list(index: usize) -> Transform {
    Box::new(move |caps: &Captures<'_>, _: &Limits| {
        let s = group(caps, index).ok_or_else(|| "missing argument list".to_owned())?;
        parse_list(s).map(TypedValue::List)
    })
}

/// A user-supplied regular expression, compiled under
/// [`Limits::regex_size_limit`].
#[must_use]
pub fn pattern(index: usize) -> Transform {
    Box::new(move |caps: &Captures<'_>, limits: &Limits| {
        let s = group(caps, index).ok_or_else(|| "missing pattern".to_owned())?;
        compile_pattern(s, limits)
    })
}

pub(crate) fn compile_pattern(source: &str, limits: &Limits) -> Result<TypedValue, String> {
    Pattern::new(source, limits.regex_size_limit)
        .map(TypedValue::Pattern)
        .map_err(|e| e.to_string())
}

fn parse_int(s: &str) -> Result<TypedValue, String> {
    s.trim()
        .parse::<i64>()
        .map(TypedValue::Int)
        .map_err(|e| e.to_string())
}
