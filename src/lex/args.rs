use winnow::ascii::multispace0;
use winnow::combinator::{alt, delimited, separated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_till};

// -- Items ------------------------------------------------------------------

fn quoted(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn bare(input: &mut &str) -> ModalResult<String> {
    take_till(1.., |c: char| c == ',' || c == '"')
        .map(|s: &str| s.trim_end().to_owned())
        .verify(|s: &String| !s.is_empty())
        .parse_next(input)
}

fn item(input: &mut &str) -> ModalResult<String> {
    delimited(multispace0, alt((quoted, bare)), multispace0)
        .context(StrContext::Expected(StrContextValue::Description(
            "argument",
        )))
        .parse_next(input)
}

// -- Lists ------------------------------------------------------------------

fn list(input: &mut &str) -> ModalResult<Vec<String>> {
    separated(1.., item, ',').parse_next(input)
}

/// Split a directive's argument text (`dragon, "god killer"`) into its items.
///
/// Bare items are trimmed; quoted items keep their inner whitespace and
/// support `\"` and `\\` escapes. Empty items are rejected.
pub(crate) fn parse_list(input: &str) -> Result<Vec<String>, String> {
    list.parse(input).map_err(|e| e.to_string())
}
