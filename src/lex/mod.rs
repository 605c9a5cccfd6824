mod args;
mod error;
mod grammar;
pub mod transform;

pub use error::{GrammarError, LexError};
pub use grammar::{Grammar, GrammarBuilder, Limits};
pub use transform::Transform;

use tracing::{debug, trace};

use crate::types::{Kind, Token};

/// Tokenize `input` with `grammar`.
///
/// Scans left to right. At each position the grammar's patterns are tried in
/// declaration order and the first match is consumed; there is no
/// backtracking and no preference for longer matches. Every character ends
/// up in a token or a skipped region.
///
/// # Errors
///
/// Returns [`LexError`] if the input is too long, if no pattern matches at
/// some position, or if a value transform rejects a match. No tokens are
/// returned on error.
pub fn tokenize<K: Kind>(input: &str, grammar: &Grammar<K>) -> Result<Vec<Token<K>>, LexError> {
    let max = grammar.limits.max_input_len;
    let len = input.chars().count();
    if len > max {
        return Err(LexError::InputTooLong { len, max });
    }

    let mut tokens = Vec::new();
    let mut pos = 0;

    'scan: while pos < input.len() {
        let rest = &input[pos..];
        for entry in &grammar.entries {
            let Some(caps) = entry.captures(rest) else {
                continue;
            };
            let Some(whole) = caps.get(0) else {
                continue;
            };

            if let (Some(kind), Some(transform)) = (entry.kind, &entry.transform) {
                let value =
                    transform(&caps, &grammar.limits).map_err(|reason| LexError::InvalidValue {
                        kind: kind.to_string(),
                        text: whole.as_str().to_owned(),
                        reason,
                    })?;
                trace!(%kind, raw = whole.as_str(), position = pos, "token");
                tokens.push(Token {
                    kind,
                    value,
                    raw: whole.as_str().to_owned(),
                    position: pos,
                });
            }

            pos += whole.end();
            continue 'scan;
        }

        let fragment = fragment_at(rest);
        debug!(position = pos, fragment, "unrecognized input");
        return Err(LexError::Unrecognized {
            position: pos,
            fragment: fragment.to_owned(),
        });
    }

    debug!(tokens = tokens.len(), "tokenized input");
    Ok(tokens)
}

/// The offending text reported in errors: up to the next whitespace.
fn fragment_at(rest: &str) -> &str {
    rest.split_whitespace().next().unwrap_or(rest)
}
