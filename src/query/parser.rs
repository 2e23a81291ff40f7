//! Shared tokenizer for the compound query grammar.
//!
//! Splits a compound expression on `:` and classifies each token. Field
//! validation is domain-specific and happens in the per-domain parsers.

use crate::{Error, Result};

/// Token delimiter combining subqueries with AND.
pub(crate) const AND_DELIMITER: char = ':';

/// A single token of a compound query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// `VALUE` with no operator; expands to the domain's default fields.
    Bare(&'a str),
    /// `FIELD=VALUE` or `FIELD~VALUE`.
    Fielded {
        field: &'a str,
        value: &'a str,
        /// True for `~` (substring requested), false for `=` (strict).
        partial: bool,
    },
}

/// Split a compound expression into tokens, failing fast on malformed
/// input. No token is handed out unless every token parses.
pub(crate) fn tokenize(input: &str) -> Result<Vec<Token<'_>>> {
    if input.is_empty() {
        return Err(Error::EmptyQuery);
    }
    input.split(AND_DELIMITER).map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<Token<'_>> {
    match token.find(['=', '~']) {
        Some(pos) => {
            let field = &token[..pos];
            if field.is_empty() || !field.chars().all(is_field_char) {
                return Err(Error::QuerySyntax(token.to_string()));
            }
            Ok(Token::Fielded {
                field,
                value: &token[pos + 1..],
                partial: token.as_bytes()[pos] == b'~',
            })
        }
        None if token.is_empty() => Err(Error::QuerySyntax(token.to_string())),
        None => Ok(Token::Bare(token)),
    }
}

/// Field names are dotted runs of word characters.
fn is_field_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}
