//! Grammars for the free-form text the editor stores in condition params.

mod error;
mod grammar;

use chrono::NaiveDateTime;

pub use error::ParseError;

/// Parse the `date` param of a `current_date` condition.
///
/// Accepts `YYYY-MM-DD`, optionally followed by a time of day as
/// ` HH:MM[:SS]` or `THH:MM[:SS]`. A bare date means midnight.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a valid calendar date/time.
pub fn parse_date(input: &str) -> Result<NaiveDateTime, ParseError> {
    use winnow::Parser;
    grammar::date_param
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}

/// Split a comma-separated editor field (`"administrator, editor"`) into its
/// trimmed, non-empty items.
#[must_use]
pub fn parse_list(input: &str) -> Vec<String> {
    use winnow::Parser;
    grammar::comma_list.parse(input).unwrap_or_default()
}
