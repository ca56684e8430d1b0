//! Person name guessing and field cleaning.

use super::patterns::{
    DISALLOWED_CHARS, LEADING_SYMBOLS, NAME_CAPITALIZED, NAME_UPPERCASE, WHITESPACE_RUN,
};

/// Pick the line most likely to be the card holder's name.
///
/// Prefers the first line shaped like a name ("John Smith" or "JOHN SMITH"),
/// otherwise the first line. Expects garbage lines to be filtered already.
pub fn guess_name(cleaned: &[String]) -> Option<&str> {
    cleaned
        .iter()
        .find(|l| NAME_CAPITALIZED.is_match(l) || NAME_UPPERCASE.is_match(l))
        .or_else(|| cleaned.first())
        .map(String::as_str)
}

/// Strip OCR debris from a name or title.
///
/// Removes leading symbols, then every character other than letters, digits,
/// whitespace, periods and hyphens, then collapses whitespace.
pub fn clean_field(s: &str) -> String {
    let s = LEADING_SYMBOLS.replace(s, "");
    let s = DISALLOWED_CHARS.replace_all(&s, "");
    WHITESPACE_RUN.replace_all(&s, " ").trim().to_string()
}
