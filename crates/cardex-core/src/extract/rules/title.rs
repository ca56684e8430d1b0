//! Job title extraction.

use super::{clean_field, find_keyword_line};

/// First line mentioning a title keyword, cleaned.
///
/// Returns `None` when no line matches or cleaning leaves nothing.
pub fn extract_title(lines: &[String], keywords: &[String]) -> Option<String> {
    find_keyword_line(lines, keywords)
        .map(clean_field)
        .filter(|t| !t.is_empty())
}
