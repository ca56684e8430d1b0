//! Company name extraction.

use super::{find_keyword_line, truncate_chars};

/// First line mentioning a company keyword, truncated to `max_len` characters.
pub fn extract_company(lines: &[String], keywords: &[String], max_len: usize) -> Option<String> {
    find_keyword_line(lines, keywords).map(|l| truncate_chars(l, max_len))
}
