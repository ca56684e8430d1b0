//! Positional address guessing.

use super::truncate_chars;
use crate::models::config::HeuristicConfig;

/// Join the lines after the name into an address.
///
/// Takes `address_lines` cleaned lines starting at `address_skip`, joins them
/// with spaces, truncates to `address_max_len` characters and appends
/// `address_suffix`. Returns `None` when no line exists past the skipped ones.
pub fn extract_address(cleaned: &[String], config: &HeuristicConfig) -> Option<String> {
    let block: Vec<&str> = cleaned
        .iter()
        .skip(config.address_skip)
        .take(config.address_lines)
        .map(String::as_str)
        .collect();

    if block.is_empty() {
        return None;
    }

    let joined = truncate_chars(&block.join(" "), config.address_max_len);
    Some(format!("{}{}", joined, config.address_suffix))
}
