//! Line splitting and noise filtering for recognized text.

use super::patterns::GARBAGE_LINE;
use crate::models::config::HeuristicConfig;

/// Recognized text split into candidate lines.
#[derive(Debug, Clone, Default)]
pub struct RecognizedLines {
    /// Trimmed lines long enough to be meaningful. Used for keyword search.
    pub lines: Vec<String>,
    /// `lines` without garbage. Used for name and address guessing.
    pub cleaned: Vec<String>,
}

impl RecognizedLines {
    /// Split raw OCR text into lines and filter noise.
    pub fn from_raw(raw: &str, config: &HeuristicConfig) -> Self {
        let lines: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|l| l.chars().count() >= config.min_line_len)
            .map(str::to_string)
            .collect();

        let cleaned = lines
            .iter()
            .filter(|l| !is_garbage(l, config.min_clean_len))
            .cloned()
            .collect();

        Self { lines, cleaned }
    }
}

/// Whether a line carries no letters or is too short to mean anything.
pub fn is_garbage(line: &str, min_len: usize) -> bool {
    GARBAGE_LINE.is_match(line) || line.chars().count() < min_len
}
