//! Common regex patterns for business card text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Name shapes: "John Smith", "Mary Ann Lee"
    pub static ref NAME_CAPITALIZED: Regex = Regex::new(
        r"^[A-Z][a-z]+(\s[A-Z][a-z]+)+$"
    ).unwrap();

    // All-caps names: "JOHN SMITH"
    pub static ref NAME_UPPERCASE: Regex = Regex::new(
        r"^[A-Z\s]{5,}$"
    ).unwrap();

    // Lines with no letters at all (symbols, underscores, digits): logos, rules, table noise
    pub static ref GARBAGE_LINE: Regex = Regex::new(
        r"^[^A-Za-z]+$"
    ).unwrap();

    // Field cleaning
    pub static ref LEADING_SYMBOLS: Regex = Regex::new(
        r"^[^A-Za-z0-9]+"
    ).unwrap();

    pub static ref DISALLOWED_CHARS: Regex = Regex::new(
        r"[^a-zA-Z0-9\s.\-]"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    // Phone: leading + or digit, then 8+ digits/whitespace/hyphens
    pub static ref PHONE: Regex = Regex::new(
        r"[+0-9][0-9\s\-]{8,}"
    ).unwrap();

    // Email pattern
    pub static ref EMAIL: Regex = Regex::new(
        r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}"
    ).unwrap();

    // Website: optional scheme and www., then domain and TLD
    pub static ref WEBSITE: Regex = Regex::new(
        r"(https?://)?(www\.)?[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}"
    ).unwrap();
}
