//! Rule-based field extractors for business card text.
//!
//! Each field has its own pure function so it can be tested in isolation;
//! [`crate::extract::HeuristicExtractor`] composes them.

pub mod address;
pub mod company;
pub mod contact_info;
pub mod keywords;
pub mod lines;
pub mod name;
pub mod patterns;
pub mod title;

pub use address::extract_address;
pub use company::extract_company;
pub use contact_info::{extract_email, extract_phone, extract_website};
pub use keywords::find_keyword_line;
pub use lines::{is_garbage, RecognizedLines};
pub use name::{clean_field, guess_name};
pub use title::extract_title;

/// Truncate to at most `max` characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
