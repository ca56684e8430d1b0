//! Phone, email and website extraction.
//!
//! These patterns run on the full raw text; they tolerate surrounding noise.

use super::patterns::{EMAIL, PHONE, WEBSITE};

/// First phone-like run of digits, spaces and hyphens.
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|p| !p.is_empty())
}

/// First email address.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

/// First domain-shaped token, with optional scheme and `www.` prefix.
pub fn extract_website(text: &str) -> Option<String> {
    WEBSITE.find(text).map(|m| m.as_str().to_string())
}
