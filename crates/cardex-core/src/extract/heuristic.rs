//! Heuristic contact extraction from raw OCR text.

use tracing::debug;

use crate::models::config::HeuristicConfig;
use crate::models::contact::ContactRecord;

use super::rules::{
    clean_field, extract_address, extract_company, extract_email, extract_phone,
    extract_title, extract_website, guess_name, RecognizedLines,
};

const NOT_AVAILABLE: &str = "N/A";

/// Derives contact fields from unstructured text using line shape and
/// lexical cues.
///
/// Extraction never fails; fields with no evidence get sentinel values.
#[derive(Debug, Clone, Default)]
pub struct HeuristicExtractor {
    config: HeuristicConfig,
}

impl HeuristicExtractor {
    /// Create an extractor with the given heuristics.
    pub fn new(config: HeuristicConfig) -> Self {
        Self { config }
    }

    /// Heuristics in use.
    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    /// Extract a contact record from recognized text.
    pub fn extract(&self, raw_text: &str) -> ContactRecord {
        let config = &self.config;
        let lines = RecognizedLines::from_raw(raw_text, config);

        debug!(
            "Heuristic extraction over {} lines ({} after noise filtering)",
            lines.lines.len(),
            lines.cleaned.len()
        );

        ContactRecord {
            name: self.extract_name(&lines),
            company: extract_company(&lines.lines, &config.company_keywords, config.company_max_len)
                .unwrap_or_else(|| config.company.clone()),
            title: extract_title(&lines.lines, &config.title_keywords)
                .unwrap_or_else(|| config.title.clone()),
            phone: extract_phone(raw_text).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            email: extract_email(raw_text).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            address: extract_address(&lines.cleaned, config)
                .unwrap_or_else(|| config.address.clone()),
            website: extract_website(raw_text).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }

    fn extract_name(&self, lines: &RecognizedLines) -> String {
        let raw = guess_name(&lines.cleaned).unwrap_or(&self.config.name_fallback);
        let name = clean_field(raw);
        if name.is_empty() {
            self.config.name_empty.clone()
        } else {
            name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // OCR output keeps no indentation; whitespace runs would bleed into the
    // phone pattern.
    const CARD: &str = "####\n\
~~ ~~\n\
John Smith\n\
Founder & CEO\n\
Acme Widget Solutions Inc.\n\
42 Main Street, Suite 400\n\
Springfield, IL 62701\n\
+1 415-555-0132\n\
Contact: jane.doe@example.com\n\
Visit www.acme.co\n";

    #[test]
    fn test_extract_full_card() {
        let record = HeuristicExtractor::default().extract(CARD);

        assert_eq!(record.name, "John Smith");
        assert_eq!(record.title, "Founder CEO");
        assert_eq!(record.company, "Acme Widget Solutions Inc.");
        assert_eq!(record.phone, "+1 415-555-0132");
        assert_eq!(record.email, "jane.doe@example.com");
        assert_eq!(
            record.address,
            "Founder & CEO Acme Widget Solutions Inc. 42 Main Street, Suite 400..."
        );
    }

    #[test]
    fn test_uppercase_name_among_noise() {
        let raw = "|||| ||||\n12345\nJOHN SMITH\nsales@acme.co";
        let record = HeuristicExtractor::default().extract(raw);
        assert_eq!(record.name, "JOHN SMITH");
    }

    #[test]
    fn test_numeric_line_never_chosen_as_name() {
        let raw = "12345\n67890\nacme widgets";
        let record = HeuristicExtractor::default().extract(raw);
        assert_eq!(record.name, "acme widgets");
    }

    #[test]
    fn test_empty_text_uses_sentinels() {
        let config = HeuristicConfig::default();
        let record = HeuristicExtractor::new(config.clone()).extract("");

        assert_eq!(
            record,
            ContactRecord {
                name: config.name_fallback.clone(),
                company: config.company.clone(),
                title: config.title.clone(),
                phone: "N/A".to_string(),
                email: "N/A".to_string(),
                address: config.address.clone(),
                website: "N/A".to_string(),
            }
        );
        assert_eq!(record.name, "Found with OCR");
    }

    #[test]
    fn test_name_cleaned_to_nothing_uses_empty_sentinel() {
        let config = HeuristicConfig {
            name_fallback: "***".to_string(),
            ..Default::default()
        };
        let record = HeuristicExtractor::new(config).extract("");
        assert_eq!(record.name, "Unknown Contact");
    }

    #[test]
    fn test_custom_keywords() {
        let config = HeuristicConfig {
            title_keywords: vec!["Engineer".to_string()],
            company_keywords: vec!["GmbH".to_string()],
            ..Default::default()
        };
        let raw = "Anna Weber\nSoftware Engineer\nMuster GmbH";
        let record = HeuristicExtractor::new(config).extract(raw);

        assert_eq!(record.title, "Software Engineer");
        assert_eq!(record.company, "Muster GmbH");
    }
}
