//! Field normalization into a fully populated contact record.

use crate::models::config::FieldDefaults;
use crate::models::contact::{ContactField, ContactRecord, FieldSource};

/// Used when a configured default is itself blank.
const LAST_RESORT: &str = "N/A";

/// Repairs any candidate into a record with all seven fields non-empty.
#[derive(Debug, Clone, Default)]
pub struct FieldNormalizer {
    defaults: FieldDefaults,
}

impl FieldNormalizer {
    /// Create a normalizer with the given per-field defaults.
    pub fn new(defaults: FieldDefaults) -> Self {
        Self { defaults }
    }

    /// Normalize a candidate. Missing or blank fields get their default.
    pub fn normalize(&self, candidate: &impl FieldSource) -> ContactRecord {
        ContactRecord::from_fn(|field| {
            candidate
                .field(field)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| self.default_for(field))
        })
    }

    /// Record with every field at its default.
    pub fn defaults(&self) -> ContactRecord {
        ContactRecord::from_fn(|field| self.default_for(field))
    }

    fn default_for(&self, field: ContactField) -> String {
        let value = self.defaults.get(field).trim();
        if value.is_empty() {
            LAST_RESORT.to_string()
        } else {
            value.to_string()
        }
    }
}
