//! Contact record produced by the extraction pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One of the seven fields on a business card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    Name,
    Company,
    Title,
    Phone,
    Email,
    Address,
    Website,
}

impl ContactField {
    /// All fields in canonical order.
    pub const ALL: [ContactField; 7] = [
        ContactField::Name,
        ContactField::Company,
        ContactField::Title,
        ContactField::Phone,
        ContactField::Email,
        ContactField::Address,
        ContactField::Website,
    ];

    /// JSON key of the field.
    pub fn key(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Company => "company",
            ContactField::Title => "title",
            ContactField::Phone => "phone",
            ContactField::Email => "email",
            ContactField::Address => "address",
            ContactField::Website => "website",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured contact information extracted from a card.
///
/// After normalization every field is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: String,
    pub company: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub website: String,
}

impl ContactRecord {
    /// Build a record by computing each field.
    pub fn from_fn(mut f: impl FnMut(ContactField) -> String) -> Self {
        Self {
            name: f(ContactField::Name),
            company: f(ContactField::Company),
            title: f(ContactField::Title),
            phone: f(ContactField::Phone),
            email: f(ContactField::Email),
            address: f(ContactField::Address),
            website: f(ContactField::Website),
        }
    }

    /// Get a field value.
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Company => &self.company,
            ContactField::Title => &self.title,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
            ContactField::Address => &self.address,
            ContactField::Website => &self.website,
        }
    }

    /// Secondary details folded into a single notes line for archiving.
    pub fn product_notes(&self) -> String {
        format!(
            "Email: {} | Web: {} | Title: {}",
            self.email, self.website, self.title
        )
    }
}

/// Anything the normalizer can read contact fields from.
pub trait FieldSource {
    /// Raw value of a field, if present.
    fn field(&self, field: ContactField) -> Option<String>;
}

impl FieldSource for ContactRecord {
    fn field(&self, field: ContactField) -> Option<String> {
        Some(self.get(field).to_string())
    }
}

impl FieldSource for Value {
    fn field(&self, field: ContactField) -> Option<String> {
        let object = self.as_object()?;

        // Models occasionally capitalize keys ("Name", "EMAIL").
        let value = object.get(field.key()).or_else(|| {
            object
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(field.key()))
                .map(|(_, v)| v)
        })?;

        scalar_to_string(value).or_else(|| {
            let parts: Vec<String> = value
                .as_array()?
                .iter()
                .filter_map(scalar_to_string)
                .filter(|s| !s.trim().is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
