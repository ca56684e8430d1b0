//! Rendering of extraction results.

use cardex_core::{ContactField, ContactRecord, ExtractionResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(std::slice::from_ref(&result.record)),
        OutputFormat::Text => Ok(format_text(&result.record)),
    }
}

/// One header row plus one row per record.
pub fn format_csv(records: &[ContactRecord]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(ContactField::ALL.iter().map(|f| f.key()))?;
    for record in records {
        wtr.write_record(ContactField::ALL.iter().map(|f| record.get(*f)))?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(record: &ContactRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}\n", record.name));
    output.push_str(&format!("  {} at {}\n", record.title, record.company));
    output.push('\n');
    output.push_str(&format!("  Phone:   {}\n", record.phone));
    output.push_str(&format!("  Email:   {}\n", record.email));
    output.push_str(&format!("  Web:     {}\n", record.website));
    output.push_str(&format!("  Address: {}\n", record.address));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record() -> ContactRecord {
        ContactRecord {
            name: "Jane Doe".to_string(),
            company: "Acme, Inc".to_string(),
            title: "CEO".to_string(),
            phone: "+1 415-555-0132".to_string(),
            email: "jane@acme.co".to_string(),
            address: "1 Market St".to_string(),
            website: "www.acme.co".to_string(),
        }
    }

    #[test]
    fn test_format_csv_quotes_commas() {
        let csv = format_csv(&[record()]).unwrap();
        assert_eq!(
            csv,
            "name,company,title,phone,email,address,website\n\
             Jane Doe,\"Acme, Inc\",CEO,+1 415-555-0132,jane@acme.co,1 Market St,www.acme.co\n"
        );
    }

    #[test]
    fn test_format_text() {
        let text = format_text(&record());
        assert!(text.starts_with("Jane Doe\n  CEO at Acme, Inc\n"));
        assert!(text.contains("  Email:   jane@acme.co\n"));
    }
}
