//! OCR collaborator used when every vision backend fails.

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrRecognizer;

use async_trait::async_trait;

use crate::error::OcrError;

/// Turns an image into raw, unstructured text.
///
/// Failures are fatal to the extraction that requested them.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in encoded image bytes (PNG, JPEG, ...).
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

/// A recognized text region with its top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Join regions top-to-bottom in 20 px rows, left-to-right within a row.
pub fn join_in_reading_order(mut regions: Vec<TextRegion>) -> String {
    regions.sort_by(|a, b| {
        let row_a = (a.y / 20.0) as i32;
        let row_b = (b.y / 20.0) as i32;
        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        }
    });

    regions
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
