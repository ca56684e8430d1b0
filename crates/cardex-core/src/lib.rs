//! Core library for business card contact extraction.
//!
//! This crate provides:
//! - Vision backend cascade (ordered, first-success-wins)
//! - OCR fallback with heuristic field extraction
//! - Field normalization into a fully populated contact record
//! - Image size-bounding before upload

pub mod compress;
pub mod error;
pub mod extract;
pub mod models;
pub mod ocr;
pub mod pipeline;
pub mod vision;

pub use compress::CardImage;
pub use error::{CardexError, OcrError, Result, VisionError};
pub use extract::{FieldNormalizer, HeuristicExtractor};
pub use models::config::CardexConfig;
pub use models::contact::{ContactField, ContactRecord, FieldSource};
pub use ocr::TextRecognizer;
#[cfg(feature = "native")]
pub use ocr::PureOcrRecognizer;
pub use pipeline::{ContactPipeline, ExtractionResult, ExtractionSource};
pub use vision::{
    BackendFailure, CascadeOutcome, GeminiBackend, ImagePayload, VisionBackend, VisionCascade,
};
