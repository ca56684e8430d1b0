//! Error types for the cardex-core library.

use thiserror::Error;

/// Main error type for the cardex library.
#[derive(Error, Debug)]
pub enum CardexError {
    /// OCR collaborator error. The only failure the pipeline propagates.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Vision backend construction error.
    #[error("vision error: {0}")]
    Vision(#[from] VisionError),

    /// Image decoding or encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors raised while setting up vision backends.
///
/// Failures of an individual request are not errors of this kind; they are
/// reported as [`crate::vision::BackendFailure`] values and absorbed by the
/// cascade. A missing API key is not an error either; the cascade is built
/// empty and every run uses OCR.
#[derive(Error, Debug)]
pub enum VisionError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Result type for the cardex library.
pub type Result<T> = std::result::Result<T, CardexError>;
