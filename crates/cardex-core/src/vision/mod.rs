//! Vision-capable extraction backends and the cascade that tries them.

mod cascade;
mod gemini;
pub mod prompt;
#[cfg(test)]
pub(crate) mod testing;

pub use cascade::{CascadeOutcome, VisionCascade};
pub use gemini::GeminiBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Image bytes sent to a backend together with their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data: Vec<u8>,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }
}

/// Why a single backend attempt produced no text.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{backend} failed{}: {reason}", status_suffix(.status))]
pub struct BackendFailure {
    /// Backend identifier.
    pub backend: String,
    /// HTTP-like status code, when the backend reported one.
    pub status: Option<u16>,
    /// Human-readable reason.
    pub reason: String,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl BackendFailure {
    pub fn new(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            status: None,
            reason: reason.into(),
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// The backend refused this caller (as opposed to being unavailable).
    pub fn is_permission_denied(&self) -> bool {
        self.status == Some(403)
    }
}

/// A vision model that turns a card image into JSON-ish text.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Backend identifier used in logs and results.
    fn id(&self) -> &str;

    /// Submit one attempt.
    async fn invoke(&self, prompt: &str, payload: &ImagePayload) -> Result<String, BackendFailure>;
}
