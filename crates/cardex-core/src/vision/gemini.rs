//! Gemini `generateContent` backend over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::VisionError;
use crate::models::config::VisionConfig;

use super::{BackendFailure, ImagePayload, VisionBackend};

/// Longest error body kept in a failure reason.
const MAX_REASON_LEN: usize = 300;

/// One Gemini model reachable through the generative language API.
pub struct GeminiBackend {
    client: Client,
    model: String,
    endpoint: String,
    api_key: String,
}

impl GeminiBackend {
    /// Create a backend for `model`.
    pub fn new(model: &str, api_key: &str, config: &VisionConfig) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            model: model.to_string(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    fn failure(&self, reason: impl Into<String>) -> BackendFailure {
        BackendFailure::new(&self.model, reason)
    }
}

#[async_trait]
impl VisionBackend for GeminiBackend {
    fn id(&self) -> &str {
        &self.model
    }

    async fn invoke(&self, prompt: &str, payload: &ImagePayload) -> Result<String, BackendFailure> {
        let request = GenerateContentRequest::new(prompt, payload);

        debug!(
            "POST {} ({} image bytes, {})",
            self.url(),
            payload.data.len(),
            payload.mime_type
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.failure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self
                .failure(error_reason(&body, status.canonical_reason()))
                .with_status(status.as_u16()));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.failure(format!("invalid response body: {}", e)))?;

        body.text().ok_or_else(|| self.failure("response has no text parts"))
    }
}

/// Pick a readable reason from an error response body.
fn error_reason(body: &str, canonical: Option<&str>) -> String {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    if message.is_empty() {
        canonical.unwrap_or("request failed").to_string()
    } else {
        message.chars().take(MAX_REASON_LEN).collect()
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn new(prompt: &str, payload: &ImagePayload) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    RequestPart::Text {
                        text: prompt.to_string(),
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: payload.mime_type.clone(),
                            data: BASE64_STANDARD.encode(&payload.data),
                        },
                    },
                ],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}
