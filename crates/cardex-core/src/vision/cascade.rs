//! Ordered, first-success-wins backend cascade.

use tracing::{debug, info, warn};

use crate::error::VisionError;
use crate::models::config::VisionConfig;

use super::{BackendFailure, GeminiBackend, ImagePayload, VisionBackend};

/// Result of running the cascade once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeOutcome {
    /// A backend returned non-empty text. Later backends were not tried.
    Success {
        backend: String,
        text: String,
        /// Failures of the backends tried before the successful one.
        failures: Vec<BackendFailure>,
    },
    /// Every backend failed or returned empty text.
    Exhausted { failures: Vec<BackendFailure> },
}

impl CascadeOutcome {
    /// Model text, if any backend produced some.
    pub fn into_text(self) -> Option<String> {
        match self {
            CascadeOutcome::Success { text, .. } => Some(text),
            CascadeOutcome::Exhausted { .. } => None,
        }
    }

    /// Failures recorded along the way.
    pub fn failures(&self) -> &[BackendFailure] {
        match self {
            CascadeOutcome::Success { failures, .. } | CascadeOutcome::Exhausted { failures } => {
                failures
            }
        }
    }
}

/// Tries vision backends in order until one returns text.
///
/// Attempts run sequentially. A failing backend is recorded and skipped,
/// never retried. Exhaustion is a normal outcome, not an error.
#[derive(Default)]
pub struct VisionCascade {
    backends: Vec<Box<dyn VisionBackend>>,
}

impl VisionCascade {
    /// Create an empty cascade.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a backend to the end of the order.
    pub fn with_backend(mut self, backend: impl VisionBackend + 'static) -> Self {
        self.backends.push(Box::new(backend));
        self
    }

    /// Append an already boxed backend.
    pub fn push(&mut self, backend: Box<dyn VisionBackend>) {
        self.backends.push(backend);
    }

    /// Build one Gemini backend per configured model identifier.
    ///
    /// Without an API key the cascade is empty, so every run falls through
    /// to OCR.
    pub fn from_config(config: &VisionConfig) -> Result<Self, VisionError> {
        let Some(api_key) = config.resolve_api_key() else {
            warn!(
                "No vision API key (set vision.api_key or ${}), using OCR only",
                config.api_key_env
            );
            return Ok(Self::new());
        };

        let mut cascade = Self::new();
        for model in &config.backends {
            cascade.push(Box::new(GeminiBackend::new(model, &api_key, config)?));
        }

        debug!("Vision cascade: {}", config.backends.join(" -> "));
        Ok(cascade)
    }

    /// Backend identifiers in order.
    pub fn backend_ids(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Run the cascade.
    pub async fn attempt(&self, payload: &ImagePayload, prompt: &str) -> CascadeOutcome {
        let mut failures = Vec::new();

        for backend in &self.backends {
            let id = backend.id();
            debug!("Trying vision backend {}", id);

            let failure = match backend.invoke(prompt, payload).await {
                Ok(text) if !text.trim().is_empty() => {
                    info!("Vision response received from {}", id);
                    return CascadeOutcome::Success {
                        backend: id.to_string(),
                        text,
                        failures,
                    };
                }
                Ok(_) => BackendFailure::new(id, "empty response"),
                Err(failure) => failure,
            };

            warn!("Vision backend {}", failure);
            if failure.is_permission_denied() {
                warn!("The API key may lack permission for {}", id);
            }
            failures.push(failure);
        }

        CascadeOutcome::Exhausted { failures }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::testing::FakeBackend;

    use std::sync::atomic::Ordering;

    fn payload() -> ImagePayload {
        ImagePayload::new(vec![0xFF, 0xD8], "image/jpeg")
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let b1 = FakeBackend::failing("b1", Some(503));
        let b2 = FakeBackend::ok("b2", r#"{"name": "Jane Doe"}"#);
        let b3 = FakeBackend::ok("b3", r#"{"name": "Never"}"#);
        let (c1, c2, c3) = (b1.counter(), b2.counter(), b3.counter());

        let cascade = VisionCascade::new().with_backend(b1).with_backend(b2).with_backend(b3);
        let outcome = cascade.attempt(&payload(), "prompt").await;

        match &outcome {
            CascadeOutcome::Success { backend, text, failures } => {
                assert_eq!(backend, "b2");
                assert_eq!(text, r#"{"name": "Jane Doe"}"#);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].status, Some(503));
            }
            other => panic!("expected success, got {:?}", other),
        }

        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
        assert_eq!(c3.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_text_counts_as_failure() {
        let cascade = VisionCascade::new()
            .with_backend(FakeBackend::ok("blank", "   \n"))
            .with_backend(FakeBackend::ok("real", "{}"));

        let outcome = cascade.attempt(&payload(), "prompt").await;
        assert_eq!(outcome.failures()[0].reason, "empty response");
        assert_eq!(outcome.into_text(), Some("{}".to_string()));
    }

    #[tokio::test]
    async fn test_exhaustion_records_every_failure() {
        let b1 = FakeBackend::failing("b1", Some(403));
        let b2 = FakeBackend::failing("b2", None);
        let (c1, c2) = (b1.counter(), b2.counter());

        let cascade = VisionCascade::new().with_backend(b1).with_backend(b2);
        let outcome = cascade.attempt(&payload(), "prompt").await;

        assert!(matches!(outcome, CascadeOutcome::Exhausted { .. }));
        assert_eq!(outcome.failures().len(), 2);
        assert!(outcome.failures()[0].is_permission_denied());
        assert_eq!(c1.load(Ordering::SeqCst), 1);
        assert_eq!(c2.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.into_text(), None);
    }

    #[tokio::test]
    async fn test_empty_cascade_is_exhausted() {
        let outcome = VisionCascade::new().attempt(&payload(), "prompt").await;
        assert_eq!(outcome, CascadeOutcome::Exhausted { failures: vec![] });
    }

    #[test]
    fn test_from_config_without_key_is_empty() {
        let config = VisionConfig {
            api_key: None,
            api_key_env: "CARDEX_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        let cascade = VisionCascade::from_config(&config).unwrap();
        assert!(cascade.is_empty());
    }

    #[test]
    fn test_from_config_keeps_order() {
        let config = VisionConfig {
            api_key: Some("test-key".to_string()),
            backends: vec!["m1".to_string(), "m2".to_string()],
            ..Default::default()
        };
        let cascade = VisionCascade::from_config(&config).unwrap();
        assert_eq!(cascade.backend_ids(), vec!["m1", "m2"]);
    }
}
