//! Scripted backends for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{BackendFailure, ImagePayload, VisionBackend};

/// Backend returning a fixed response and counting its invocations.
pub(crate) struct FakeBackend {
    id: String,
    response: Result<String, BackendFailure>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeBackend {
    pub(crate) fn ok(id: &str, text: &str) -> Self {
        Self {
            id: id.to_string(),
            response: Ok(text.to_string()),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::default(),
        }
    }

    pub(crate) fn failing(id: &str, status: Option<u16>) -> Self {
        let mut failure = BackendFailure::new(id, "unavailable");
        failure.status = status;
        Self {
            id: id.to_string(),
            response: Err(failure),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::default(),
        }
    }

    /// Sleep before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Prompts received, in call order.
    pub(crate) fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl VisionBackend for FakeBackend {
    fn id(&self) -> &str {
        &self.id
    }

    async fn invoke(&self, prompt: &str, _payload: &ImagePayload) -> Result<String, BackendFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}
