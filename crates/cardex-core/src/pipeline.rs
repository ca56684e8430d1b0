//! End-to-end extraction: vision cascade, OCR fallback, normalization.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::compress::CardImage;
use crate::error::Result;
use crate::extract::{FieldNormalizer, HeuristicExtractor};
#[cfg(feature = "native")]
use crate::models::config::CardexConfig;
use crate::models::contact::ContactRecord;
use crate::ocr::TextRecognizer;
use crate::vision::prompt::DEFAULT_PROMPT;
use crate::vision::{BackendFailure, CascadeOutcome, VisionCascade};

/// Where the extracted record came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionSource {
    /// A vision backend answered.
    Vision { backend: String },
    /// Every backend failed; OCR plus heuristics were used.
    Ocr,
}

impl ExtractionSource {
    pub fn label(&self) -> &str {
        match self {
            ExtractionSource::Vision { backend } => backend,
            ExtractionSource::Ocr => "ocr",
        }
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Fully populated contact record.
    pub record: ContactRecord,

    /// Path that produced the record.
    pub source: ExtractionSource,

    /// Model text or recognized OCR text.
    pub raw_text: String,

    /// Backend attempts that failed before the result was produced.
    pub failures: Vec<BackendFailure>,

    /// Wall-clock time of the run.
    pub processing_time_ms: u64,
}

/// Orchestrates a single card extraction.
///
/// A run either returns a normalized record or fails with the OCR error.
/// Backend failures never surface as errors. Dropping the future returned
/// by [`ContactPipeline::run`] cancels the run: nothing after the current
/// await point is started.
pub struct ContactPipeline {
    cascade: VisionCascade,
    recognizer: Box<dyn TextRecognizer>,
    extractor: HeuristicExtractor,
    normalizer: FieldNormalizer,
    prompt: String,
}

impl ContactPipeline {
    /// Create a pipeline from its collaborators.
    pub fn new(
        cascade: VisionCascade,
        recognizer: Box<dyn TextRecognizer>,
        extractor: HeuristicExtractor,
        normalizer: FieldNormalizer,
    ) -> Self {
        Self {
            cascade,
            recognizer,
            extractor,
            normalizer,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    /// Replace the extraction prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Build the pipeline described by a configuration.
    #[cfg(feature = "native")]
    pub fn from_config(config: &CardexConfig) -> Result<Self> {
        let cascade = VisionCascade::from_config(&config.vision)?;
        let recognizer = crate::ocr::PureOcrRecognizer::new(&config.ocr);
        if !recognizer.models_available() {
            warn!(
                "OCR models not found in {}; the OCR fallback will fail",
                config.ocr.model_dir.display()
            );
        }

        let pipeline = Self::new(
            cascade,
            Box::new(recognizer),
            HeuristicExtractor::new(config.heuristics.clone()),
            FieldNormalizer::new(config.defaults.clone()),
        );

        Ok(match &config.vision.prompt {
            Some(prompt) => pipeline.with_prompt(prompt.clone()),
            None => pipeline,
        })
    }

    /// Vision cascade in use.
    pub fn cascade(&self) -> &VisionCascade {
        &self.cascade
    }

    /// Extract a contact record from a card image.
    pub async fn run(&self, image: &CardImage) -> Result<ExtractionResult> {
        let start = Instant::now();

        let outcome = self.cascade.attempt(&image.payload, &self.prompt).await;

        let (record, source, raw_text, failures) = match outcome {
            CascadeOutcome::Success {
                backend,
                text,
                failures,
            } => {
                let candidate = parse_model_text(&text);
                let record = self.normalizer.normalize(&candidate);
                (record, ExtractionSource::Vision { backend }, text, failures)
            }
            CascadeOutcome::Exhausted { failures } => {
                info!(
                    "All {} vision backends failed, falling back to OCR",
                    self.cascade.len()
                );
                let text = self.recognizer.recognize(&image.original).await?;
                let candidate = self.extractor.extract(&text);
                let record = self.normalizer.normalize(&candidate);
                (record, ExtractionSource::Ocr, text, failures)
            }
        };

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted \"{}\" via {} in {}ms",
            record.name,
            source.label(),
            processing_time_ms
        );

        Ok(ExtractionResult {
            record,
            source,
            raw_text,
            failures,
            processing_time_ms,
        })
    }
}

/// Parse model output into a JSON value.
///
/// Markdown code fences are removed first. Unparseable text yields an empty
/// object, so every field later takes its default. It does not trigger the
/// OCR fallback.
pub fn parse_model_text(text: &str) -> Value {
    let cleaned = text.replace("```json", "").replace("```", "");
    match serde_json::from_str(cleaned.trim()) {
        Ok(value) => value,
        Err(e) => {
            warn!("Model output is not valid JSON ({}), using defaults", e);
            Value::Object(Default::default())
        }
    }
}
