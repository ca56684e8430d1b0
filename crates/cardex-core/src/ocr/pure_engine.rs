//! Pure Rust OCR recognizer using `pure-onnx-ocr`.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use image::GenericImageView;
use pure_onnx_ocr::engine::{OcrEngine, OcrEngineBuilder};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::{join_in_reading_order, TextRecognizer, TextRegion};

/// OCR backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
///
/// The engine is built on first use and reused afterwards, so a missing
/// model directory only matters when the fallback actually runs. A failed
/// load is retried on the next call. Recognition runs on tokio's blocking
/// pool; calls are serialized on the engine.
#[derive(Clone)]
pub struct PureOcrRecognizer {
    inner: Arc<Inner>,
}

struct Inner {
    det_path: PathBuf,
    rec_path: PathBuf,
    dict_path: PathBuf,
    keep_unk: bool,
    // The engine keeps per-shape model caches in `RefCell`s: `Send`, not `Sync`.
    engine: Mutex<Option<OcrEngine>>,
}

impl PureOcrRecognizer {
    /// Create a recognizer reading models from `config.model_dir`.
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                det_path: config.model_path(&config.detection_model),
                rec_path: config.model_path(&config.recognition_model),
                dict_path: config.model_path(&config.dictionary),
                keep_unk: config.keep_unk,
                engine: Mutex::new(None),
            }),
        }
    }

    /// Whether all model files are present.
    pub fn models_available(&self) -> bool {
        let inner = &self.inner;
        inner.det_path.exists() && inner.rec_path.exists() && inner.dict_path.exists()
    }
}

impl Inner {
    fn load_engine(&self) -> Result<OcrEngine, OcrError> {
        for path in [&self.det_path, &self.rec_path, &self.dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = OcrEngineBuilder::new()
            .det_model_path(&self.det_path)
            .rec_model_path(&self.rec_path)
            .dictionary_path(&self.dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", self.det_path.display());
        Ok(engine)
    }

    fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let start = Instant::now();

        let image = image::load_from_memory(image)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;
        let (width, height) = image.dimensions();
        info!("Running OCR on {}x{} image", width, height);

        let mut slot = self
            .engine
            .lock()
            .map_err(|_| OcrError::Recognition("OCR engine lock poisoned".to_string()))?;
        let engine = match slot.take() {
            Some(engine) => engine,
            None => self.load_engine()?,
        };

        let results = engine.run_from_image(&image);
        *slot = Some(engine);
        let results = results.map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let regions = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                TextRegion { text, x, y }
            })
            .collect();

        let text = join_in_reading_order(regions);

        info!(
            "OCR complete: {} characters in {}ms",
            text.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

#[async_trait]
impl TextRecognizer for PureOcrRecognizer {
    async fn recognize(&self, image: &[u8]) -> Result<String, OcrError> {
        let inner = Arc::clone(&self.inner);
        let image = image.to_vec();

        tokio::task::spawn_blocking(move || inner.recognize(&image))
            .await
            .map_err(|e| OcrError::Recognition(format!("OCR task failed: {}", e)))?
    }
}

/// Smallest x and y over the region polygon's exterior.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    polygon
        .exterior()
        .coords()
        .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
            (x.min(c.x as f32), y.min(c.y as f32))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    fn missing_models() -> PureOcrRecognizer {
        PureOcrRecognizer::new(&OcrConfig {
            model_dir: PathBuf::from("/nonexistent/cardex-models"),
            ..Default::default()
        })
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut png = std::io::Cursor::new(Vec::new());
        image::DynamicImage::new_rgb8(width, height)
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();
        png.into_inner()
    }

    #[tokio::test]
    async fn test_missing_models_is_model_load_error() {
        let recognizer = missing_models();
        assert!(!recognizer.models_available());

        // A valid image so decoding succeeds and model loading is reached.
        let err = recognizer.recognize(&png(1, 1)).await.unwrap_err();
        assert!(matches!(err, OcrError::ModelLoad(_)));
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let recognizer = missing_models();
        let image = png(1, 1);

        for _ in 0..2 {
            let err = recognizer.recognize(&image).await.unwrap_err();
            assert!(matches!(err, OcrError::ModelLoad(_)));
            assert!(recognizer.inner.engine.lock().unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_invalid_image() {
        let recognizer = PureOcrRecognizer::new(&OcrConfig::default());
        let err = recognizer.recognize(b"garbage").await.unwrap_err();
        assert!(matches!(err, OcrError::InvalidImage(_)));
    }

    #[tokio::test]
    async fn test_recognize_does_not_block_the_runtime() {
        let recognizer = missing_models();
        let image = png(2000, 2000);

        let ticks = Arc::new(AtomicUsize::new(0));
        let ticker = {
            let ticks = Arc::clone(&ticks);
            tokio::spawn(async move {
                loop {
                    ticks.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                }
            })
        };

        // Single-threaded runtime: the ticker only runs if `recognize` yields.
        let err = recognizer.recognize(&image).await.unwrap_err();
        let observed = ticks.load(Ordering::SeqCst);
        ticker.abort();

        assert!(matches!(err, OcrError::ModelLoad(_)));
        assert!(observed > 0, "runtime was blocked during recognition");
    }
}
