//! Size-bounding of card images before they are sent to vision backends.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use crate::error::Result;
use crate::models::config::ImageConfig;
use crate::vision::ImagePayload;

/// A card image as uploaded, plus the payload sent to vision backends.
///
/// OCR always reads `original`; backends only see `payload`.
#[derive(Debug, Clone)]
pub struct CardImage {
    pub original: Vec<u8>,
    pub payload: ImagePayload,
}

impl CardImage {
    /// Re-encode the upload as JPEG, downscaling if it is still too large.
    pub fn prepare(original: Vec<u8>, config: &ImageConfig) -> Result<Self> {
        let image = image::load_from_memory(&original)?;
        let (width, height) = image.dimensions();

        let mut data = encode_jpeg(&image, config.jpeg_quality)?;
        debug!(
            "Encoded {}x{} card at quality {}: {} -> {} bytes",
            width,
            height,
            config.jpeg_quality,
            original.len(),
            data.len()
        );

        if data.len() > config.max_bytes {
            let resized = image.resize(config.downscale_width, u32::MAX, FilterType::Lanczos3);
            data = encode_jpeg(&resized, config.downscale_quality)?;
            debug!(
                "Downscaled card to {}x{}: {} bytes",
                resized.width(),
                resized.height(),
                data.len()
            );
        }

        Ok(Self {
            original,
            payload: ImagePayload::new(data, "image/jpeg"),
        })
    }

    /// Send the upload unchanged.
    pub fn passthrough(original: Vec<u8>, mime_type: impl Into<String>) -> Self {
        let payload = ImagePayload::new(original.clone(), mime_type);
        Self { original, payload }
    }
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
    let mut buffer = Cursor::new(Vec::new());
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buffer, quality))?;
    Ok(buffer.into_inner())
}

/// Guess a media type from a file extension.
pub fn mime_type_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        _ => None,
    }
}
