//! CLI subcommands.

pub mod archive;
pub mod batch;
pub mod config;
pub mod extract;

use std::fs;
use std::path::{Path, PathBuf};

use cardex_core::compress::mime_type_for_extension;
use cardex_core::models::config::ImageConfig;
use cardex_core::{CardImage, CardexConfig};
use tracing::debug;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardex")
        .join("config.json")
}

/// Path given with `--config`, or the default one.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration. An explicit path must exist; the default path is
/// optional.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<CardexConfig> {
    match config_path {
        Some(path) => Ok(CardexConfig::from_file(Path::new(path))?),
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Loading configuration from {}", path.display());
                Ok(CardexConfig::from_file(&path)?)
            } else {
                Ok(CardexConfig::default())
            }
        }
    }
}

/// Whether a path looks like a supported card image.
pub fn is_card_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(mime_type_for_extension)
        .is_some()
}

/// Read a card image from disk and prepare its upload payload.
pub fn read_card(path: &Path, config: &ImageConfig, no_compress: bool) -> anyhow::Result<CardImage> {
    let data = fs::read(path)?;

    if no_compress {
        let mime_type = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_type_for_extension)
            .unwrap_or("image/jpeg");
        return Ok(CardImage::passthrough(data, mime_type));
    }

    Ok(CardImage::prepare(data, config)?)
}
