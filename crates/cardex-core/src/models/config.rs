//! Configuration structures for the extraction pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CardexError, Result};
use crate::models::contact::ContactField;

/// Main configuration for the cardex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardexConfig {
    /// Vision backend configuration.
    pub vision: VisionConfig,

    /// OCR fallback configuration.
    pub ocr: OcrConfig,

    /// Heuristic text extraction configuration.
    pub heuristics: HeuristicConfig,

    /// Per-field defaults applied by the normalizer.
    pub defaults: FieldDefaults,

    /// Upload image compression.
    pub image: ImageConfig,

    /// Contact archive.
    pub archive: ArchiveConfig,
}

/// Vision backend cascade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Backend (model) identifiers, tried in this order.
    pub backends: Vec<String>,

    /// Base URL of the generative language API.
    pub endpoint: String,

    /// API key. Takes precedence over `api_key_env`.
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Replacement for the built-in extraction prompt.
    pub prompt: Option<String>,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            backends: vec![
                "gemini-3-flash-preview".to_string(),
                "gemini-1.5-flash".to_string(),
                "gemini-3.1-pro-preview".to_string(),
            ],
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 60,
            prompt: None,
        }
    }
}

impl VisionConfig {
    /// Resolve the API key from the config or the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of blanking them.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Get full path to a model file.
    pub fn model_path(&self, file_name: &str) -> PathBuf {
        self.model_dir.join(file_name)
    }
}

/// Heuristic text extractor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Lines with fewer characters are dropped before anything else.
    pub min_line_len: usize,

    /// Lines with fewer characters count as garbage.
    pub min_clean_len: usize,

    /// Keywords marking a job title line (case-insensitive).
    pub title_keywords: Vec<String>,

    /// Keywords marking a company line (case-insensitive).
    pub company_keywords: Vec<String>,

    /// Maximum company length in characters.
    pub company_max_len: usize,

    /// Cleaned lines skipped before the address block (the name line).
    pub address_skip: usize,

    /// Number of cleaned lines joined into the address.
    pub address_lines: usize,

    /// Maximum address length in characters, before the suffix.
    pub address_max_len: usize,

    /// Marker appended to the joined address.
    pub address_suffix: String,

    /// Name used when no usable line exists.
    pub name_fallback: String,

    /// Name used when cleaning leaves nothing.
    pub name_empty: String,

    /// Title used when no keyword line exists.
    pub title: String,

    /// Company used when no keyword line exists.
    pub company: String,

    /// Address used when there are too few lines.
    pub address: String,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            min_line_len: 4,
            min_clean_len: 3,
            title_keywords: ["CEO", "Manager", "Founder", "Director", "Owner", "President", "Lead"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            company_keywords: ["Inc", "Ltd", "Corp", "Company", "Solutions", "Industries"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            company_max_len: 50,
            address_skip: 1,
            address_lines: 3,
            address_max_len: 100,
            address_suffix: "...".to_string(),
            name_fallback: "Found with OCR".to_string(),
            name_empty: "Unknown Contact".to_string(),
            title: "Professional".to_string(),
            company: "OCR Extraction".to_string(),
            address: "Not found".to_string(),
        }
    }
}

/// Defaults substituted for missing or blank fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    pub name: String,
    pub company: String,
    pub title: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub website: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        let na = || "N/A".to_string();
        Self {
            name: "Unknown".to_string(),
            company: na(),
            title: na(),
            phone: na(),
            email: na(),
            address: na(),
            website: na(),
        }
    }
}

impl FieldDefaults {
    /// Configured default for a field.
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Company => &self.company,
            ContactField::Title => &self.title,
            ContactField::Phone => &self.phone,
            ContactField::Email => &self.email,
            ContactField::Address => &self.address,
            ContactField::Website => &self.website,
        }
    }
}

/// Upload image compression configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// JPEG quality for the first encoding pass.
    pub jpeg_quality: u8,

    /// Payloads above this size are downscaled.
    pub max_bytes: usize,

    /// Target width when downscaling.
    pub downscale_width: u32,

    /// JPEG quality after downscaling.
    pub downscale_quality: u8,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            jpeg_quality: 90,
            max_bytes: 10 * 1024 * 1024,
            downscale_width: 2000,
            downscale_quality: 80,
        }
    }
}

/// Contact archive configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Archive file (defaults to the user data directory).
    pub path: Option<PathBuf>,

    /// Store the compressed card photo alongside the record.
    pub store_photos: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            path: None,
            store_photos: true,
        }
    }
}

impl CardexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values the pipeline relies on.
    pub fn validate(&self) -> Result<()> {
        for field in ContactField::ALL {
            if self.defaults.get(field).trim().is_empty() {
                return Err(CardexError::Config(format!(
                    "default for `{}` must not be empty",
                    field
                )));
            }
        }
        if self.heuristics.min_line_len == 0 {
            return Err(CardexError::Config(
                "heuristics.min_line_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CardexConfig =
            serde_json::from_str(r#"{"vision": {"backends": ["only-model"]}}"#).unwrap();

        assert_eq!(config.vision.backends, vec!["only-model".to_string()]);
        assert_eq!(config.vision.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.heuristics.company_max_len, 50);
        assert_eq!(config.defaults.name, "Unknown");
    }

    #[test]
    fn test_validate_rejects_blank_default() {
        let mut config = CardexConfig::default();
        assert!(config.validate().is_ok());

        config.defaults.email = "  ".to_string();
        assert!(matches!(config.validate(), Err(CardexError::Config(_))));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("cardex-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut config = CardexConfig::default();
        config.heuristics.title_keywords.push("Engineer".to_string());
        config.save(&path).unwrap();

        let loaded = CardexConfig::from_file(&path).unwrap();
        assert!(loaded.heuristics.title_keywords.contains(&"Engineer".to_string()));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = VisionConfig {
            api_key: Some("abc".to_string()),
            api_key_env: "CARDEX_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), Some("abc".to_string()));

        let config = VisionConfig {
            api_key: None,
            api_key_env: "CARDEX_TEST_UNSET_KEY_VAR".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), None);
    }
}
