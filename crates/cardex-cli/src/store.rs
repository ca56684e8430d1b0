//! Append-only archive of extracted cards (JSON lines).

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cardex_core::models::config::ArchiveConfig;
use cardex_core::{ContactRecord, ExtractionResult, ExtractionSource};

/// One archived card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Monotonic job number, starting at 1.
    pub job_id: u64,
    pub created_at: DateTime<Utc>,
    /// Input file name, if the card came from a file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub source: ExtractionSource,
    pub record: ContactRecord,
    pub notes: String,
    /// Base64 of the image sent to the vision backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// JSON-lines archive file.
pub struct ContactArchive {
    path: PathBuf,
}

impl ContactArchive {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Archive at the configured path, or in the user data directory.
    pub fn from_config(config: &ArchiveConfig) -> Self {
        Self::new(config.path.clone().unwrap_or_else(default_archive_path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a result and return the stored entry.
    pub fn append(
        &self,
        file: Option<&str>,
        result: &ExtractionResult,
        photo: Option<&[u8]>,
    ) -> anyhow::Result<ArchiveEntry> {
        let job_id = self.entries()?.iter().map(|e| e.job_id).max().unwrap_or(0) + 1;

        let entry = ArchiveEntry {
            job_id,
            created_at: Utc::now(),
            file: file.map(str::to_string),
            source: result.source.clone(),
            record: result.record.clone(),
            notes: result.record.product_notes(),
            photo: photo.map(|p| BASE64_STANDARD.encode(p)),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        out.write_all(line.as_bytes())?;

        debug!("Archived job {} to {}", job_id, self.path.display());
        Ok(entry)
    }

    /// All entries in file order. A missing file is an empty archive.
    pub fn entries(&self) -> anyhow::Result<Vec<ArchiveEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let mut entries = Vec::new();

        for (i, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping corrupt archive line {}: {}", i + 1, e),
            }
        }

        Ok(entries)
    }

    /// Newest entries first.
    pub fn list(&self, limit: Option<usize>) -> anyhow::Result<Vec<ArchiveEntry>> {
        let mut entries = self.entries()?;
        entries.sort_by(|a, b| b.job_id.cmp(&a.job_id));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}

pub fn default_archive_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardex")
        .join("archive.jsonl")
}
