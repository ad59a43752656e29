//! Configuration structures for the statement pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, StatementError};

/// Main configuration for the ccparse pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Issuer registry configuration.
    pub registry: RegistryConfig,

    /// Export locations.
    pub output: OutputConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Embedded text shorter than this (after trimming) triggers OCR.
    pub min_text_length: usize,

    /// Maximum pages to OCR (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 1,
            max_pages: 0,
        }
    }
}

/// OCR collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Fall back to OCR when a PDF has no embedded text.
    pub enabled: bool,

    /// Explicit path to the tesseract binary.
    pub tesseract_cmd: Option<PathBuf>,

    /// Tesseract language code.
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tesseract_cmd: None,
            language: "eng".to_string(),
        }
    }
}

/// Issuer registry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON file replacing the built-in issuer table.
    pub issuers_file: Option<PathBuf>,
}

/// Export locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// CSV export path.
    pub csv: PathBuf,

    /// JSON export path.
    pub json: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: PathBuf::from("parsed_credit_card_statements.csv"),
            json: PathBuf::from("parsed_credit_card_statements.json"),
        }
    }
}

impl StatementConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| StatementError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StatementError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
