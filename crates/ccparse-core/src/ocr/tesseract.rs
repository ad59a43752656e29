//! Tesseract command-line engine.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;
use tracing::{debug, trace};

use super::{OcrEngine, Result};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Environment variable naming the tesseract binary.
pub const TESSERACT_CMD_ENV: &str = "TESSERACT_CMD";

/// Default install location of the Windows installer.
pub const DEFAULT_TESSERACT_PATH: &str = r"C:\Program Files\Tesseract-OCR\tesseract.exe";

/// OCR through the `tesseract` executable.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: PathBuf,
    language: String,
}

impl TesseractEngine {
    pub fn new(command: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    /// Locate tesseract: configured path, then `TESSERACT_CMD`, then the
    /// default install path, then `tesseract` on `PATH`.
    pub fn locate(config: &OcrConfig) -> Result<Self> {
        let env_cmd = std::env::var_os(TESSERACT_CMD_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::locate_from(config, env_cmd)
    }

    fn locate_from(config: &OcrConfig, env_cmd: Option<PathBuf>) -> Result<Self> {
        if let Some(cmd) = config.tesseract_cmd.clone().or(env_cmd) {
            debug!("Using tesseract at {}", cmd.display());
            return Ok(Self::new(cmd, config.language.clone()));
        }

        if Path::new(DEFAULT_TESSERACT_PATH).is_file() {
            return Ok(Self::new(DEFAULT_TESSERACT_PATH, config.language.clone()));
        }

        let on_path = Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);
        if on_path {
            debug!("Using tesseract from PATH");
            return Ok(Self::new("tesseract", config.language.clone()));
        }

        Err(OcrError::NotFound)
    }

    /// Path of the binary in use.
    pub fn command(&self) -> &Path {
        &self.command
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage) -> Result<String> {
        let file = tempfile::Builder::new()
            .prefix("ccparse-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::Image(e.to_string()))?;
        image
            .save_with_format(file.path(), image::ImageFormat::Png)
            .map_err(|e| OcrError::Image(e.to_string()))?;

        trace!("Running {} on {}", self.command.display(), file.path().display());
        let output = Command::new(&self.command)
            .arg(file.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| OcrError::Invocation(format!("{}: {}", self.command.display(), e)))?;

        if !output.status.success() {
            return Err(OcrError::Invocation(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_path_wins() {
        let config = OcrConfig {
            tesseract_cmd: Some(PathBuf::from("/opt/tesseract/bin/tesseract")),
            ..Default::default()
        };

        let engine = TesseractEngine::locate_from(&config, Some(PathBuf::from("/env/tesseract"))).unwrap();
        assert_eq!(engine.command(), Path::new("/opt/tesseract/bin/tesseract"));
    }

    #[test]
    fn test_env_path_used_without_config() {
        let engine =
            TesseractEngine::locate_from(&OcrConfig::default(), Some(PathBuf::from("/env/tesseract"))).unwrap();
        assert_eq!(engine.command(), Path::new("/env/tesseract"));
        assert_eq!(engine.name(), "tesseract");
    }

    #[test]
    fn test_missing_binary_is_invocation_error() {
        let engine = TesseractEngine::new("/nonexistent/ccparse-tesseract", "eng");
        let image = DynamicImage::new_luma8(4, 4);

        let err = engine.recognize(&image).unwrap_err();
        assert!(matches!(err, OcrError::Invocation(_)));
    }
}
