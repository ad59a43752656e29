//! Statement text acquisition: embedded PDF text with an OCR fallback.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{Result, StatementError};
use crate::models::config::PdfConfig;
use crate::models::statement::StatementText;
use crate::ocr::OcrEngine;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// Reads statement files into text.
#[derive(Clone, Default)]
pub struct StatementReader {
    pdf: PdfConfig,
    ocr: Option<Arc<dyn OcrEngine>>,
}

impl StatementReader {
    /// Create a reader without OCR.
    pub fn new(pdf: PdfConfig) -> Self {
        Self { pdf, ocr: None }
    }

    /// Enable the OCR fallback.
    pub fn with_ocr(mut self, engine: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(engine);
        self
    }

    pub fn has_ocr(&self) -> bool {
        self.ocr.is_some()
    }

    /// Raw text of a statement file.
    ///
    /// `.txt` files are read as is. For PDFs the embedded text is used; when it
    /// is missing or unreadable the page images go through OCR. Without an OCR
    /// engine the (possibly empty) embedded text is returned.
    pub fn extract_text(&self, path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "txt" => Ok(std::fs::read_to_string(path)?),
            "pdf" => {
                let data = std::fs::read(path)?;
                self.extract_pdf_text(&data, path)
            }
            _ => Err(StatementError::Config(format!(
                "unsupported statement format: {}",
                path.display()
            ))),
        }
    }

    /// Normalized text of a statement file.
    pub fn read(&self, path: &Path) -> Result<StatementText> {
        self.extract_text(path).map(|raw| StatementText::normalize(&raw))
    }

    fn extract_pdf_text(&self, data: &[u8], path: &Path) -> Result<String> {
        let mut extractor = PdfExtractor::new();
        extractor.load(data)?;

        let text = match extractor.extract_text() {
            Ok(text) => text,
            Err(e) => {
                warn!("Text extraction failed for {}: {}", path.display(), e);
                String::new()
            }
        };

        if text.trim().len() >= self.pdf.min_text_length {
            debug!("Using {} chars of embedded text", text.len());
            return Ok(text);
        }

        let Some(engine) = &self.ocr else {
            warn!("No embedded text in {} and OCR is unavailable", path.display());
            return Ok(text);
        };

        warn!("OCR fallback for {}", path.display());
        Ok(self.ocr_pages(&extractor, engine.as_ref()))
    }

    fn ocr_pages(&self, extractor: &PdfExtractor, engine: &dyn OcrEngine) -> String {
        let mut pages = extractor.page_count();
        if self.pdf.max_pages > 0 {
            pages = pages.min(self.pdf.max_pages as u32);
        }

        let mut text = String::new();
        for page in 1..=pages {
            let images = match extractor.page_images(page) {
                Ok(images) => images,
                Err(e) => {
                    warn!("Failed to extract images from page {}: {}", page, e);
                    continue;
                }
            };

            for image in &images {
                match engine.recognize(image) {
                    Ok(page_text) => {
                        text.push_str(&page_text);
                        text.push('\n');
                    }
                    Err(e) => warn!("{} failed on page {}: {}", engine.name(), page, e),
                }
            }
        }

        info!("OCR produced {} chars from {} page(s)", text.len(), pages);
        text
    }
}
