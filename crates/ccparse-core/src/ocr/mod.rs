//! OCR fallback for statements without embedded text.

mod tesseract;

pub use tesseract::{TesseractEngine, DEFAULT_TESSERACT_PATH, TESSERACT_CMD_ENV};

use image::DynamicImage;

use crate::error::OcrError;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// Trait for OCR engines.
///
/// Engines may block for a long time; callers run them off any async
/// executor.
pub trait OcrEngine: Send + Sync {
    /// Engine name for logs.
    fn name(&self) -> &str;

    /// Recognize the text in an image.
    fn recognize(&self, image: &DynamicImage) -> Result<String>;
}
