//! Core library for credit-card statement parsing.
//!
//! This crate provides:
//! - Issuer detection and field extraction over normalized statement text
//! - Generic fallback patterns for fields an issuer template misses
//! - PDF text extraction with an OCR fallback for scanned statements
//! - Configuration for the pipeline

pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod reader;
pub mod statement;

pub use error::{OcrError, PdfError, RegistryError, Result, StatementError};
pub use models::config::StatementConfig;
pub use models::statement::{ExtractionResult, Field, StatementText};
pub use ocr::{OcrEngine, TesseractEngine};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use reader::StatementReader;
pub use statement::{
    IssuerDefinition, IssuerProfile, IssuerRegistry, ParseReport, StatementExtractor, StatementParser,
};

/// Extract statement fields using the built-in issuer registry.
pub fn detect_and_extract(text: &StatementText) -> ExtractionResult {
    StatementParser::new().detect_and_extract(text)
}
