//! Statement field extraction.
//!
//! Raw text is normalized into a [`StatementText`], the issuer is detected
//! against an [`IssuerRegistry`], the issuer's own patterns are applied and any
//! field still missing goes through the generic [`fallback`] strategies.

pub mod detector;
pub mod extractor;
pub mod fallback;
pub mod normalize;
mod parser;
pub mod patterns;
pub mod registry;

pub use detector::detect_issuer;
pub use parser::StatementParser;
pub use registry::{IssuerDefinition, IssuerProfile, IssuerRegistry};

use serde::Serialize;

use crate::models::statement::{ExtractionResult, Field, StatementText};

/// Extraction outcome with diagnostics for front-ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    /// The extracted record.
    pub result: ExtractionResult,
    /// Whether a registry issuer matched.
    pub issuer_detected: bool,
    /// Fields recovered by the generic fallbacks.
    pub fallback_fields: Vec<Field>,
    /// Fields that remain unset.
    pub missing: Vec<Field>,
    /// Human readable warnings (undetected issuer, missing fields).
    pub warnings: Vec<String>,
}

/// Trait for statement extractors.
pub trait StatementExtractor {
    /// Extract fields with diagnostics.
    fn parse(&self, text: &StatementText) -> ParseReport;

    /// Extract fields.
    fn detect_and_extract(&self, text: &StatementText) -> ExtractionResult {
        self.parse(text).result
    }
}
