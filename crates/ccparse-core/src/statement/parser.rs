//! Statement parser: detection, issuer extraction, then generic fallbacks.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::detector::detect_issuer;
use super::extractor::apply_profile;
use super::fallback;
use super::registry::IssuerRegistry;
use super::{ParseReport, StatementExtractor};
use crate::models::statement::{ExtractionResult, Field, StatementText};

/// Rule-based statement parser over an issuer registry.
///
/// Parsing is a pure function of the text and the registry, so one parser can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct StatementParser {
    registry: Arc<IssuerRegistry>,
}

impl StatementParser {
    /// Create a parser over the built-in registry.
    pub fn new() -> Self {
        Self {
            registry: IssuerRegistry::builtin(),
        }
    }

    /// Create a parser over a custom registry.
    pub fn with_registry(registry: Arc<IssuerRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this parser detects against.
    pub fn registry(&self) -> &IssuerRegistry {
        &self.registry
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementExtractor for StatementParser {
    fn parse(&self, text: &StatementText) -> ParseReport {
        let mut result = ExtractionResult::default();
        let mut warnings = Vec::new();

        if text.is_empty() {
            warn!("Statement text is empty, nothing to extract");
            warnings.push("No text could be extracted from the statement".to_string());
            return ParseReport {
                missing: result.missing_fields(),
                result,
                issuer_detected: false,
                fallback_fields: Vec::new(),
                warnings,
            };
        }

        info!("Parsing statement from {} characters of text", text.len());

        let issuer = detect_issuer(text, &self.registry);
        match issuer {
            Some(profile) => {
                result.issuer = Some(profile.name().to_string());
                apply_profile(text, profile, &mut result);
            }
            None => {
                warn!("Could not detect issuer");
                warnings.push("Could not detect issuer".to_string());
            }
        }

        let fallback_fields = fallback::resolve(text, &mut result);

        let missing = result.missing_fields();
        for field in missing.iter().filter(|f| **f != Field::Issuer) {
            warnings.push(format!("Could not extract {}", field.label().to_lowercase()));
        }

        debug!(
            "Extracted statement for {:?}, {} field(s) missing",
            result.issuer,
            missing.len()
        );

        ParseReport {
            result,
            issuer_detected: issuer.is_some(),
            fallback_fields,
            missing,
            warnings,
        }
    }
}
