//! Issuer detection.

use tracing::{debug, trace};

use super::registry::{IssuerProfile, IssuerRegistry};
use crate::models::statement::StatementText;

/// Find the issuer of a statement.
///
/// Returns the first profile, in registry order, whose keyword (the first word
/// of its name) occurs anywhere in the text, ignoring case. The match is loose
/// on purpose: statements rarely print the full issuer name verbatim. When two
/// issuers share a keyword, or the keyword appears incidentally (a merchant
/// name, say), the earlier declaration wins.
pub fn detect_issuer<'r>(text: &StatementText, registry: &'r IssuerRegistry) -> Option<&'r IssuerProfile> {
    if text.is_empty() {
        return None;
    }

    let haystack = text.as_str().to_lowercase();
    let found = registry.iter().find(|profile| {
        trace!("Checking issuer keyword '{}'", profile.keyword());
        haystack.contains(profile.keyword())
    });

    if let Some(profile) = found {
        debug!("Detected issuer {}", profile.name());
    }
    found
}
