//! Field extraction with an issuer's own patterns.

use regex::{Captures, Regex};
use tracing::trace;

use super::registry::IssuerProfile;
use crate::models::statement::{ExtractionResult, StatementText};

/// Fill `result` from the issuer's patterns.
///
/// Fields whose pattern does not match are left untouched so the generic
/// fallbacks can try them.
pub fn apply_profile(text: &StatementText, profile: &IssuerProfile, result: &mut ExtractionResult) {
    let text = text.as_str();

    result.last_4_digits = capture_first(profile.last_4_digits(), text);

    if let Some(caps) = profile.billing_cycle().captures(text) {
        if let (Some(start), Some(end)) = (caps.get(1), caps.get(2)) {
            result.billing_cycle_start = Some(start.as_str().to_string());
            result.billing_cycle_end = Some(end.as_str().to_string());
        }
    }

    result.payment_due_date = capture_first(profile.payment_due_date(), text);

    result.total_outstanding_balance = capture_first(profile.total_outstanding_balance(), text)
        .map(|raw| strip_thousands(&raw))
        .filter(|value| !value.is_empty());

    trace!("Applied {} patterns, missing {:?}", profile.name(), result.missing_fields());
}

/// Value of the first capture group that took part in the match.
///
/// Patterns with alternatives put each alternative's value in its own group;
/// only one of them participates. A match through a later group therefore
/// counts as an issuer match and is not listed in `ParseReport::fallback_fields`.
pub(crate) fn capture_first(regex: &Regex, text: &str) -> Option<String> {
    regex.captures(text).as_ref().and_then(first_group)
}

fn first_group(caps: &Captures<'_>) -> Option<String> {
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().to_string())
}

/// Remove thousands separators from a captured amount.
pub(crate) fn strip_thousands(raw: &str) -> String {
    raw.replace(',', "")
}
