//! Whitespace normalization of raw extracted text.

/// Collapse every whitespace run (newlines and tabs included) into a single
/// space and trim both ends.
///
/// Extraction tools break a field across lines or pages in different ways;
/// every pattern in this crate assumes single-line, single-spaced input.
pub fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for token in raw.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(token);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_runs() {
        assert_eq!(
            collapse_whitespace("Payment\nDue   Date:\t15 Feb\r\n2024"),
            "Payment Due Date: 15 Feb 2024"
        );
    }

    #[test]
    fn test_trims_and_handles_empty() {
        assert_eq!(collapse_whitespace("   \n\t "), "");
        assert_eq!(collapse_whitespace(""), "");
        assert_eq!(collapse_whitespace("  XXXX 4321  "), "XXXX 4321");
    }

    #[test]
    fn test_unicode_whitespace() {
        // NBSP and form feeds show up in OCR output and page breaks.
        assert_eq!(collapse_whitespace("Rs.\u{00a0}5,000\u{000c}.00"), "Rs. 5,000 .00");
    }
}
