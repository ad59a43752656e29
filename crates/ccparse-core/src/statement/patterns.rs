//! Issuer-agnostic patterns used by the fallback resolver.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Masked card numbers: ****1234, XXXX 1234, "ending: 1234"
    pub static ref MASKED_CARD: Regex = Regex::new(
        r"(?i)(?:\*{4}|X{4}|ending\s*:?)\s*(\d{4})"
    ).unwrap();

    // Any 4-digit group within 30 characters after a card/account label
    pub static ref CARD_NEAR_LABEL: Regex = Regex::new(
        r"(?i)(Card|Account|Ending).{0,30}(\d{4})"
    ).unwrap();

    pub static ref LABELED_BALANCE: Regex = Regex::new(
        r"(?i)(?:Total\s*Due|Amount\s*Due|Total\s*Outstanding|Statement\s*Balance|Current\s*Balance)\s*[:\-]?\s*(?:INR|Rs\.|₹)?\s*([\d,]+\.?\d{0,2})"
    ).unwrap();

    // "01 Jan 2024 to 31 Jan 2024", also with a hyphen or dash between the ends
    pub static ref DATE_RANGE: Regex = Regex::new(
        r"(?i)(\d{1,2}\s\w{3,9}\s\d{4})\s*[-to–—]+\s*(\d{1,2}\s\w{3,9}\s\d{4})"
    ).unwrap();

    pub static ref PAYMENT_DUE_DATE: Regex = Regex::new(
        r"(?i)Payment\s*Due\s*Date\s*[:\-]?\s*(\d{1,2}\s\w{3,9}\s\d{4})"
    ).unwrap();

    pub static ref DUE_DATE: Regex = Regex::new(
        r"(?i)Due\s*Date\s*[:\-]?\s*(\d{1,2}\s\w{3,9}\s\d{4})"
    ).unwrap();
}
