//! Generic fallback resolution.
//!
//! Each field has an ordered list of strategies. A strategy is a pure function
//! of the normalized text; the first one that returns a value wins. Fields no
//! strategy can recover stay `None`.

use tracing::debug;

use super::extractor::{capture_first, strip_thousands};
use super::patterns::{CARD_NEAR_LABEL, DATE_RANGE, DUE_DATE, LABELED_BALANCE, MASKED_CARD, PAYMENT_DUE_DATE};
use crate::models::statement::{ExtractionResult, Field, StatementText};

/// A single fallback attempt.
pub type Strategy<T> = fn(&str) -> Option<T>;

/// Strategies for the last four card digits.
pub const LAST_4_DIGITS: &[Strategy<String>] = &[masked_card_number, card_number_near_label];

/// Strategies for the outstanding balance.
pub const TOTAL_OUTSTANDING_BALANCE: &[Strategy<String>] = &[labeled_balance];

/// Strategies for the billing cycle; both ends come from one match.
pub const BILLING_CYCLE: &[Strategy<(String, String)>] = &[date_range];

/// Strategies for the payment due date.
pub const PAYMENT_DUE_DATE_STRATEGIES: &[Strategy<String>] = &[payment_due_date_label, due_date_label];

/// Run strategies in order until one succeeds.
pub fn first_match<T>(strategies: &[Strategy<T>], text: &str) -> Option<T> {
    strategies.iter().find_map(|strategy| strategy(text))
}

/// Fill every still-missing field from the generic strategies.
///
/// Returns the fields that were recovered, in export order.
pub fn resolve(text: &StatementText, result: &mut ExtractionResult) -> Vec<Field> {
    let text = text.as_str();
    let mut recovered = Vec::new();

    if text.is_empty() {
        return recovered;
    }

    if result.last_4_digits.is_none() {
        result.last_4_digits = first_match(LAST_4_DIGITS, text);
        if result.last_4_digits.is_some() {
            recovered.push(Field::Last4Digits);
        }
    }

    if result.billing_cycle_start.is_none() || result.billing_cycle_end.is_none() {
        if let Some((start, end)) = first_match(BILLING_CYCLE, text) {
            result.billing_cycle_start = Some(start);
            result.billing_cycle_end = Some(end);
            recovered.extend([Field::BillingCycleStart, Field::BillingCycleEnd]);
        }
    }

    if result.payment_due_date.is_none() {
        result.payment_due_date = first_match(PAYMENT_DUE_DATE_STRATEGIES, text);
        if result.payment_due_date.is_some() {
            recovered.push(Field::PaymentDueDate);
        }
    }

    if result.total_outstanding_balance.is_none() {
        result.total_outstanding_balance = first_match(TOTAL_OUTSTANDING_BALANCE, text);
        if result.total_outstanding_balance.is_some() {
            recovered.push(Field::TotalOutstandingBalance);
        }
    }

    if !recovered.is_empty() {
        debug!("Fallback patterns recovered {:?}", recovered);
    }
    recovered
}

/// `****1234`, `XXXX 1234` or `ending: 1234`.
pub fn masked_card_number(text: &str) -> Option<String> {
    capture_first(&MASKED_CARD, text)
}

/// A 4-digit group within 30 characters after "Card", "Account" or "Ending".
pub fn card_number_near_label(text: &str) -> Option<String> {
    CARD_NEAR_LABEL
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Amount after a common balance label, normalized to a plain decimal.
pub fn labeled_balance(text: &str) -> Option<String> {
    let value = strip_thousands(&capture_first(&LABELED_BALANCE, text)?);
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    if value.contains('.') {
        Some(value)
    } else {
        Some(format!("{}.00", value))
    }
}

/// "day month-name year" range.
pub fn date_range(text: &str) -> Option<(String, String)> {
    let caps = DATE_RANGE.captures(text)?;
    let start = caps.get(1)?.as_str().to_string();
    let end = caps.get(2)?.as_str().to_string();
    Some((start, end))
}

pub fn payment_due_date_label(text: &str) -> Option<String> {
    capture_first(&PAYMENT_DUE_DATE, text)
}

pub fn due_date_label(text: &str) -> Option<String> {
    capture_first(&DUE_DATE, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_masked_card_variants() {
        assert_eq!(masked_card_number("Card **** 1234"), Some("1234".to_string()));
        assert_eq!(masked_card_number("xxxx5678"), Some("5678".to_string()));
        assert_eq!(masked_card_number("card ending: 4321"), Some("4321".to_string()));
        assert_eq!(masked_card_number("Card 1234"), None);
    }

    #[test]
    fn test_card_near_label() {
        assert_eq!(
            card_number_near_label("Account no. 55 0091 issued"),
            Some("0091".to_string())
        );
        assert_eq!(
            card_number_near_label("Card holder name is far too long before 1234"),
            None
        );
    }

    #[test]
    fn test_last_4_order() {
        // The masked pattern is tried before the proximity one.
        assert_eq!(
            first_match(LAST_4_DIGITS, "Card 9999 9999 ****1111"),
            Some("1111".to_string())
        );
        assert_eq!(first_match(LAST_4_DIGITS, "Card 2222"), Some("2222".to_string()));
    }

    #[test]
    fn test_labeled_balance_normalization() {
        assert_eq!(labeled_balance("Total Due: 1,234"), Some("1234.00".to_string()));
        assert_eq!(labeled_balance("Statement Balance 12,345.6"), Some("12345.6".to_string()));
        assert_eq!(labeled_balance("Current Balance: ₹ 980.50"), Some("980.50".to_string()));
        assert_eq!(labeled_balance("Amount Due: Rs. 75"), Some("75.00".to_string()));
        assert_eq!(labeled_balance("Minimum payment 500"), None);
    }

    #[test]
    fn test_date_range_separators() {
        for text in [
            "01 Jan 2024 to 31 Jan 2024",
            "01 Jan 2024 - 31 Jan 2024",
            "01 Jan 2024 – 31 Jan 2024",
            "01 Jan 2024—31 Jan 2024",
        ] {
            assert_eq!(
                date_range(text),
                Some(("01 Jan 2024".to_string(), "31 Jan 2024".to_string())),
                "{text}"
            );
        }
    }

    #[test]
    fn test_billing_cycle_is_atomic() {
        let text = StatementText::normalize("Cycle starts 01 Jan 2024 and runs a month");
        let mut result = ExtractionResult::default();
        resolve(&text, &mut result);

        assert_eq!(result.billing_cycle_start, None);
        assert_eq!(result.billing_cycle_end, None);
    }

    #[test]
    fn test_due_date_label_order() {
        assert_eq!(
            first_match(PAYMENT_DUE_DATE_STRATEGIES, "Due Date 02 Mar 2024 Payment Due Date: 05 Mar 2024"),
            Some("05 Mar 2024".to_string())
        );
        assert_eq!(
            first_match(PAYMENT_DUE_DATE_STRATEGIES, "Due Date: 02 March 2024"),
            Some("02 March 2024".to_string())
        );
    }

    #[test]
    fn test_resolve_leaves_found_fields_alone() {
        let text = StatementText::normalize("XXXX 5678 Total Due: 1,234");
        let mut result = ExtractionResult {
            last_4_digits: Some("0001".to_string()),
            ..Default::default()
        };

        let recovered = resolve(&text, &mut result);

        assert_eq!(recovered, vec![Field::TotalOutstandingBalance]);
        assert_eq!(result.last_4_digits.as_deref(), Some("0001"));
        assert_eq!(result.total_outstanding_balance.as_deref(), Some("1234.00"));
    }
}
