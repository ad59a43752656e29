//! Statement data models: normalized text and the extraction record.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statement::normalize::collapse_whitespace;

/// Date layouts printed by the supported issuers.
const DATE_FORMATS: &[&str] = &["%d %b %Y", "%d %B %Y", "%d/%m/%Y", "%d-%m-%Y"];

/// Normalized statement text: one line, single-spaced, trimmed.
///
/// The only way to build one is through [`StatementText::normalize`], so every
/// pattern downstream can assume the invariant holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StatementText(String);

impl StatementText {
    /// Normalize raw extracted text.
    pub fn normalize(raw: &str) -> Self {
        Self(collapse_whitespace(raw))
    }

    /// The normalized text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl AsRef<str> for StatementText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatementText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A field of the extraction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Issuer,
    Last4Digits,
    BillingCycleStart,
    BillingCycleEnd,
    PaymentDueDate,
    TotalOutstandingBalance,
}

impl Field {
    /// All fields in export column order.
    pub const ALL: [Field; 6] = [
        Field::Issuer,
        Field::Last4Digits,
        Field::BillingCycleStart,
        Field::BillingCycleEnd,
        Field::PaymentDueDate,
        Field::TotalOutstandingBalance,
    ];

    /// Column / key name used in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Issuer => "issuer",
            Field::Last4Digits => "last_4_digits",
            Field::BillingCycleStart => "billing_cycle_start",
            Field::BillingCycleEnd => "billing_cycle_end",
            Field::PaymentDueDate => "payment_due_date",
            Field::TotalOutstandingBalance => "total_outstanding_balance",
        }
    }

    /// Human readable label for front-ends.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Issuer => "Issuer",
            Field::Last4Digits => "Card (last 4 digits)",
            Field::BillingCycleStart => "Billing cycle start",
            Field::BillingCycleEnd => "Billing cycle end",
            Field::PaymentDueDate => "Payment due date",
            Field::TotalOutstandingBalance => "Total outstanding balance",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fields extracted from one statement.
///
/// Every field is optional: absence is a valid terminal state. Values are kept
/// as printed on the statement; only the balance is normalized (thousands
/// separators stripped, and `.00` appended when recovered by the generic
/// fallback without a decimal part).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Detected issuer name, as declared in the registry.
    pub issuer: Option<String>,

    /// Last four digits of the card number.
    pub last_4_digits: Option<String>,

    /// First day of the billing cycle.
    pub billing_cycle_start: Option<String>,

    /// Last day of the billing cycle.
    pub billing_cycle_end: Option<String>,

    /// Payment due date.
    pub payment_due_date: Option<String>,

    /// Total outstanding balance as a plain decimal string.
    pub total_outstanding_balance: Option<String>,
}

impl ExtractionResult {
    /// Value of a single field.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Issuer => self.issuer.as_deref(),
            Field::Last4Digits => self.last_4_digits.as_deref(),
            Field::BillingCycleStart => self.billing_cycle_start.as_deref(),
            Field::BillingCycleEnd => self.billing_cycle_end.as_deref(),
            Field::PaymentDueDate => self.payment_due_date.as_deref(),
            Field::TotalOutstandingBalance => self.total_outstanding_balance.as_deref(),
        }
    }

    /// Check whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Fields that were not found.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    /// Balance as a decimal number.
    pub fn balance_amount(&self) -> Option<Decimal> {
        self.total_outstanding_balance
            .as_deref()
            .and_then(|s| Decimal::from_str(s).ok())
    }

    /// Payment due date as a calendar date, when its layout is recognized.
    pub fn payment_due_on(&self) -> Option<NaiveDate> {
        self.payment_due_date.as_deref().and_then(parse_statement_date)
    }

    /// Billing cycle as calendar dates, when both ends are recognized.
    pub fn billing_cycle_dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.billing_cycle_start.as_deref().and_then(parse_statement_date)?;
        let end = self.billing_cycle_end.as_deref().and_then(parse_statement_date)?;
        Some((start, end))
    }
}

/// Parse a date in one of the layouts printed on statements.
pub fn parse_statement_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_statement_text_is_normalized() {
        let text = StatementText::normalize("  HDFC Bank\n\nTotal\tDue  \r\n 1,234 ");
        assert_eq!(text.as_str(), "HDFC Bank Total Due 1,234");
    }

    #[test]
    fn test_default_result_is_empty() {
        let result = ExtractionResult::default();
        assert!(result.is_empty());
        assert_eq!(result.missing_fields(), Field::ALL.to_vec());
    }

    #[test]
    fn test_serializes_nulls_in_column_order() {
        let result = ExtractionResult {
            issuer: Some("HDFC Bank".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"issuer":"HDFC Bank","last_4_digits":null,"billing_cycle_start":null,"billing_cycle_end":null,"payment_due_date":null,"total_outstanding_balance":null}"#
        );
    }

    #[test]
    fn test_typed_views() {
        let result = ExtractionResult {
            billing_cycle_start: Some("01 Jan 2024".to_string()),
            billing_cycle_end: Some("31/01/2024".to_string()),
            payment_due_date: Some("15 February 2024".to_string()),
            total_outstanding_balance: Some("5000.00".to_string()),
            ..Default::default()
        };

        assert_eq!(result.balance_amount(), Some(Decimal::new(500000, 2)));
        assert_eq!(result.payment_due_on(), NaiveDate::from_ymd_opt(2024, 2, 15));
        assert_eq!(
            result.billing_cycle_dates(),
            Some((
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
            ))
        );
    }

    #[test]
    fn test_unrecognized_date_layout() {
        assert_eq!(parse_statement_date("Jan 15th"), None);
        assert_eq!(parse_statement_date("15-02-2024"), NaiveDate::from_ymd_opt(2024, 2, 15));
    }
}
