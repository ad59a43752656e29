//! Issuer pattern registry.
//!
//! Each issuer is a plain record of four field patterns. The registry keeps
//! declaration order, which decides detection precedence. It is validated once
//! when built and is read-only afterwards.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

lazy_static! {
    static ref BUILTIN: Arc<IssuerRegistry> = Arc::new(
        IssuerRegistry::from_definitions(builtin_definitions())
            .expect("built-in issuer patterns are valid")
    );
}

/// Uncompiled issuer patterns, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IssuerDefinition {
    /// Issuer display name; its first word is the detection keyword.
    pub name: String,
    /// Pattern capturing the last four card digits.
    pub last_4_digits: String,
    /// Pattern capturing the cycle start (group 1) and end (group 2).
    pub billing_cycle: String,
    /// Pattern capturing the payment due date.
    pub payment_due_date: String,
    /// Pattern capturing the outstanding balance.
    pub total_outstanding_balance: String,
}

impl IssuerDefinition {
    pub fn new(
        name: impl Into<String>,
        last_4_digits: impl Into<String>,
        billing_cycle: impl Into<String>,
        payment_due_date: impl Into<String>,
        total_outstanding_balance: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            last_4_digits: last_4_digits.into(),
            billing_cycle: billing_cycle.into(),
            payment_due_date: payment_due_date.into(),
            total_outstanding_balance: total_outstanding_balance.into(),
        }
    }
}

/// A compiled issuer profile.
#[derive(Debug, Clone)]
pub struct IssuerProfile {
    name: String,
    keyword: String,
    last_4_digits: Regex,
    billing_cycle: Regex,
    payment_due_date: Regex,
    total_outstanding_balance: Regex,
}

impl IssuerProfile {
    /// Compile and validate a definition.
    pub fn compile(def: &IssuerDefinition) -> std::result::Result<Self, RegistryError> {
        let name = def.name.trim();
        let keyword = name
            .split_whitespace()
            .next()
            .ok_or(RegistryError::EmptyName)?
            .to_lowercase();

        let build = |field: &'static str,
                     pattern: &str,
                     exact: Option<usize>|
         -> std::result::Result<Regex, RegistryError> {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| RegistryError::InvalidPattern {
                    issuer: name.to_string(),
                    field,
                    source,
                })?;

            let groups = regex.captures_len() - 1;
            let (ok, expected) = match exact {
                Some(n) => (groups == n, "exactly 2"),
                None => (groups >= 1, "at least 1"),
            };
            if !ok {
                return Err(RegistryError::GroupCount {
                    issuer: name.to_string(),
                    field,
                    expected,
                    found: groups,
                });
            }
            Ok(regex)
        };

        Ok(Self {
            name: name.to_string(),
            keyword,
            last_4_digits: build("last_4_digits", &def.last_4_digits, None)?,
            billing_cycle: build("billing_cycle", &def.billing_cycle, Some(2))?,
            payment_due_date: build("payment_due_date", &def.payment_due_date, None)?,
            total_outstanding_balance: build(
                "total_outstanding_balance",
                &def.total_outstanding_balance,
                None,
            )?,
        })
    }

    /// Issuer display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercased first word of the name, used for detection.
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn last_4_digits(&self) -> &Regex {
        &self.last_4_digits
    }

    pub fn billing_cycle(&self) -> &Regex {
        &self.billing_cycle
    }

    pub fn payment_due_date(&self) -> &Regex {
        &self.payment_due_date
    }

    pub fn total_outstanding_balance(&self) -> &Regex {
        &self.total_outstanding_balance
    }
}

/// Ordered, immutable set of issuer profiles.
#[derive(Debug, Clone, Default)]
pub struct IssuerRegistry {
    profiles: Vec<IssuerProfile>,
}

impl IssuerRegistry {
    /// The shared built-in registry.
    pub fn builtin() -> Arc<IssuerRegistry> {
        Arc::clone(&BUILTIN)
    }

    /// Build a registry from definitions, keeping their order.
    pub fn from_definitions<I>(definitions: I) -> std::result::Result<Self, RegistryError>
    where
        I: IntoIterator<Item = IssuerDefinition>,
    {
        let mut seen = HashSet::new();
        let mut profiles = Vec::new();

        for def in definitions {
            let profile = IssuerProfile::compile(&def)?;
            if !seen.insert(profile.name.to_lowercase()) {
                return Err(RegistryError::DuplicateIssuer(profile.name));
            }
            profiles.push(profile);
        }

        Ok(Self { profiles })
    }

    /// Parse a JSON array of definitions.
    pub fn from_json(json: &str) -> std::result::Result<Self, RegistryError> {
        let definitions: Vec<IssuerDefinition> =
            serde_json::from_str(json).map_err(|e| RegistryError::Definition(e.to_string()))?;
        Self::from_definitions(definitions)
    }

    /// Load a JSON definitions file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Profiles in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &IssuerProfile> {
        self.profiles.iter()
    }

    /// Issuer names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name()).collect()
    }

    /// Look up a profile by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&IssuerProfile> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// The built-in issuer table, in detection order.
pub fn builtin_definitions() -> Vec<IssuerDefinition> {
    vec![
        IssuerDefinition::new(
            "HDFC Bank",
            r"\(.*?(\d{4})\)|(?:\*{4}|X{4})\s*(\d{4})",
            r"Statement Period\s*[:\-]?\s*(\d{1,2}\s\w{3,9}\s\d{4})\s*[-to–—]+\s*(\d{1,2}\s\w{3,9}\s\d{4})",
            r"Payment Due Date\s*[:\-]?\s*(\d{1,2}\s\w{3,9}\s\d{4})",
            r"Total\s*Amount\s*Due\s*[:\-]?\s*(?:INR|Rs\.|₹)?\s*([\d,]+\.?\d{0,2})",
        ),
        IssuerDefinition::new(
            "ICICI Bank",
            r"Card Number\s*[:\-]?\s*(?:XXXX|\*{4})\s*(\d{4})",
            r"Statement Period\s*[:\-]?\s*(\d{2}[/\-]\d{2}[/\-]\d{4})\s*to\s*(\d{2}[/\-]\d{2}[/\-]\d{4})",
            r"Payment Due Date\s*[:\-]?\s*(\d{2}[/\-]\d{2}[/\-]\d{4})",
            r"Total Outstanding\s*[:\-]?\s*(?:INR|₹)?\s*([\d,]+\.\d{2})",
        ),
        IssuerDefinition::new(
            "SBI Card",
            r"Card Number\s*[:\-]?\s*(?:XXXX|\*{4})\s*(\d{4})",
            r"Statement Date\s*[:\-]?\s*(\d{2}/\d{2}/\d{4})\s*to\s*(\d{2}/\d{2}/\d{4})",
            r"Due Date\s*[:\-]?\s*(\d{2}/\d{2}/\d{4})",
            r"Total Due\s*[:\-]?\s*(?:INR|₹)?\s*([\d,]+\.\d{2})",
        ),
        IssuerDefinition::new(
            "Axis Bank",
            r"Card Number\s*[:\-]?\s*(?:XXXX|\*{4})\s*(\d{4})",
            r"Statement Period\s*[:\-]?\s*(\d{2}/\d{2}/\d{4})\s*-\s*(\d{2}/\d{2}/\d{4})",
            r"Payment Due Date\s*[:\-]?\s*(\d{2}/\d{2}/\d{4})",
            r"Amount Due\s*[:\-]?\s*(?:INR|₹)?\s*([\d,]+\.\d{2})",
        ),
        IssuerDefinition::new(
            "Canara Bank",
            r"Card Number\s*Ending\s*[:\-]?\s*(\d{4})",
            r"Billing Period\s*[:\-]?\s*(\d{2}-\d{2}-\d{4})\s*to\s*(\d{2}-\d{2}-\d{4})",
            r"Payment Due Date\s*[:\-]?\s*(\d{2}-\d{2}-\d{4})",
            r"Outstanding Amount\s*[:\-]?\s*(?:INR|₹)?\s*([\d,]+\.\d{2})",
        ),
    ]
}
