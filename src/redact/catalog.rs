//! Static catalog of redaction rules
//!
//! The catalog is an ordered table of (pattern, category, placeholder)
//! entries compiled once into process-wide immutable state. Order is the
//! match precedence: longest-match classes come first so that, e.g., a full
//! URL is consumed before the bare IP fragment embedded in it.
//!
//! Placeholders are chosen so that no catalog pattern can match any
//! placeholder, which makes redaction idempotent (see redactor tests).

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Category of identifying data a rule detects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionCategory {
    Name,
    Email,
    Phone,
    Url,
    IpAddress,
    ApiKey,
    CustomerId,
    Address,
    Date,
    Other,
}

impl RedactionCategory {
    /// Fixed placeholder emitted for every match of this category
    pub fn placeholder(&self) -> &'static str {
        match self {
            RedactionCategory::Name => "[NAME]",
            RedactionCategory::Email => "[EMAIL]",
            RedactionCategory::Phone => "[PHONE]",
            RedactionCategory::Url => "[URL]",
            RedactionCategory::IpAddress => "[IP]",
            RedactionCategory::ApiKey => "[API_KEY]",
            RedactionCategory::CustomerId => "[CUSTOMER_ID]",
            RedactionCategory::Address => "[ADDRESS]",
            RedactionCategory::Date => "[DATE]",
            RedactionCategory::Other => "[REDACTED]",
        }
    }

    /// Short lowercase label used in logs and redaction reports
    pub fn label(&self) -> &'static str {
        match self {
            RedactionCategory::Name => "name",
            RedactionCategory::Email => "email",
            RedactionCategory::Phone => "phone",
            RedactionCategory::Url => "url",
            RedactionCategory::IpAddress => "ip_address",
            RedactionCategory::ApiKey => "api_key",
            RedactionCategory::CustomerId => "customer_id",
            RedactionCategory::Address => "address",
            RedactionCategory::Date => "date",
            RedactionCategory::Other => "other",
        }
    }
}

/// A single compiled redaction rule
#[derive(Debug)]
pub struct RedactionRule {
    pub category: RedactionCategory,
    pub pattern: Regex,
}

impl RedactionRule {
    fn new(category: RedactionCategory, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| {
            Error::Redaction(format!(
                "Invalid pattern for category '{}': {}",
                category.label(),
                e
            ))
        })?;
        Ok(Self { category, pattern })
    }
}

/// Source table: precedence order, one entry per rule.
///
/// Api-key assignments go before bare emails/URLs (the value side of a
/// `token=...` pair may itself look like another category); URLs go before
/// IP addresses; the high-entropy blob rule runs last as a catch-all for
/// credential-shaped strings no earlier rule claimed.
const RULE_TABLE: &[(RedactionCategory, &str)] = &[
    (
        RedactionCategory::ApiKey,
        r#"(?i)\b(?:api[_-]?key|secret|token|password)\s*[:=]\s*['"]?[A-Za-z0-9_\-./+]+['"]?"#,
    ),
    (RedactionCategory::Url, r"https?://[^\s)]+|\bwww\.[^\s)]+"),
    (
        RedactionCategory::Email,
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
    ),
    (RedactionCategory::IpAddress, r"\b(?:\d{1,3}\.){3}\d{1,3}\b"),
    (
        RedactionCategory::Phone,
        r"\b\+?1?[\s().-]*\d{3}[\s().-]*\d{3}[\s.-]?\d{4}\b",
    ),
    (
        RedactionCategory::CustomerId,
        r"\b[A-Z]{2,}-\d{2,4}-\d{2,}\b",
    ),
    (
        RedactionCategory::Address,
        r"\b\d+\s+[A-Z][A-Za-z]*\s+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way)\b\.?",
    ),
    (
        RedactionCategory::Date,
        r"\b\d{4}-\d{2}-\d{2}\b|\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\.?\s+\d{1,2},?\s+\d{4}\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b",
    ),
    (
        RedactionCategory::Name,
        r"\b(?:Mr|Mrs|Ms|Dr|Prof)\.?\s+[A-Z][a-z]+\b",
    ),
    (
        RedactionCategory::Other,
        r"\b[A-Za-z0-9+/]{40,}={0,2}\b",
    ),
];

/// Build the rule set from the source table, failing fast on any bad pattern.
pub fn build_rules() -> Result<Vec<RedactionRule>> {
    RULE_TABLE
        .iter()
        .map(|(category, pattern)| RedactionRule::new(*category, pattern))
        .collect()
}

/// Process-wide compiled catalog.
///
/// The table is static and every pattern is covered by tests, so a compile
/// failure here is a programming error, not a runtime condition.
pub static CATALOG: Lazy<Vec<RedactionRule>> =
    Lazy::new(|| build_rules().expect("builtin redaction rules must compile"));
