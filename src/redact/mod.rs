//! Redaction: rule-based removal of identifying substrings
//!
//! The catalog is an ordered, auditable table of rules; the redactor applies
//! it with non-overlapping precedence and guarantees idempotence. Partial
//! redaction is never produced: any failure aborts the run.

pub mod catalog;
pub mod redactor;

pub use catalog::{RedactionCategory, RedactionRule, CATALOG};
pub use redactor::{RedactedText, RedactionResult, Redactor};
