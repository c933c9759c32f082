//! Rule-based redaction of identifying substrings
//!
//! `Redactor::redact` applies the catalog in precedence order and replaces
//! each match with its category placeholder. Matching is non-overlapping:
//! once a span is consumed by an earlier rule, later rules never match
//! inside it. Replacement runs back-to-front so byte offsets stay valid.
//!
//! Removing one match can expose another (a phone number glued to an email,
//! say), so a single pass is not a fixpoint. `redact` therefore re-runs the
//! pass until the text stabilizes, which makes idempotence hold by
//! construction: the returned text is itself a fixpoint.

use super::catalog::{RedactionCategory, RedactionRule, CATALOG};
use crate::error::{Error, Result};
use std::collections::BTreeMap;

/// Upper bound on stabilization passes. Real input settles in one or two;
/// hitting the bound means the rule set oscillates and the run must abort
/// rather than emit partially redacted text.
const MAX_PASSES: usize = 10;

/// Text that has passed through the Redactor.
///
/// Only this module can construct one, so any API that takes `RedactedText`
/// is structurally incapable of receiving raw memory content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedText(String);

impl RedactedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the redacted text line by line
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }
}

impl std::fmt::Display for RedactedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a redaction run: the cleaned text plus per-category counts
#[derive(Debug, Clone)]
pub struct RedactionResult {
    pub text: RedactedText,
    pub counts: BTreeMap<RedactionCategory, usize>,
}

impl RedactionResult {
    /// Total number of replacements across all categories
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Compact `email=2, url=1` summary for logs and CLI output
    pub fn summary(&self) -> String {
        self.counts
            .iter()
            .map(|(category, count)| format!("{}={}", category.label(), count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Applies the redaction catalog to raw text. Pure; no side effects.
pub struct Redactor {
    rules: &'static [RedactionRule],
}

impl Redactor {
    /// Redactor over the builtin catalog
    pub fn new() -> Self {
        Self { rules: &CATALOG }
    }

    /// Redact all catalog matches from `text`.
    ///
    /// Returns the placeholder-substituted text and a count of replacements
    /// per category. Guarantees: the output contains no substring matching
    /// any catalog rule, and re-redacting the output returns it unchanged.
    pub fn redact(&self, text: &str) -> Result<RedactionResult> {
        let mut current = text.to_string();
        let mut counts: BTreeMap<RedactionCategory, usize> = BTreeMap::new();

        for _ in 0..MAX_PASSES {
            let (next, pass_counts) = self.single_pass(&current);
            if pass_counts.is_empty() {
                return Ok(RedactionResult {
                    text: RedactedText(current),
                    counts,
                });
            }
            for (category, count) in pass_counts {
                *counts.entry(category).or_insert(0) += count;
            }
            current = next;
        }

        // Never emit text we could not bring to a fixpoint.
        Err(Error::Redaction(format!(
            "redaction did not stabilize within {} passes",
            MAX_PASSES
        )))
    }

    /// One precedence-ordered pass: collect non-overlapping matches for every
    /// rule, then substitute back-to-front.
    fn single_pass(&self, text: &str) -> (String, BTreeMap<RedactionCategory, usize>) {
        let mut consumed: Vec<(usize, usize, RedactionCategory)> = Vec::new();

        for rule in self.rules {
            for m in rule.pattern.find_iter(text) {
                let overlaps = consumed
                    .iter()
                    .any(|&(start, end, _)| m.start() < end && start < m.end());
                if !overlaps {
                    consumed.push((m.start(), m.end(), rule.category));
                }
            }
        }

        let mut counts: BTreeMap<RedactionCategory, usize> = BTreeMap::new();
        for &(_, _, category) in &consumed {
            *counts.entry(category).or_insert(0) += 1;
        }

        // Replace in reverse position order to keep earlier offsets valid.
        consumed.sort_by(|a, b| b.0.cmp(&a.0));
        let mut result = text.to_string();
        for (start, end, category) in consumed {
            result.replace_range(start..end, category.placeholder());
        }

        (result, counts)
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redact(text: &str) -> RedactionResult {
        Redactor::new().redact(text).unwrap()
    }

    #[test]
    fn test_redact_email() {
        let result = redact("Contact jane@acme.com for access");
        assert_eq!(result.text.as_str(), "Contact [EMAIL] for access");
        assert_eq!(result.counts[&RedactionCategory::Email], 1);
    }

    #[test]
    fn test_redact_multiple_categories() {
        let result = redact("Email jane@acme.com or call 555-123-4567");
        assert!(!result.text.as_str().contains("jane@acme.com"));
        assert!(!result.text.as_str().contains("555-123-4567"));
        assert_eq!(result.total(), 2);
    }

    #[test]
    fn test_url_wins_over_embedded_ip() {
        let result = redact("dashboard at http://10.0.0.1/admin today");
        assert_eq!(result.text.as_str(), "dashboard at [URL] today");
        assert!(!result.counts.contains_key(&RedactionCategory::IpAddress));
    }

    #[test]
    fn test_bare_ip_still_matched() {
        let result = redact("server 10.0.0.1 is primary");
        assert_eq!(result.text.as_str(), "server [IP] is primary");
    }

    #[test]
    fn test_customer_id() {
        let result = redact("customer ACME-2024-001 renewed");
        assert_eq!(result.text.as_str(), "customer [CUSTOMER_ID] renewed");
    }

    #[test]
    fn test_api_key_assignment() {
        let result = redact("set api_key = sk_live_abc123 in the env");
        assert!(!result.text.as_str().contains("sk_live_abc123"));
        assert_eq!(result.counts[&RedactionCategory::ApiKey], 1);
    }

    #[test]
    fn test_idempotence() {
        let redactor = Redactor::new();
        let inputs = [
            "Email jane@acme.com or visit https://acme.com, server 10.0.0.1",
            "Works with Jane Doe (jane@acme.com) on project Falcon, customer ACME-2024-001",
            "no identifying content at all",
            "token=abc123def456 and 555-123-4567 on 2024-03-15",
            // Adjacent values that only separate after the first pass
            "reach me at foo@bar.com123-456-7890 ok",
        ];
        for input in inputs {
            let once = redactor.redact(input).unwrap();
            let twice = redactor.redact(once.text.as_str()).unwrap();
            assert_eq!(once.text, twice.text, "not idempotent for: {input}");
            assert_eq!(twice.total(), 0, "second pass found matches for: {input}");
        }
    }

    #[test]
    fn test_closure_no_rule_matches_output() {
        let result = redact(
            "Jane jane@acme.com 555-123-4567 https://acme.com/x 10.0.0.1 \
             password=hunter2secret ACME-2024-001 123 Main Street 2024-03-15 Dr. Chen",
        );
        for rule in CATALOG.iter() {
            assert!(
                !rule.pattern.is_match(result.text.as_str()),
                "rule '{}' still matches output: {}",
                rule.category.label(),
                result.text.as_str()
            );
        }
    }

    #[test]
    fn test_counts_are_per_category() {
        let result = redact("a@x.com b@y.com and http://z.org");
        assert_eq!(result.counts[&RedactionCategory::Email], 2);
        assert_eq!(result.counts[&RedactionCategory::Url], 1);
    }

    #[test]
    fn test_summary_format() {
        let result = redact("a@x.com and http://z.org");
        let summary = result.summary();
        assert!(summary.contains("email=1"));
        assert!(summary.contains("url=1"));
    }

    #[test]
    fn test_clean_text_untouched() {
        let input = "prefers iterative prototyping over upfront design";
        let result = redact(input);
        assert_eq!(result.text.as_str(), input);
        assert_eq!(result.total(), 0);
    }

    #[test]
    fn test_pii_spanning_line_boundary_context() {
        // The matcher sees the whole text, so values straddling a line join
        // still redact when lines are concatenated with separators that the
        // pattern tolerates.
        let result = redact("contact:\njane@acme.com\nend");
        assert!(!result.text.as_str().contains("jane@acme.com"));
    }

    #[test]
    fn test_high_entropy_blob() {
        let result = redact(
            "cache key aGVsbG8gd29ybGQgdGhpcyBpcyBhIHNlY3JldCBibG9i12345 stored",
        );
        assert_eq!(result.counts[&RedactionCategory::Other], 1);
    }

    #[test]
    fn test_redacted_text_lines() {
        let result = redact("one jane@acme.com\ntwo");
        let lines: Vec<&str> = result.text.lines().collect();
        assert_eq!(lines, vec!["one [EMAIL]", "two"]);
    }
}
